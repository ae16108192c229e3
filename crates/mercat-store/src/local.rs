//! # Local Store
//!
//! Persists each registry as one ordered JSON array document:
//! `products.json` and `shops.json` under the configured data dir. The
//! collection itself is the record; there is no per-entity addressing.
//!
//! The products document must exist before the first load (there is no
//! fallback below the local store), while a missing shops document is
//! initialized to an empty collection on first access.

use std::path::{Path, PathBuf};

use tracing::debug;

use mercat_core::{Product, Shop};

use crate::codec;
use crate::error::{StoreError, StoreResult};

/// File name of the products collection document.
pub const PRODUCTS_DOCUMENT: &str = "products.json";

/// File name of the shops collection document.
pub const SHOPS_DOCUMENT: &str = "shops.json";

/// Single-document JSON store for both entity collections.
#[derive(Debug, Clone)]
pub struct LocalStore {
    products_path: PathBuf,
    shops_path: PathBuf,
}

impl LocalStore {
    /// Creates a store over `data_dir`. The directory is created lazily
    /// on the first write.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        LocalStore {
            products_path: data_dir.join(PRODUCTS_DOCUMENT),
            shops_path: data_dir.join(SHOPS_DOCUMENT),
        }
    }

    pub fn products_path(&self) -> &Path {
        &self.products_path
    }

    pub fn shops_path(&self) -> &Path {
        &self.shops_path
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Loads the whole products collection.
    ///
    /// A missing document is an error: the caller treats it as fatal at
    /// startup.
    pub async fn load_products(&self) -> StoreResult<Vec<Product>> {
        let text = self.read_document(&self.products_path, false).await?;
        codec::decode_collection_str(&text, PRODUCTS_DOCUMENT)
    }

    /// Replaces the whole products collection.
    pub async fn save_products(&self, products: &[Product]) -> StoreResult<()> {
        debug!(count = products.len(), "saving products document");
        let text = codec::encode_collection(products, PRODUCTS_DOCUMENT)?;
        self.write_document(&self.products_path, &text).await
    }

    // =========================================================================
    // Shops
    // =========================================================================

    /// Loads the whole shops collection, initializing an empty document
    /// if none exists yet. Shops without a usable name are dropped.
    pub async fn load_shops(&self) -> StoreResult<Vec<Shop>> {
        let text = self.read_document(&self.shops_path, true).await?;
        let mut shops: Vec<Shop> = codec::decode_collection_str(&text, SHOPS_DOCUMENT)?;
        shops.retain(|shop| !shop.name.trim().is_empty());
        Ok(shops)
    }

    /// Replaces the whole shops collection.
    pub async fn save_shops(&self, shops: &[Shop]) -> StoreResult<()> {
        debug!(count = shops.len(), "saving shops document");
        let text = codec::encode_collection(shops, SHOPS_DOCUMENT)?;
        self.write_document(&self.shops_path, &text).await
    }

    // =========================================================================
    // Document I/O
    // =========================================================================

    async fn read_document(&self, path: &Path, initialize_missing: bool) -> StoreResult<String> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                if initialize_missing {
                    self.write_document(path, "[]").await?;
                    Ok("[]".to_string())
                } else {
                    Err(StoreError::DocumentMissing {
                        path: path.to_path_buf(),
                    })
                }
            }
            Err(err) => Err(StoreError::DocumentIo {
                path: path.to_path_buf(),
                source: err,
            }),
        }
    }

    async fn write_document(&self, path: &Path, text: &str) -> StoreResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| StoreError::DocumentIo {
                    path: parent.to_path_buf(),
                    source: err,
                })?;
        }
        tokio::fs::write(path, text)
            .await
            .map_err(|err| StoreError::DocumentIo {
                path: path.to_path_buf(),
                source: err,
            })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mercat_core::{BusinessModel, TaxCategory};

    fn store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        (dir, store)
    }

    #[tokio::test]
    async fn test_missing_products_document_is_an_error() {
        let (_dir, store) = store();
        let result = store.load_products().await;
        assert!(matches!(result, Err(StoreError::DocumentMissing { .. })));
    }

    #[tokio::test]
    async fn test_missing_shops_document_initializes_empty() {
        let (_dir, store) = store();
        let shops = store.load_shops().await.unwrap();
        assert!(shops.is_empty());
        // The document now exists on disk.
        assert!(store.shops_path().exists());
    }

    #[tokio::test]
    async fn test_products_round_trip() {
        let (_dir, store) = store();
        let mut product = Product::new(
            "Olive Oil",
            "Borges",
            12.5,
            TaxCategory::Reduced {
                average_rating: 4.0,
            },
        );
        product.add_review(mercat_core::Review::new(5, "excellent"));

        store.save_products(&[product.clone()]).await.unwrap();
        let loaded = store.load_products().await.unwrap();
        assert_eq!(loaded, vec![product]);
    }

    #[tokio::test]
    async fn test_shops_round_trip_keeps_order() {
        let (_dir, store) = store();
        let mut first = Shop::new(
            "Can Petra",
            "corner store",
            1987,
            BusinessModel::Loyalty {
                loyalty_threshold: 300.0,
            },
        );
        first.add_entry("Olive Oil", 10.0);
        let second = Shop::new(
            "Mercat Vell",
            "market hall",
            1874,
            BusinessModel::Sponsored {
                sponsor_brand: "Borges".to_string(),
            },
        );

        store
            .save_shops(&[first.clone(), second.clone()])
            .await
            .unwrap();
        let loaded = store.load_shops().await.unwrap();
        assert_eq!(loaded, vec![first, second]);
    }

    #[tokio::test]
    async fn test_nameless_shops_are_dropped_on_load() {
        let (_dir, store) = store();
        tokio::fs::create_dir_all(store.shops_path().parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(
            store.shops_path(),
            r#"[
                {"name": "", "description": "d", "since": 2000,
                 "businessModel": "MAX_PROFIT", "earnings": 0.0, "catalogue": []},
                {"name": "Mercat Vell", "description": "d", "since": 1874,
                 "businessModel": "MAX_PROFIT", "earnings": 0.0, "catalogue": []}
            ]"#,
        )
        .await
        .unwrap();

        let shops = store.load_shops().await.unwrap();
        assert_eq!(shops.len(), 1);
        assert_eq!(shops[0].name, "Mercat Vell");
    }
}
