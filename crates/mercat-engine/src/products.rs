//! # Product Registry
//!
//! Holds product identities, tax-category parameters and accumulated
//! reviews, routed over the dual store backend.
//!
//! ## Backend Routing
//! Every operation resolves the backend mode once up front and then
//! runs exclusively against that store:
//!
//! - **Remote**: the remote collection is the source of truth for the
//!   call; reads fetch it fresh, writes address it (positionally where
//!   required), and successful writes opportunistically mirror the
//!   collection into the local documents.
//! - **Local**: the in-memory list is authoritative and every mutation
//!   rewrites the whole products document.
//!
//! The initial local load happens at [`ProductRegistry::open`]; a
//! missing products document there is fatal for the process, there is
//! no further fallback.

use tracing::{debug, warn};

use mercat_core::validation::{
    normalize_brand, price_within_limit, validate_mrp, validate_name, validate_rating,
};
use mercat_core::{Product, Review, TaxCategory, ValidationError};
use mercat_store::remote::EntityKind;
use mercat_store::{ActiveBackend, Backend, RemoteStore};

use crate::error::{EngineError, EngineResult};

/// Registry of all products in the marketplace.
#[derive(Debug)]
pub struct ProductRegistry {
    backend: Backend,
    /// Authoritative list in local mode; best-effort copy in remote
    /// mode so a later fallback to local still has the session's data.
    cache: Vec<Product>,
}

impl ProductRegistry {
    /// Opens the registry, loading the initial collection from the
    /// active backend. In local mode a missing products document is an
    /// error the caller treats as fatal.
    pub async fn open(backend: Backend) -> EngineResult<Self> {
        let cache = match backend.resolve().await {
            ActiveBackend::Remote(remote) => remote.fetch_products().await?,
            ActiveBackend::Local => backend.local().load_products().await?,
        };
        debug!(count = cache.len(), "product registry opened");
        Ok(ProductRegistry { backend, cache })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The active product collection for the current backend mode.
    pub async fn list(&self) -> EngineResult<Vec<Product>> {
        match self.backend.resolve().await {
            ActiveBackend::Remote(remote) => Ok(remote.fetch_products().await?),
            ActiveBackend::Local => Ok(self.cache.clone()),
        }
    }

    /// Case-insensitive exact-name lookup. Absence is a `None`, not an
    /// error.
    pub async fn find_by_name(&self, name: &str) -> EngineResult<Option<Product>> {
        let products = self.list().await?;
        Ok(products.into_iter().find(|p| p.is_named(name)))
    }

    /// Whether a product with this name exists (case-insensitive).
    pub async fn exists(&self, name: &str) -> EngineResult<bool> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    /// Products whose name or brand contains the search text.
    pub async fn search(&self, query: &str) -> EngineResult<Vec<Product>> {
        let products = self.list().await?;
        Ok(products
            .into_iter()
            .filter(|p| p.matches_query(query))
            .collect())
    }

    /// The reviews of a product, in insertion order.
    pub async fn reviews(&self, name: &str) -> EngineResult<Vec<Review>> {
        match self.find_by_name(name).await? {
            Some(product) => Ok(product.reviews),
            None => Err(EngineError::not_found("product", name)),
        }
    }

    /// A proposed catalogue price is acceptable only if SOME product's
    /// maximum retail price covers it.
    pub async fn price_within_limit(&self, candidate_price: f64) -> EngineResult<bool> {
        let products = self.list().await?;
        Ok(price_within_limit(&products, candidate_price))
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a product from primitive arguments.
    ///
    /// The category tag is parsed case-insensitively and is a closed
    /// set; `average_rating` is only consumed by REDUCED. The brand is
    /// normalized to title case. A duplicate name (case-insensitive) is
    /// a validation error and mutates nothing.
    pub async fn create(
        &mut self,
        name: &str,
        brand: &str,
        mrp: f64,
        category_tag: &str,
        average_rating: f64,
    ) -> EngineResult<Product> {
        validate_name("product name", name)?;
        validate_mrp(mrp)?;
        let category = TaxCategory::from_tag(category_tag, average_rating)?;
        if self.exists(name).await? {
            return Err(ValidationError::duplicate("product", name).into());
        }

        let product = Product::new(name, normalize_brand(brand), mrp, category);
        debug!(name = %product.name, category = category_tag, "creating product");

        match self.backend.resolve().await {
            ActiveBackend::Remote(remote) => {
                remote.append_product(&product).await?;
                self.cache.push(product.clone());
                self.mirror_products_from(remote).await;
            }
            ActiveBackend::Local => {
                self.cache.push(product.clone());
                self.backend.local().save_products(&self.cache).await?;
            }
        }
        Ok(product)
    }

    /// Withdraws a product from the active collection.
    ///
    /// Remote deletion is positional: the position is resolved with a
    /// fresh full-list scan immediately beforehand, since positions
    /// shift after every remote mutation. Catalogue entries referencing
    /// the product are NOT pruned; they dangle and resolve to "not
    /// listed" at pricing time.
    pub async fn remove(&mut self, name: &str) -> EngineResult<()> {
        match self.backend.resolve().await {
            ActiveBackend::Remote(remote) => {
                let mut products = remote.fetch_products().await?;
                let position = products
                    .iter()
                    .position(|p| p.is_named(name))
                    .ok_or_else(|| EngineError::not_found("product", name))?;
                remote.delete_at(EntityKind::Products, position).await?;
                products.remove(position);
                self.cache.retain(|p| !p.is_named(name));
                self.backend.mirror_products(&products).await;
            }
            ActiveBackend::Local => {
                let position = self
                    .cache
                    .iter()
                    .position(|p| p.is_named(name))
                    .ok_or_else(|| EngineError::not_found("product", name))?;
                self.cache.remove(position);
                self.backend.local().save_products(&self.cache).await?;
            }
        }
        debug!(name, "product withdrawn");
        Ok(())
    }

    /// Appends a review to a product and persists the change via
    /// update-in-place.
    pub async fn add_review(&mut self, name: &str, rating: u8, comment: &str) -> EngineResult<()> {
        validate_rating(rating)?;
        let review = Review::new(rating, comment);

        match self.backend.resolve().await {
            ActiveBackend::Remote(remote) => {
                let mut products = remote.fetch_products().await?;
                let position = products
                    .iter()
                    .position(|p| p.is_named(name))
                    .ok_or_else(|| EngineError::not_found("product", name))?;
                products[position].add_review(review.clone());
                remote.put_product_at(position, &products[position]).await?;
                if let Some(cached) = self.cache.iter_mut().find(|p| p.is_named(name)) {
                    cached.add_review(review);
                }
                self.backend.mirror_products(&products).await;
            }
            ActiveBackend::Local => {
                let position = self
                    .cache
                    .iter()
                    .position(|p| p.is_named(name))
                    .ok_or_else(|| EngineError::not_found("product", name))?;
                self.cache[position].add_review(review);
                self.backend.local().save_products(&self.cache).await?;
            }
        }
        Ok(())
    }

    // =========================================================================
    // Mirroring
    // =========================================================================

    /// Refreshes the local products document from the remote collection
    /// after a write that did not already have the full list at hand.
    /// Never fails the calling operation.
    async fn mirror_products_from(&self, remote: &RemoteStore) {
        match remote.fetch_products().await {
            Ok(products) => self.backend.mirror_products(&products).await,
            Err(err) => warn!(error = %err, "skipping local mirror after remote write"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
