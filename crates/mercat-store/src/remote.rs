//! # Remote Store Client
//!
//! HTTP client for the remote store. Each entity type lives under a
//! fixed resource path addressed by a group identifier:
//!
//! ```text
//! {base_url}/{group_id}/products        GET all | POST append
//! {base_url}/{group_id}/products/{pos}  PUT update | DELETE remove
//! {base_url}/{group_id}/shops           GET all | POST append
//! {base_url}/{group_id}/shops/{pos}     PUT update | DELETE remove
//! ```
//!
//! Deletion and update are POSITIONAL, not by identity: positions shift
//! after every remote mutation, so callers resolve the position with a
//! full list scan immediately before addressing it.
//!
//! Connect and request timeouts are engine-imposed; there is no retry
//! loop here. A failed call surfaces as a [`StoreError`] and the backend
//! mode is re-probed on the next operation.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::Url;

use mercat_core::{Product, Shop};

use crate::codec;
use crate::config::RemoteConfig;
use crate::error::{StoreError, StoreResult};

// =============================================================================
// Entity Kind
// =============================================================================

/// Which remote collection an operation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Products,
    Shops,
}

impl EntityKind {
    /// Resource path segment for this entity type.
    pub const fn path(&self) -> &'static str {
        match self {
            EntityKind::Products => "products",
            EntityKind::Shops => "shops",
        }
    }
}

// =============================================================================
// Remote Store
// =============================================================================

/// Client for the remote store service.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Client,
    base_url: Url,
    group_id: String,
}

impl RemoteStore {
    /// Builds a client for `config`, applying its connect and request
    /// timeouts.
    pub fn new(config: &RemoteConfig) -> StoreResult<Self> {
        let base_url = Url::parse(config.base_url.trim_end_matches('/'))?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::InvalidConfig(e.to_string()))?;
        Ok(RemoteStore {
            client,
            base_url,
            group_id: config.group_id.clone(),
        })
    }

    /// Probes the remote store with a HEAD request against the base
    /// URL. Any transport failure or non-success status means inactive;
    /// callers re-probe before every operation rather than caching the
    /// answer for a session.
    pub async fn is_active(&self) -> bool {
        match self.client.head(self.base_url.clone()).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!(url = %self.base_url, error = %err, "remote store probe failed");
                false
            }
        }
    }

    // =========================================================================
    // Typed Operations
    // =========================================================================

    /// Fetches the whole products collection.
    pub async fn fetch_products(&self) -> StoreResult<Vec<Product>> {
        self.fetch(EntityKind::Products).await
    }

    /// Fetches the whole shops collection. Shops without a usable name
    /// are dropped.
    pub async fn fetch_shops(&self) -> StoreResult<Vec<Shop>> {
        let mut shops: Vec<Shop> = self.fetch(EntityKind::Shops).await?;
        shops.retain(|shop| !shop.name.trim().is_empty());
        Ok(shops)
    }

    /// Appends a product to the remote collection.
    pub async fn append_product(&self, product: &Product) -> StoreResult<()> {
        self.append(EntityKind::Products, product).await
    }

    /// Appends a shop to the remote collection.
    pub async fn append_shop(&self, shop: &Shop) -> StoreResult<()> {
        self.append(EntityKind::Shops, shop).await
    }

    /// Replaces the product at `position` in place.
    pub async fn put_product_at(&self, position: usize, product: &Product) -> StoreResult<()> {
        self.put_at(EntityKind::Products, position, product).await
    }

    /// Replaces the shop at `position` in place.
    pub async fn put_shop_at(&self, position: usize, shop: &Shop) -> StoreResult<()> {
        self.put_at(EntityKind::Shops, position, shop).await
    }

    /// Deletes the record at `position`. Positions shift after every
    /// mutation; resolve the position immediately before calling this.
    pub async fn delete_at(&self, kind: EntityKind, position: usize) -> StoreResult<()> {
        let url = self.position_url(kind, position)?;
        debug!(%url, "remote delete");
        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        check_status(&url, response.status())
    }

    // =========================================================================
    // Generic HTTP Plumbing
    // =========================================================================

    async fn fetch<T: DeserializeOwned>(&self, kind: EntityKind) -> StoreResult<Vec<T>> {
        let url = self.collection_url(kind)?;
        debug!(%url, "remote fetch");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        check_status(&url, response.status())?;
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(&url, e))?;
        codec::decode_collection_str(&text, url.as_str())
    }

    async fn append<T: Serialize>(&self, kind: EntityKind, entity: &T) -> StoreResult<()> {
        let url = self.collection_url(kind)?;
        debug!(%url, "remote append");
        let response = self
            .client
            .post(url.clone())
            .json(entity)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        check_status(&url, response.status())
    }

    async fn put_at<T: Serialize>(
        &self,
        kind: EntityKind,
        position: usize,
        entity: &T,
    ) -> StoreResult<()> {
        let url = self.position_url(kind, position)?;
        debug!(%url, "remote put");
        let response = self
            .client
            .put(url.clone())
            .json(entity)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;
        check_status(&url, response.status())
    }

    // =========================================================================
    // Endpoint Construction
    // =========================================================================

    fn collection_url(&self, kind: EntityKind) -> StoreResult<Url> {
        let url = format!(
            "{}/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.group_id,
            kind.path()
        );
        Ok(Url::parse(&url)?)
    }

    fn position_url(&self, kind: EntityKind, position: usize) -> StoreResult<Url> {
        let url = format!(
            "{}/{}/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            self.group_id,
            kind.path(),
            position
        );
        Ok(Url::parse(&url)?)
    }
}

/// Maps a reqwest transport failure onto the store error taxonomy.
fn transport_error(url: &Url, err: reqwest::Error) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout {
            url: url.to_string(),
        }
    } else {
        StoreError::Unreachable {
            url: url.to_string(),
            detail: err.to_string(),
        }
    }
}

/// Turns a non-success status into a [`StoreError::Status`].
fn check_status(url: &Url, status: reqwest::StatusCode) -> StoreResult<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(StoreError::Status {
            code: status.as_u16(),
            url: url.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> RemoteStore {
        RemoteStore::new(&RemoteConfig::new(
            "https://store.example/api/",
            "mercat-demo",
        ))
        .unwrap()
    }

    #[test]
    fn test_collection_url_per_entity_under_group() {
        let store = remote();
        assert_eq!(
            store.collection_url(EntityKind::Products).unwrap().as_str(),
            "https://store.example/api/mercat-demo/products"
        );
        assert_eq!(
            store.collection_url(EntityKind::Shops).unwrap().as_str(),
            "https://store.example/api/mercat-demo/shops"
        );
    }

    #[test]
    fn test_position_url_is_positional() {
        let store = remote();
        assert_eq!(
            store.position_url(EntityKind::Shops, 4).unwrap().as_str(),
            "https://store.example/api/mercat-demo/shops/4"
        );
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let result = RemoteStore::new(&RemoteConfig::new("not a url", "g"));
        assert!(matches!(result, Err(StoreError::InvalidUrl(_))));
    }
}
