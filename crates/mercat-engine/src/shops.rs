//! # Shop Registry
//!
//! Holds shop identities, discount-model parameters, catalogues and
//! cumulative earnings, and owns the loyalty transition.
//!
//! ## Loyalty Transition
//! ```text
//! checkout posts a per-shop earnings batch
//!       │
//!       ▼
//! add_earnings(shop, amount)
//!       │  status before ── apply amount ── status after
//!       ▼
//! newly_regular = after is REGULAR and before was not
//! ```
//!
//! Earnings only ever grow, so `REGULAR` is absorbing: once a LOYALTY
//! shop's cumulative earnings meet its threshold the status never
//! reverts, and the transition is reported exactly once. A shop loaded
//! with earnings already at or above its threshold starts out `REGULAR`
//! without a transition event.

use tracing::{debug, warn};

use mercat_core::validation::validate_name;
use mercat_core::{BusinessModel, CatalogueEntry, CustomerStatus, Shop, ValidationError};
use mercat_store::{ActiveBackend, Backend, RemoteStore};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Earnings Posting
// =============================================================================

/// Outcome of one per-shop earnings posting.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EarningsPosting {
    pub shop_name: String,
    /// The batched amount posted by this checkout.
    pub amount: f64,
    /// Historic cumulative earnings after the posting.
    pub total_earnings: f64,
    /// Whether this posting crossed the loyalty threshold. True at most
    /// once per shop lifetime.
    pub newly_regular: bool,
}

// =============================================================================
// Shop Registry
// =============================================================================

/// Registry of all shops in the marketplace.
#[derive(Debug)]
pub struct ShopRegistry {
    backend: Backend,
    /// Authoritative list in local mode; best-effort copy in remote
    /// mode.
    cache: Vec<Shop>,
}

impl ShopRegistry {
    /// Opens the registry. A missing local shops document is
    /// initialized to an empty collection rather than treated as fatal.
    pub async fn open(backend: Backend) -> EngineResult<Self> {
        let cache = match backend.resolve().await {
            ActiveBackend::Remote(remote) => remote.fetch_shops().await?,
            ActiveBackend::Local => backend.local().load_shops().await?,
        };
        debug!(count = cache.len(), "shop registry opened");
        Ok(ShopRegistry { backend, cache })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The active shop collection for the current backend mode.
    pub async fn list(&self) -> EngineResult<Vec<Shop>> {
        match self.backend.resolve().await {
            ActiveBackend::Remote(remote) => Ok(remote.fetch_shops().await?),
            ActiveBackend::Local => Ok(self.cache.clone()),
        }
    }

    /// Case-insensitive exact-name lookup.
    pub async fn find_by_name(&self, name: &str) -> EngineResult<Option<Shop>> {
        let shops = self.list().await?;
        Ok(shops.into_iter().find(|s| s.is_named(name)))
    }

    /// Whether a shop with this name exists (case-insensitive).
    pub async fn exists(&self, name: &str) -> EngineResult<bool> {
        Ok(self.find_by_name(name).await?.is_some())
    }

    /// The catalogue of a shop, empty when the shop does not exist.
    pub async fn catalogue(&self, shop_name: &str) -> EngineResult<Vec<CatalogueEntry>> {
        Ok(self
            .find_by_name(shop_name)
            .await?
            .map(|shop| shop.catalogue)
            .unwrap_or_default())
    }

    /// The listed price of a product at a shop. `None` when the shop
    /// does not exist or does not list the product; with duplicate
    /// catalogue entries the last one's price wins.
    pub async fn price_at(&self, shop_name: &str, product_name: &str) -> EngineResult<Option<f64>> {
        Ok(self
            .find_by_name(shop_name)
            .await?
            .and_then(|shop| shop.price_at(product_name)))
    }

    /// Every shop whose catalogue currently lists the product.
    pub async fn shops_selling(&self, product_name: &str) -> EngineResult<Vec<Shop>> {
        let shops = self.list().await?;
        Ok(shops
            .into_iter()
            .filter(|shop| shop.sells(product_name))
            .collect())
    }

    /// Collective customer status at a shop (LOYALTY shops only; every
    /// other model is permanently `NotRegular`).
    pub async fn customer_status(&self, shop_name: &str) -> EngineResult<CustomerStatus> {
        match self.find_by_name(shop_name).await? {
            Some(shop) => Ok(shop.customer_status()),
            None => Err(EngineError::not_found("shop", shop_name)),
        }
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Creates a shop from primitive arguments.
    ///
    /// `loyalty_threshold` is only consumed by LOYALTY and
    /// `sponsor_brand` is required for SPONSORED. Earnings start at
    /// zero with an empty catalogue.
    pub async fn create(
        &mut self,
        name: &str,
        description: &str,
        since: i32,
        model_tag: &str,
        loyalty_threshold: f64,
        sponsor_brand: Option<&str>,
    ) -> EngineResult<Shop> {
        validate_name("shop name", name)?;
        let business_model = BusinessModel::from_tag(model_tag, loyalty_threshold, sponsor_brand)?;
        if self.exists(name).await? {
            return Err(ValidationError::duplicate("shop", name).into());
        }

        let shop = Shop::new(name, description, since, business_model);
        debug!(name = %shop.name, model = model_tag, "creating shop");

        match self.backend.resolve().await {
            ActiveBackend::Remote(remote) => {
                remote.append_shop(&shop).await?;
                self.cache.push(shop.clone());
                self.mirror_shops_from(remote).await;
            }
            ActiveBackend::Local => {
                self.cache.push(shop.clone());
                self.backend.local().save_shops(&self.cache).await?;
            }
        }
        Ok(shop)
    }

    /// Appends a catalogue entry for the shop, unconditionally: no
    /// duplicate check is made here, and the price/product cross-checks
    /// belong to the caller (see [`crate::listings`]).
    pub async fn add_to_catalogue(
        &mut self,
        shop_name: &str,
        product_name: &str,
        price: f64,
    ) -> EngineResult<()> {
        let product_name = product_name.to_string();
        self.update_shop(shop_name, move |shop| {
            shop.add_entry(product_name, price);
        })
        .await
    }

    /// Removes the LAST catalogue entry matching the product (earlier
    /// duplicates survive) and reports whether an entry was removed.
    pub async fn remove_from_catalogue(
        &mut self,
        shop_name: &str,
        product_name: &str,
    ) -> EngineResult<bool> {
        let product_name = product_name.to_string();
        self.update_shop(shop_name, move |shop| shop.remove_entry(&product_name))
            .await
    }

    /// Posts a batched earnings amount to a shop and evaluates the
    /// loyalty transition after the full amount is applied.
    pub async fn add_earnings(
        &mut self,
        shop_name: &str,
        amount: f64,
    ) -> EngineResult<EarningsPosting> {
        self.update_shop(shop_name, move |shop| {
            let before = shop.customer_status();
            shop.earnings += amount;
            let after = shop.customer_status();
            EarningsPosting {
                shop_name: shop.name.clone(),
                amount,
                total_earnings: shop.earnings,
                newly_regular: after.is_regular() && !before.is_regular(),
            }
        })
        .await
    }

    // =========================================================================
    // Routed Mutation
    // =========================================================================

    /// Applies a mutation to one shop through the active backend.
    ///
    /// Remote mode resolves the shop's position with a fresh full-list
    /// scan immediately before the positional update, writes the shop
    /// back in place, then mirrors the collection locally. Local mode
    /// mutates the in-memory list and rewrites the shops document.
    async fn update_shop<F, R>(&mut self, shop_name: &str, mutate: F) -> EngineResult<R>
    where
        F: FnOnce(&mut Shop) -> R,
    {
        match self.backend.resolve().await {
            ActiveBackend::Remote(remote) => {
                let mut shops = remote.fetch_shops().await?;
                let position = shops
                    .iter()
                    .position(|s| s.is_named(shop_name))
                    .ok_or_else(|| EngineError::not_found("shop", shop_name))?;
                let result = mutate(&mut shops[position]);
                remote.put_shop_at(position, &shops[position]).await?;
                if let Some(cached) = self.cache.iter_mut().find(|s| s.is_named(shop_name)) {
                    *cached = shops[position].clone();
                }
                self.backend.mirror_shops(&shops).await;
                Ok(result)
            }
            ActiveBackend::Local => {
                let position = self
                    .cache
                    .iter()
                    .position(|s| s.is_named(shop_name))
                    .ok_or_else(|| EngineError::not_found("shop", shop_name))?;
                let result = mutate(&mut self.cache[position]);
                self.backend.local().save_shops(&self.cache).await?;
                Ok(result)
            }
        }
    }

    /// Refreshes the local shops document from the remote collection.
    /// Never fails the calling operation.
    async fn mirror_shops_from(&self, remote: &RemoteStore) {
        match remote.fetch_shops().await {
            Ok(shops) => self.backend.mirror_shops(&shops).await,
            Err(err) => warn!(error = %err, "skipping local mirror after remote write"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
