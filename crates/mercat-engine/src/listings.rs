//! # Cross-Registry Listing Operations
//!
//! Operations that need both registries at once: expanding a shop's
//! catalogue (which cross-checks the product registry) and resolving a
//! catalogue into actual products.
//!
//! Catalogue entries reference products by name only, so a resolution
//! can encounter dangling entries; those are skipped, never failures.

use mercat_core::validation::validate_price;
use mercat_core::{Product, ValidationError};

use crate::error::{EngineError, EngineResult};
use crate::products::ProductRegistry;
use crate::shops::ShopRegistry;

/// Lists a product in a shop's catalogue at the given price.
///
/// Checks, in order: the shop exists, the product exists, the price is
/// non-negative, and SOME product's maximum retail price covers the
/// proposed price (the global any-product rule). Only then is the entry
/// appended; the append itself is unconditional and allows duplicates.
pub async fn expand_catalogue(
    products: &ProductRegistry,
    shops: &mut ShopRegistry,
    shop_name: &str,
    product_name: &str,
    price: f64,
) -> EngineResult<()> {
    if !shops.exists(shop_name).await? {
        return Err(EngineError::not_found("shop", shop_name));
    }
    if !products.exists(product_name).await? {
        return Err(EngineError::not_found("product", product_name));
    }
    validate_price(price)?;
    if !products.price_within_limit(price).await? {
        return Err(ValidationError::PriceAboveEveryMrp { price }.into());
    }
    shops.add_to_catalogue(shop_name, product_name, price).await
}

/// Resolves a shop's catalogue entries into products, in catalogue
/// order. Dangling entries (the product was withdrawn) are skipped; an
/// unknown shop yields an empty list.
pub async fn products_in_catalogue(
    products: &ProductRegistry,
    shops: &ShopRegistry,
    shop_name: &str,
) -> EngineResult<Vec<Product>> {
    let catalogue = shops.catalogue(shop_name).await?;
    let all_products = products.list().await?;

    let mut resolved = Vec::with_capacity(catalogue.len());
    for entry in catalogue {
        if let Some(product) = all_products
            .iter()
            .find(|p| p.is_named(&entry.product_name))
        {
            resolved.push(product.clone());
        }
    }
    Ok(resolved)
}

// =============================================================================
// Unit Tests
// =============================================================================
