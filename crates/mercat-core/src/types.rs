//! # Domain Types
//!
//! Core domain types for the Mercat marketplace.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌────────────────┐      ┌────────────────┐     ┌────────────────┐  │
//! │  │    Product     │      │      Shop      │     │ CatalogueEntry │  │
//! │  │  ────────────  │      │  ────────────  │     │  ────────────  │  │
//! │  │  name (key)    │      │  name (key)    │     │  productName   │  │
//! │  │  brand         │ ◄┄┄┄ │  description   │────►│  priceAtShop   │  │
//! │  │  mrp           │ name │  since         │     └────────────────┘  │
//! │  │  category      │ ref  │  businessModel │                         │
//! │  │  reviews[]     │      │  earnings      │     ┌────────────────┐  │
//! │  └────────────────┘      │  catalogue[]   │     │     Review     │  │
//! │                          └────────────────┘     │  rating 1-5    │  │
//! │                                                 │  comment       │  │
//! │                                                 └────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity and References
//! Entities are identified by their case-insensitive name; there are no
//! surrogate ids. A `CatalogueEntry` references its product by name only,
//! so dangling references are a normal "not found" condition, never a
//! crash.
//!
//! ## Persisted Shape
//! The serde attributes on these types ARE the persisted record shape:
//! camelCase field names, with `category` / `businessModel` as internal
//! tags carrying the variant-specific parameter (`averageRating`,
//! `loyaltyThreshold`, `sponsorBrand`). Local files, remote payloads and
//! round-trip tests all share this single definition.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Case-insensitive name comparison used for every entity lookup.
pub fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

// =============================================================================
// Tax Category
// =============================================================================

/// The tax category of a product.
///
/// A closed enumeration: an unrecognized tag is a construction-time error
/// (see [`TaxCategory::from_tag`]), never a pricing-time one. The REDUCED
/// category carries the quality signal its rate depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaxCategory {
    /// Standard rate.
    General,
    /// Reduced rate, cheaper still for highly rated products.
    Reduced {
        #[serde(rename = "averageRating")]
        average_rating: f64,
    },
    /// Super-reduced rate for low-priced products.
    SuperReduced,
}

impl TaxCategory {
    /// Parses a category tag (case-insensitive).
    ///
    /// `average_rating` is only meaningful for `REDUCED`; it is ignored
    /// for the other categories.
    pub fn from_tag(tag: &str, average_rating: f64) -> Result<Self, ValidationError> {
        match tag.to_uppercase().as_str() {
            "GENERAL" => Ok(TaxCategory::General),
            "REDUCED" => Ok(TaxCategory::Reduced { average_rating }),
            "SUPER_REDUCED" => Ok(TaxCategory::SuperReduced),
            _ => Err(ValidationError::UnknownTag {
                field: "category".to_string(),
                value: tag.to_string(),
            }),
        }
    }

    /// The wire tag for this category.
    pub const fn tag(&self) -> &'static str {
        match self {
            TaxCategory::General => "GENERAL",
            TaxCategory::Reduced { .. } => "REDUCED",
            TaxCategory::SuperReduced => "SUPER_REDUCED",
        }
    }
}

// =============================================================================
// Review
// =============================================================================

/// A product review: a star rating and a free-text comment.
///
/// Owned exclusively by its product, immutable once created, kept in
/// insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub rating: u8,
    pub comment: String,
}

impl Review {
    pub fn new(rating: u8, comment: impl Into<String>) -> Self {
        Review {
            rating,
            comment: comment.into(),
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the marketplace registry.
///
/// `mrp` is the manufacturer's maximum retail price, the ceiling used by
/// the global catalogue-price check; the price a shop actually lists may
/// differ per catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub name: String,
    pub brand: String,
    pub mrp: f64,
    #[serde(flatten)]
    pub category: TaxCategory,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// Creates a product with no reviews.
    pub fn new(
        name: impl Into<String>,
        brand: impl Into<String>,
        mrp: f64,
        category: TaxCategory,
    ) -> Self {
        Product {
            name: name.into(),
            brand: brand.into(),
            mrp,
            category,
            reviews: Vec::new(),
        }
    }

    /// Case-insensitive identity check against `name`.
    pub fn is_named(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }

    /// Whether the search text appears in the name or the brand
    /// (case-insensitive substring match).
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query) || self.brand.to_lowercase().contains(&query)
    }

    /// Appends a review. Reviews keep their insertion order.
    pub fn add_review(&mut self, review: Review) {
        self.reviews.push(review);
    }

    /// Average of the review ratings, rounded to two decimals.
    /// 0.0 when there are no reviews.
    pub fn review_average(&self) -> f64 {
        if self.reviews.is_empty() {
            return 0.0;
        }
        let total: u32 = self.reviews.iter().map(|r| u32::from(r.rating)).sum();
        let average = f64::from(total) / self.reviews.len() as f64;
        (average * 100.0).round() / 100.0
    }
}

// =============================================================================
// Business Model
// =============================================================================

/// The discount model a shop operates under.
///
/// Each variant carries exactly the parameter its discount behavior
/// needs; there is no fallthrough case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "businessModel", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessModel {
    /// No discount of any kind.
    MaxProfit,
    /// No price discount; cumulative earnings crossing the threshold
    /// grant customers "regular" status (see `CustomerStatus`).
    Loyalty {
        #[serde(rename = "loyaltyThreshold")]
        loyalty_threshold: f64,
    },
    /// 10% off products of the sponsoring brand.
    Sponsored {
        #[serde(rename = "sponsorBrand")]
        sponsor_brand: String,
    },
}

impl BusinessModel {
    /// Parses a business-model tag (case-insensitive).
    ///
    /// `loyalty_threshold` is read only for `LOYALTY`; `sponsor_brand`
    /// is required for `SPONSORED` and ignored otherwise.
    pub fn from_tag(
        tag: &str,
        loyalty_threshold: f64,
        sponsor_brand: Option<&str>,
    ) -> Result<Self, ValidationError> {
        match tag.to_uppercase().as_str() {
            "MAX_PROFIT" => Ok(BusinessModel::MaxProfit),
            "LOYALTY" => Ok(BusinessModel::Loyalty { loyalty_threshold }),
            "SPONSORED" => match sponsor_brand {
                Some(brand) if !brand.trim().is_empty() => Ok(BusinessModel::Sponsored {
                    sponsor_brand: brand.to_string(),
                }),
                _ => Err(ValidationError::MissingModelParameter {
                    field: "sponsorBrand".to_string(),
                    tag: "SPONSORED".to_string(),
                }),
            },
            _ => Err(ValidationError::UnknownTag {
                field: "businessModel".to_string(),
                value: tag.to_string(),
            }),
        }
    }

    /// The wire tag for this model.
    pub const fn tag(&self) -> &'static str {
        match self {
            BusinessModel::MaxProfit => "MAX_PROFIT",
            BusinessModel::Loyalty { .. } => "LOYALTY",
            BusinessModel::Sponsored { .. } => "SPONSORED",
        }
    }

    /// The loyalty threshold, for LOYALTY shops.
    pub fn loyalty_threshold(&self) -> Option<f64> {
        match self {
            BusinessModel::Loyalty { loyalty_threshold } => Some(*loyalty_threshold),
            _ => None,
        }
    }

    /// The sponsoring brand, for SPONSORED shops.
    pub fn sponsor_brand(&self) -> Option<&str> {
        match self {
            BusinessModel::Sponsored { sponsor_brand } => Some(sponsor_brand),
            _ => None,
        }
    }
}

// =============================================================================
// Catalogue Entry
// =============================================================================

/// One line of a shop's catalogue: a product name and the price this
/// shop lists it at. The reference is by name only; the product may have
/// been withdrawn since the entry was added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntry {
    pub product_name: String,
    pub price_at_shop: f64,
}

impl CatalogueEntry {
    pub fn new(product_name: impl Into<String>, price_at_shop: f64) -> Self {
        CatalogueEntry {
            product_name: product_name.into(),
            price_at_shop,
        }
    }

    /// Case-insensitive check that this entry lists `product_name`.
    pub fn is_for(&self, product_name: &str) -> bool {
        same_name(&self.product_name, product_name)
    }
}

// =============================================================================
// Shop
// =============================================================================

/// A shop: identity, discount model, cumulative earnings and an ordered
/// catalogue.
///
/// Earnings start at zero and only ever grow; checkout posts them in
/// per-shop batches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub name: String,
    pub description: String,
    pub since: i32,
    #[serde(flatten)]
    pub business_model: BusinessModel,
    #[serde(default)]
    pub earnings: f64,
    #[serde(default)]
    pub catalogue: Vec<CatalogueEntry>,
}

impl Shop {
    /// Creates a shop with zero earnings and an empty catalogue.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        since: i32,
        business_model: BusinessModel,
    ) -> Self {
        Shop {
            name: name.into(),
            description: description.into(),
            since,
            business_model,
            earnings: 0.0,
            catalogue: Vec::new(),
        }
    }

    /// Case-insensitive identity check against `name`.
    pub fn is_named(&self, name: &str) -> bool {
        same_name(&self.name, name)
    }

    /// Appends a catalogue entry unconditionally. Duplicate entries for
    /// the same product are allowed; lookups resolve them with
    /// last-match-wins (see [`Shop::price_at`]).
    pub fn add_entry(&mut self, product_name: impl Into<String>, price_at_shop: f64) {
        self.catalogue
            .push(CatalogueEntry::new(product_name, price_at_shop));
    }

    /// The listed price for `product_name` at this shop, or `None` when
    /// the product is not in the catalogue.
    ///
    /// The scan never short-circuits: with duplicate entries the LAST
    /// one's price wins. Callers must not assume first-match.
    pub fn price_at(&self, product_name: &str) -> Option<f64> {
        let mut price = None;
        for entry in &self.catalogue {
            if entry.is_for(product_name) {
                price = Some(entry.price_at_shop);
            }
        }
        price
    }

    /// Whether this shop currently lists `product_name`.
    pub fn sells(&self, product_name: &str) -> bool {
        self.catalogue.iter().any(|e| e.is_for(product_name))
    }

    /// Collective customer status at this shop.
    ///
    /// Only LOYALTY shops ever reach `Regular`; earnings are
    /// monotonically non-decreasing, so once the threshold is met the
    /// status never reverts.
    pub fn customer_status(&self) -> CustomerStatus {
        match &self.business_model {
            BusinessModel::Loyalty { loyalty_threshold } if self.earnings >= *loyalty_threshold => {
                CustomerStatus::Regular
            }
            _ => CustomerStatus::NotRegular,
        }
    }

    /// Removes the catalogue entry for `product_name`, if any, and
    /// reports whether an entry was removed.
    ///
    /// The full catalogue is scanned first and the LAST matching entry
    /// is the one removed; with duplicates, earlier entries survive.
    /// This mirrors the lookup's last-match-wins rule and is relied on
    /// by callers, so it must not be changed to first-match.
    pub fn remove_entry(&mut self, product_name: &str) -> bool {
        let mut last_match = None;
        for (index, entry) in self.catalogue.iter().enumerate() {
            if entry.is_for(product_name) {
                last_match = Some(index);
            }
        }
        match last_match {
            Some(index) => {
                self.catalogue.remove(index);
                true
            }
            None => false,
        }
    }
}

// =============================================================================
// Customer Status
// =============================================================================

/// Collective customer status at a LOYALTY shop.
///
/// ```text
///                earnings >= loyaltyThreshold
/// NOT_REGULAR ────────────────────────────────► REGULAR (absorbing)
/// ```
///
/// The transition is evaluated when checkout posts earnings and is
/// irreversible; there is no path back to `NotRegular`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    #[default]
    NotRegular,
    Regular,
}

impl CustomerStatus {
    #[inline]
    pub const fn is_regular(&self) -> bool {
        matches!(self, CustomerStatus::Regular)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reduced_product() -> Product {
        Product::new(
            "Olive Oil",
            "Borges",
            12.5,
            TaxCategory::Reduced {
                average_rating: 4.0,
            },
        )
    }

    #[test]
    fn test_category_tag_parsing() {
        assert_eq!(
            TaxCategory::from_tag("general", 0.0).unwrap(),
            TaxCategory::General
        );
        assert_eq!(
            TaxCategory::from_tag("Super_Reduced", 0.0).unwrap(),
            TaxCategory::SuperReduced
        );
        assert_eq!(
            TaxCategory::from_tag("REDUCED", 4.2).unwrap(),
            TaxCategory::Reduced {
                average_rating: 4.2
            }
        );
        assert!(matches!(
            TaxCategory::from_tag("EXEMPT", 0.0),
            Err(ValidationError::UnknownTag { .. })
        ));
    }

    #[test]
    fn test_business_model_tag_parsing() {
        assert_eq!(
            BusinessModel::from_tag("max_profit", 0.0, None).unwrap(),
            BusinessModel::MaxProfit
        );
        assert_eq!(
            BusinessModel::from_tag("LOYALTY", 250.0, None).unwrap(),
            BusinessModel::Loyalty {
                loyalty_threshold: 250.0
            }
        );
        assert_eq!(
            BusinessModel::from_tag("SPONSORED", 0.0, Some("Acme")).unwrap(),
            BusinessModel::Sponsored {
                sponsor_brand: "Acme".to_string()
            }
        );
        assert!(matches!(
            BusinessModel::from_tag("SPONSORED", 0.0, None),
            Err(ValidationError::MissingModelParameter { .. })
        ));
        assert!(matches!(
            BusinessModel::from_tag("FRANCHISE", 0.0, None),
            Err(ValidationError::UnknownTag { .. })
        ));
    }

    #[test]
    fn test_name_matching_is_case_insensitive() {
        let product = reduced_product();
        assert!(product.is_named("olive oil"));
        assert!(product.is_named("OLIVE OIL"));
        assert!(!product.is_named("olive"));

        assert!(product.matches_query("oil"));
        assert!(product.matches_query("borg"));
        assert!(!product.matches_query("vinegar"));
    }

    #[test]
    fn test_review_average_rounds_to_two_decimals() {
        let mut product = reduced_product();
        assert_eq!(product.review_average(), 0.0);

        product.add_review(Review::new(5, "great"));
        product.add_review(Review::new(4, "good"));
        product.add_review(Review::new(4, "fine"));
        // 13 / 3 = 4.333... -> 4.33
        assert_eq!(product.review_average(), 4.33);
    }

    #[test]
    fn test_price_at_returns_last_duplicate() {
        let mut shop = Shop::new("Can Petra", "corner store", 1987, BusinessModel::MaxProfit);
        shop.add_entry("Olive Oil", 10.0);
        shop.add_entry("Bread", 1.2);
        shop.add_entry("olive oil", 11.5);

        assert_eq!(shop.price_at("OLIVE OIL"), Some(11.5));
        assert_eq!(shop.price_at("Bread"), Some(1.2));
        assert_eq!(shop.price_at("Milk"), None);
    }

    #[test]
    fn test_remove_entry_takes_last_duplicate() {
        let mut shop = Shop::new("Can Petra", "corner store", 1987, BusinessModel::MaxProfit);
        shop.add_entry("Olive Oil", 10.0);
        shop.add_entry("Bread", 1.2);
        shop.add_entry("olive oil", 11.5);

        // The later duplicate goes away; the 10.0 entry survives.
        assert!(shop.remove_entry("Olive Oil"));
        assert_eq!(shop.catalogue.len(), 2);
        assert_eq!(shop.price_at("Olive Oil"), Some(10.0));

        assert!(shop.remove_entry("Olive Oil"));
        assert_eq!(shop.price_at("Olive Oil"), None);
        assert!(!shop.remove_entry("Olive Oil"));
    }

    #[test]
    fn test_product_round_trip_preserves_every_field() {
        let mut product = reduced_product();
        product.add_review(Review::new(5, "top"));

        let json = serde_json::to_string(&product).unwrap();
        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_shop_round_trip_preserves_every_field() {
        for model in [
            BusinessModel::MaxProfit,
            BusinessModel::Loyalty {
                loyalty_threshold: 300.0,
            },
            BusinessModel::Sponsored {
                sponsor_brand: "Borges".to_string(),
            },
        ] {
            let mut shop = Shop::new("Mercat Vell", "market hall", 1874, model);
            shop.earnings = 120.75;
            shop.add_entry("Olive Oil", 10.0);

            let json = serde_json::to_string(&shop).unwrap();
            let back: Shop = serde_json::from_str(&json).unwrap();
            assert_eq!(back, shop);
        }
    }

    #[test]
    fn test_persisted_field_names() {
        let product = Product::new(
            "Olive Oil",
            "Borges",
            12.5,
            TaxCategory::Reduced {
                average_rating: 4.0,
            },
        );
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["category"], "REDUCED");
        assert_eq!(value["averageRating"], 4.0);
        assert_eq!(value["mrp"], 12.5);

        let mut shop = Shop::new(
            "Mercat Vell",
            "market hall",
            1874,
            BusinessModel::Sponsored {
                sponsor_brand: "Borges".to_string(),
            },
        );
        shop.add_entry("Olive Oil", 10.0);
        let value = serde_json::to_value(&shop).unwrap();
        assert_eq!(value["businessModel"], "SPONSORED");
        assert_eq!(value["sponsorBrand"], "Borges");
        assert_eq!(value["catalogue"][0]["productName"], "Olive Oil");
        assert_eq!(value["catalogue"][0]["priceAtShop"], 10.0);
    }

    #[test]
    fn test_customer_status_default() {
        assert_eq!(CustomerStatus::default(), CustomerStatus::NotRegular);
        assert!(!CustomerStatus::NotRegular.is_regular());
        assert!(CustomerStatus::Regular.is_regular());
    }

    #[test]
    fn test_customer_status_only_for_loyalty_shops() {
        let mut loyalty = Shop::new(
            "Can Petra",
            "corner store",
            1987,
            BusinessModel::Loyalty {
                loyalty_threshold: 100.0,
            },
        );
        assert_eq!(loyalty.customer_status(), CustomerStatus::NotRegular);
        loyalty.earnings = 100.0;
        assert_eq!(loyalty.customer_status(), CustomerStatus::Regular);

        let mut max_profit = Shop::new("Mercat Vell", "market hall", 1874, BusinessModel::MaxProfit);
        max_profit.earnings = 1_000_000.0;
        assert_eq!(max_profit.customer_status(), CustomerStatus::NotRegular);
    }
}
