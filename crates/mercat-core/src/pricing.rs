//! # Pricing Module
//!
//! Turns a catalogue (listed) price into the price the customer pays.
//!
//! ## Two Composed Steps
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Pricing Pipeline                               │
//! │                                                                     │
//! │  listed price (what the shop's catalogue entry states)              │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  sell_price ── tax category of the PRODUCT                          │
//! │       │          GENERAL        ÷ 1.21                              │
//! │       │          REDUCED        ÷ 1.05 (rating > 3.5) else ÷ 1.10   │
//! │       │          SUPER_REDUCED  unchanged if ≥ 100, else ÷ 1.04     │
//! │       ▼                                                             │
//! │  final_price ── business model of the SHOP                          │
//! │                  MAX_PROFIT     sell price                          │
//! │                  LOYALTY        sell price (status only, no rate)   │
//! │                  SPONSORED      × 0.9 when brand == sponsor brand   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  what the customer pays                                             │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The discount step invokes the tax step itself: callers hand
//! [`final_price`] the LISTED price, not an already-taxed one.
//!
//! Both functions are total over any non-negative input, have no side
//! effects, and are monotonically non-decreasing in the listed price.

use crate::types::{BusinessModel, Product, TaxCategory};

// =============================================================================
// Rates and Thresholds
// =============================================================================

/// Standard tax rate, as a percentage.
pub const GENERAL_TAX_RATE: f64 = 21.0;

/// Reduced tax rate, as a percentage.
pub const REDUCED_TAX_RATE: f64 = 10.0;

/// Reduced tax rate for highly rated products, as a percentage.
pub const REDUCED_TAX_RATE_HIGH_RATING: f64 = 5.0;

/// Average rating above which the lower reduced rate applies.
pub const HIGH_RATING_THRESHOLD: f64 = 3.5;

/// Super-reduced tax rate, as a percentage.
pub const SUPER_REDUCED_TAX_RATE: f64 = 4.0;

/// Listed price at and above which super-reduced products keep their
/// listed price unchanged.
pub const SUPER_REDUCED_PRICE_THRESHOLD: f64 = 100.0;

/// Multiplier applied by sponsored shops to products of their sponsor
/// brand.
pub const SPONSOR_DISCOUNT_FACTOR: f64 = 0.9;

// =============================================================================
// Tax Step
// =============================================================================

/// Removes the category's tax from a listed price.
///
/// For `Reduced`, the category's `averageRating` parameter selects the
/// rate; for `SuperReduced`, prices at or above
/// [`SUPER_REDUCED_PRICE_THRESHOLD`] pass through unchanged.
pub fn sell_price(listed_price: f64, category: &TaxCategory) -> f64 {
    match category {
        TaxCategory::General => listed_price / (1.0 + GENERAL_TAX_RATE / 100.0),
        TaxCategory::Reduced { average_rating } => {
            if *average_rating > HIGH_RATING_THRESHOLD {
                listed_price / (1.0 + REDUCED_TAX_RATE_HIGH_RATING / 100.0)
            } else {
                listed_price / (1.0 + REDUCED_TAX_RATE / 100.0)
            }
        }
        TaxCategory::SuperReduced => {
            if listed_price >= SUPER_REDUCED_PRICE_THRESHOLD {
                listed_price
            } else {
                listed_price / (1.0 + SUPER_REDUCED_TAX_RATE / 100.0)
            }
        }
    }
}

// =============================================================================
// Discount Step
// =============================================================================

/// Computes what the customer pays for `product` listed at
/// `listed_price` in a shop operating under `model`.
///
/// The tax step runs inside this function; `listed_price` is the raw
/// catalogue price. Every model maps to exactly one arm; LOYALTY has no
/// rate of its own (regular status is tracked separately and affects
/// messaging, not arithmetic).
pub fn final_price(listed_price: f64, product: &Product, model: &BusinessModel) -> f64 {
    let sell = sell_price(listed_price, &product.category);
    match model {
        BusinessModel::MaxProfit => sell,
        BusinessModel::Loyalty { .. } => sell,
        BusinessModel::Sponsored { sponsor_brand } => {
            if product.brand == *sponsor_brand {
                sell * SPONSOR_DISCOUNT_FACTOR
            } else {
                sell
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
