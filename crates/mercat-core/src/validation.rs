//! # Validation Module
//!
//! Input validation and conditioning for registry operations.
//!
//! All checks run before any state mutation: a failed validation leaves
//! registries and stores untouched.

use crate::error::{ValidationError, ValidationResult};
use crate::types::Product;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an entity name (product or shop).
///
/// Names are identity keys, so they must be non-empty after trimming.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(())
}

/// Normalizes a brand to title case: every word lowercased, then its
/// first letter capitalized ("ACME corp" becomes "Acme Corp").
pub fn normalize_brand(brand: &str) -> String {
    brand
        .split_whitespace()
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a maximum retail price. Zero is allowed.
pub fn validate_mrp(mrp: f64) -> ValidationResult<()> {
    if mrp < 0.0 || !mrp.is_finite() {
        return Err(ValidationError::Negative {
            field: "mrp".to_string(),
            value: mrp,
        });
    }
    Ok(())
}

/// Validates a catalogue price. Zero is allowed (a legitimately free
/// item), negatives are not.
pub fn validate_price(price: f64) -> ValidationResult<()> {
    if price < 0.0 || !price.is_finite() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
            value: price,
        });
    }
    Ok(())
}

/// Validates a review rating (1 to 5 stars).
pub fn validate_rating(rating: u8) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::RatingOutOfRange { value: rating });
    }
    Ok(())
}

// =============================================================================
// Cross-Entity Checks
// =============================================================================

/// A proposed catalogue price is accepted only if SOME product in the
/// registry has an MRP at or above it.
///
/// This is a global any-product check, not a check against the product
/// being listed.
pub fn price_within_limit(products: &[Product], candidate_price: f64) -> bool {
    products.iter().any(|p| p.mrp >= candidate_price)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxCategory;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Olive Oil").is_ok());
        assert!(validate_name("name", "").is_err());
        assert!(validate_name("name", "   ").is_err());
    }

    #[test]
    fn test_normalize_brand() {
        assert_eq!(normalize_brand("ACME corp"), "Acme Corp");
        assert_eq!(normalize_brand("borges"), "Borges");
        assert_eq!(normalize_brand("  el  molí  "), "El Molí");
        assert_eq!(normalize_brand(""), "");
    }

    #[test]
    fn test_validate_mrp_and_price() {
        assert!(validate_mrp(0.0).is_ok());
        assert!(validate_mrp(19.99).is_ok());
        assert!(validate_mrp(-1.0).is_err());
        assert!(validate_mrp(f64::NAN).is_err());

        assert!(validate_price(0.0).is_ok());
        assert!(validate_price(-0.01).is_err());
    }

    #[test]
    fn test_validate_rating() {
        for rating in 1..=5 {
            assert!(validate_rating(rating).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_price_within_limit_is_an_any_product_check() {
        let products = vec![
            Product::new("Bread", "El Molí", 2.0, TaxCategory::SuperReduced),
            Product::new("TV", "Acme", 500.0, TaxCategory::General),
        ];

        // 400 exceeds the bread's MRP but the TV's covers it.
        assert!(price_within_limit(&products, 400.0));
        assert!(price_within_limit(&products, 500.0));
        assert!(!price_within_limit(&products, 500.01));
        assert!(!price_within_limit(&[], 1.0));
    }
}
