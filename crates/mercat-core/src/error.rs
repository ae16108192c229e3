//! # Domain Error Types
//!
//! Validation errors raised by mercat-core.
//!
//! ## Error Flow
//! ```text
//! ValidationError (this crate)
//!      │
//!      ▼
//! EngineError::Validation (mercat-engine) ← adds not-found / store cases
//!      │
//!      ▼
//! Caller-facing message
//! ```
//!
//! Not-found conditions are deliberately NOT errors here: lookups return
//! `Option` and the engine decides how to report an absent entity.

use thiserror::Error;

/// Input and business-rule validation failures.
///
/// Raised before any state is mutated; an operation that returns a
/// `ValidationError` has changed nothing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A numeric field must not be negative.
    #[error("{field} must not be negative (got {value})")]
    Negative { field: String, value: f64 },

    /// Rating outside the 1-5 star range.
    #[error("rating must be between 1 and 5 stars (got {value})")]
    RatingOutOfRange { value: u8 },

    /// An entity with this case-insensitive name already exists.
    #[error("{entity} '{name}' already exists")]
    Duplicate { entity: String, name: String },

    /// A proposed catalogue price that no product's maximum retail price
    /// can cover.
    #[error("price {price} exceeds every product's maximum retail price")]
    PriceAboveEveryMrp { price: f64 },

    /// An unrecognized category or business-model tag. These are closed
    /// enumerations, so the failure happens at construction time, never
    /// at pricing time.
    #[error("unknown {field} tag: '{value}'")]
    UnknownTag { field: String, value: String },

    /// A model-specific parameter is missing (e.g. a sponsored shop
    /// without a sponsor brand).
    #[error("{field} is required for {tag} entities")]
    MissingModelParameter { field: String, tag: String },
}

impl ValidationError {
    /// Creates a `Required` error for the named field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates a `Duplicate` error for the named entity.
    pub fn duplicate(entity: impl Into<String>, name: impl Into<String>) -> Self {
        ValidationError::Duplicate {
            entity: entity.into(),
            name: name.into(),
        }
    }
}

/// Result type alias for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;
