//! # Engine Error Types
//!
//! The error surface the UI collaborator sees.
//!
//! ## Error Flow
//! ```text
//! ValidationError (mercat-core)  ──┐
//! StoreError      (mercat-store) ──┼──► EngineError ──► caller
//! not-found conditions           ──┘
//! ```
//!
//! Lookups that can legitimately miss return `Option`/empty collections
//! instead; `NotFound` is reserved for operations that require the
//! entity to exist (posting earnings, reviewing a product, ...).

use thiserror::Error;

use mercat_core::ValidationError;
use mercat_store::StoreError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by registry and checkout operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input or business-rule validation failed; nothing was mutated.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An operation required an entity that does not exist.
    #[error("{entity} not found: {name}")]
    NotFound { entity: String, name: String },

    /// The active store backend failed. The message carries the
    /// operation target (url or path); the engine does not retry.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Creates a `NotFound` error for the named entity.
    pub fn not_found(entity: impl Into<String>, name: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity: entity.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = EngineError::not_found("shop", "Can Petra");
        assert_eq!(err.to_string(), "shop not found: Can Petra");
    }

    #[test]
    fn test_validation_errors_convert() {
        let err: EngineError = ValidationError::duplicate("product", "Bread").into();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
