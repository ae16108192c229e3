//! # Store Error Types
//!
//! Errors raised by the local and remote store backends.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Store Error Categories                         │
//! │                                                                     │
//! │  ┌────────────────┐  ┌────────────────┐  ┌──────────────────────┐   │
//! │  │   Transport    │  │    Payload     │  │      Document        │   │
//! │  │                │  │                │  │                      │   │
//! │  │  Unreachable   │  │  Malformed     │  │  DocumentMissing     │   │
//! │  │  Timeout       │  │  Serialize     │  │  DocumentIo          │   │
//! │  │  Status        │  │                │  │                      │   │
//! │  └────────────────┘  └────────────────┘  └──────────────────────┘   │
//! │                                                                     │
//! │  ┌────────────────┐                                                 │
//! │  │ Configuration  │   Every variant names the operation target      │
//! │  │                │   (url or path) so callers can log or display   │
//! │  │  InvalidUrl    │   it without extra context.                     │
//! │  │  ConfigLoad    │                                                 │
//! │  └────────────────┘                                                 │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store never retries internally: a failed call is reported upward
//! and the backend mode is re-probed on the next operation.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store operation errors, covering both backends.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Transport Errors (remote store)
    // =========================================================================
    /// The remote store could not be reached.
    #[error("remote store unreachable at {url}: {detail}")]
    Unreachable { url: String, detail: String },

    /// The remote call exceeded the configured connect/request timeout.
    #[error("remote store timed out at {url}")]
    Timeout { url: String },

    /// The remote store answered with a non-success status.
    #[error("remote store returned HTTP {code} for {url}")]
    Status { code: u16, url: String },

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// A payload that could not be interpreted as an entity collection
    /// at all (individual unreadable records are skipped instead, see
    /// [`crate::codec`]).
    #[error("malformed payload from {context}: {detail}")]
    MalformedPayload { context: String, detail: String },

    /// An entity could not be serialized for persistence.
    #[error("failed to serialize {context}: {detail}")]
    Serialize { context: String, detail: String },

    // =========================================================================
    // Document Errors (local store)
    // =========================================================================
    /// A required local document does not exist. Fatal for the very
    /// first products load; there is no further fallback below the
    /// local store.
    #[error("local store document missing: {path}")]
    DocumentMissing { path: PathBuf },

    /// Reading or writing a local document failed.
    #[error("local store I/O failed for {path}: {source}")]
    DocumentIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// A remote endpoint could not be built into a valid URL.
    #[error("invalid remote store URL: {0}")]
    InvalidUrl(String),

    /// The store configuration file could not be read or parsed.
    #[error("failed to load store configuration: {0}")]
    ConfigLoad(String),

    /// A configuration value is not valid.
    #[error("invalid store configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    /// Creates a `MalformedPayload` error for the given source context.
    pub fn malformed(context: impl Into<String>, detail: impl Into<String>) -> Self {
        StoreError::MalformedPayload {
            context: context.into(),
            detail: detail.into(),
        }
    }

    /// Whether this error means the remote store was not usable for the
    /// call (as opposed to a bad payload or local document problem).
    /// The caller may re-probe the backend mode on its next operation.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            StoreError::Unreachable { .. } | StoreError::Timeout { .. } | StoreError::Status { .. }
        )
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<url::ParseError> for StoreError {
    fn from(err: url::ParseError) -> Self {
        StoreError::InvalidUrl(err.to_string())
    }
}

impl From<toml::de::Error> for StoreError {
    fn from(err: toml::de::Error) -> Self {
        StoreError::ConfigLoad(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_categorization() {
        assert!(StoreError::Timeout {
            url: "http://store.example/g/products".into()
        }
        .is_connectivity());
        assert!(StoreError::Status {
            code: 503,
            url: "http://store.example/g/shops".into()
        }
        .is_connectivity());

        assert!(!StoreError::malformed("products.json", "not an array").is_connectivity());
        assert!(!StoreError::DocumentMissing {
            path: "data/products.json".into()
        }
        .is_connectivity());
    }

    #[test]
    fn test_error_messages_carry_the_target() {
        let err = StoreError::Status {
            code: 404,
            url: "http://store.example/g/products/3".into(),
        };
        assert_eq!(
            err.to_string(),
            "remote store returned HTTP 404 for http://store.example/g/products/3"
        );
    }
}
