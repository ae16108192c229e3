//! # mercat-store: Store Backends for Mercat
//!
//! Registry state lives in one of two places: a local JSON document per
//! entity collection, or a remote store reachable over HTTP. This crate
//! provides both backends and the per-call routing between them; the
//! engine behaves identically (same catalog contents, same computed
//! prices) whichever backend is active.
//!
//! ## Routing Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Per-Operation Backend Routing                     │
//! │                                                                     │
//! │  registry operation                                                 │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  Backend::mode() ── probes the remote store (re-evaluated per call) │
//! │       │                                                             │
//! │       ├── Remote ──► RemoteStore only for this call                 │
//! │       │                 └─ after a successful write: opportunistic  │
//! │       │                    local mirror (failures logged, never     │
//! │       │                    surfaced)                                │
//! │       │                                                             │
//! │       └── Local ───► LocalStore only for this call                  │
//! │                                                                     │
//! │  There is NO merge or conflict resolution between the two stores.   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`] - TOML + environment store configuration
//! - [`local`] - single-document JSON store per entity collection
//! - [`remote`] - HTTP store client (probe, fetch-all, append,
//!   positional delete, positional put)
//! - [`backend`] - the mode router consumed by every registry operation
//! - [`codec`] - tolerant collection decoding (skip unreadable records)
//! - [`error`] - store error taxonomy

pub mod backend;
pub mod codec;
pub mod config;
pub mod error;
pub mod local;
pub mod remote;

pub use backend::{ActiveBackend, Backend, BackendMode};
pub use config::{BackendPreference, RemoteConfig, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use local::LocalStore;
pub use remote::RemoteStore;
