//! # Backend Router
//!
//! The mode router every registry operation consults before reading or
//! writing. The remote store's availability is re-probed per call; an
//! operation then runs exclusively against the backend the probe chose,
//! never mixing results from both within one operation.
//!
//! After a successful remote WRITE the caller may mirror the full entity
//! collection into the local store as a cache. Mirroring failures are
//! logged and never surfaced: the two stores are not kept consistent and
//! a process that was remote must not assume the local store agrees.

use tracing::warn;

use mercat_core::{Product, Shop};

use crate::config::{BackendPreference, StoreConfig};
use crate::error::StoreResult;
use crate::local::LocalStore;
use crate::remote::RemoteStore;

// =============================================================================
// Backend Mode
// =============================================================================

/// Which store an operation runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Local,
    Remote,
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendMode::Local => write!(f, "local"),
            BackendMode::Remote => write!(f, "remote"),
        }
    }
}

/// The backend chosen for ONE operation. Carrying the remote handle in
/// the `Remote` arm makes "never mix backends within an operation"
/// structural: the caller matches once and cannot reach the other store.
#[derive(Debug)]
pub enum ActiveBackend<'a> {
    Local,
    Remote(&'a RemoteStore),
}

// =============================================================================
// Backend
// =============================================================================

/// Both store backends plus the routing policy between them.
#[derive(Debug, Clone)]
pub struct Backend {
    local: LocalStore,
    remote: Option<RemoteStore>,
}

impl Backend {
    /// Builds the backend pair from configuration. With preference
    /// `local`, or without a remote section, no remote client is built
    /// and every operation is pinned to the local store.
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        let local = LocalStore::new(&config.data_dir);
        let remote = match (config.preference, &config.remote) {
            (BackendPreference::Auto, Some(remote_config)) => {
                Some(RemoteStore::new(remote_config)?)
            }
            _ => None,
        };
        Ok(Backend { local, remote })
    }

    /// A backend that only ever uses the local store.
    pub fn local_only(local: LocalStore) -> Self {
        Backend {
            local,
            remote: None,
        }
    }

    /// A backend with both stores configured.
    pub fn with_remote(local: LocalStore, remote: RemoteStore) -> Self {
        Backend {
            local,
            remote: Some(remote),
        }
    }

    /// Resolves the backend for ONE operation. The remote probe runs
    /// every time; the answer is never cached for a session.
    pub async fn resolve(&self) -> ActiveBackend<'_> {
        match &self.remote {
            Some(remote) if remote.is_active().await => ActiveBackend::Remote(remote),
            _ => ActiveBackend::Local,
        }
    }

    /// Like [`Backend::resolve`], reduced to a plain mode value for
    /// display and tests.
    pub async fn mode(&self) -> BackendMode {
        match self.resolve().await {
            ActiveBackend::Remote(_) => BackendMode::Remote,
            ActiveBackend::Local => BackendMode::Local,
        }
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    /// The remote store, when one is configured. Callers must have
    /// resolved [`Backend::mode`] to `Remote` for the current operation
    /// before using it.
    pub fn remote(&self) -> Option<&RemoteStore> {
        self.remote.as_ref()
    }

    // =========================================================================
    // Opportunistic Local Mirroring
    // =========================================================================

    /// Mirrors the products collection into the local store after a
    /// remote write. Never fails the calling operation.
    pub async fn mirror_products(&self, products: &[Product]) {
        if let Err(err) = self.local.save_products(products).await {
            warn!(error = %err, "local mirror of products failed");
        }
    }

    /// Mirrors the shops collection into the local store after a remote
    /// write. Never fails the calling operation.
    pub async fn mirror_shops(&self, shops: &[Shop]) {
        if let Err(err) = self.local.save_shops(shops).await {
            warn!(error = %err, "local mirror of shops failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_only_backend_never_probes() {
        let dir = tempfile::tempdir().unwrap();
        let backend = Backend::local_only(LocalStore::new(dir.path()));
        assert_eq!(backend.mode().await, BackendMode::Local);
        assert!(backend.remote().is_none());
    }

    #[tokio::test]
    async fn test_local_preference_disables_a_configured_remote() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig {
            data_dir: dir.path().to_path_buf(),
            preference: BackendPreference::Local,
            remote: Some(crate::config::RemoteConfig::new(
                "https://store.example/api",
                "mercat-demo",
            )),
        };
        let backend = Backend::from_config(&config).unwrap();
        assert!(backend.remote().is_none());
        assert_eq!(backend.mode().await, BackendMode::Local);
    }
}
