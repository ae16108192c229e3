//! # Store Configuration
//!
//! Configuration for the store backends.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                           │
//! │                                                                     │
//! │  1. Environment Variables (highest priority)                        │
//! │     MERCAT_DATA_DIR=/var/lib/mercat                                 │
//! │     MERCAT_BACKEND=local                                            │
//! │     MERCAT_REMOTE_URL=https://store.example/api                     │
//! │     MERCAT_GROUP_ID=mercat-demo                                     │
//! │                                                                     │
//! │  2. TOML Config File                                                │
//! │     ~/.config/mercat/store.toml (Linux)                             │
//! │     ~/Library/Application Support/com.mercat/store.toml (macOS)     │
//! │                                                                     │
//! │  3. Default Values (lowest priority)                                │
//! │     data_dir = ./data, backend = auto, no remote store              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # store.toml
//! [store]
//! data_dir = "./data"
//! backend = "auto"   # auto | local
//!
//! [remote]
//! base_url = "https://store.example/api"
//! group_id = "mercat-demo"
//! connect_timeout_secs = 10
//! request_timeout_secs = 10
//! ```

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};

/// Default connect and request timeout for remote calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Backend Preference
// =============================================================================

/// Which backends an operation is allowed to use.
///
/// `Auto` probes the remote store per call and falls back to local;
/// `Local` pins every operation to the local store so tests and offline
/// deployments behave deterministically without a network probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendPreference {
    #[default]
    Auto,
    Local,
}

impl std::fmt::Display for BackendPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendPreference::Auto => write!(f, "auto"),
            BackendPreference::Local => write!(f, "local"),
        }
    }
}

impl FromStr for BackendPreference {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(BackendPreference::Auto),
            "local" | "offline" => Ok(BackendPreference::Local),
            other => Err(StoreError::InvalidConfig(format!(
                "unknown backend preference: '{}'. Valid options: auto, local",
                other
            ))),
        }
    }
}

// =============================================================================
// Remote Configuration
// =============================================================================

/// Connection settings for the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the remote store service.
    pub base_url: String,

    /// Group identifier all entity collections are addressed under.
    pub group_id: String,

    /// Connect timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl RemoteConfig {
    pub fn new(base_url: impl Into<String>, group_id: impl Into<String>) -> Self {
        RemoteConfig {
            base_url: base_url.into(),
            group_id: group_id.into(),
            connect_timeout_secs: DEFAULT_TIMEOUT_SECS,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Store Configuration
// =============================================================================

/// Complete store configuration: where local documents live, whether a
/// remote store is configured, and the backend preference.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    pub preference: BackendPreference,
    pub remote: Option<RemoteConfig>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            data_dir: PathBuf::from("./data"),
            preference: BackendPreference::default(),
            remote: None,
        }
    }
}

/// On-disk layout of `store.toml`.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    store: StoreSection,
    remote: Option<RemoteConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct StoreSection {
    data_dir: Option<PathBuf>,
    backend: Option<String>,
}

impl StoreConfig {
    /// Loads configuration from the platform config dir and the
    /// environment. A missing config file is not an error; defaults
    /// apply.
    pub fn load() -> StoreResult<Self> {
        let path = Self::config_path();
        let mut config = match path {
            Some(ref path) if path.exists() => {
                let text = std::fs::read_to_string(path)
                    .map_err(|e| StoreError::ConfigLoad(e.to_string()))?;
                Self::from_toml(&text)?
            }
            _ => StoreConfig::default(),
        };
        config.apply_env()?;
        debug!(
            data_dir = %config.data_dir.display(),
            preference = %config.preference,
            remote = config.remote.is_some(),
            "store configuration loaded"
        );
        Ok(config)
    }

    /// Parses a `store.toml` document.
    pub fn from_toml(text: &str) -> StoreResult<Self> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = StoreConfig::default();
        if let Some(data_dir) = file.store.data_dir {
            config.data_dir = data_dir;
        }
        if let Some(backend) = file.store.backend {
            config.preference = backend.parse()?;
        }
        config.remote = file.remote;
        Ok(config)
    }

    /// Applies `MERCAT_*` environment overrides on top of the current
    /// values.
    fn apply_env(&mut self) -> StoreResult<()> {
        if let Ok(dir) = env::var("MERCAT_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Ok(backend) = env::var("MERCAT_BACKEND") {
            self.preference = backend.parse()?;
        }
        if let Ok(base_url) = env::var("MERCAT_REMOTE_URL") {
            let group_id = env::var("MERCAT_GROUP_ID").unwrap_or_else(|_| "mercat".to_string());
            let mut remote = self
                .remote
                .take()
                .unwrap_or_else(|| RemoteConfig::new(base_url.clone(), group_id.clone()));
            remote.base_url = base_url;
            remote.group_id = group_id;
            self.remote = Some(remote);
        }
        Ok(())
    }

    /// Platform-specific path of `store.toml`, if a home directory can
    /// be resolved.
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mercat").map(|dirs| dirs.config_dir().join("store.toml"))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert_eq!(config.preference, BackendPreference::Auto);
        assert!(config.remote.is_none());
    }

    #[test]
    fn test_preference_parsing() {
        assert_eq!(
            "auto".parse::<BackendPreference>().unwrap(),
            BackendPreference::Auto
        );
        assert_eq!(
            "LOCAL".parse::<BackendPreference>().unwrap(),
            BackendPreference::Local
        );
        assert_eq!(
            "offline".parse::<BackendPreference>().unwrap(),
            BackendPreference::Local
        );
        assert!("remote-only".parse::<BackendPreference>().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = StoreConfig::from_toml(
            r#"
            [store]
            data_dir = "/var/lib/mercat"
            backend = "local"

            [remote]
            base_url = "https://store.example/api"
            group_id = "mercat-demo"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/mercat"));
        assert_eq!(config.preference, BackendPreference::Local);
        let remote = config.remote.unwrap();
        assert_eq!(remote.base_url, "https://store.example/api");
        assert_eq!(remote.group_id, "mercat-demo");
        assert_eq!(remote.connect_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(remote.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_toml_rejects_bad_backend() {
        let result = StoreConfig::from_toml(
            r#"
            [store]
            backend = "cloud"
            "#,
        );
        assert!(matches!(result, Err(StoreError::InvalidConfig(_))));
    }
}
