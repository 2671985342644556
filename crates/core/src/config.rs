//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Tracker store backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StoreConfig {
    /// SQLite database file.
    Sqlite {
        /// Path to the database file.
        path: PathBuf,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::Sqlite { path: PathBuf::from("data/checkwright.db") }
    }
}

/// Checklist view cache tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum age in seconds before a cached checklist view is refreshed
    /// on read.
    #[serde(default = "default_view_ttl_secs")]
    pub view_ttl_secs: u64,
    /// Upper bound in milliseconds on a single refresh round-trip to the
    /// store. A read that overruns it is served the stale view if one
    /// exists.
    #[serde(default = "default_refresh_timeout_ms")]
    pub refresh_timeout_ms: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            view_ttl_secs: default_view_ttl_secs(),
            refresh_timeout_ms: default_refresh_timeout_ms(),
        }
    }
}

fn default_view_ttl_secs() -> u64 {
    30
}

fn default_refresh_timeout_ms() -> u64 {
    2000
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Store backend configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Checklist cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses an in-tree SQLite path the test harness
    /// overrides with a temporary file.
    pub fn for_testing() -> Self {
        Self::default()
    }
}
