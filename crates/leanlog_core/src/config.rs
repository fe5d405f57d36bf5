//! Configuration types for log queries.

use crate::error::{LeanLogError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the configuration file inside a log directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Query defaults used by [`crate::LogIndex`].
    #[serde(default)]
    pub query: QueryConfig,
}

impl Config {
    /// Load configuration from `dir/config.toml`.
    ///
    /// A missing file yields the default configuration. A file that exists but
    /// cannot be read fails with [`LeanLogError::Io`].
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Config::default())
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| LeanLogError::ConfigError(format!("failed to parse config: {}", e)))
    }

    /// Render configuration as TOML text.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LeanLogError::ConfigError(format!("failed to serialize config: {}", e)))
    }
}

/// Defaults for queries that take an optional limit or depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Number of ancestors and descendants kept per match in reasoning search (default: 3).
    pub reasoning_depth: usize,

    /// Maximum results returned by "top matches" searches (default: 20).
    pub search_limit: usize,

    /// Number of entries in the "recent" window (default: 8).
    pub recent_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            reasoning_depth: 3,
            search_limit: 20,
            recent_limit: 8,
        }
    }
}
