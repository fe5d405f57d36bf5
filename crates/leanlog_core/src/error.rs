//! Error types for leanlog_core operations.
//!
//! Graph, index and query operations never fail: dangling references, cycles
//! and unknown ids degrade to empty results. Errors only arise when records are
//! created or edited, when configuration is loaded, and when derived results are
//! serialized.

use thiserror::Error;

/// Core error type for leanlog_core operations.
#[derive(Error, Debug)]
pub enum LeanLogError {
    /// A required record field was empty when the record was created.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// A positional edit referred to an entry outside the collection.
    #[error("invalid entry position {position} (collection has {len} entries)")]
    InvalidPosition {
        /// The requested position
        position: usize,
        /// Number of entries in the collection
        len: usize,
    },

    /// Configuration error (loading, parsing, invalid values).
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Serialization error while rendering derived results.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error during configuration file access.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LeanLogError {
    /// Returns a user-friendly recovery suggestion for the error, if available.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::MissingField(_) => Some("Every entry needs a non-empty name and problem."),
            Self::InvalidPosition { .. } => {
                Some("Positions are zero-based; reload the log and check the entry count.")
            }
            Self::ConfigError(_) => {
                Some("Check config.toml; delete it to fall back to the default settings.")
            }
            _ => None,
        }
    }
}

/// Convenience Result type for leanlog_core operations.
pub type Result<T> = std::result::Result<T, LeanLogError>;
