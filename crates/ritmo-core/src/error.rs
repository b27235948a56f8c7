//! Core error types for ritmo-core.
//!
//! The timer engine itself never fails: invalid transitions are no-ops and
//! persistence problems degrade to defaults. These types cover the fallible
//! edges around it (opening stores, loading configuration).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for ritmo-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistence store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a [`PersistenceStore`](crate::storage::PersistenceStore).
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// A value could not be encoded for storage
    #[error("Failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),

    /// The data directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown timer mode name
    #[error("Unknown timer mode: {0}")]
    UnknownMode(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_wraps_into_core_error() {
        let err: CoreError = StoreError::Locked.into();
        assert_eq!(err.to_string(), "Store error: Store is locked");
    }

    #[test]
    fn config_error_messages_name_the_key() {
        let err = ConfigError::InvalidValue {
            key: "timer.tick_period_ms".into(),
            message: "must be positive".into(),
        };
        assert!(err.to_string().contains("timer.tick_period_ms"));
    }
}
