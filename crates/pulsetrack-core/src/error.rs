//! Error types for pulsetrack-core.
//!
//! The pure transforms (curve, layout, rules, viewport) never fail. Errors
//! come only from the storage and configuration edges. Malformed persisted
//! session data is not an error either: the repository logs it and loads an
//! empty session.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding a session or config value failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A lock around an in-memory store was poisoned by a panicking writer.
    #[error("Store poisoned: {0}")]
    Poisoned(&'static str),
}

/// Failures of the SQLite key-value store.
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Schema creation or a kv statement failed.
    #[error("Query failed: {0}")]
    Query(#[from] rusqlite::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Dotted key with no matching field.
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// A configuration field outside its allowed range.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;
