//! Core error types for restcycle-core.
//!
//! The taxonomy deliberately separates "the backend never answered"
//! (retry on the next poll, keep local state) from "the backend answered
//! and said no" (surface it, keep local state). Nothing in this crate is
//! fatal to the process; every failure degrades to "try again on the
//! next tick".

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for restcycle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Backend communication errors
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Acknowledgement-store errors
    #[error("Storage error: {0}")]
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

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the user-state backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The request never produced an authoritative answer. Callers must
    /// treat this as "no information" -- retry on the next poll, never
    /// clear an active session.
    #[error("Network error talking to backend: {0}")]
    Network(String),

    /// The backend answered and refused. Surfaced to the user; local
    /// session state stays untouched so the command can be retried.
    #[error("Backend rejected request: {0}")]
    Rejected(String),
}

impl BackendError {
    /// True when the failure carries no authoritative information.
    pub fn is_network(&self) -> bool {
        matches!(self, BackendError::Network(_))
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Network(err.to_string())
    }
}

/// Acknowledgement-store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Data directory could not be resolved or created
    #[error("Failed to resolve data directory: {0}")]
    DataDir(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Store is locked by another process
    #[error("Store is locked")]
    Locked,

    /// A persisted session record could not be decoded
    #[error("Corrupt session record for '{username}': {message}")]
    CorruptRecord { username: String, message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
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

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
