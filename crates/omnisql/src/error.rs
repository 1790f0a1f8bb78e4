//! Error types for query execution.

use omnisql_core::SpecError;
use thiserror::Error;

/// Errors raised by a database driver.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The connection could not be established.
    #[error("failed to connect to '{url}': {source}")]
    Connect {
        /// Connection URL.
        url: String,
        /// Underlying error.
        #[source]
        source: sqlx::Error,
    },

    /// A query was issued before `connect()` or after `disconnect()`.
    #[error("not connected")]
    NotConnected,

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Errors raised by a result cache. These never fail a query.
#[derive(Debug, Error)]
pub enum CacheError {
    /// A cached value could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The cache backend is not reachable.
    #[error("cache unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while loading a connection profile.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The profile file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The profile is not valid JSON or has unknown fields.
    #[error("invalid profile: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any error surfaced by the facade.
#[derive(Debug, Error)]
pub enum Error {
    /// Statement building failed.
    #[error(transparent)]
    Spec(#[from] SpecError),

    /// Statement execution failed.
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;
