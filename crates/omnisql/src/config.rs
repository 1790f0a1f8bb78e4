//! Connection profiles loaded from JSON.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use omnisql_core::{Dialect, DialectKind, DialectOptions};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sqlite::SqliteDriver;

const fn default_max_connections() -> u32 {
    5
}

/// Everything needed to open a connection and render for it.
///
/// ```json
/// {
///     "dialect": "mssql",
///     "database_url": "sqlite::memory:",
///     "options": { "quotes": ["`", "`"] },
///     "cache_ttl_secs": 300
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConnectionProfile {
    /// SQL dialect to render statements in.
    pub dialect: DialectKind,
    /// Driver connection URL.
    pub database_url: String,
    /// Per-instance dialect overrides.
    #[serde(default)]
    pub options: DialectOptions,
    /// Connection pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Default lifetime of cached results, in seconds.
    #[serde(default)]
    pub cache_ttl_secs: Option<u64>,
}

impl ConnectionProfile {
    /// Creates a profile with default options.
    #[must_use]
    pub fn new(dialect: DialectKind, database_url: impl Into<String>) -> Self {
        Self {
            dialect,
            database_url: database_url.into(),
            options: DialectOptions::default(),
            max_connections: default_max_connections(),
            cache_ttl_secs: None,
        }
    }

    /// Parses a profile from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a profile file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Builds the configured dialect.
    #[must_use]
    pub fn build_dialect(&self) -> Arc<dyn Dialect> {
        self.dialect.build(&self.options)
    }

    /// Builds a SQLite driver for the configured URL.
    #[must_use]
    pub fn sqlite_driver(&self) -> SqliteDriver {
        SqliteDriver::new(self.database_url.clone()).max_connections(self.max_connections)
    }

    /// Default cache lifetime, if the profile sets one.
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }
}
