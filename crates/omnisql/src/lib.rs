//! # omnisql
//!
//! Runs statements built by `omnisql-core` against a database.
//!
//! This crate provides:
//! - A [`Driver`] boundary with a SQLite implementation on sqlx
//! - A [`Cache`] boundary with an in-process TTL cache
//! - The [`Query`] facade: builders for the configured dialect plus plain
//!   and cached execution
//! - JSON connection profiles
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use omnisql::prelude::*;
//!
//! # async fn run() -> omnisql::Result<()> {
//! let profile = ConnectionProfile::new(DialectKind::Sqlite, "sqlite::memory:");
//! let driver = Arc::new(profile.sqlite_driver().max_connections(1));
//! let query = Query::from_profile(&profile, driver).with_cache(Arc::new(MemoryCache::new()));
//! query.connect().await?;
//!
//! let rendered = query
//!     .select()
//!     .from("users")
//!     .filter(col("active").eq(true))
//!     .limit(10)
//!     .render()?;
//! let outcome = query.run_cached(&rendered, None).await?;
//! println!("{} rows", outcome.count());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod driver;
pub mod error;
pub mod query;
pub mod sqlite;

pub use cache::{fingerprint, Cache, MemoryCache};
pub use config::ConnectionProfile;
pub use driver::{Driver, FetchOptions, Outcome, ResultSet, Row};
pub use error::{CacheError, ConfigError, DriverError, Error, Result};
pub use query::{Query, DEFAULT_CACHE_TTL};
pub use sqlite::SqliteDriver;

pub use omnisql_core;

/// Common imports.
pub mod prelude {
    pub use crate::{
        Cache, ConnectionProfile, Driver, FetchOptions, MemoryCache, Outcome, Query, SqliteDriver,
    };
    pub use omnisql_core::{
        col, CanonicalType, ColumnSpec, Dialect, DialectKind, DialectOptions, Rendered, SqlValue,
    };
}
