//! Query facade tying a dialect, a driver and an optional result cache.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use omnisql_core::builder::{AlterTable, Batch, Create, Delete, DropObject, Insert, Select, Update};
use omnisql_core::{Dialect, Rendered, SqlValue};
use tracing::{debug, warn};

use crate::cache::{fingerprint, Cache};
use crate::config::ConnectionProfile;
use crate::driver::{Driver, FetchOptions, Outcome};
use crate::error::DriverError;

/// Lifetime of cached results when none is given.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Entry point for building and running statements against one database.
///
/// Builders come from the configured dialect; execution goes through the
/// driver. Cached execution never fails because of the cache: read and
/// write errors are logged and the query runs (or returns) as usual.
pub struct Query {
    dialect: Arc<dyn Dialect>,
    driver: Arc<dyn Driver>,
    cache: Option<Arc<dyn Cache>>,
    default_ttl: Duration,
}

impl Query {
    /// Creates a facade without a cache.
    #[must_use]
    pub fn new(dialect: Arc<dyn Dialect>, driver: Arc<dyn Driver>) -> Self {
        Self {
            dialect,
            driver,
            cache: None,
            default_ttl: DEFAULT_CACHE_TTL,
        }
    }

    /// Builds the facade from a profile and a driver for it.
    #[must_use]
    pub fn from_profile(profile: &ConnectionProfile, driver: Arc<dyn Driver>) -> Self {
        let mut query = Self::new(profile.build_dialect(), driver);
        if let Some(ttl) = profile.cache_ttl() {
            query.default_ttl = ttl;
        }
        query
    }

    /// Attaches a result cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sets the lifetime used when a cached call passes no TTL.
    #[must_use]
    pub const fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Returns the dialect statements are rendered in.
    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    /// Returns the underlying driver.
    pub fn driver(&self) -> &dyn Driver {
        self.driver.as_ref()
    }

    /// Starts a SELECT statement.
    pub fn select(&self) -> Select<'_> {
        self.dialect.select()
    }

    /// Starts an INSERT statement.
    pub fn insert(&self) -> Insert<'_> {
        self.dialect.insert()
    }

    /// Starts an UPDATE statement.
    pub fn update(&self) -> Update<'_> {
        self.dialect.update()
    }

    /// Starts a DELETE statement.
    pub fn delete(&self) -> Delete<'_> {
        self.dialect.delete()
    }

    /// Starts a CREATE DATABASE or CREATE TABLE statement.
    pub fn create(&self) -> Create<'_> {
        self.dialect.create()
    }

    /// Starts an ALTER TABLE statement.
    pub fn alter(&self) -> AlterTable<'_> {
        self.dialect.alter()
    }

    /// Starts a DROP statement.
    pub fn drop_object(&self) -> DropObject<'_> {
        self.dialect.drop_object()
    }

    /// Opens the driver connection.
    pub async fn connect(&self) -> Result<(), DriverError> {
        self.driver.connect().await
    }

    /// Closes the driver connection. Returns false if it was not open.
    pub async fn disconnect(&self) -> bool {
        self.driver.disconnect().await
    }

    /// Quotes a string literal for the connected database.
    pub fn escape(&self, data: &str) -> String {
        self.driver.escape(data)
    }

    /// Runs SQL text without parameters.
    pub async fn raw(&self, sql: &str, options: &FetchOptions) -> Result<Outcome, DriverError> {
        self.driver.raw(sql, options).await
    }

    /// Runs SQL text without parameters, serving repeats from the cache.
    pub async fn raw_cached(
        &self,
        sql: &str,
        options: &FetchOptions,
        ttl: Option<Duration>,
    ) -> Result<Outcome, DriverError> {
        let key = cache_key(sql, &[], options);
        self.cached(sql, key, ttl, || self.driver.raw(sql, options))
            .await
    }

    /// Runs SQL text with bound values.
    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<Outcome, DriverError> {
        self.driver
            .prepared(sql, params, &FetchOptions::default())
            .await
    }

    /// Runs SQL text with bound values, serving repeats from the cache.
    ///
    /// The key is derived from `sql` and `params`. Only plain reads
    /// (SELECT, WITH or VALUES without any data-modifying keyword) are
    /// stored, so writes always reach the database.
    pub async fn execute_cached(
        &self,
        sql: &str,
        params: &[SqlValue],
        ttl: Option<Duration>,
    ) -> Result<Outcome, DriverError> {
        let options = FetchOptions::default();
        let key = cache_key(sql, params, &options);
        self.cached(sql, key, ttl, || self.driver.prepared(sql, params, &options))
            .await
    }

    /// Runs a rendered statement.
    pub async fn run(&self, rendered: &Rendered) -> Result<Outcome, DriverError> {
        self.execute(&rendered.sql, &rendered.params).await
    }

    /// Runs a rendered statement through the cache.
    pub async fn run_cached(
        &self,
        rendered: &Rendered,
        ttl: Option<Duration>,
    ) -> Result<Outcome, DriverError> {
        self.execute_cached(&rendered.sql, &rendered.params, ttl)
            .await
    }

    /// Runs one statement per value list in a single transaction.
    pub async fn multi(&self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<bool, DriverError> {
        self.driver.multi(sql, rows).await
    }

    /// Runs a multi-row insert rendered by [`Insert::render_batch`].
    pub async fn run_batch(&self, batch: &Batch) -> Result<bool, DriverError> {
        self.multi(&batch.sql, &batch.rows).await
    }

    /// Like [`Query::multi`], mapping each item to its value list first.
    pub async fn multi_with<T, F>(
        &self,
        sql: &str,
        items: &[T],
        to_values: F,
    ) -> Result<bool, DriverError>
    where
        F: FnMut(&T) -> Vec<SqlValue>,
    {
        let rows: Vec<Vec<SqlValue>> = items.iter().map(to_values).collect();
        self.multi(sql, &rows).await
    }

    async fn cached<F, Fut>(
        &self,
        sql: &str,
        key: String,
        ttl: Option<Duration>,
        load: F,
    ) -> Result<Outcome, DriverError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Outcome, DriverError>>,
    {
        let Some(cache) = &self.cache else {
            return load().await;
        };
        if !is_read_only(sql) {
            debug!(sql = %sql, "Statement may modify data, bypassing cache");
            return load().await;
        }

        match cache.get(&key).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<Outcome>(&bytes) {
                Ok(outcome) => {
                    debug!(key = %key, "Cache hit");
                    return Ok(outcome);
                }
                Err(e) => warn!(key = %key, error = %e, "Discarding undecodable cache entry"),
            },
            Ok(None) => debug!(key = %key, "Cache miss"),
            Err(e) => warn!(key = %key, error = %e, "Cache read failed"),
        }

        let outcome = load().await?;
        if outcome.rows().is_none() {
            return Ok(outcome);
        }
        match serde_json::to_vec(&outcome) {
            Ok(bytes) => {
                let ttl = ttl.unwrap_or(self.default_ttl);
                if let Err(e) = cache.set(&key, bytes, ttl).await {
                    warn!(key = %key, error = %e, "Cache write failed");
                }
            }
            Err(e) => warn!(key = %key, error = %e, "Failed to encode result for caching"),
        }
        Ok(outcome)
    }
}

/// Whether a statement only reads, judged from its keywords.
///
/// Any data-modifying keyword disqualifies it, even inside a string literal.
fn is_read_only(sql: &str) -> bool {
    let upper = sql.to_ascii_uppercase();
    let mut words = upper
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| !word.is_empty());
    let leading = matches!(words.next(), Some("SELECT" | "WITH" | "VALUES"));
    leading
        && !words.any(|word| {
            matches!(
                word,
                "INSERT" | "UPDATE" | "DELETE" | "REPLACE" | "MERGE" | "UPSERT" | "RETURNING"
            )
        })
}

// Fetch shape is part of the key so differently shaped results never collide.
fn cache_key(sql: &str, params: &[SqlValue], options: &FetchOptions) -> String {
    let key = fingerprint(sql, params);
    if *options == FetchOptions::default() {
        return key;
    }
    format!(
        "{key}:{}:{}",
        options.index.as_deref().unwrap_or_default(),
        u8::from(options.assoc)
    )
}
