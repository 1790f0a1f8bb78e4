//! SQLite driver backed by a sqlx connection pool.

use async_trait::async_trait;
use indexmap::IndexMap;
use omnisql_core::SqlValue;
use serde_json::Value;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, Sqlite, TypeInfo, ValueRef};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::driver::{Driver, FetchOptions, Outcome, ResultSet, Row};
use crate::error::DriverError;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

type SqliteQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// Driver for SQLite databases.
pub struct SqliteDriver {
    url: String,
    max_connections: u32,
    pool: RwLock<Option<SqlitePool>>,
}

impl SqliteDriver {
    /// Creates a driver for the given URL, e.g. `sqlite:app.db?mode=rwc`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            pool: RwLock::new(None),
        }
    }

    /// Sets the pool size. In-memory databases need a single connection.
    #[must_use]
    pub const fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    async fn pool(&self) -> Result<SqlitePool, DriverError> {
        self.pool.read().await.clone().ok_or(DriverError::NotConnected)
    }
}

#[async_trait]
impl Driver for SqliteDriver {
    async fn connect(&self) -> Result<(), DriverError> {
        let mut guard = self.pool.write().await;
        if guard.is_some() {
            return Ok(());
        }
        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect(&self.url)
            .await
            .map_err(|source| DriverError::Connect {
                url: self.url.clone(),
                source,
            })?;
        info!(url = %self.url, "Connected to SQLite");
        *guard = Some(pool);
        Ok(())
    }

    async fn disconnect(&self) -> bool {
        let pool = self.pool.write().await.take();
        match pool {
            Some(pool) => {
                pool.close().await;
                info!(url = %self.url, "Disconnected from SQLite");
                true
            }
            None => false,
        }
    }

    fn client_info(&self) -> String {
        String::from("sqlx-sqlite")
    }

    async fn server_info(&self) -> Result<String, DriverError> {
        let pool = self.pool().await?;
        let version = sqlx::query_scalar::<_, String>("SELECT sqlite_version()")
            .fetch_one(&pool)
            .await?;
        Ok(format!("SQLite {version}"))
    }

    async fn raw(&self, sql: &str, options: &FetchOptions) -> Result<Outcome, DriverError> {
        let pool = self.pool().await?;
        debug!(sql = %sql, "Executing raw SQL");
        if returns_rows(sql) {
            let rows = sqlx::query(sql).fetch_all(&pool).await?;
            return Ok(Outcome::Rows(collect(&rows, options)?));
        }
        let result = sqlx::raw_sql(sql).execute(&pool).await?;
        Ok(Outcome::Done {
            rows_affected: result.rows_affected(),
        })
    }

    async fn prepared(
        &self,
        sql: &str,
        values: &[SqlValue],
        options: &FetchOptions,
    ) -> Result<Outcome, DriverError> {
        let pool = self.pool().await?;
        debug!(sql = %sql, params = values.len(), "Executing prepared SQL");
        let query = bind_all(sqlx::query(sql), values);
        if returns_rows(sql) {
            let rows = query.fetch_all(&pool).await?;
            return Ok(Outcome::Rows(collect(&rows, options)?));
        }
        let result = query.execute(&pool).await?;
        Ok(Outcome::Done {
            rows_affected: result.rows_affected(),
        })
    }

    async fn multi(&self, sql: &str, rows: &[Vec<SqlValue>]) -> Result<bool, DriverError> {
        if rows.is_empty() {
            debug!(sql = %sql, "No value lists, nothing to execute");
            return Ok(false);
        }
        let pool = self.pool().await?;
        let mut tx = pool.begin().await?;
        for values in rows {
            bind_all(sqlx::query(sql), values).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        debug!(sql = %sql, rows = rows.len(), "Executed statement batch");
        Ok(true)
    }
}

fn bind_all<'q>(mut query: SqliteQuery<'q>, values: &[SqlValue]) -> SqliteQuery<'q> {
    for value in values {
        query = bind_value(query, value.clone());
    }
    query
}

fn bind_value(query: SqliteQuery<'_>, value: SqlValue) -> SqliteQuery<'_> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Blob(b) => query.bind(b),
    }
}

/// Whether a statement yields a result set.
fn returns_rows(sql: &str) -> bool {
    let upper = sql.trim_start().to_ascii_uppercase();
    let keyword = upper
        .split(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or_default();
    matches!(keyword, "SELECT" | "WITH" | "PRAGMA" | "VALUES" | "EXPLAIN")
        || upper.contains(" RETURNING ")
}

fn collect(rows: &[SqliteRow], options: &FetchOptions) -> Result<ResultSet, DriverError> {
    let rows = rows
        .iter()
        .map(|row| decode_row(row, options.assoc))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResultSet::new(rows, options.index.clone()))
}

fn decode_row(row: &SqliteRow, assoc: bool) -> Result<Row, sqlx::Error> {
    let mut fields = IndexMap::with_capacity(row.len());
    for (index, column) in row.columns().iter().enumerate() {
        let key = if assoc {
            column.name().to_string()
        } else {
            index.to_string()
        };
        fields.insert(key, decode_cell(row, index)?);
    }
    Ok(Row { fields })
}

// Decoded by storage class, not declared type.
fn decode_cell(row: &SqliteRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_string();
    let value = match storage.as_str() {
        "INTEGER" | "BOOLEAN" => Value::from(row.try_get_unchecked::<i64, _>(index)?),
        "REAL" => Value::from(row.try_get_unchecked::<f64, _>(index)?),
        "BLOB" => Value::from(row.try_get_unchecked::<Vec<u8>, _>(index)?),
        _ => Value::String(row.try_get_unchecked::<String, _>(index)?),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returns_rows() {
        assert!(returns_rows("SELECT 1"));
        assert!(returns_rows("  select * from t"));
        assert!(returns_rows("WITH x AS (SELECT 1) SELECT * FROM x"));
        assert!(returns_rows("PRAGMA table_info(users)"));
        assert!(returns_rows("INSERT INTO t (a) VALUES (?) RETURNING id"));
        assert!(!returns_rows("INSERT INTO t (a) VALUES (?)"));
        assert!(!returns_rows("CREATE TABLE t (a INT)"));
        assert!(!returns_rows("DELETE FROM selections"));
    }

    #[test]
    fn test_escape() {
        let driver = SqliteDriver::new("sqlite::memory:");
        assert_eq!(driver.escape("O'Brien"), "'O''Brien'");
    }

    #[tokio::test]
    async fn test_query_before_connect() {
        let driver = SqliteDriver::new("sqlite::memory:");
        let result = driver.raw("SELECT 1", &FetchOptions::default()).await;
        assert!(matches!(result, Err(DriverError::NotConnected)));
        assert!(!driver.disconnect().await);
    }
}
