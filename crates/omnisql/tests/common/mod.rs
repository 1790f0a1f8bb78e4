#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use indexmap::IndexMap;
use omnisql::{
    Cache, CacheError, Driver, DriverError, FetchOptions, Outcome, Query, ResultSet, Row,
    SqliteDriver,
};
use omnisql_core::{DialectKind, DialectOptions, SqlValue};
use serde_json::json;

/// Driver that answers every query with one row and counts calls.
#[derive(Default)]
pub struct CountingDriver {
    pub queries: AtomicUsize,
    pub batches: AtomicUsize,
}

impl CountingDriver {
    pub fn calls(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn answer(&self, sql: &str, values: &[SqlValue], options: &FetchOptions) -> Outcome {
        let n = self.queries.fetch_add(1, Ordering::SeqCst) + 1;
        if !sql.trim_start().to_ascii_uppercase().starts_with("SELECT") {
            return Outcome::Done { rows_affected: 1 };
        }
        let mut fields = IndexMap::new();
        fields.insert(String::from("call"), json!(n));
        fields.insert(String::from("params"), json!(values.len()));
        Outcome::Rows(ResultSet::new(vec![Row { fields }], options.index.clone()))
    }
}

#[async_trait]
impl Driver for CountingDriver {
    async fn connect(&self) -> Result<(), DriverError> {
        Ok(())
    }

    async fn disconnect(&self) -> bool {
        true
    }

    fn client_info(&self) -> String {
        String::from("counting")
    }

    async fn server_info(&self) -> Result<String, DriverError> {
        Ok(String::from("counting"))
    }

    async fn raw(&self, sql: &str, options: &FetchOptions) -> Result<Outcome, DriverError> {
        Ok(self.answer(sql, &[], options))
    }

    async fn prepared(
        &self,
        sql: &str,
        values: &[SqlValue],
        options: &FetchOptions,
    ) -> Result<Outcome, DriverError> {
        Ok(self.answer(sql, values, options))
    }

    async fn multi(&self, _sql: &str, rows: &[Vec<SqlValue>]) -> Result<bool, DriverError> {
        self.batches.fetch_add(rows.len(), Ordering::SeqCst);
        Ok(!rows.is_empty())
    }
}

/// Driver whose every statement is rejected.
pub struct FailingDriver;

#[async_trait]
impl Driver for FailingDriver {
    async fn connect(&self) -> Result<(), DriverError> {
        Err(DriverError::NotConnected)
    }

    async fn disconnect(&self) -> bool {
        false
    }

    fn client_info(&self) -> String {
        String::from("failing")
    }

    async fn server_info(&self) -> Result<String, DriverError> {
        Err(DriverError::NotConnected)
    }

    async fn raw(&self, _sql: &str, _options: &FetchOptions) -> Result<Outcome, DriverError> {
        Err(DriverError::NotConnected)
    }

    async fn prepared(
        &self,
        _sql: &str,
        _values: &[SqlValue],
        _options: &FetchOptions,
    ) -> Result<Outcome, DriverError> {
        Err(DriverError::NotConnected)
    }

    async fn multi(&self, _sql: &str, _rows: &[Vec<SqlValue>]) -> Result<bool, DriverError> {
        Err(DriverError::NotConnected)
    }
}

/// Cache whose reads miss and whose writes always fail.
#[derive(Default)]
pub struct BrokenCache {
    pub writes: AtomicUsize,
}

#[async_trait]
impl Cache for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Err(CacheError::Unavailable(String::from("down")))
    }

    async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(CacheError::Unavailable(String::from("down")))
    }
}

pub fn counting_query(kind: DialectKind) -> (Query, Arc<CountingDriver>) {
    let driver = Arc::new(CountingDriver::default());
    let query = Query::new(kind.build(&DialectOptions::default()), driver.clone());
    (query, driver)
}

pub fn failing_query(kind: DialectKind) -> Query {
    Query::new(kind.build(&DialectOptions::default()), Arc::new(FailingDriver))
}

/// Connected facade over a private in-memory SQLite database.
pub async fn sqlite_query() -> Query {
    let driver = Arc::new(SqliteDriver::new("sqlite::memory:").max_connections(1));
    let query = Query::new(DialectKind::Sqlite.build(&DialectOptions::default()), driver);
    query.connect().await.unwrap();
    query
}
