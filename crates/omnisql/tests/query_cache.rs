mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{counting_query, failing_query, BrokenCache};
use omnisql::{Cache, DriverError, MemoryCache, Outcome};
use omnisql_core::{col, DialectKind, SqlValue, ToSqlValue};
use serde_json::json;

fn call_number(outcome: &Outcome) -> serde_json::Value {
    outcome.rows().unwrap().rows[0].get("call").cloned().unwrap()
}

#[tokio::test]
async fn test_execute_without_cache_always_hits_driver() {
    let (query, driver) = counting_query(DialectKind::Sqlite);
    query.execute_cached("SELECT 1", &[], None).await.unwrap();
    query.execute_cached("SELECT 1", &[], None).await.unwrap();
    assert_eq!(driver.calls(), 2);
}

#[tokio::test]
async fn test_execute_cached_serves_repeat_from_cache() {
    let (query, driver) = counting_query(DialectKind::Mysql);
    let query = query.with_cache(Arc::new(MemoryCache::new()));
    let params = [SqlValue::Int(7)];

    let first = query
        .execute_cached("SELECT * FROM t WHERE id = ?", &params, None)
        .await
        .unwrap();
    let second = query
        .execute_cached("SELECT * FROM t WHERE id = ?", &params, None)
        .await
        .unwrap();

    assert_eq!(driver.calls(), 1);
    assert_eq!(first, second);
    assert_eq!(call_number(&second), json!(1));
}

#[tokio::test]
async fn test_different_params_use_different_keys() {
    let (query, driver) = counting_query(DialectKind::Mysql);
    let query = query.with_cache(Arc::new(MemoryCache::new()));
    let sql = "SELECT * FROM t WHERE id = ?";

    query.execute_cached(sql, &[SqlValue::Int(1)], None).await.unwrap();
    query.execute_cached(sql, &[SqlValue::Int(2)], None).await.unwrap();
    query
        .execute_cached(sql, &[SqlValue::Text(String::from("1"))], None)
        .await
        .unwrap();

    assert_eq!(driver.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cached_result_expires_after_ttl() {
    let (query, driver) = counting_query(DialectKind::Sqlite);
    let query = query.with_cache(Arc::new(MemoryCache::new()));
    let ttl = Some(Duration::from_secs(30));

    query.execute_cached("SELECT 1", &[], ttl).await.unwrap();
    tokio::time::advance(Duration::from_secs(29)).await;
    query.execute_cached("SELECT 1", &[], ttl).await.unwrap();
    assert_eq!(driver.calls(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    let fresh = query.execute_cached("SELECT 1", &[], ttl).await.unwrap();
    assert_eq!(driver.calls(), 2);
    assert_eq!(call_number(&fresh), json!(2));
}

#[tokio::test(start_paused = true)]
async fn test_default_ttl_applies_when_none_given() {
    let (query, driver) = counting_query(DialectKind::Sqlite);
    let query = query
        .with_cache(Arc::new(MemoryCache::new()))
        .with_default_ttl(Duration::from_secs(5));

    query.execute_cached("SELECT 1", &[], None).await.unwrap();
    tokio::time::advance(Duration::from_secs(6)).await;
    query.execute_cached("SELECT 1", &[], None).await.unwrap();
    assert_eq!(driver.calls(), 2);
}

#[tokio::test]
async fn test_cache_failures_do_not_fail_the_query() {
    let (query, driver) = counting_query(DialectKind::Firebird);
    let cache = Arc::new(BrokenCache::default());
    let query = query.with_cache(cache.clone());

    let outcome = query.execute_cached("SELECT 1", &[], None).await.unwrap();
    assert_eq!(call_number(&outcome), json!(1));
    assert_eq!(cache.writes.load(Ordering::SeqCst), 1);

    query.execute_cached("SELECT 1", &[], None).await.unwrap();
    assert_eq!(driver.calls(), 2);
}

#[tokio::test]
async fn test_writes_are_not_cached() {
    let (query, driver) = counting_query(DialectKind::Sqlite);
    let cache = Arc::new(MemoryCache::new());
    let query = query.with_cache(cache.clone());

    let outcome = query
        .execute_cached("DELETE FROM t", &[], None)
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Done { rows_affected: 1 });
    query
        .execute_cached("DELETE FROM t", &[], None)
        .await
        .unwrap();

    assert_eq!(driver.calls(), 2);
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_undecodable_entry_is_replaced() {
    let (query, driver) = counting_query(DialectKind::Sqlite);
    let cache = Arc::new(MemoryCache::new());
    let key = omnisql::fingerprint("SELECT 1", &[]);
    cache
        .set(&key, b"not json".to_vec(), Duration::from_secs(60))
        .await
        .unwrap();
    let query = query.with_cache(cache.clone());

    query.execute_cached("SELECT 1", &[], None).await.unwrap();
    query.execute_cached("SELECT 1", &[], None).await.unwrap();
    assert_eq!(driver.calls(), 1);
}

#[tokio::test]
async fn test_run_cached_with_rendered_select() {
    let (query, driver) = counting_query(DialectKind::Mssql);
    let query = query.with_cache(Arc::new(MemoryCache::new()));

    let rendered = query
        .select()
        .from("users")
        .filter(col("active").eq(true))
        .limit(10)
        .render()
        .unwrap();
    assert_eq!(
        rendered.sql,
        "SELECT * FROM users WHERE active = ? ORDER BY 1 OFFSET ? ROWS FETCH NEXT ? ROWS ONLY"
    );

    let outcome = query.run_cached(&rendered, None).await.unwrap();
    query.run_cached(&rendered, None).await.unwrap();
    assert_eq!(driver.calls(), 1);
    assert_eq!(
        outcome.rows().unwrap().rows[0].get("params"),
        Some(&json!(3))
    );
}

#[tokio::test]
async fn test_multi_with_maps_items() {
    let (query, driver) = counting_query(DialectKind::Sqlite);
    let names = [String::from("a"), String::from("b"), String::from("c")];
    let ran = query
        .multi_with("INSERT INTO t (name) VALUES (?)", &names, |name| {
            vec![name.clone().to_sql_value()]
        })
        .await
        .unwrap();
    assert!(ran);
    assert_eq!(driver.batches.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_driver_error_surfaces_through_memory_cache() {
    let cache = Arc::new(MemoryCache::new());
    let query = failing_query(DialectKind::Sqlite).with_cache(cache.clone());

    let result = query.execute_cached("SELECT 1", &[], None).await;

    assert!(matches!(result, Err(DriverError::NotConnected)));
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_driver_error_surfaces_through_broken_cache() {
    let cache = Arc::new(BrokenCache::default());
    let query = failing_query(DialectKind::Mssql).with_cache(cache.clone());

    let result = query
        .raw_cached("SELECT 1", &omnisql::FetchOptions::default(), None)
        .await;

    assert!(matches!(result, Err(DriverError::NotConnected)));
    assert_eq!(cache.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cached_write_reaches_driver_every_time() {
    let (query, driver) = counting_query(DialectKind::Sqlite);
    let cache = Arc::new(MemoryCache::new());
    let query = query.with_cache(cache.clone());

    let sql = "WITH src AS (SELECT 1) INSERT INTO t SELECT * FROM src";
    query.execute_cached(sql, &[], None).await.unwrap();
    query.execute_cached(sql, &[], None).await.unwrap();

    assert_eq!(driver.calls(), 2);
    assert!(cache.is_empty());
}
