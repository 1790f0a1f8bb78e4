//! Result cache boundary and an in-process implementation.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use omnisql_core::SqlValue;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tokio::time::Instant;

use crate::error::CacheError;

/// A key-value store for serialized query results.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Returns the stored value, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Stores a value that expires after `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;
}

struct Entry {
    value: Vec<u8>,
    // None when the TTL runs past the clock's range
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| at > now)
    }
}

/// Process-local cache with per-entry expiry.
///
/// Expired entries are dropped lazily on read, or in bulk by
/// [`MemoryCache::purge_expired`].
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Removes every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let expired = match entries.get(key) {
            Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError> {
        let entry = Entry {
            value,
            expires_at: Instant::now().checked_add(ttl),
        };
        self.entries.lock().insert(key.to_string(), entry);
        Ok(())
    }
}

/// Derives a cache key from statement text and bound values.
///
/// Each value is tagged with its kind so that `Int(1)` and `Text("1")`
/// produce different keys.
#[must_use]
pub fn fingerprint(sql: &str, params: &[SqlValue]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((sql.len() as u64).to_le_bytes());
    hasher.update(sql.as_bytes());
    for param in params {
        match param {
            SqlValue::Null => hasher.update([0u8]),
            SqlValue::Bool(b) => hasher.update([1u8, u8::from(*b)]),
            SqlValue::Int(i) => {
                hasher.update([2u8]);
                hasher.update(i.to_le_bytes());
            }
            SqlValue::Float(f) => {
                hasher.update([3u8]);
                hasher.update(f.to_bits().to_le_bytes());
            }
            SqlValue::Text(s) => {
                hasher.update([4u8]);
                hasher.update((s.len() as u64).to_le_bytes());
                hasher.update(s.as_bytes());
            }
            SqlValue::Blob(b) => {
                hasher.update([5u8]);
                hasher.update((b.len() as u64).to_le_bytes());
                hasher.update(b);
            }
        }
    }
    format!("{:x}", hasher.finalize())
}
