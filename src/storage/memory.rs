//! In-Memory Cache Backend
//!
//! This module implements the core store: a thread-safe mapping from keys to
//! byte values with exact usage statistics.
//!
//! ## Concurrency Model
//!
//! One `RwLock` guards the map and the statistics together. Reads (`get`,
//! `stat`) share the read lock; a mutation (`set`, `delete`) holds the write
//! lock for its key lookup, store update and statistics adjustment as a
//! single unit. That makes every mutation atomic against the whole store and
//! guarantees a `stat` snapshot can never observe a torn pair of counters.
//!
//! The lock is only held for the duration of one call, never across network
//! I/O, so a stalled client cannot block other connections.

use crate::storage::cache::{Cache, CacheError};
use crate::storage::stat::CacheStat;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::RwLock;

/// The store and its statistics, updated together under one lock.
#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<Bytes, Bytes>,
    stat: CacheStat,
}

/// The in-memory cache backend.
///
/// Designed to be wrapped in an `Arc` and shared across all connection
/// handler tasks.
///
/// # Example
///
/// ```
/// use bytecache::storage::{Cache, MemoryCache};
/// use bytes::Bytes;
///
/// let cache = MemoryCache::new();
///
/// cache.set(Bytes::from("name"), Bytes::from("val")).unwrap();
/// assert_eq!(cache.get(b"name").unwrap(), Some(Bytes::from("val")));
///
/// let stat = cache.stat();
/// assert_eq!(stat.entries, 1);
/// assert_eq!(stat.value_bytes, 3);
/// ```
#[derive(Debug, Default)]
pub struct MemoryCache {
    inner: RwLock<Inner>,
}

impl MemoryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn set(&self, key: Bytes, value: Bytes) -> Result<(), CacheError> {
        let mut inner = self.inner.write().unwrap();

        let value_len = value.len();
        if let Some(old) = inner.entries.insert(key, value) {
            inner.stat.remove(old.len());
        }
        inner.stat.add(value_len);

        Ok(())
    }

    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, CacheError> {
        let inner = self.inner.read().unwrap();
        Ok(inner.entries.get(key).cloned())
    }

    fn delete(&self, key: &[u8]) -> Result<(), CacheError> {
        let mut inner = self.inner.write().unwrap();

        if let Some(old) = inner.entries.remove(key) {
            inner.stat.remove(old.len());
        }

        Ok(())
    }

    fn stat(&self) -> CacheStat {
        self.inner.read().unwrap().stat
    }
}
