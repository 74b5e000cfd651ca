//! The Cache Contract
//!
//! Everything above the storage layer talks to the store through the [`Cache`]
//! trait, so an alternate backend can be substituted without touching the
//! protocol or connection code. The in-memory [`MemoryCache`] is the only
//! implementation today.
//!
//! [`MemoryCache`]: crate::storage::MemoryCache

use crate::storage::stat::CacheStat;
use bytes::Bytes;
use thiserror::Error;

/// Errors a cache backend can report.
///
/// The in-memory backend never fails, but the contract stays error-capable so
/// backends with real failure modes (capacity limits, remote stores) fit
/// behind the same trait.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// A backend-specific failure
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// The storage abstraction shared by every connection handler.
///
/// All four operations are safe to call concurrently from any number of
/// tasks. Implementations must keep their statistics exactly in sync with the
/// store: once a `set` or `delete` returns, a `stat` snapshot reflects it.
pub trait Cache: Send + Sync {
    /// Inserts or replaces the entry for `key`.
    ///
    /// Replacing an existing entry removes the old value's statistics
    /// contribution before adding the new one, atomically with respect to
    /// every other operation on the store.
    fn set(&self, key: Bytes, value: Bytes) -> Result<(), CacheError>;

    /// Returns the stored value for `key`, or `None` if absent.
    ///
    /// A missing key is not an error.
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>, CacheError>;

    /// Removes the entry for `key` if present.
    ///
    /// Removing an absent key is a successful no-op; statistics are only
    /// decremented when an entry was actually removed.
    fn delete(&self, key: &[u8]) -> Result<(), CacheError>;

    /// Returns a consistent snapshot of the current statistics.
    ///
    /// Both counters are read together under the store's lock, so the
    /// snapshot always reflects a state the store was actually in.
    fn stat(&self) -> CacheStat;
}
