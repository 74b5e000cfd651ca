//! Storage Module
//!
//! This module provides the authoritative data store: the [`Cache`] trait
//! that the rest of the server programs against, the in-memory [`MemoryCache`]
//! backend, and the [`CacheStat`] usage counters.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                MemoryCache                  │
//! │  ┌───────────────────────────────────────┐  │
//! │  │           RwLock<Inner>               │  │
//! │  │  HashMap<Bytes, Bytes>  +  CacheStat  │  │
//! │  └───────────────────────────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! The map and the statistics live under one lock, so each mutation is a
//! single atomic unit against the whole store and the counters can never
//! drift from the actual contents.
//!
//! ## Example
//!
//! ```
//! use bytecache::storage::{Cache, MemoryCache};
//! use bytes::Bytes;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(MemoryCache::new());
//!
//! cache.set(Bytes::from("key"), Bytes::from("value")).unwrap();
//! assert_eq!(cache.get(b"key").unwrap(), Some(Bytes::from("value")));
//!
//! cache.delete(b"key").unwrap();
//! assert_eq!(cache.stat().entries, 0);
//! ```

pub mod cache;
pub mod memory;
pub mod stat;

// Re-export commonly used types
pub use cache::{Cache, CacheError};
pub use memory::MemoryCache;
pub use stat::CacheStat;
