//! # bytecache - A Minimal Networked In-Memory Key-Value Cache
//!
//! bytecache is a small TCP cache server: clients issue set/get/delete
//! operations against an in-process store using a compact length-prefixed
//! binary protocol.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          bytecache                           │
//! │                                                              │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐       │
//! │  │ TCP Server  │───>│ Connection  │───>│  Command    │       │
//! │  │ (Listener)  │    │  Handler    │    │  Handler    │       │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘       │
//! │                                               │              │
//! │                                               ▼              │
//! │  ┌─────────────┐    ┌──────────────────────────────────┐     │
//! │  │   Frame     │    │           Cache trait            │     │
//! │  │   Parser    │    │  ┌────────────────────────────┐  │     │
//! │  │             │    │  │        MemoryCache         │  │     │
//! │  └─────────────┘    │  │ RwLock(HashMap + CacheStat)│  │     │
//! │                     │  └────────────────────────────┘  │     │
//! │                     └──────────────────────────────────┘     │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Protocol
//!
//! A request starts with a one-byte operation tag, followed by decimal-ASCII
//! field lengths (each terminated by a single space) and then the raw field
//! bytes:
//!
//! - `S<keyLen> <valueLen> <key><value>` — set
//! - `G<keyLen> <key>` — get
//! - `D<keyLen> <key>` — delete
//!
//! Responses are `<len><payload>` on success and `-<len><message>` on
//! failure. Keys and values are binary-safe; their boundaries come entirely
//! from the length counts.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bytecache::commands::CommandHandler;
//! use bytecache::connection::{handle_connection, ConnectionStats};
//! use bytecache::storage::{Cache, MemoryCache};
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
//!     let stats = Arc::new(ConnectionStats::new());
//!
//!     let listener = TcpListener::bind("127.0.0.1:9000").await?;
//!
//!     loop {
//!         let (stream, addr) = listener.accept().await?;
//!         let handler = CommandHandler::new(Arc::clone(&cache));
//!         let stats = Arc::clone(&stats);
//!
//!         tokio::spawn(handle_connection(stream, addr, handler, stats));
//!     }
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`protocol`]: frame parser and command/response types
//! - [`storage`]: the `Cache` trait, in-memory backend and usage statistics
//! - [`commands`]: command execution against the cache
//! - [`connection`]: per-connection read-execute-respond loop
//!
//! ## Design Highlights
//!
//! ### Coarse-Grained Locking
//!
//! The store and its statistics live under one `RwLock`, so every mutation is
//! a single atomic unit against the whole store and a statistics snapshot can
//! never observe counters that disagree with the contents.
//!
//! ### One Task per Connection
//!
//! Each accepted connection runs in its own Tokio task. Connections share
//! nothing but the cache, and the cache lock is only held for the duration of
//! a single operation, never across a network round trip.

pub mod commands;
pub mod connection;
pub mod protocol;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::CommandHandler;
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{Command, FrameError, FrameParser, Response};
pub use storage::{Cache, CacheError, CacheStat, MemoryCache};

/// The default port the cache server listens on
pub const DEFAULT_PORT: u16 = 9000;

/// The default host the server binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of bytecache
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
