//! Wire Protocol Implementation
//!
//! This module implements the compact length-prefixed binary protocol spoken
//! between clients and the cache server.
//!
//! ## Overview
//!
//! A request is a one-byte operation tag (`S`, `G` or `D`) followed by
//! decimal-ASCII field lengths (each terminated by a space) and then the raw
//! field bytes. A response is the payload length followed by the payload,
//! with a leading `-` when the operation failed.
//!
//! ## Modules
//!
//! - `types`: the `Command` and `Response` types and response serialization
//! - `parser`: incremental parser for incoming frames
//!
//! ## Example
//!
//! ```
//! use bytecache::protocol::{parse_frame, Command, Response};
//! use bytes::Bytes;
//!
//! // Parsing incoming data
//! let data = b"S3 3 keyval";
//! let (command, consumed) = parse_frame(data).unwrap().unwrap();
//! assert_eq!(consumed, data.len());
//!
//! // Creating responses
//! let response = Response::value(Bytes::from("val"));
//! assert_eq!(response.serialize(), b"3val");
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{parse_frame, FrameError, FrameParser, FrameResult, MAX_FIELD_SIZE};
pub use types::{Command, Response};
