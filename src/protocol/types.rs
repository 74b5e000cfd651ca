//! Wire Protocol Data Types
//!
//! This module defines the commands and responses exchanged over the
//! length-prefixed binary protocol.
//!
//! ## Protocol Format
//!
//! Every request starts with a one-byte operation tag:
//! - `S` Set
//! - `G` Get
//! - `D` Delete
//!
//! Field lengths are decimal ASCII, each terminated by a single space which is
//! consumed and not counted. The raw field bytes follow immediately, with no
//! further delimiters — their boundaries come entirely from the preceding
//! length counts, so keys and values are binary-safe (they may contain spaces,
//! digits, or any other byte).
//!
//! ## Examples
//!
//! Set: `S3 3 keyval` (key `key`, value `val`)
//! Get: `G3 key`
//! Delete: `D3 key`
//! Success response: `3val` (length, then raw payload)
//! Error response: `-9not found` (leading `-`, length, then message)

use bytes::Bytes;
use std::fmt;

/// Request operation tags
pub mod op {
    pub const SET: u8 = b'S';
    pub const GET: u8 = b'G';
    pub const DELETE: u8 = b'D';
}

/// Prefix byte marking an error response
pub const ERROR_PREFIX: u8 = b'-';

/// A fully decoded client command.
///
/// Keys and values are `Bytes` rather than `String` because the protocol
/// delimits them by length, not by terminator — any byte value is legal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert or replace the entry for `key`.
    /// Format: `S<keyLen> <valueLen> <key><value>`
    Set { key: Bytes, value: Bytes },

    /// Look up the value for `key`.
    /// Format: `G<keyLen> <key>`
    Get { key: Bytes },

    /// Remove the entry for `key` (a no-op if absent).
    /// Format: `D<keyLen> <key>`
    Delete { key: Bytes },
}

impl Command {
    /// Returns the operation tag byte for this command.
    pub fn tag(&self) -> u8 {
        match self {
            Command::Set { .. } => op::SET,
            Command::Get { .. } => op::GET,
            Command::Delete { .. } => op::DELETE,
        }
    }

    /// Returns the key this command operates on.
    pub fn key(&self) -> &Bytes {
        match self {
            Command::Set { key, .. } => key,
            Command::Get { key } => key,
            Command::Delete { key } => key,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Delete { .. } => "DELETE",
        };
        write!(f, "{} ({} key bytes)", name, self.key().len())
    }
}

/// A response to be written back to the client.
///
/// Success and failure share one framing scheme, distinguished only by a
/// leading `-` on failure. There is no separate status byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Success: `<len(payload)><payload bytes>`.
    /// An empty payload encodes as the single byte `0`.
    Value(Bytes),

    /// Failure: `-<len(message)><message bytes>`.
    Error(String),
}

impl Response {
    /// Creates a success response carrying `payload`.
    pub fn value(payload: impl Into<Bytes>) -> Self {
        Response::Value(payload.into())
    }

    /// Creates a success response with an empty payload (`0` on the wire).
    pub fn empty() -> Self {
        Response::Value(Bytes::new())
    }

    /// Creates an error response.
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error(message.into())
    }

    /// Returns true if this response is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error(_))
    }

    /// Serializes the response to bytes for sending over the wire.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the response into an existing buffer.
    ///
    /// This is more efficient than `serialize()` when reusing a buffer.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            Response::Value(payload) => {
                buf.extend_from_slice(payload.len().to_string().as_bytes());
                buf.extend_from_slice(payload);
            }
            Response::Error(message) => {
                buf.push(ERROR_PREFIX);
                buf.extend_from_slice(message.len().to_string().as_bytes());
                buf.extend_from_slice(message.as_bytes());
            }
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Value(payload) => {
                if let Ok(s) = std::str::from_utf8(payload) {
                    write!(f, "\"{}\"", s)
                } else {
                    write!(f, "(binary data, {} bytes)", payload.len())
                }
            }
            Response::Error(message) => write!(f, "(error) {}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_serialize() {
        let response = Response::value(Bytes::from("val"));
        assert_eq!(response.serialize(), b"3val");
    }

    #[test]
    fn test_empty_value_serialize() {
        let response = Response::empty();
        assert_eq!(response.serialize(), b"0");
    }

    #[test]
    fn test_error_serialize() {
        let response = Response::error("not found");
        assert_eq!(response.serialize(), b"-9not found");
    }

    #[test]
    fn test_binary_value_serialize() {
        let response = Response::value(Bytes::from(&b"a\x00 b"[..]));
        assert_eq!(response.serialize(), b"4a\x00 b");
    }

    #[test]
    fn test_serialize_into_reuses_buffer() {
        let mut buf = Vec::new();
        Response::value(Bytes::from("v1")).serialize_into(&mut buf);
        Response::empty().serialize_into(&mut buf);
        assert_eq!(buf, b"2v10");
    }

    #[test]
    fn test_command_tag_and_key() {
        let set = Command::Set {
            key: Bytes::from("k"),
            value: Bytes::from("v"),
        };
        assert_eq!(set.tag(), op::SET);
        assert_eq!(set.key(), &Bytes::from("k"));

        let get = Command::Get {
            key: Bytes::from("k"),
        };
        assert_eq!(get.tag(), op::GET);

        let del = Command::Delete {
            key: Bytes::from("k"),
        };
        assert_eq!(del.tag(), op::DELETE);
    }
}
