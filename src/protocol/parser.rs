//! Incremental Frame Parser
//!
//! This module parses client commands out of a raw byte buffer. TCP is a
//! stream protocol, so a read may deliver a partial command or several
//! commands at once; the parser is written to cope with both.
//!
//! ## How the Parser Works
//!
//! The parser inspects a buffer and returns one of:
//! - `Ok(Some((command, consumed)))` - a complete command, `consumed` bytes used
//! - `Ok(None)` - the frame is incomplete, more data is needed
//! - `Err(FrameError)` - the stream is malformed and no longer trustworthy
//!
//! The caller appends incoming network data to its buffer, calls [`parse`]
//! (see [`FrameParser::parse`]), advances the buffer by `consumed` on success,
//! waits for more data on `Ok(None)`, and closes the connection on error.
//!
//! A frame error is always fatal for the connection: once a length token or
//! operation tag is wrong there is no way to tell where the next frame starts.

use crate::protocol::types::{op, Command};
use bytes::Bytes;
use thiserror::Error;

/// Errors that can occur while decoding a frame.
///
/// Any of these means the byte stream is corrupt; the connection must be
/// closed without sending a response.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// The leading byte is not a known operation tag
    #[error("unknown operation tag: {0:#04x}")]
    UnknownOperation(u8),

    /// A length token is empty, non-numeric, or unterminated
    #[error("invalid length token: {0}")]
    InvalidLength(String),

    /// A declared field length exceeds the maximum allowed size
    #[error("field too large: {size} bytes (max: {max})")]
    FieldTooLarge { size: usize, max: usize },
}

/// Result type for frame parsing operations.
pub type FrameResult<T> = Result<T, FrameError>;

/// Maximum size for a single key or value field (64 MB)
pub const MAX_FIELD_SIZE: usize = 64 * 1024 * 1024;

/// Maximum number of digits in a length token.
/// `MAX_FIELD_SIZE` needs 8; anything longer is garbage, not a short read.
const MAX_LENGTH_DIGITS: usize = 20;

/// Parses length-prefixed command frames from a byte buffer.
///
/// # Example
///
/// ```
/// use bytecache::protocol::FrameParser;
///
/// let parser = FrameParser::new();
/// let buf = b"G3 key";
///
/// let (command, consumed) = parser.parse(buf).unwrap().unwrap();
/// assert_eq!(consumed, buf.len());
/// ```
#[derive(Debug, Default)]
pub struct FrameParser;

impl FrameParser {
    /// Creates a new parser instance.
    pub fn new() -> Self {
        Self
    }

    /// Attempts to parse one complete command from the buffer.
    ///
    /// # Returns
    ///
    /// - `Ok(Some((command, consumed)))` - successfully parsed a command
    /// - `Ok(None)` - incomplete frame, need more bytes
    /// - `Err(e)` - fatal framing error
    pub fn parse(&self, buf: &[u8]) -> FrameResult<Option<(Command, usize)>> {
        if buf.is_empty() {
            return Ok(None);
        }

        match buf[0] {
            op::SET => self.parse_set(buf),
            op::GET => self.parse_single_key(buf, |key| Command::Get { key }),
            op::DELETE => self.parse_single_key(buf, |key| Command::Delete { key }),
            other => Err(FrameError::UnknownOperation(other)),
        }
    }

    /// Parses a set frame: `S<keyLen> <valueLen> <key><value>`
    fn parse_set(&self, buf: &[u8]) -> FrameResult<Option<(Command, usize)>> {
        debug_assert!(buf[0] == op::SET);
        let mut pos = 1;

        let (key_len, used) = match read_length(&buf[pos..])? {
            Some(v) => v,
            None => return Ok(None),
        };
        pos += used;

        let (value_len, used) = match read_length(&buf[pos..])? {
            Some(v) => v,
            None => return Ok(None),
        };
        pos += used;

        let total = pos + key_len + value_len;
        if buf.len() < total {
            return Ok(None);
        }

        let key = Bytes::copy_from_slice(&buf[pos..pos + key_len]);
        let value = Bytes::copy_from_slice(&buf[pos + key_len..total]);

        Ok(Some((Command::Set { key, value }, total)))
    }

    /// Parses a get or delete frame: `<tag><keyLen> <key>`
    fn parse_single_key(
        &self,
        buf: &[u8],
        build: impl FnOnce(Bytes) -> Command,
    ) -> FrameResult<Option<(Command, usize)>> {
        let mut pos = 1;

        let (key_len, used) = match read_length(&buf[pos..])? {
            Some(v) => v,
            None => return Ok(None),
        };
        pos += used;

        let total = pos + key_len;
        if buf.len() < total {
            return Ok(None);
        }

        let key = Bytes::copy_from_slice(&buf[pos..total]);
        Ok(Some((build(key), total)))
    }
}

/// Reads one space-terminated decimal length token from the front of `buf`.
///
/// Returns `Ok(Some((length, consumed)))` where `consumed` includes the
/// terminating space, or `Ok(None)` if the token is not yet complete.
fn read_length(buf: &[u8]) -> FrameResult<Option<(usize, usize)>> {
    let space = match buf.iter().position(|&b| b == b' ') {
        Some(pos) => pos,
        None => {
            // No terminator yet. Only a bounded number of digits can precede
            // one, so an over-long run is corruption rather than a short read.
            if buf.len() > MAX_LENGTH_DIGITS {
                return Err(FrameError::InvalidLength(
                    "unterminated length token".to_string(),
                ));
            }
            return Ok(None);
        }
    };

    if space == 0 || space > MAX_LENGTH_DIGITS {
        return Err(FrameError::InvalidLength(format!(
            "bad token of {} bytes",
            space
        )));
    }

    let token = std::str::from_utf8(&buf[..space])
        .map_err(|_| FrameError::InvalidLength("non-ASCII length token".to_string()))?;

    let length: usize = token
        .parse()
        .map_err(|_| FrameError::InvalidLength(token.to_string()))?;

    if length > MAX_FIELD_SIZE {
        return Err(FrameError::FieldTooLarge {
            size: length,
            max: MAX_FIELD_SIZE,
        });
    }

    Ok(Some((length, space + 1)))
}

/// Helper function to parse a single frame from bytes.
///
/// This is a convenience function for simple use cases.
pub fn parse_frame(buf: &[u8]) -> FrameResult<Option<(Command, usize)>> {
    FrameParser::new().parse(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get() {
        let input = b"G3 key";
        let (command, consumed) = parse_frame(input).unwrap().unwrap();
        assert_eq!(
            command,
            Command::Get {
                key: Bytes::from("key")
            }
        );
        assert_eq!(consumed, 6);
    }

    #[test]
    fn test_parse_delete() {
        let input = b"D3 key";
        let (command, consumed) = parse_frame(input).unwrap().unwrap();
        assert_eq!(
            command,
            Command::Delete {
                key: Bytes::from("key")
            }
        );
        assert_eq!(consumed, 6);
    }

    #[test]
    fn test_parse_set() {
        let input = b"S3 3 keyval";
        let (command, consumed) = parse_frame(input).unwrap().unwrap();
        assert_eq!(
            command,
            Command::Set {
                key: Bytes::from("key"),
                value: Bytes::from("val"),
            }
        );
        assert_eq!(consumed, 11);
    }

    #[test]
    fn test_parse_set_empty_value() {
        let input = b"S3 0 key";
        let (command, consumed) = parse_frame(input).unwrap().unwrap();
        assert_eq!(
            command,
            Command::Set {
                key: Bytes::from("key"),
                value: Bytes::new(),
            }
        );
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_parse_incomplete_tag_only() {
        assert!(parse_frame(b"S").unwrap().is_none());
        assert!(parse_frame(b"G").unwrap().is_none());
        assert!(parse_frame(b"").unwrap().is_none());
    }

    #[test]
    fn test_parse_incomplete_length_token() {
        // Digits present but no terminating space yet
        assert!(parse_frame(b"G12").unwrap().is_none());
        assert!(parse_frame(b"S3 1").unwrap().is_none());
    }

    #[test]
    fn test_parse_incomplete_field_bytes() {
        assert!(parse_frame(b"G5 ke").unwrap().is_none());
        assert!(parse_frame(b"S3 3 keyva").unwrap().is_none());
    }

    #[test]
    fn test_parse_unknown_operation() {
        let result = parse_frame(b"X3 key");
        assert_eq!(result, Err(FrameError::UnknownOperation(b'X')));
    }

    #[test]
    fn test_parse_non_numeric_length() {
        let result = parse_frame(b"Gabc key");
        assert!(matches!(result, Err(FrameError::InvalidLength(_))));
    }

    #[test]
    fn test_parse_empty_length_token() {
        // Space immediately after the tag means an empty token
        let result = parse_frame(b"G key");
        assert!(matches!(result, Err(FrameError::InvalidLength(_))));
    }

    #[test]
    fn test_parse_unterminated_length_token() {
        let input = b"G111111111111111111111111111111";
        let result = parse_frame(input);
        assert!(matches!(result, Err(FrameError::InvalidLength(_))));
    }

    #[test]
    fn test_parse_field_too_large() {
        let input = format!("G{} ", MAX_FIELD_SIZE + 1);
        let result = parse_frame(input.as_bytes());
        assert!(matches!(result, Err(FrameError::FieldTooLarge { .. })));
    }

    #[test]
    fn test_binary_safe_key_with_space() {
        // The key's boundary comes from the length count, not the space
        let input = b"G5 a b c";
        let (command, consumed) = parse_frame(input).unwrap().unwrap();
        assert_eq!(
            command,
            Command::Get {
                key: Bytes::from("a b c")
            }
        );
        assert_eq!(consumed, 8);
    }

    #[test]
    fn test_binary_safe_value_with_null_and_digits() {
        let input = b"S1 5 k12\x003 ";
        let (command, _) = parse_frame(input).unwrap().unwrap();
        assert_eq!(
            command,
            Command::Set {
                key: Bytes::from("k"),
                value: Bytes::from(&b"12\x003 "[..]),
            }
        );
    }

    #[test]
    fn test_pipelined_frames() {
        let input = b"S1 1 avG1 a";
        let parser = FrameParser::new();

        let (first, consumed) = parser.parse(input).unwrap().unwrap();
        assert_eq!(
            first,
            Command::Set {
                key: Bytes::from("a"),
                value: Bytes::from("v"),
            }
        );

        let (second, rest) = parser.parse(&input[consumed..]).unwrap().unwrap();
        assert_eq!(
            second,
            Command::Get {
                key: Bytes::from("a")
            }
        );
        assert_eq!(consumed + rest, input.len());
    }
}
