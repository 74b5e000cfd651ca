//! Command Execution
//!
//! This module turns decoded [`Command`]s into [`Response`]s by calling into
//! the storage layer. It is the only place that maps cache results onto the
//! wire protocol's success and error framings.
//!
//! ## Response Semantics
//!
//! All three operations answer with the shared length-prefixed framing:
//!
//! - `SET` echoes the stored value back (`S3 3 keyval` answers `3val`), so a
//!   client can verify what was written
//! - `GET` answers with the value, or an empty payload (`0`) for a missing
//!   key — absence is not an error
//! - `DELETE` always answers with an empty payload (`0`)
//!
//! A [`CacheError`] becomes an error-framed response (`-<len><message>`); the
//! connection stays open and the client may issue further commands.
//!
//! [`CacheError`]: crate::storage::CacheError

use crate::protocol::{Command, Response};
use crate::storage::Cache;
use std::sync::Arc;

/// Executes commands against the shared cache.
///
/// Cheap to clone; every connection handler gets its own copy holding a
/// reference to the one shared [`Cache`].
#[derive(Clone)]
pub struct CommandHandler {
    /// The storage backend, shared across all connections
    cache: Arc<dyn Cache>,
}

impl CommandHandler {
    /// Creates a new command handler backed by the given cache.
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    /// Executes a command and returns the response to send back.
    pub fn execute(&self, command: Command) -> Response {
        match command {
            Command::Set { key, value } => match self.cache.set(key, value.clone()) {
                Ok(()) => Response::Value(value),
                Err(e) => Response::error(e.to_string()),
            },
            Command::Get { key } => match self.cache.get(&key) {
                Ok(value) => Response::Value(value.unwrap_or_default()),
                Err(e) => Response::error(e.to_string()),
            },
            Command::Delete { key } => match self.cache.delete(&key) {
                Ok(()) => Response::empty(),
                Err(e) => Response::error(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryCache;
    use bytes::Bytes;

    fn handler() -> CommandHandler {
        CommandHandler::new(Arc::new(MemoryCache::new()))
    }

    #[test]
    fn test_set_echoes_stored_value() {
        let handler = handler();

        let response = handler.execute(Command::Set {
            key: Bytes::from("key"),
            value: Bytes::from("val"),
        });

        assert_eq!(response, Response::Value(Bytes::from("val")));
        assert_eq!(response.serialize(), b"3val");
    }

    #[test]
    fn test_get_returns_value() {
        let handler = handler();

        handler.execute(Command::Set {
            key: Bytes::from("key"),
            value: Bytes::from("val"),
        });
        let response = handler.execute(Command::Get {
            key: Bytes::from("key"),
        });

        assert_eq!(response, Response::Value(Bytes::from("val")));
    }

    #[test]
    fn test_get_missing_is_empty_success() {
        let handler = handler();

        let response = handler.execute(Command::Get {
            key: Bytes::from("missing"),
        });

        assert!(!response.is_error());
        assert_eq!(response.serialize(), b"0");
    }

    #[test]
    fn test_delete_answers_empty() {
        let handler = handler();

        handler.execute(Command::Set {
            key: Bytes::from("key"),
            value: Bytes::from("val"),
        });

        let response = handler.execute(Command::Delete {
            key: Bytes::from("key"),
        });
        assert_eq!(response.serialize(), b"0");

        // The entry is gone
        let response = handler.execute(Command::Get {
            key: Bytes::from("key"),
        });
        assert_eq!(response.serialize(), b"0");

        // Deleting again still succeeds
        let response = handler.execute(Command::Delete {
            key: Bytes::from("key"),
        });
        assert_eq!(response.serialize(), b"0");
    }
}
