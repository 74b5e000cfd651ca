//! Connection Handler
//!
//! Each client gets its own handler task that runs in a loop, reading framed
//! commands and sending responses. The loop is strictly half-duplex: one
//! command is fully read, executed and answered before the next is parsed.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. Client connects (TCP handshake)
//!        │
//!        ▼
//! 2. ConnectionHandler spawned
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │  Read bytes from the socket  │
//!    │            │                 │
//!    │            ▼                 │
//!    │  Parse one command frame     │
//!    │            │                 │
//!    │            ▼                 │
//!    │  Execute against the cache   │
//!    │            │                 │
//!    │            ▼                 │
//!    │  Write + flush the response  │
//!    │            │                 │
//!    │       [loop back]            │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 4. EOF, framing error or I/O error
//! ```
//!
//! ## Error Tiers
//!
//! Framing and transport errors (unknown operation tag, malformed length
//! token, short read, write failure) are fatal for the connection: the stream
//! can no longer be trusted, so the error is logged and the socket closed
//! without sending anything. Operation errors reported by the cache travel
//! back to the client as error-framed responses and the connection stays
//! open. Other connections and the shared store are unaffected either way.
//!
//! ## Buffer Management
//!
//! A `BytesMut` buffer accumulates incoming data, because a single read may
//! deliver a partial command or several pipelined commands at once.

use crate::commands::CommandHandler;
use crate::protocol::{Command, FrameError, FrameParser, Response, MAX_FIELD_SIZE};
use bytes::{Buf, BytesMut};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, error, info, trace, warn};

/// Maximum size for the read buffer.
/// A complete set frame is at most two fields plus a few header bytes.
const MAX_BUFFER_SIZE: usize = 2 * MAX_FIELD_SIZE + 64;

/// Initial buffer capacity
const INITIAL_BUFFER_SIZE: usize = 4096;

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total commands processed
    pub commands_processed: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn command_processed(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Handles a single client connection.
///
/// Owns the read buffer, the frame parser and the write half for one
/// connected client.
pub struct ConnectionHandler {
    /// The TCP stream for this connection
    stream: BufWriter<TcpStream>,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// Buffer for incoming data
    buffer: BytesMut,

    /// The command handler (shared cache behind it)
    command_handler: CommandHandler,

    /// Frame parser
    parser: FrameParser,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,

    /// Reusable response encoding buffer
    response_buf: Vec<u8>,
}

impl ConnectionHandler {
    /// Creates a new connection handler.
    pub fn new(
        stream: TcpStream,
        addr: SocketAddr,
        command_handler: CommandHandler,
        stats: Arc<ConnectionStats>,
    ) -> Self {
        stats.connection_opened();

        Self {
            stream: BufWriter::new(stream),
            addr,
            buffer: BytesMut::with_capacity(INITIAL_BUFFER_SIZE),
            command_handler,
            parser: FrameParser::new(),
            stats,
            response_buf: Vec::new(),
        }
    }

    /// Runs the connection loop to completion.
    ///
    /// Reads commands, executes them and sends responses until the client
    /// disconnects or a fatal error occurs.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        info!(client = %self.addr, "Client connected");

        let result = self.main_loop().await;

        match &result {
            Ok(()) => info!(client = %self.addr, "Client disconnected gracefully"),
            Err(e) => match e {
                ConnectionError::ClientDisconnected => {
                    debug!(client = %self.addr, "Client disconnected")
                }
                ConnectionError::IoError(io_err)
                    if io_err.kind() == std::io::ErrorKind::ConnectionReset =>
                {
                    debug!(client = %self.addr, "Connection reset by client")
                }
                _ => warn!(client = %self.addr, error = %e, "Connection error"),
            },
        }

        self.stats.connection_closed();
        result
    }

    /// The half-duplex read-execute-respond loop.
    async fn main_loop(&mut self) -> Result<(), ConnectionError> {
        loop {
            // Serve every complete command already buffered
            while let Some(command) = self.try_parse_command()? {
                let response = self.command_handler.execute(command);
                self.stats.command_processed();

                self.send_response(&response).await?;
            }

            // Need more data - read from the socket
            self.read_more_data().await?;
        }
    }

    /// Attempts to parse one command from the buffer.
    ///
    /// A frame error here is fatal: no response is sent, since the framing
    /// state is presumed corrupted.
    fn try_parse_command(&mut self) -> Result<Option<Command>, ConnectionError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        match self.parser.parse(&self.buffer) {
            Ok(Some((command, consumed))) => {
                self.buffer.advance(consumed);
                trace!(
                    client = %self.addr,
                    command = %command,
                    consumed = consumed,
                    remaining = self.buffer.len(),
                    "Parsed command"
                );
                Ok(Some(command))
            }
            Ok(None) => {
                trace!(
                    client = %self.addr,
                    buffered = self.buffer.len(),
                    "Incomplete frame, need more data"
                );
                Ok(None)
            }
            Err(e) => {
                warn!(client = %self.addr, error = %e, "Framing error");
                Err(ConnectionError::FrameError(e))
            }
        }
    }

    /// Reads more data from the socket into the buffer.
    async fn read_more_data(&mut self) -> Result<(), ConnectionError> {
        if self.buffer.len() >= MAX_BUFFER_SIZE {
            error!(
                client = %self.addr,
                size = self.buffer.len(),
                "Buffer size limit exceeded"
            );
            return Err(ConnectionError::BufferFull);
        }

        if self.buffer.capacity() - self.buffer.len() < 1024 {
            self.buffer.reserve(4096);
        }

        let n = self.stream.get_mut().read_buf(&mut self.buffer).await?;

        if n == 0 {
            // End of stream. Clean if it falls on a frame boundary, a short
            // read if a partial command is left in the buffer.
            if self.buffer.is_empty() {
                return Err(ConnectionError::ClientDisconnected);
            } else {
                return Err(ConnectionError::UnexpectedEof);
            }
        }

        self.stats.bytes_read(n);
        trace!(client = %self.addr, bytes = n, "Read data");

        Ok(())
    }

    /// Serializes and sends one response to the client.
    async fn send_response(&mut self, response: &Response) -> Result<(), ConnectionError> {
        self.response_buf.clear();
        response.serialize_into(&mut self.response_buf);

        self.stream.write_all(&self.response_buf).await?;
        self.stream.flush().await?;
        self.stats.bytes_written(self.response_buf.len());
        trace!(
            client = %self.addr,
            bytes = self.response_buf.len(),
            "Sent response"
        );
        Ok(())
    }
}

/// Errors that can occur while handling a connection.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Fatal framing error
    #[error("framing error: {0}")]
    FrameError(#[from] FrameError),

    /// Client disconnected at a frame boundary
    #[error("client disconnected")]
    ClientDisconnected,

    /// End of stream in the middle of a frame
    #[error("unexpected end of stream")]
    UnexpectedEof,

    /// Buffer size limit exceeded
    #[error("buffer size limit exceeded")]
    BufferFull,
}

/// Handles a client connection.
///
/// This is a convenience function that creates a [`ConnectionHandler`] and
/// runs it to completion. Errors are logged, not propagated: a failed
/// connection only affects itself.
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    command_handler: CommandHandler,
    stats: Arc<ConnectionStats>,
) {
    let handler = ConnectionHandler::new(stream, addr, command_handler, stats);
    if let Err(e) = handler.run().await {
        match e {
            ConnectionError::ClientDisconnected => {}
            ConnectionError::IoError(ref io_err)
                if io_err.kind() == std::io::ErrorKind::ConnectionReset => {}
            _ => {
                debug!(client = %addr, error = %e, "Connection ended with error");
            }
        }
    }
}
