//! bytecache - A Minimal Networked In-Memory Key-Value Cache
//!
//! This is the main entry point for the bytecache server.
//! It sets up the TCP listener, the shared cache, and hands each incoming
//! connection to its own handler task.

use bytecache::commands::CommandHandler;
use bytecache::connection::{handle_connection, ConnectionStats};
use bytecache::storage::{Cache, MemoryCache};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Server configuration
struct Config {
    /// Host to bind to
    host: String,
    /// Port to listen on
    port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: bytecache::DEFAULT_HOST.to_string(),
            port: bytecache::DEFAULT_PORT,
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    if i + 1 < args.len() {
                        config.host = args[i + 1].clone();
                        i += 2;
                    } else {
                        eprintln!("Error: --host requires a value");
                        std::process::exit(1);
                    }
                }
                "--port" | "-p" => {
                    if i + 1 < args.len() {
                        config.port = args[i + 1].parse().unwrap_or_else(|_| {
                            eprintln!("Error: invalid port number");
                            std::process::exit(1);
                        });
                        i += 2;
                    } else {
                        eprintln!("Error: --port requires a value");
                        std::process::exit(1);
                    }
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("bytecache version {}", bytecache::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }

    /// Returns the bind address as a string
    fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn print_help() {
    println!(
        r#"
bytecache - A Minimal Networked In-Memory Key-Value Cache

USAGE:
    bytecache [OPTIONS]

OPTIONS:
    -h, --host <HOST>    Host to bind to (default: 127.0.0.1)
    -p, --port <PORT>    Port to listen on (default: 9000)
    -v, --version        Print version information
        --help           Print this help message

EXAMPLES:
    bytecache                      # Start on 127.0.0.1:9000
    bytecache --port 9001          # Start on port 9001
    bytecache --host 0.0.0.0       # Listen on all interfaces

PROTOCOL:
    Requests start with an operation tag, then space-terminated field
    lengths, then the raw field bytes:
    $ printf 'S3 3 keyval' | nc 127.0.0.1 9000
    3val
    $ printf 'G3 key' | nc 127.0.0.1 9000
    3val
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::from_args();

    // Set up logging
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    // Create the cache (shared across all connections)
    let cache: Arc<dyn Cache> = Arc::new(MemoryCache::new());
    info!("In-memory cache initialized");

    // Create connection statistics
    let stats = Arc::new(ConnectionStats::new());

    // Bind the TCP listener
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", config.bind_address());

    // Set up graceful shutdown
    let shutdown = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Shutdown signal received, stopping server...");
    };

    // Main accept loop. An accept failure is fatal to the whole service.
    tokio::select! {
        result = accept_loop(listener, cache, stats) => {
            result?;
        }
        _ = shutdown => {}
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Main loop that accepts incoming connections.
///
/// Each accepted connection gets its own task; a per-connection failure
/// affects only that connection, but an accept failure takes the service
/// down.
async fn accept_loop(
    listener: TcpListener,
    cache: Arc<dyn Cache>,
    stats: Arc<ConnectionStats>,
) -> std::io::Result<()> {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let handler = CommandHandler::new(Arc::clone(&cache));
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                return Err(e);
            }
        }
    }
}
