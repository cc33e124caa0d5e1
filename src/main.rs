//! duokv - A Minimal Dual-Transport Key-Value Store
//!
//! This is the main entry point for the duokv server.
//! It binds the TCP listener and/or the UDP socket, shares one store
//! engine between them, and handles incoming clients until Ctrl+C.

use duokv::commands::{CommandHandler, ResponseStyle};
use duokv::connection::{handle_connection, ConnectionStats, DatagramServer};
use duokv::storage::StoreEngine;
use std::sync::Arc;
use tokio::net::{TcpListener, UdpSocket};
use tokio::signal;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Which transports to serve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Tcp,
    Udp,
    Both,
}

impl Transport {
    fn tcp(&self) -> bool {
        matches!(self, Transport::Tcp | Transport::Both)
    }

    fn udp(&self) -> bool {
        matches!(self, Transport::Udp | Transport::Both)
    }
}

/// Server configuration
struct Config {
    /// Host to bind to
    host: String,
    /// Port to listen on (both transports)
    port: u16,
    /// Transports to serve
    transport: Transport,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: duokv::DEFAULT_HOST.to_string(),
            port: duokv::DEFAULT_PORT,
            transport: Transport::Both,
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
                "--transport" | "-t" => {
                    if i + 1 < args.len() {
                        config.transport = match args[i + 1].as_str() {
                            "tcp" => Transport::Tcp,
                            "udp" => Transport::Udp,
                            "both" => Transport::Both,
                            other => {
                                eprintln!("Error: unknown transport '{}'", other);
                                std::process::exit(1);
                            }
                        };
                        i += 2;
                    } else {
                        eprintln!("Error: --transport requires a value");
                        std::process::exit(1);
                    }
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("duokv version {}", duokv::VERSION);
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
duokv - A Minimal Dual-Transport Key-Value Store

USAGE:
    duokv [OPTIONS]

OPTIONS:
    -h, --host <HOST>            Host to bind to (default: 127.0.0.1)
    -p, --port <PORT>            Port to listen on (default: 7856)
    -t, --transport <TRANSPORT>  tcp, udp, or both (default: both)
    -v, --version                Print version information
        --help                   Print this help message

EXAMPLES:
    duokv                        # Serve TCP and UDP on 127.0.0.1:7856
    duokv --transport tcp        # Stream transport only
    duokv --host 0.0.0.0         # Listen on all interfaces

CONNECTING:
    Use the bundled client:
    $ duokv-cli                  # TCP, interactive menu
    $ duokv-cli --transport udp  # UDP, same menu
"#
    );
}

fn print_banner(config: &Config) {
    println!(
        r#"
      _             _
   __| |_   _  ___ | | ____   __
  / _` | | | |/ _ \| |/ /\ \ / /
 | (_| | |_| | (_) |   <  \ V /
  \__,_|\__,_|\___/|_|\_\  \_/

duokv v{} - Minimal Dual-Transport Key-Value Store
──────────────────────────────────────────────────────────────
Serving on {} ({:?})
Ready to accept clients.

Use Ctrl+C to shutdown gracefully.
"#,
        duokv::VERSION,
        config.bind_address(),
        config.transport,
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

    print_banner(&config);

    // Create the store engine (shared by both transports)
    let storage = Arc::new(StoreEngine::new());
    info!("Store engine initialized");

    // Connection statistics for the stream transport
    let stats = Arc::new(ConnectionStats::new());

    // Set up graceful shutdown
    let shutdown = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Shutdown signal received, stopping server...");
    };

    tokio::select! {
        res = serve(&config, storage, stats) => {
            if let Err(e) = res {
                error!("Server error: {}", e);
            }
        }
        _ = shutdown => {}
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Binds the configured transports and serves them until aborted.
async fn serve(
    config: &Config,
    storage: Arc<StoreEngine>,
    stats: Arc<ConnectionStats>,
) -> anyhow::Result<()> {
    let mut tasks = Vec::new();

    if config.transport.tcp() {
        let listener = TcpListener::bind(config.bind_address()).await?;
        info!("Stream transport listening on {}", config.bind_address());

        let storage = Arc::clone(&storage);
        let stats = Arc::clone(&stats);
        tasks.push(tokio::spawn(accept_loop(listener, storage, stats)));
    }

    if config.transport.udp() {
        let socket = UdpSocket::bind(config.bind_address()).await?;
        info!("Datagram transport bound on {}", config.bind_address());

        let handler = CommandHandler::new(Arc::clone(&storage), ResponseStyle::Datagram);
        tasks.push(tokio::spawn(DatagramServer::new(socket, handler).run()));
    }

    for task in tasks {
        task.await?;
    }
    Ok(())
}

/// Main loop that accepts incoming stream connections
async fn accept_loop(
    listener: TcpListener,
    storage: Arc<StoreEngine>,
    stats: Arc<ConnectionStats>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                // Create a command handler for this connection
                let handler = CommandHandler::new(Arc::clone(&storage), ResponseStyle::Stream);
                let stats = Arc::clone(&stats);

                // Spawn a task to handle this connection
                tokio::spawn(async move {
                    handle_connection(stream, addr, handler, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
