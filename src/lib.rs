//! # duokv - A Minimal Dual-Transport Key-Value Store
//!
//! duokv is a small remote key-value store reachable over two transports:
//! a stream transport (TCP, length-prefixed text frames) and a datagram
//! transport (UDP, one plain-text payload per packet). Clients send
//! line-style text commands; the server keeps an in-memory mapping from
//! short keys to short values and answers each command with one
//! timestamped text line.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           duokv                              │
//! │                                                              │
//! │  ┌─────────────┐   ┌──────────────┐                          │
//! │  │ TCP Frames  │──>│  Connection  │──┐                       │
//! │  │ (Listener)  │   │   Handler    │  │   ┌───────────────┐   │
//! │  └─────────────┘   └──────────────┘  ├──>│    Command    │   │
//! │  ┌─────────────┐   ┌──────────────┐  │   │    Handler    │   │
//! │  │ UDP Packets │──>│   Datagram   │──┘   └───────┬───────┘   │
//! │  │  (Socket)   │   │    Server    │              │           │
//! │  └─────────────┘   └──────────────┘              ▼           │
//! │                                          ┌───────────────┐   │
//! │                                          │  StoreEngine  │   │
//! │                                          │ RwLock<Map>   │   │
//! │                                          └───────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `GET key` - look up the value stored under a key
//! - `PUT key value` - insert a new pair (duplicates are rejected)
//! - `DELETE key` - remove a pair
//! - `KEYS` - list every stored key
//! - `EDIT_KEY oldKey newKey` - move a value to a new key
//! - `EDIT_VALUE key newValue` - overwrite the value under a key
//! - `QUIT` - end the session
//!
//! Keys and values are limited to 10 characters by design; key lookup is
//! case-insensitive (keys are stored lowercase). Every business-rule
//! rejection is an ordinary response line, never a dropped session.
//!
//! ## Quick Start
//!
//! ```ignore
//! use duokv::commands::{CommandHandler, ResponseStyle};
//! use duokv::connection::{handle_connection, ConnectionStats};
//! use duokv::storage::StoreEngine;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() {
//!     let storage = Arc::new(StoreEngine::new());
//!     let stats = Arc::new(ConnectionStats::new());
//!
//!     let listener = TcpListener::bind("127.0.0.1:7856").await.unwrap();
//!
//!     loop {
//!         let (stream, addr) = listener.accept().await.unwrap();
//!         let handler = CommandHandler::new(Arc::clone(&storage), ResponseStyle::Stream);
//!         let stats = Arc::clone(&stats);
//!
//!         tokio::spawn(handle_connection(stream, addr, handler, stats));
//!     }
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`protocol`]: the line command parser and the `Command`/`Reply` types
//! - [`storage`]: the in-memory store engine and its validation rules
//! - [`commands`]: command dispatch and response-line formatting
//! - [`connection`]: TCP framing and per-client loop, UDP packet loop

pub mod commands;
pub mod connection;
pub mod protocol;
pub mod storage;

// Re-export commonly used types for convenience
pub use commands::{CommandHandler, ResponseStyle};
pub use connection::{handle_connection, ConnectionStats, DatagramServer, MAX_DATAGRAM_SIZE};
pub use protocol::{parse_command, Command, CommandError, Reply, SessionAction};
pub use storage::{StoreEngine, StoreError};

/// The default port duokv listens on, for both transports
pub const DEFAULT_PORT: u16 = 7856;

/// The default host duokv binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of duokv
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
