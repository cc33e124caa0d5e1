//! Transport Module
//!
//! This module owns everything transport-specific: the length-prefixed
//! frame codec and per-client loop for the stream (TCP) transport, and the
//! packet loop for the datagram (UDP) transport. The command/response
//! contract itself lives in the `protocol` and `commands` modules and is
//! identical over both wires.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────┐      ┌───────────────────────┐
//! │     TCP Listener      │      │      UDP Socket       │
//! │      (main.rs)        │      │      (main.rs)        │
//! └──────────┬────────────┘      └──────────┬────────────┘
//!            │ accept() + spawn             │ one task
//!            ▼                              ▼
//! ┌───────────────────────┐      ┌───────────────────────┐
//! │   ConnectionHandler   │      │    DatagramServer     │
//! │  frame in → execute   │      │  packet in → execute  │
//! │  → frame out          │      │  → reply to sender    │
//! └───────────────────────┘      └───────────────────────┘
//! ```

pub mod datagram;
pub mod frame;
pub mod handler;

// Re-export commonly used types
pub use datagram::{DatagramServer, MAX_DATAGRAM_SIZE};
pub use frame::{FrameError, FrameResult, MAX_FRAME_LEN};
pub use handler::{handle_connection, ConnectionError, ConnectionHandler, ConnectionStats};
