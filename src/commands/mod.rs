//! Command Handler Module
//!
//! This module implements the command processing layer: it receives request
//! lines, executes them against the store engine, and produces the single
//! timestamped response line each command earns.
//!
//! ## Architecture
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌─────────────────┐
//! │  Line Parser    │  (protocol module)
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ CommandHandler  │  (this module)
//! │                 │
//! │  - Dispatch     │
//! │  - Execute      │
//! │  - Format       │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  StoreEngine    │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! `GET`, `PUT`, `DELETE`, `KEYS`, `EDIT_KEY`, `EDIT_VALUE`, `QUIT`

pub mod handler;

// Re-export the main command handler
pub use handler::{CommandHandler, ResponseStyle};
