//! Command Protocol Data Types
//!
//! This module defines the data types shared by both transports:
//! the parsed [`Command`], the [`Reply`] sent back to the client, and the
//! wall-clock timestamp prefix every response line carries.
//!
//! ## Line Format
//!
//! Requests are single text lines: a verb followed by space-separated
//! positional arguments.
//!
//! ```text
//! PUT alpha 123
//! GET alpha
//! EDIT_KEY alpha beta
//! KEYS
//! ```
//!
//! Responses are single text lines prefixed with a bracketed timestamp:
//!
//! ```text
//! [2024-03-01 18:04:12] Key [alpha] with value [123]
//! ```

use chrono::Local;
use std::fmt;

/// The verb constants recognized by the server.
pub mod verbs {
    pub const GET: &str = "GET";
    pub const PUT: &str = "PUT";
    pub const DELETE: &str = "DELETE";
    pub const KEYS: &str = "KEYS";
    pub const EDIT_KEY: &str = "EDIT_KEY";
    pub const EDIT_VALUE: &str = "EDIT_VALUE";
    pub const QUIT: &str = "QUIT";
}

/// A parsed client request.
///
/// Commands are ephemeral: one is created per received line and discarded
/// once its [`Reply`] has been produced. Arguments keep the case the client
/// supplied; key normalization happens in the storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `GET <key>` - look up the value stored under a key
    Get { key: String },

    /// `PUT <key> <value>` - insert a new key-value pair (never overwrites)
    Put { key: String, value: String },

    /// `DELETE <key>` - remove a key-value pair
    Delete { key: String },

    /// `KEYS` - enumerate every stored key
    Keys,

    /// `EDIT_KEY <oldKey> <newKey>` - move a value to a new key
    EditKey { old_key: String, new_key: String },

    /// `EDIT_VALUE <key> <newValue>` - overwrite the value under a key
    EditValue { key: String, value: String },

    /// `QUIT` - end the session
    Quit,
}

impl Command {
    /// Returns the wire verb for this command.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Get { .. } => verbs::GET,
            Command::Put { .. } => verbs::PUT,
            Command::Delete { .. } => verbs::DELETE,
            Command::Keys => verbs::KEYS,
            Command::EditKey { .. } => verbs::EDIT_KEY,
            Command::EditValue { .. } => verbs::EDIT_VALUE,
            Command::Quit => verbs::QUIT,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Get { key } => write!(f, "{} {}", verbs::GET, key),
            Command::Put { key, value } => write!(f, "{} {} {}", verbs::PUT, key, value),
            Command::Delete { key } => write!(f, "{} {}", verbs::DELETE, key),
            Command::Keys => write!(f, "{}", verbs::KEYS),
            Command::EditKey { old_key, new_key } => {
                write!(f, "{} {} {}", verbs::EDIT_KEY, old_key, new_key)
            }
            Command::EditValue { key, value } => {
                write!(f, "{} {} {}", verbs::EDIT_VALUE, key, value)
            }
            Command::Quit => write!(f, "{}", verbs::QUIT),
        }
    }
}

/// What the transport should do with the session after sending a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    /// Keep the session open and wait for the next command.
    Continue,

    /// The client sent QUIT: close the stream connection, or reset the
    /// datagram server's client-connected flag.
    Close,
}

/// A single response line plus the session action it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// The full response line, timestamp prefix included.
    pub text: String,

    /// Whether the session stays open after this reply.
    pub action: SessionAction,
}

impl Reply {
    /// Creates an ordinary reply that keeps the session open.
    pub fn line(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: SessionAction::Continue,
        }
    }

    /// Creates a reply that ends the session after it is sent.
    pub fn closing(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: SessionAction::Close,
        }
    }

    /// Returns true if this reply ends the session.
    pub fn closes_session(&self) -> bool {
        self.action == SessionAction::Close
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Formats the current wall-clock time as `YYYY-MM-DD HH:MM:SS`.
pub fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Prefixes a message with the bracketed timestamp used on every response
/// line: `[YYYY-MM-DD HH:MM:SS] <message>`.
pub fn stamped(message: impl AsRef<str>) -> String {
    format!("[{}] {}", timestamp(), message.as_ref())
}
