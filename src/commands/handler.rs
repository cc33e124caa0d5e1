//! Command Handler Module
//!
//! This module executes parsed commands against the store engine and
//! formats the single response line each command earns.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CommandHandler                          │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │   parse()   │───>│  dispatch() │───>│  format     │      │
//! │  └─────────────┘    └─────────────┘    └─────────────┘      │
//! │                            │                                │
//! │                            ▼                                │
//! │                      StoreEngine                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every outcome, success or rejection, is an ordinary [`Reply`]: malformed
//! usage, oversized keys, duplicate or missing keys never fail the session.
//! The only per-transport difference is the `KEYS` listing separator, kept
//! as observed in the two wire formats and selected by [`ResponseStyle`].

use crate::protocol::{parse_command, stamped, Command, CommandError, Reply};
use crate::storage::{StoreEngine, StoreError};
use std::sync::Arc;

// Response wording, shared by both transports.
const MSG_KEY_TOO_LONG: &str = "Key length exceeds 10 characters.";
const MSG_KEY_OR_VALUE_TOO_LONG: &str = "Key or value length exceeds 10 characters.";
const MSG_NEW_KEY_TOO_LONG: &str = "New key length exceeds 10 characters.";
const MSG_DUPLICATE_KEY: &str = "Key already exists. Cannot add duplicate keys.";
const MSG_NOT_FOUND: &str = "Error: Key does not exist or not found";
const MSG_EDIT_MISSING: &str = "Key does not exist.";
const MSG_EDIT_KEY_TAKEN: &str = "Key with this name already exists. Please edit it again!";
const MSG_KEY_UPDATED: &str = "Key updated successfully.";
const MSG_VALUE_UPDATED: &str = "Value updated successfully.";
const MSG_EMPTY_STORE: &str = "Key Store: Empty";
const MSG_INVALID: &str = "Invalid command";
const MSG_FAREWELL: &str = "Connection closed. Goodbye!";

/// Per-transport response formatting.
///
/// The two wire formats list keys differently and that difference is part
/// of the observed contract: `[k1][k2]` on the stream transport,
/// `[k1] [k2] ` on the datagram transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStyle {
    /// Stream (TCP) formatting
    Stream,
    /// Datagram (UDP) formatting
    Datagram,
}

/// Executes commands against the store engine and formats replies.
///
/// One handler is created per stream connection and one for the datagram
/// server; all of them share the same `Arc<StoreEngine>`.
#[derive(Debug, Clone)]
pub struct CommandHandler {
    /// The store engine (shared across sessions)
    storage: Arc<StoreEngine>,

    /// Which transport's formatting to use
    style: ResponseStyle,
}

impl CommandHandler {
    /// Creates a new command handler over the given store engine.
    pub fn new(storage: Arc<StoreEngine>, style: ResponseStyle) -> Self {
        Self { storage, style }
    }

    /// Parses and executes one request line, returning the reply to send.
    ///
    /// # Example
    ///
    /// ```
    /// use duokv::commands::{CommandHandler, ResponseStyle};
    /// use duokv::storage::StoreEngine;
    /// use std::sync::Arc;
    ///
    /// let handler = CommandHandler::new(Arc::new(StoreEngine::new()), ResponseStyle::Stream);
    /// let reply = handler.execute("PUT alpha 123");
    /// assert!(reply.text.ends_with("added successfully"));
    /// ```
    pub fn execute(&self, line: &str) -> Reply {
        match parse_command(line) {
            Ok(command) => self.dispatch(command),
            Err(err) => self.reject(err),
        }
    }

    /// Executes an already-parsed command.
    pub fn dispatch(&self, command: Command) -> Reply {
        match command {
            Command::Get { key } => self.cmd_get(&key),
            Command::Put { key, value } => self.cmd_put(&key, &value),
            Command::Delete { key } => self.cmd_delete(&key),
            Command::Keys => self.cmd_keys(),
            Command::EditKey { old_key, new_key } => self.cmd_edit_key(&old_key, &new_key),
            Command::EditValue { key, value } => self.cmd_edit_value(&key, &value),
            Command::Quit => Reply::closing(stamped(MSG_FAREWELL)),
        }
    }

    /// Renders a parse error as a response line.
    fn reject(&self, err: CommandError) -> Reply {
        match err.usage() {
            Some(usage) => Reply::line(stamped(format!("{}. Usage: {}", MSG_INVALID, usage))),
            None => Reply::line(stamped(MSG_INVALID)),
        }
    }

    /// GET key
    fn cmd_get(&self, key: &str) -> Reply {
        Reply::line(stamped(match self.storage.get(key) {
            Ok(value) => format!("Key [{}] with value [{}]", key, value),
            Err(StoreError::KeyTooLong) => MSG_KEY_TOO_LONG.to_string(),
            Err(_) => MSG_NOT_FOUND.to_string(),
        }))
    }

    /// PUT key value
    fn cmd_put(&self, key: &str, value: &str) -> Reply {
        Reply::line(stamped(match self.storage.put(key, value) {
            Ok(()) => format!(
                "Successfully: Key [{}] with value [{}] added successfully",
                key, value
            ),
            Err(StoreError::KeyTooLong) | Err(StoreError::ValueTooLong) => {
                MSG_KEY_OR_VALUE_TOO_LONG.to_string()
            }
            Err(_) => MSG_DUPLICATE_KEY.to_string(),
        }))
    }

    /// DELETE key
    fn cmd_delete(&self, key: &str) -> Reply {
        Reply::line(stamped(match self.storage.delete(key) {
            Ok(()) => format!("Successfully: Key [{}] removed successfully", key),
            Err(StoreError::KeyTooLong) => MSG_KEY_TOO_LONG.to_string(),
            Err(_) => MSG_NOT_FOUND.to_string(),
        }))
    }

    /// KEYS
    fn cmd_keys(&self) -> Reply {
        let keys = self.storage.keys();
        if keys.is_empty() {
            return Reply::line(stamped(MSG_EMPTY_STORE));
        }

        let mut listing = String::from("Key Store: ");
        for key in &keys {
            match self.style {
                ResponseStyle::Stream => listing.push_str(&format!("[{}]", key)),
                ResponseStyle::Datagram => listing.push_str(&format!("[{}] ", key)),
            }
        }
        Reply::line(stamped(listing))
    }

    /// EDIT_KEY oldKey newKey
    fn cmd_edit_key(&self, old_key: &str, new_key: &str) -> Reply {
        Reply::line(stamped(match self.storage.edit_key(old_key, new_key) {
            Ok(()) => MSG_KEY_UPDATED,
            Err(StoreError::KeyTooLong) => MSG_NEW_KEY_TOO_LONG,
            Err(StoreError::KeyExists) => MSG_EDIT_KEY_TAKEN,
            Err(_) => MSG_EDIT_MISSING,
        }))
    }

    /// EDIT_VALUE key newValue
    fn cmd_edit_value(&self, key: &str, value: &str) -> Reply {
        Reply::line(stamped(match self.storage.edit_value(key, value) {
            Ok(()) => MSG_VALUE_UPDATED,
            Err(StoreError::KeyTooLong) | Err(StoreError::ValueTooLong) => {
                MSG_KEY_OR_VALUE_TOO_LONG
            }
            Err(_) => MSG_EDIT_MISSING,
        }))
    }
}
