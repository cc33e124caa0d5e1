//! Line Command Protocol
//!
//! This module implements the text protocol shared by both transports.
//!
//! ## Overview
//!
//! A request is one line: an upper-case verb plus space-separated positional
//! arguments. A response is one line prefixed with a bracketed wall-clock
//! timestamp. The same verbs and responses travel over the stream transport
//! (length-prefixed frames) and the datagram transport (one packet per line).
//!
//! ## Modules
//!
//! - `types`: the `Command` and `Reply` types and the timestamp prefix
//! - `parser`: line splitting, verb lookup, and arity validation
//!
//! ## Example
//!
//! ```
//! use duokv::protocol::{parse_command, Command};
//!
//! let cmd = parse_command("GET alpha").unwrap();
//! assert_eq!(cmd, Command::Get { key: "alpha".to_string() });
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{parse_command, CommandError, ParseResult};
pub use types::{stamped, timestamp, verbs, Command, Reply, SessionAction};
