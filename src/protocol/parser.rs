//! Line Command Parser
//!
//! This module turns a raw request line into a [`Command`].
//!
//! ## How Parsing Works
//!
//! The line is split on single spaces. The first token, upper-cased, is the
//! verb; every remaining token is a positional argument kept in its original
//! case. There is no quoting or escaping: a value containing a space loses
//! everything after its first token, and tokens beyond a verb's arity are
//! silently ignored.
//!
//! ## Arity Errors
//!
//! A recognized verb with too few arguments is a [`CommandError::BadArity`]
//! carrying the usage string for that verb. The caller renders it as an
//! ordinary response line; a malformed frame must never take the server
//! down, only earn a rejection.

use crate::protocol::types::{verbs, Command};
use thiserror::Error;

/// Errors produced while parsing a request line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line was empty (or whitespace only)
    #[error("empty command line")]
    EmptyLine,

    /// The first token is not a known verb
    #[error("unknown verb: {0}")]
    UnknownVerb(String),

    /// A known verb arrived with fewer arguments than it requires
    #[error("wrong number of arguments for '{verb}'")]
    BadArity {
        verb: &'static str,
        usage: &'static str,
    },
}

impl CommandError {
    /// The usage string for arity errors, e.g. `PUT <key> <value>`.
    pub fn usage(&self) -> Option<&'static str> {
        match self {
            CommandError::BadArity { usage, .. } => Some(usage),
            _ => None,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, CommandError>;

/// Usage strings, one per verb that takes arguments.
mod usage {
    pub const GET: &str = "GET <key>";
    pub const PUT: &str = "PUT <key> <value>";
    pub const DELETE: &str = "DELETE <key>";
    pub const EDIT_KEY: &str = "EDIT_KEY <oldKey> <newKey>";
    pub const EDIT_VALUE: &str = "EDIT_VALUE <key> <newValue>";
}

/// Parses a single request line into a [`Command`].
///
/// # Example
///
/// ```
/// use duokv::protocol::{parse_command, Command};
///
/// let cmd = parse_command("PUT alpha 123").unwrap();
/// assert_eq!(cmd, Command::Put { key: "alpha".to_string(), value: "123".to_string() });
/// ```
pub fn parse_command(line: &str) -> ParseResult<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Err(CommandError::EmptyLine);
    }

    // Split on single spaces, matching the wire contract. Consecutive
    // spaces therefore yield empty tokens rather than being collapsed.
    let tokens: Vec<&str> = line.split(' ').collect();
    let verb = tokens[0].to_uppercase();
    let args = &tokens[1..];

    match verb.as_str() {
        verbs::GET => {
            let key = required(args, 0, verbs::GET, usage::GET)?;
            Ok(Command::Get { key })
        }
        verbs::PUT => {
            let key = required(args, 0, verbs::PUT, usage::PUT)?;
            let value = required(args, 1, verbs::PUT, usage::PUT)?;
            Ok(Command::Put { key, value })
        }
        verbs::DELETE => {
            let key = required(args, 0, verbs::DELETE, usage::DELETE)?;
            Ok(Command::Delete { key })
        }
        verbs::KEYS => Ok(Command::Keys),
        verbs::EDIT_KEY => {
            let old_key = required(args, 0, verbs::EDIT_KEY, usage::EDIT_KEY)?;
            let new_key = required(args, 1, verbs::EDIT_KEY, usage::EDIT_KEY)?;
            Ok(Command::EditKey { old_key, new_key })
        }
        verbs::EDIT_VALUE => {
            let key = required(args, 0, verbs::EDIT_VALUE, usage::EDIT_VALUE)?;
            let value = required(args, 1, verbs::EDIT_VALUE, usage::EDIT_VALUE)?;
            Ok(Command::EditValue { key, value })
        }
        verbs::QUIT => Ok(Command::Quit),
        _ => Err(CommandError::UnknownVerb(tokens[0].to_string())),
    }
}

/// Fetches the argument at `index`, or reports an arity error for `verb`.
fn required(
    args: &[&str],
    index: usize,
    verb: &'static str,
    usage: &'static str,
) -> ParseResult<String> {
    args.get(index)
        .map(|s| s.to_string())
        .ok_or(CommandError::BadArity { verb, usage })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get() {
        let cmd = parse_command("GET alpha").unwrap();
        assert_eq!(
            cmd,
            Command::Get {
                key: "alpha".to_string()
            }
        );
    }

    #[test]
    fn test_parse_put() {
        let cmd = parse_command("PUT alpha 123").unwrap();
        assert_eq!(
            cmd,
            Command::Put {
                key: "alpha".to_string(),
                value: "123".to_string()
            }
        );
    }

    #[test]
    fn test_parse_zero_arg_verbs() {
        assert_eq!(parse_command("KEYS").unwrap(), Command::Keys);
        assert_eq!(parse_command("QUIT").unwrap(), Command::Quit);
    }

    #[test]
    fn test_verb_is_case_insensitive() {
        let cmd = parse_command("put Alpha 123").unwrap();
        assert_eq!(cmd.verb(), "PUT");

        let cmd = parse_command("edit_key a b").unwrap();
        assert_eq!(cmd.verb(), "EDIT_KEY");
    }

    #[test]
    fn test_argument_case_is_preserved() {
        let cmd = parse_command("PUT Alpha VaLuE").unwrap();
        assert_eq!(
            cmd,
            Command::Put {
                key: "Alpha".to_string(),
                value: "VaLuE".to_string()
            }
        );
    }

    #[test]
    fn test_extra_tokens_are_ignored() {
        // No quoting support: "hello world" is truncated at the parser level.
        let cmd = parse_command("PUT greeting hello world").unwrap();
        assert_eq!(
            cmd,
            Command::Put {
                key: "greeting".to_string(),
                value: "hello".to_string()
            }
        );

        let cmd = parse_command("GET alpha beta").unwrap();
        assert_eq!(
            cmd,
            Command::Get {
                key: "alpha".to_string()
            }
        );
    }

    #[test]
    fn test_missing_arguments() {
        let err = parse_command("PUT alpha").unwrap_err();
        assert_eq!(
            err,
            CommandError::BadArity {
                verb: "PUT",
                usage: "PUT <key> <value>"
            }
        );
        assert_eq!(err.usage(), Some("PUT <key> <value>"));

        let err = parse_command("GET").unwrap_err();
        assert!(matches!(err, CommandError::BadArity { verb: "GET", .. }));

        let err = parse_command("EDIT_KEY old").unwrap_err();
        assert!(matches!(
            err,
            CommandError::BadArity {
                verb: "EDIT_KEY",
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_verb() {
        let err = parse_command("FROB alpha").unwrap_err();
        assert_eq!(err, CommandError::UnknownVerb("FROB".to_string()));
        assert_eq!(err.usage(), None);
    }

    #[test]
    fn test_empty_line() {
        assert_eq!(parse_command("").unwrap_err(), CommandError::EmptyLine);
        assert_eq!(parse_command("   ").unwrap_err(), CommandError::EmptyLine);
        assert_eq!(parse_command("\r\n").unwrap_err(), CommandError::EmptyLine);
    }

    #[test]
    fn test_trailing_newline_is_stripped() {
        let cmd = parse_command("GET alpha\r\n").unwrap();
        assert_eq!(
            cmd,
            Command::Get {
                key: "alpha".to_string()
            }
        );
    }

    #[test]
    fn test_double_space_yields_empty_argument() {
        // Split on single spaces: "GET  x" has an empty first argument.
        let cmd = parse_command("GET  x").unwrap();
        assert_eq!(cmd, Command::Get { key: String::new() });
    }
}
