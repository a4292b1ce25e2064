//! Error types for richtext_core.
//!
//! The editing surface itself never errors: inapplicable commands are
//! swallowed as no-ops and malformed markup is parsed best-effort. Errors
//! exist only at the host boundary, where a toolbar binds commands by name.

use std::fmt;

/// Result type alias for richtext_core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for richtext_core operations.
#[derive(Debug)]
pub enum Error {
    /// A command name that is not part of the editing vocabulary.
    UnknownCommand(String),
    /// A block tag that is not part of the supported markup subset.
    UnknownBlockTag(String),
    /// A named command was invoked without its required argument.
    MissingArgument {
        /// The command that required the argument.
        command: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(name) => write!(f, "unknown command: {name}"),
            Self::UnknownBlockTag(tag) => write!(f, "unknown block tag: {tag}"),
            Self::MissingArgument { command } => {
                write!(f, "command {command} requires an argument")
            }
        }
    }
}

impl std::error::Error for Error {}
