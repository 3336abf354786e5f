//! Error kinds shared by the parser, the canvas, and the interpreter.
//!
//! Every kind is fatal to the current run. The only tolerated failures are
//! geometric (clipped or degenerate shapes) and those never produce an
//! `Error` at all.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Canvas constructed with a non-positive side.
    #[error("invalid canvas dimension {width}x{height}: both sides must be positive")]
    InvalidDimension { width: i64, height: i64 },

    /// Source line without a `:` separator.
    #[error("malformed line {text:?}: expected `name:arg,arg,...`")]
    MalformedLine { text: String },

    /// Instruction name outside the command vocabulary.
    #[error("unknown command `{name}`")]
    UnknownCommand { name: String },

    /// Arguments whose count or types do not fit the command.
    #[error("`{command}`: {reason}")]
    ArgumentMismatch { command: String, reason: String },

    /// Shape command with an ill-formed bounding box or missing size.
    #[error("`{command}`: {reason}")]
    InvalidArguments {
        command: &'static str,
        reason: String,
    },

    /// Color token that is neither a known name nor a hex literal.
    #[error("unknown color `{token}`")]
    UnknownColor { token: String },

    /// Program ended before the canvas and cursor were configured.
    #[error("program ended before {missing} setup")]
    IncompleteSetup { missing: &'static str },
}

impl Error {
    pub fn mismatch(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ArgumentMismatch {
            command: command.into(),
            reason: reason.into(),
        }
    }

    /// Attach the source position this error was raised at.
    pub fn at(self, line: usize, text: impl Into<String>) -> LineError {
        LineError {
            line,
            text: text.into(),
            kind: self,
        }
    }
}

/// An [`Error`] located at a 1-based source line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line} ({text:?}): {kind}")]
pub struct LineError {
    pub line: usize,
    pub text: String,
    #[source]
    pub kind: Error,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_error_mentions_position_and_cause() {
        let err = Error::UnknownCommand {
            name: "jump".into(),
        }
        .at(4, "jump:10,10");
        let msg = err.to_string();
        assert!(msg.starts_with("line 4"), "{msg}");
        assert!(msg.contains("unknown command `jump`"), "{msg}");
    }

    #[test]
    fn dimension_message() {
        let err = Error::InvalidDimension {
            width: 0,
            height: 100,
        };
        assert_eq!(
            err.to_string(),
            "invalid canvas dimension 0x100: both sides must be positive"
        );
    }
}
