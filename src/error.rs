use thiserror::Error;

use crate::TokenKind;

/// A syntax error. Any of these aborts the parse; no partial tree is
/// returned.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    /// This token was unexpected.
    #[error("line {line}: syntax error at token '{text}'")]
    Unexpected { line: u32, text: String },
    /// A different type of token was expected.
    #[error("line {line}: syntax error at token '{text}', expected {expected}")]
    Expect {
        line: u32,
        text: String,
        expected: TokenKind,
    },
    /// The end of input was reached, but more was expected.
    #[error("syntax error: no more input")]
    UnexpectedEof,
    /// The left-hand side of an assignment is a call or a parenthesized
    /// expression.
    #[error("line {line}: cannot assign to this expression")]
    InvalidTarget { line: u32 },
    /// An assignment binds values to targets by position, so both lists must
    /// be the same length.
    #[error("line {line}: assignment has {targets} targets but {values} values")]
    AssignArity {
        line: u32,
        targets: usize,
        values: usize,
    },
}

impl Error {
    /// The source line the error was found on. `None` at end of input.
    pub fn line(&self) -> Option<u32> {
        match self {
            Error::Unexpected { line, .. }
            | Error::Expect { line, .. }
            | Error::InvalidTarget { line }
            | Error::AssignArity { line, .. } => Some(*line),
            Error::UnexpectedEof => None,
        }
    }
}

/// An error found while scanning. These are reported to the
/// [`Diagnostics`](crate::Diagnostics) sink and scanning carries on.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LexError {
    /// An invalid character was read in while outside a string or comment.
    #[error("Illegal character '{0}'")]
    IllegalCharacter(char),
    /// A backslash in a string was followed by something other than
    /// `a b f n r t v " \`.
    #[error("Incomplete character escape sequence in string literal")]
    InvalidEscape,
    /// A `--[[` comment reached the end of input.
    #[error("Long comment not closed")]
    UnclosedComment,
    /// A string reached the end of its line without a closing quote.
    #[error("Unfinished string")]
    UnclosedString,
}
