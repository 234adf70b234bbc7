//! Collects the lexical errors found during a run.

use std::fmt::{self, Display, Formatter};
use std::slice;

use crate::LexError;

/// One reported error and the line it was found on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub error: LexError,
    pub line: u32,
}

/// An ordered record of lexical errors. Create one per run and lend it to
/// the lexer; nothing here is global.
#[derive(Clone, Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error found on `line`.
    pub fn report(&mut self, error: LexError, line: u32) {
        tracing::debug!(line, %error, "lexical error");
        self.entries.push(Diagnostic { error, line });
    }

    /// The number of errors reported so far.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Diagnostic> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "LexerError: {} in line {}.", self.error, self.line)
    }
}
