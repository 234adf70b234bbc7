//! This module holds the enum which describes what kind of prefix
//! expression the parser has just read.

use crate::ast::{CallFunction, Expr};

/// A "prefix expression" is an expression which could be followed by certain
/// extensions and still be a valid expression.
#[derive(Clone, Debug)]
pub(super) enum PrefixExp {
    /// A name, dotted name, or table index. These can be assigned to.
    Place(Expr),
    /// A function call
    FunctionCall(CallFunction),
    /// An expression wrapped in parentheses, with nothing after it
    Parenthesized(Expr),
}

impl PrefixExp {
    /// Converts the prefix expression into a plain expression, once it's
    /// known it won't be assigned to.
    pub(super) fn into_expr(self) -> Expr {
        match self {
            PrefixExp::Place(exp) | PrefixExp::Parenthesized(exp) => exp,
            PrefixExp::FunctionCall(call) => Expr::CallFunction(call),
        }
    }
}

impl From<CallFunction> for PrefixExp {
    fn from(call: CallFunction) -> Self {
        Self::FunctionCall(call)
    }
}
