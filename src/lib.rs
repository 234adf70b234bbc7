//! A lexer and parser for MiniLua, a small subset of Lua.
//!
//! Source text is split into [`Token`]s by the [`Lexer`], which reports
//! lexical errors to a [`Diagnostics`] sink and keeps going. The parser
//! turns the tokens into an [`ast::Program`], or stops at the first syntax
//! [`Error`]. Trees are read through the [`ast::Visitor`] trait; the
//! [`DotRender`] visitor draws them with Graphviz.
//!
//! ```
//! use minilua::{parse_str, Diagnostics};
//!
//! let mut diagnostics = Diagnostics::new();
//! let program = parse_str("x = 1 + 2 * 3", &mut diagnostics)?;
//! assert_eq!(program.stmtlist.len(), 1);
//! assert!(diagnostics.is_empty());
//! # Ok::<(), minilua::Error>(())
//! ```

#![warn(future_incompatible)]
#![warn(non_ascii_idents)]
#![warn(rust_2018_idioms)]
#![warn(single_use_lifetimes)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused)]

pub mod ast;
mod diagnostics;
mod error;
mod frontend;
mod render;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{Error, LexError};
pub use frontend::{parse, parse_str, tokenize, Lexer, Numeral, Token, TokenKind};
pub use render::DotRender;

/// Custom result type for parsing MiniLua.
pub type Result<T> = std::result::Result<T, Error>;
