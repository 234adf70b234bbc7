//! Turning source text into a syntax tree.

mod exp_desc;
mod lexer;
mod parser;
mod token;

pub use lexer::{tokenize, Lexer};
pub use parser::{parse, parse_str};
pub use token::{Numeral, Token, TokenKind};
