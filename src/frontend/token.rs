use std::fmt::{self, Display, Formatter};

/// A single lexical unit, tagged with the line it started on.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// The raw source text of the token. For strings this includes the quotes.
    pub text: String,
    pub line: u32,
}

#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenKind {
    // Keywords
    And, Break, Do, Else, ElseIf, End, For, Function, If, In, Local,
    Not, Or, Repeat, Return, Then, Until, While,
    // Literal keywords
    True, False, Nil,
    // Comparisons
    Equal, NotEqual, LessEqual, GreaterEqual, Less, Greater,
    // Operator symbols
    Plus, Minus, Star, Slash, Caret, Mod, DotDot,
    // L/R stuff
    LParen, RParen, LCurly, RCurly, LSquare, RSquare,
    // Other symbols
    Semi, Colon, Comma, Dot, Assign,
    // Others
    Name,
    Number(Numeral),
    LiteralString,
}

/// The value of a number literal. Integers stay integers until something
/// forces them to be floats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeral {
    Int(i64),
    Float(f64),
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32) -> Self {
        Token {
            kind,
            text: text.into(),
            line,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.line, self.kind, self.text)
    }
}

impl Numeral {
    pub fn as_f64(self) -> f64 {
        match self {
            Numeral::Int(i) => i as f64,
            Numeral::Float(x) => x,
        }
    }
}

impl TokenKind {
    /// Returns `true` if a token of this kind can end a block.
    pub(crate) fn closes_block(self) -> bool {
        matches!(
            self,
            TokenKind::End | TokenKind::Else | TokenKind::ElseIf | TokenKind::Until
        )
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use TokenKind::*;
        let s = match self {
            And => "'and'",
            Break => "'break'",
            Do => "'do'",
            Else => "'else'",
            ElseIf => "'elseif'",
            End => "'end'",
            For => "'for'",
            Function => "'function'",
            If => "'if'",
            In => "'in'",
            Local => "'local'",
            Not => "'not'",
            Or => "'or'",
            Repeat => "'repeat'",
            Return => "'return'",
            Then => "'then'",
            Until => "'until'",
            While => "'while'",
            True => "'true'",
            False => "'false'",
            Nil => "'nil'",
            Equal => "'=='",
            NotEqual => "'~='",
            LessEqual => "'<='",
            GreaterEqual => "'>='",
            Less => "'<'",
            Greater => "'>'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Caret => "'^'",
            Mod => "'%'",
            DotDot => "'..'",
            LParen => "'('",
            RParen => "')'",
            LCurly => "'{'",
            RCurly => "'}'",
            LSquare => "'['",
            RSquare => "']'",
            Semi => "';'",
            Colon => "':'",
            Comma => "','",
            Dot => "'.'",
            Assign => "'='",
            Name => "name",
            Number(_) => "number",
            LiteralString => "string",
        };
        f.write_str(s)
    }
}
