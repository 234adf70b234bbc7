//! This module contains functions which can tokenize a string input.

use std::iter::Peekable;

use crate::Diagnostics;
use crate::LexError;

use super::token::Numeral;
use super::Token;
use super::TokenKind::{self, *};

/// Characters which may legally follow a backslash in a string literal.
const ESCAPES: &str = "abfnrtv\"\\";

/// A `TokenStream` is a wrapper around a token iterator. It provides a
/// lookahead buffer and several helper methods.
#[derive(Debug)]
pub(crate) struct TokenStream<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
}

/// A `Lexer` handles the raw conversion of characters to tokens.
///
/// It is an iterator: tokens are only scanned as they are pulled, and the
/// iterator ends at the end of the source. Errors never stop it; they are
/// reported to the borrowed [`Diagnostics`] and scanning resumes.
#[derive(Debug)]
pub struct Lexer<'a> {
    /// The byte offset of the next character.
    pos: usize,
    /// The line of the next character, starting at 1.
    line: u32,
    source: &'a str,
    diagnostics: &'a mut Diagnostics,
}

/// Tokenizes all of `source`.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn tokenize(source: &str, diagnostics: &mut Diagnostics) -> Vec<Token> {
    Lexer::new(source, diagnostics).collect()
}

impl<I: Iterator<Item = Token>> TokenStream<I> {
    pub(crate) fn new(tokens: I) -> Self {
        TokenStream {
            tokens: tokens.peekable(),
        }
    }

    /// Return the next Token.
    pub(crate) fn next(&mut self) -> Option<Token> {
        self.tokens.next()
    }

    pub(crate) fn peek(&mut self) -> Option<&Token> {
        self.tokens.peek()
    }

    /// Return the kind of the next token without popping it.
    pub(crate) fn peek_kind(&mut self) -> Option<TokenKind> {
        self.peek().map(|token| token.kind)
    }

    pub(crate) fn check_kind(&mut self, expected: TokenKind) -> bool {
        self.peek_kind() == Some(expected)
    }

    /// Checks the next token's kind. If it matches `expected`, it is popped
    /// off and returned as `Some`. Else, we return `None`.
    pub(crate) fn try_pop(&mut self, expected: TokenKind) -> Option<Token> {
        if self.check_kind(expected) {
            self.next()
        } else {
            None
        }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, diagnostics: &'a mut Diagnostics) -> Self {
        Lexer {
            pos: 0,
            line: 1,
            source,
            diagnostics,
        }
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            self.consume_whitespace();
            let tok_start = self.pos;
            let line = self.line;
            let first_char = self.next_char()?;
            let kind = match first_char {
                '+' => Plus,
                '*' => Star,
                '/' => Slash,
                '%' => Mod,
                '^' => Caret,
                ';' => Semi,
                ':' => Colon,
                ',' => Comma,
                '(' => LParen,
                ')' => RParen,
                '{' => LCurly,
                '}' => RCurly,
                '[' => LSquare,
                ']' => RSquare,

                '.' => self.peek_dot(),

                '=' | '<' | '>' | '~' => match self.peek_equals(first_char) {
                    Some(kind) => kind,
                    None => {
                        self.illegal(first_char, line);
                        continue;
                    }
                },

                '-' => {
                    if self.try_next('-') {
                        self.comment();
                        continue;
                    } else {
                        Minus
                    }
                }

                '\'' | '\"' => {
                    if self.lex_string(first_char, line) {
                        TokenKind::LiteralString
                    } else {
                        continue;
                    }
                }

                _ if first_char.is_ascii_digit() => self.lex_full_number(tok_start, first_char),

                _ if first_char.is_ascii_alphabetic() || first_char == '_' => {
                    self.lex_word(tok_start)
                }

                _ => {
                    self.illegal(first_char, line);
                    continue;
                }
            };
            let text = &self.source[tok_start..self.pos];
            return Some(Token::new(kind, text, line));
        }
    }

    fn illegal(&mut self, c: char, line: u32) {
        self.diagnostics.report(LexError::IllegalCharacter(c), line);
    }

    /// Skips a comment. The leading `--` has already been read.
    fn comment(&mut self) {
        let line = self.line;
        if self.long_bracket() {
            if !self.skip_long_comment() {
                self.diagnostics.report(LexError::UnclosedComment, line);
            }
        } else {
            while let Some(c) = self.peek_char() {
                if c == '\n' {
                    break;
                }
                self.next_char();
            }
        }
    }

    /// Reads an opening long bracket (`[[`, `[=[`, `[==[`, ...) if there is
    /// one.
    fn long_bracket(&mut self) -> bool {
        if self.peek_char() != Some('[') {
            return false;
        }
        let mut level = 0;
        while self.peek_nth(level + 1) == Some('=') {
            level += 1;
        }
        if self.peek_nth(level + 1) != Some('[') {
            return false;
        }
        for _ in 0..level + 2 {
            self.next_char();
        }
        true
    }

    /// Skips to the end of a long comment. Any closing bracket ends it,
    /// whatever its level. Returns `false` if the input ran out first.
    fn skip_long_comment(&mut self) -> bool {
        while let Some(c) = self.next_char() {
            if c != ']' {
                continue;
            }
            let mut equals = 0;
            while self.peek_nth(equals) == Some('=') {
                equals += 1;
            }
            if self.peek_nth(equals) == Some(']') {
                for _ in 0..=equals {
                    self.next_char();
                }
                return true;
            }
        }
        false
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    /// Consume any whitespace characters
    fn consume_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek_char() {
            self.next_char();
        }
    }

    /// Move a character forward, only if the current character matches
    /// `expected`.
    fn try_next(&mut self, expected: char) -> bool {
        match self.peek_char() {
            Some(c) if c == expected => {
                self.next_char();
                true
            }
            _ => false,
        }
    }

    /// The lexer just read a `.`. Determine whether it was a:
    /// - `Dot`: table access
    /// - `DotDot`: String concatenation
    fn peek_dot(&mut self) -> TokenKind {
        if self.try_next('.') {
            DotDot
        } else {
            Dot
        }
    }

    /// The lexer just read something which might be part of a two-character
    /// operator, with `=` as the second character.
    ///
    /// Returns `None` if the first character is `~` and it is not paired with
    /// a `=`.
    fn peek_equals(&mut self, first_char: char) -> Option<TokenKind> {
        let paired = self.try_next('=');
        let kind = match (first_char, paired) {
            ('=', true) => Equal,
            ('~', true) => NotEqual,
            ('<', true) => LessEqual,
            ('>', true) => GreaterEqual,
            ('=', false) => Assign,
            ('<', false) => Less,
            ('>', false) => Greater,
            _ => return None,
        };
        Some(kind)
    }

    /// Tokenize a literal string, denoted by single or double quotes. The
    /// opening quote has already been read.
    ///
    /// Returns `false` if the line ended before the closing quote. In that
    /// case the lexer is rewound to just after the opening quote.
    fn lex_string(&mut self, quote: char, line: u32) -> bool {
        let start = self.pos;
        let mut bad_escapes = 0;
        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    self.pos = start;
                    self.diagnostics.report(LexError::UnclosedString, line);
                    return false;
                }
                Some(c) => {
                    self.next_char();
                    if c == quote {
                        break;
                    }
                    if c == '\\' {
                        match self.peek_char() {
                            Some(e) if ESCAPES.contains(e) => {
                                self.next_char();
                            }
                            _ => bad_escapes += 1,
                        }
                    }
                }
            }
        }
        for _ in 0..bad_escapes {
            self.diagnostics.report(LexError::InvalidEscape, line);
        }
        true
    }

    /// Read in a number which starts with a digit.
    fn lex_full_number(&mut self, tok_start: usize, first_char: char) -> TokenKind {
        // Check for hex values. `0x` with no digits after it is just a zero.
        let is_hex = first_char == '0'
            && self.peek_char() == Some('x')
            && self.peek_nth(1).is_some_and(|c| c.is_ascii_hexdigit());
        if is_hex {
            self.next_char();
            let digits_start = self.pos;
            while let Some(c) = self.peek_char() {
                if !c.is_ascii_hexdigit() {
                    break;
                }
                self.next_char();
            }
            return Number(hex_value(&self.source[digits_start..self.pos]));
        }

        // Read in the rest of the base
        self.lex_digits();

        // A fraction needs at least one digit after the point.
        let mut is_float = false;
        if self.peek_char() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.next_char();
            self.lex_digits();
            is_float = true;
        }
        if self.lex_exponent() {
            is_float = true;
        }

        Number(decimal_value(&self.source[tok_start..self.pos], is_float))
    }

    /// Read in an unbroken sequence of digits.
    fn lex_digits(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.next_char();
            } else {
                break;
            }
        }
    }

    /// Read in the optional exponent part of a literal number. Returns
    /// whether there was one.
    fn lex_exponent(&mut self) -> bool {
        if !matches!(self.peek_char(), Some('e' | 'E')) {
            return false;
        }
        // The exponent might have a sign.
        let digits_at = match self.peek_nth(1) {
            Some('+' | '-') => 2,
            _ => 1,
        };
        if !self.peek_nth(digits_at).is_some_and(|c| c.is_ascii_digit()) {
            return false;
        }
        for _ in 0..digits_at {
            self.next_char();
        }
        self.lex_digits();
        true
    }

    fn lex_word(&mut self, tok_start: usize) -> TokenKind {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.next_char();
            } else {
                break;
            }
        }

        keyword_match(&self.source[tok_start..self.pos])
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

fn keyword_match(s: &str) -> TokenKind {
    match s {
        "and" => And,
        "break" => Break,
        "do" => Do,
        "else" => Else,
        "elseif" => ElseIf,
        "end" => End,
        "false" => False,
        "for" => For,
        "function" => Function,
        "if" => If,
        "in" => In,
        "local" => Local,
        "nil" => Nil,
        "not" => Not,
        "or" => Or,
        "repeat" => Repeat,
        "return" => Return,
        "then" => Then,
        "true" => True,
        "until" => Until,
        "while" => While,
        _ => Name,
    }
}

fn hex_value(digits: &str) -> Numeral {
    match i64::from_str_radix(digits, 16) {
        Ok(i) => Numeral::Int(i),
        Err(_) => {
            let x = digits
                .chars()
                .filter_map(|c| c.to_digit(16))
                .fold(0.0, |acc, d| acc * 16.0 + f64::from(d));
            Numeral::Float(x)
        }
    }
}

fn decimal_value(text: &str, is_float: bool) -> Numeral {
    if !is_float {
        if let Ok(i) = text.parse::<i64>() {
            return Numeral::Int(i);
        }
    }
    // Every literal the lexer accepts is valid float syntax; this fallback
    // is unreachable.
    Numeral::Float(text.parse().unwrap_or(f64::NAN))
}

/// Returns the contents of a string token with its quotes removed and its
/// escape sequences replaced. Invalid escapes, which the lexer has already
/// reported, are kept as written.
pub(crate) fn string_value(text: &str) -> String {
    let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or("");
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('a') => value.push('\u{07}'),
            Some('b') => value.push('\u{08}'),
            Some('f') => value.push('\u{0C}'),
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some('v') => value.push('\u{0B}'),
            Some(e @ ('"' | '\\')) => value.push(e),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => value.push('\\'),
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(input: &str, tokens: &[(TokenKind, &str, u32)], errors: usize) {
        let mut diagnostics = Diagnostics::new();
        let actual = tokenize(input, &mut diagnostics);
        let expected: Vec<Token> = tokens
            .iter()
            .map(|(kind, text, line)| Token::new(*kind, *text, *line))
            .collect();
        assert_eq!(expected, actual);
        assert_eq!(errors, diagnostics.count());
    }

    fn check_line(input: &str, tokens: &[(TokenKind, &str)]) {
        let tokens: Vec<_> = tokens.iter().map(|(kind, text)| (*kind, *text, 1u32)).collect();
        check(input, &tokens, 0);
    }

    #[test]
    fn test_lexer01() {
        check_line("50", &[(Number(Numeral::Int(50)), "50")]);
    }

    #[test]
    fn test_lexer02() {
        let input = "hi 4 false";
        let tokens = &[
            (Name, "hi"),
            (Number(Numeral::Int(4)), "4"),
            (False, "false"),
        ];
        check_line(input, tokens);
    }

    #[test]
    fn test_lexer03() {
        check_line("hi5", &[(Name, "hi5")]);
    }

    #[test]
    fn test_lexer04() {
        let input = "t = {x = 3}";
        let tokens = &[
            (Name, "t"),
            (Assign, "="),
            (LCurly, "{"),
            (Name, "x"),
            (Assign, "="),
            (Number(Numeral::Int(3)), "3"),
            (RCurly, "}"),
        ];
        check_line(input, tokens);
    }

    #[test]
    fn test_lexer05() {
        let input = "0x5rad";
        let tokens = &[(Number(Numeral::Int(5)), "0x5"), (Name, "rad")];
        check_line(input, tokens);
    }

    #[test]
    fn test_numbers() {
        check_line("0x1A", &[(Number(Numeral::Int(26)), "0x1A")]);
        check_line("3.14e2", &[(Number(Numeral::Float(314.0)), "3.14e2")]);
        check_line("2E-1", &[(Number(Numeral::Float(0.2)), "2E-1")]);
        check_line("10", &[(Number(Numeral::Int(10)), "10")]);
    }

    #[test]
    fn test_integer_overflow_becomes_float() {
        let text = "9223372036854775807";
        check_line(text, &[(Number(Numeral::Int(i64::MAX)), text)]);
        let text = "9223372036854775808";
        check_line(text, &[(Number(Numeral::Float(9.223372036854776e18)), text)]);
        let text = "0x7FFFFFFFFFFFFFFF";
        check_line(text, &[(Number(Numeral::Int(i64::MAX)), text)]);
        let text = "0xFFFFFFFFFFFFFFFFF";
        check_line(text, &[(Number(Numeral::Float(2f64.powi(68))), text)]);
    }

    #[test]
    fn test_number_stops_before_incomplete_parts() {
        let tokens = &[(Number(Numeral::Int(3)), "3"), (DotDot, ".."), (Name, "x")];
        check_line("3..x", tokens);
        let tokens = &[(Number(Numeral::Int(1)), "1"), (Name, "e")];
        check_line("1e", tokens);
        let tokens = &[(Number(Numeral::Int(0)), "0"), (Name, "x")];
        check_line("0x", tokens);
    }

    #[test]
    fn test_operators() {
        let input = "<= < >= > == ~= = .. .";
        let tokens = &[
            (LessEqual, "<="),
            (Less, "<"),
            (GreaterEqual, ">="),
            (Greater, ">"),
            (Equal, "=="),
            (NotEqual, "~="),
            (Assign, "="),
            (DotDot, ".."),
            (Dot, "."),
        ];
        check_line(input, tokens);
    }

    #[test]
    fn test_lines() {
        let input = "print()\nsome_other_function(an_argument)\n\n\nx";
        let tokens = &[
            (Name, "print", 1),
            (LParen, "(", 1),
            (RParen, ")", 1),
            (Name, "some_other_function", 2),
            (LParen, "(", 2),
            (Name, "an_argument", 2),
            (RParen, ")", 2),
            (Name, "x", 5),
        ];
        check(input, tokens, 0);
    }

    #[test]
    fn test_comments() {
        let input = "-- basic test\nprint('hi' --comment\n )\n";
        let tokens = &[
            (Name, "print", 2),
            (LParen, "(", 2),
            (TokenKind::LiteralString, "'hi'", 2),
            (RParen, ")", 3),
        ];
        check(input, tokens, 0);
    }

    #[test]
    fn test_long_comments() {
        let input = "a --[[ one\ntwo ]] b --[==[ ]=] \n c --[=[ ] ]] d";
        let tokens = &[(Name, "a", 1), (Name, "b", 2), (Name, "c", 3), (Name, "d", 3)];
        check(input, tokens, 0);
    }

    #[test]
    fn test_long_comment_closes_at_any_level() {
        let input = "a --[==[ c ]] b\nc";
        let tokens = &[(Name, "a", 1), (Name, "b", 1), (Name, "c", 2)];
        check(input, tokens, 0);
    }

    #[test]
    fn test_unclosed_comment() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("x\n--[[ never\nclosed", &mut diagnostics);
        assert_eq!(tokens.len(), 1);
        let reported: Vec<_> = diagnostics.iter().cloned().collect();
        assert_eq!(
            reported,
            [crate::Diagnostic {
                error: LexError::UnclosedComment,
                line: 2
            }]
        );
    }

    #[test]
    fn test_strings() {
        let input = r#"'single' "dou\"ble" "tab\t""#;
        let tokens = &[
            (TokenKind::LiteralString, "'single'"),
            (TokenKind::LiteralString, r#""dou\"ble""#),
            (TokenKind::LiteralString, r#""tab\t""#),
        ];
        check_line(input, tokens);
    }

    #[test]
    fn test_bad_escape() {
        let input = r#"s = "a\qb""#;
        let tokens = &[
            (Name, "s", 1),
            (Assign, "=", 1),
            (TokenKind::LiteralString, r#""a\qb""#, 1),
        ];
        check(input, tokens, 1);
    }

    #[test]
    fn test_unfinished_string() {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize("'abc\nd", &mut diagnostics);
        let kinds: Vec<_> = tokens.iter().map(|t| (t.kind, t.text.as_str())).collect();
        assert_eq!(kinds, [(Name, "abc"), (Name, "d")]);
        assert_eq!(diagnostics.count(), 1);
        assert_eq!(diagnostics.iter().next().map(|d| d.line), Some(1));
    }

    #[test]
    fn test_illegal_character() {
        let input = "a = 1\nb = $2\nc = 3";
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(input, &mut diagnostics);
        assert_eq!(tokens.len(), 9);
        let reported: Vec<_> = diagnostics.iter().cloned().collect();
        assert_eq!(
            reported,
            [crate::Diagnostic {
                error: LexError::IllegalCharacter('$'),
                line: 2
            }]
        );
    }

    #[test]
    fn test_lone_tilde_and_hash() {
        let tokens = &[(Name, "a", 1), (Name, "b", 1)];
        check("a ~ # b", tokens, 2);
    }

    #[test]
    fn test_string_value() {
        assert_eq!(string_value(r#""a\tb""#), "a\tb");
        assert_eq!(string_value(r#"'q\"'"#), "q\"");
        assert_eq!(string_value(r#""\q""#), "\\q");
        assert_eq!(string_value("''"), "");
    }
}
