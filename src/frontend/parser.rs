use super::exp_desc::PrefixExp;
use super::lexer::{string_value, TokenStream};
use super::Lexer;
use super::Token;
use super::TokenKind;
use crate::ast::{
    Assignment, BinOp, Binop, CallFunction, CallTable, DefFunction, Expr, For, Forin, Function,
    FunctionBody, If, Name, Node, Program, Repeat, Stmt, TableData, Var, While,
};
use crate::Diagnostics;
use crate::Error;
use crate::Result;

/// The priority operands of `-` and `not` are parsed at. Unary operators
/// bind tighter than `*`, but looser than `..` and `^`.
const UNARY_PRIORITY: u8 = 12;

/// Tracks the current state, to make parsing easier.
#[derive(Debug)]
struct Parser<I: Iterator<Item = Token>> {
    /// The input token stream.
    input: TokenStream<I>,
}

/// Parses a sequence of tokens into a `Program`.
#[tracing::instrument(skip_all)]
pub fn parse<I: IntoIterator<Item = Token>>(tokens: I) -> Result<Program> {
    let parser = Parser {
        input: TokenStream::new(tokens.into_iter()),
    };
    parser.parse_all()
}

/// Lexes and parses `source`. Lexical errors go to `diagnostics`; the first
/// syntax error ends the parse.
#[tracing::instrument(skip_all, fields(source_len = source.len()))]
pub fn parse_str(source: &str, diagnostics: &mut Diagnostics) -> Result<Program> {
    parse(Lexer::new(source, diagnostics))
}

/// The declarative precedence table for binary operators.
///
/// Each entry is `(operator, left priority, right priority)`. An operator
/// joins the expression being built while its left priority is above the
/// current limit, and its right operand is parsed with the right priority
/// as the new limit. Left-associative operators use the same number on both
/// sides; right-associative ones have a right priority one lower.
fn binary_op(kind: TokenKind) -> Option<(BinOp, u8, u8)> {
    let entry = match kind {
        TokenKind::Or => (BinOp::Or, 2, 2),
        TokenKind::And => (BinOp::And, 4, 4),
        TokenKind::Less => (BinOp::Less, 6, 6),
        TokenKind::Greater => (BinOp::Greater, 6, 6),
        TokenKind::LessEqual => (BinOp::LessEqual, 6, 6),
        TokenKind::GreaterEqual => (BinOp::GreaterEqual, 6, 6),
        TokenKind::NotEqual => (BinOp::NotEqual, 6, 6),
        TokenKind::Equal => (BinOp::Equal, 6, 6),
        TokenKind::Plus => (BinOp::Add, 8, 8),
        TokenKind::Minus => (BinOp::Sub, 8, 8),
        TokenKind::Star => (BinOp::Mul, 10, 10),
        TokenKind::Slash => (BinOp::Div, 10, 10),
        TokenKind::Mod => (BinOp::Mod, 10, 10),
        TokenKind::DotDot => (BinOp::Concat, 14, 13),
        TokenKind::Caret => (BinOp::Pow, 16, 15),
        _ => return None,
    };
    Some(entry)
}

impl<I: Iterator<Item = Token>> Parser<I> {
    // Helper functions

    /// Pulls the next token, failing at the end of input.
    fn next_token(&mut self) -> Result<Token> {
        self.input.next().ok_or(Error::UnexpectedEof)
    }

    /// The line of the next token, failing at the end of input.
    fn peek_line(&mut self) -> Result<u32> {
        self.input
            .peek()
            .map(|token| token.line)
            .ok_or(Error::UnexpectedEof)
    }

    /// Pulls a token off the input and checks it against `expected`.
    /// Returns the token if it matches, `Err` otherwise.
    fn expect(&mut self, expected: TokenKind) -> Result<Token> {
        let token = self.next_token()?;
        if token.kind == expected {
            Ok(token)
        } else {
            Err(Error::Expect {
                line: token.line,
                text: token.text,
                expected,
            })
        }
    }

    /// Expects a name token and returns the name as a string.
    fn expect_name(&mut self) -> Result<String> {
        Ok(self.expect(TokenKind::Name)?.text)
    }

    /// Returns `true` if the next token can't start anything inside a block.
    fn at_block_end(&mut self) -> bool {
        match self.input.peek_kind() {
            None | Some(TokenKind::Semi) => true,
            Some(kind) => kind.closes_block(),
        }
    }

    // Actual parsing

    /// The main entry point for the parser. This parses the entire input.
    fn parse_all(mut self) -> Result<Program> {
        let stmtlist = self.parse_statements()?;
        if let Some(token) = self.input.next() {
            return Err(unexpected(token));
        }
        tracing::debug!(statements = stmtlist.len(), "parsed program");
        Ok(Program { stmtlist })
    }

    /// Parses 0 or more statements, each optionally followed by a semicolon.
    /// Stops at the first token that can't start a statement, or after a
    /// `return`.
    fn parse_statements(&mut self) -> Result<Vec<Stmt>> {
        let mut stmtlist = Vec::new();
        loop {
            let stmt = match self.input.peek_kind() {
                None => break,
                Some(kind) if kind.closes_block() => break,
                Some(TokenKind::Semi) => {
                    self.input.next();
                    continue;
                }
                Some(TokenKind::Return) => {
                    stmtlist.push(self.parse_return()?);
                    break;
                }
                Some(TokenKind::Break) => {
                    self.input.next();
                    Stmt::Break
                }
                Some(TokenKind::If) => self.parse_if()?,
                Some(TokenKind::While) => self.parse_while()?,
                Some(TokenKind::Repeat) => self.parse_repeat()?,
                Some(TokenKind::Do) => self.parse_do()?,
                Some(TokenKind::Local) => self.parse_locals()?,
                Some(TokenKind::For) => self.parse_for()?,
                Some(TokenKind::Function) => self.parse_fndecl()?,
                Some(_) => self.parse_assign_or_call()?,
            };
            tracing::trace!(kind = ?stmt.kind(), "parsed statement");
            stmtlist.push(stmt);
        }
        Ok(stmtlist)
    }

    /// Parses a return statement. Return statements must always come last in
    /// a block.
    fn parse_return(&mut self) -> Result<Stmt> {
        self.input.next(); // `return` keyword
        let exprlist = if self.at_block_end() {
            Vec::new()
        } else {
            self.parse_explist()?
        };
        self.input.try_pop(TokenKind::Semi);
        Ok(Stmt::Return(exprlist))
    }

    /// Parses a function declaration, which is any statement that starts with
    /// the keyword `function`.
    fn parse_fndecl(&mut self) -> Result<Stmt> {
        self.input.next(); // `function` keyword
        let function = self.parse_function()?;
        Ok(Stmt::DefFunction(DefFunction {
            function,
            local: false,
        }))
    }

    /// Parses a function's name, parameters and body.
    fn parse_function(&mut self) -> Result<Function> {
        let value = self.parse_funcname()?;
        let funcbody = self.parse_funcbody()?;
        Ok(Function { value, funcbody })
    }

    /// Parses a function name: `a`, `a.b.c`, or `a.b:c`. The parts are joined
    /// with dots.
    fn parse_funcname(&mut self) -> Result<Name> {
        let mut name = Name::new(self.expect_name()?);
        while self.input.try_pop(TokenKind::Dot).is_some() {
            name = name.with_segment(&self.expect_name()?);
        }
        if self.input.try_pop(TokenKind::Colon).is_some() {
            name = name.with_segment(&self.expect_name()?);
        }
        Ok(name)
    }

    /// Parses the parameters and body of a function definition, through the
    /// closing `end`.
    fn parse_funcbody(&mut self) -> Result<FunctionBody> {
        let params = self.parse_params()?;
        let stmtlist = self.parse_statements()?;
        self.expect(TokenKind::End)?;
        Ok(FunctionBody { params, stmtlist })
    }

    /// Parses the parameters in a function definition.
    fn parse_params(&mut self) -> Result<Vec<Name>> {
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if self.input.try_pop(TokenKind::RParen).is_some() {
            return Ok(params);
        }
        params.push(Name::new(self.expect_name()?));
        while self.input.try_pop(TokenKind::Comma).is_some() {
            params.push(Name::new(self.expect_name()?));
        }
        self.expect(TokenKind::RParen)?;
        Ok(params)
    }

    /// Parses a statement which could be a variable assignment or a function call.
    fn parse_assign_or_call(&mut self) -> Result<Stmt> {
        let line = self.peek_line()?;
        match self.parse_prefix_exp()? {
            PrefixExp::FunctionCall(call)
                if !matches!(
                    self.input.peek_kind(),
                    Some(TokenKind::Assign | TokenKind::Comma)
                ) =>
            {
                Ok(Stmt::CallFunction(call))
            }
            first => self.parse_assign(first, line),
        }
    }

    /// Parses a variable assignment, whose first target has already been
    /// read.
    fn parse_assign(&mut self, first: PrefixExp, line: u32) -> Result<Stmt> {
        let mut varlist = vec![into_target(first, line)?];
        while self.input.try_pop(TokenKind::Comma).is_some() {
            let line = self.peek_line()?;
            let place = self.parse_prefix_exp()?;
            varlist.push(into_target(place, line)?);
        }

        let assign = self.expect(TokenKind::Assign)?;
        let explist = self.parse_explist()?;
        check_arity(assign.line, &varlist, &explist)?;
        Ok(Stmt::Assignment(Assignment {
            varlist,
            explist,
            local: false,
        }))
    }

    /// Parses a `local` declaration or `local function`.
    fn parse_locals(&mut self) -> Result<Stmt> {
        self.input.next(); // `local` keyword
        if self.input.try_pop(TokenKind::Function).is_some() {
            let function = self.parse_function()?;
            return Ok(Stmt::DefFunction(DefFunction {
                function,
                local: true,
            }));
        }

        // There has to be at least one name
        let mut varlist = vec![Expr::Var(Var::new(self.expect_name()?))];
        while self.input.try_pop(TokenKind::Comma).is_some() {
            varlist.push(Expr::Var(Var::new(self.expect_name()?)));
        }

        let explist = match self.input.try_pop(TokenKind::Assign) {
            Some(assign) => {
                let explist = self.parse_explist()?;
                check_arity(assign.line, &varlist, &explist)?;
                explist
            }
            // They've only been declared, just set them all nil
            None => vec![Expr::Nil; varlist.len()],
        };

        Ok(Stmt::Assignment(Assignment {
            varlist,
            explist,
            local: true,
        }))
    }

    /// Parses a `for` loop, before we know whether it's generic (`for i in t do`) or
    /// numeric (`for i = 1,5 do`).
    fn parse_for(&mut self) -> Result<Stmt> {
        self.input.next(); // `for` keyword
        let name = self.expect_name()?;
        if self.input.try_pop(TokenKind::Assign).is_some() {
            self.parse_numeric_for(name)
        } else {
            self.parse_generic_for(name)
        }
    }

    /// Parses a numeric `for` loop, starting with the first expression after the `=`.
    fn parse_numeric_for(&mut self, name: String) -> Result<Stmt> {
        let start = self.parse_expr()?;
        self.expect(TokenKind::Comma)?;
        let limit = self.parse_expr()?;

        // optional step value
        let step = if self.input.try_pop(TokenKind::Comma).is_some() {
            self.parse_expr()?
        } else {
            Expr::Number(1.0)
        };

        self.expect(TokenKind::Do)?;
        let stmtlist = self.parse_statements()?;
        self.expect(TokenKind::End)?;

        let assign = Assignment {
            varlist: vec![Expr::Var(Var::new(name))],
            explist: vec![start],
            local: true,
        };
        Ok(Stmt::For(For {
            assign,
            limit,
            step,
            stmtlist,
        }))
    }

    /// Parses a generic `for` loop, starting after the first name.
    fn parse_generic_for(&mut self, first_name: String) -> Result<Stmt> {
        let mut namelist = vec![Name::new(first_name)];
        while self.input.try_pop(TokenKind::Comma).is_some() {
            namelist.push(Name::new(self.expect_name()?));
        }
        self.expect(TokenKind::In)?;
        let exprlist = self.parse_explist()?;
        self.expect(TokenKind::Do)?;
        let stmtlist = self.parse_statements()?;
        self.expect(TokenKind::End)?;
        Ok(Stmt::Forin(Forin {
            namelist,
            exprlist,
            stmtlist,
        }))
    }

    /// Parses a `do ... end` statement.
    fn parse_do(&mut self) -> Result<Stmt> {
        self.input.next(); // `do` keyword
        let stmtlist = self.parse_statements()?;
        self.expect(TokenKind::End)?;
        Ok(Stmt::Do(stmtlist))
    }

    /// Parses a `repeat ... until` statement.
    fn parse_repeat(&mut self) -> Result<Stmt> {
        self.input.next(); // `repeat` keyword
        let stmtlist = self.parse_statements()?;
        self.expect(TokenKind::Until)?;
        let cond = self.parse_expr()?;
        Ok(Stmt::Repeat(Repeat { stmtlist, cond }))
    }

    /// Parses a `while ... do ... end` statement.
    fn parse_while(&mut self) -> Result<Stmt> {
        self.input.next(); // `while` keyword
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Do)?;
        let stmtlist = self.parse_statements()?;
        self.expect(TokenKind::End)?;
        Ok(Stmt::While(While { cond, stmtlist }))
    }

    /// Parses an if-then statement, including any attached `else` or `elseif` branches.
    fn parse_if(&mut self) -> Result<Stmt> {
        self.input.next(); // `if` keyword
        Ok(Stmt::If(self.parse_if_arm()?))
    }

    /// Parses the condition and body of an `if` or `elseif`, and any arms that
    /// follow it in the same chain, through the shared `end`. An `elseif`
    /// becomes a nested `If` and the only statement in `elsepart`.
    fn parse_if_arm(&mut self) -> Result<If> {
        let cond = self.parse_expr()?;
        self.expect(TokenKind::Then)?;
        let stmtlist = self.parse_statements()?;

        let elsepart = match self.input.peek_kind() {
            Some(TokenKind::ElseIf) => {
                self.input.next();
                vec![Stmt::If(self.parse_if_arm()?)]
            }
            Some(TokenKind::Else) => {
                self.input.next();
                let stmtlist = self.parse_statements()?;
                self.expect(TokenKind::End)?;
                stmtlist
            }
            _ => {
                self.expect(TokenKind::End)?;
                Vec::new()
            }
        };

        Ok(If {
            cond,
            stmtlist,
            elsepart,
        })
    }

    /// Parses a comma-separated list of expressions. Trailing and leading
    /// commas are not allowed.
    fn parse_explist(&mut self) -> Result<Vec<Expr>> {
        // An explist has to have at least one expression.
        let mut explist = vec![self.parse_expr()?];
        while self.input.try_pop(TokenKind::Comma).is_some() {
            explist.push(self.parse_expr()?);
        }
        Ok(explist)
    }

    /// Parses a single expression.
    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_subexpr(0)
    }

    /// Parses an expression whose binary operators all bind tighter than
    /// `limit`. See `binary_op` for the table of priorities.
    fn parse_subexpr(&mut self, limit: u8) -> Result<Expr> {
        let mut exp = match self.input.peek_kind() {
            Some(TokenKind::Minus) => {
                self.input.next();
                negate(self.parse_subexpr(UNARY_PRIORITY)?)
            }
            Some(TokenKind::Not) => {
                self.input.next();
                Expr::Not(Box::new(self.parse_subexpr(UNARY_PRIORITY)?))
            }
            _ => self.parse_simple_exp()?,
        };

        while let Some((op, left, right)) = self.input.peek_kind().and_then(binary_op) {
            if left <= limit {
                break;
            }
            self.input.next();
            let rhs = self.parse_subexpr(right)?;
            exp = Binop::new(exp, op, rhs).into();
        }

        Ok(exp)
    }

    /// Parses an expression with no operators. This can be:
    /// * A literal number
    /// * A literal string
    /// * A function definition
    /// * One of the keywords `nil`, `false` or `true`
    /// * A table constructor
    /// * A prefix expression
    fn parse_simple_exp(&mut self) -> Result<Expr> {
        if let Some(TokenKind::Name | TokenKind::LParen) = self.input.peek_kind() {
            return Ok(self.parse_prefix_exp()?.into_expr());
        }

        let token = self.next_token()?;
        let exp = match token.kind {
            TokenKind::Nil => Expr::Nil,
            TokenKind::True => Expr::Boolean(true),
            TokenKind::False => Expr::Boolean(false),
            TokenKind::Number(n) => Expr::Number(n.as_f64()),
            TokenKind::LiteralString => Expr::String(string_value(&token.text)),
            TokenKind::Function => Expr::Function(self.parse_funcbody()?),
            TokenKind::LCurly => self.parse_table()?,
            _ => return Err(unexpected(token)),
        };
        Ok(exp)
    }

    /// Parses a `prefix expression`. Prefix expressions are the expressions
    /// which can appear on the left side of a function call, table index, or
    /// field access.
    fn parse_prefix_exp(&mut self) -> Result<PrefixExp> {
        let token = self.next_token()?;
        let prefix = match token.kind {
            TokenKind::Name => PrefixExp::Place(Name::new(token.text).into()),
            TokenKind::LParen => {
                let exp = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                PrefixExp::Parenthesized(exp)
            }
            _ => return Err(unexpected(token)),
        };
        self.parse_prefix_extension(prefix)
    }

    /// Parses any extensions to a prefix expression: field accesses, table
    /// indexes, and function calls.
    fn parse_prefix_extension(&mut self, mut prefix: PrefixExp) -> Result<PrefixExp> {
        loop {
            prefix = match self.input.peek_kind() {
                Some(TokenKind::Dot) => {
                    self.input.next();
                    let field = self.expect_name()?;
                    PrefixExp::Place(member(prefix.into_expr(), field))
                }
                Some(TokenKind::LSquare) => {
                    self.input.next();
                    let field = self.parse_expr()?;
                    self.expect(TokenKind::RSquare)?;
                    PrefixExp::Place(
                        CallTable {
                            table: Box::new(prefix.into_expr()),
                            field: Box::new(field),
                        }
                        .into(),
                    )
                }
                Some(TokenKind::LParen) => {
                    self.input.next();
                    let explist = self.parse_call()?;
                    call(prefix.into_expr(), explist).into()
                }
                Some(TokenKind::LCurly) => {
                    self.input.next();
                    let table = self.parse_table()?;
                    call(prefix.into_expr(), vec![table]).into()
                }
                _ => return Ok(prefix),
            };
        }
    }

    /// Parses a table constructor, after the `{`.
    fn parse_table(&mut self) -> Result<Expr> {
        let mut data = Vec::new();
        while !self.input.check_kind(TokenKind::RCurly) {
            data.push(self.parse_table_entry()?);
            if self.input.try_pop(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RCurly)?;
        Ok(Expr::Table(data))
    }

    /// Parses a table entry: `name = exp` or `[exp] = exp`.
    fn parse_table_entry(&mut self) -> Result<TableData> {
        let token = self.next_token()?;
        let value = match token.kind {
            TokenKind::Name => Name::new(token.text).into(),
            TokenKind::LSquare => {
                let key = self.parse_expr()?;
                self.expect(TokenKind::RSquare)?;
                key
            }
            _ => return Err(unexpected(token)),
        };
        self.expect(TokenKind::Assign)?;
        let exp = self.parse_expr()?;
        Ok(TableData { value, exp })
    }

    /// Parses the arguments of a function call, after the `(`.
    fn parse_call(&mut self) -> Result<Vec<Expr>> {
        if self.input.try_pop(TokenKind::RParen).is_some() {
            return Ok(Vec::new());
        }
        let explist = self.parse_explist()?;
        self.expect(TokenKind::RParen)?;
        Ok(explist)
    }
}

/// Constructs an error for a token which doesn't fit anywhere here.
fn unexpected(token: Token) -> Error {
    Error::Unexpected {
        line: token.line,
        text: token.text,
    }
}

/// Applies unary minus. A number literal is negated in place; anything else
/// is wrapped in `Neg`.
fn negate(exp: Expr) -> Expr {
    match exp {
        Expr::Number(value) => Expr::Number(-value),
        exp => Expr::Neg(Box::new(exp)),
    }
}

/// Builds `table.field`. A plain or dotted name just grows by one segment;
/// anything else becomes an index with the field name as a string key.
fn member(table: Expr, field: String) -> Expr {
    match table {
        Expr::Name(name) => name.with_segment(&field).into(),
        table => CallTable {
            table: Box::new(table),
            field: Box::new(Expr::String(field)),
        }
        .into(),
    }
}

fn call(value: Expr, explist: Vec<Expr>) -> CallFunction {
    CallFunction {
        value: Box::new(value),
        explist,
    }
}

/// Checks that a prefix expression can be assigned to, and converts it into
/// an assignment target.
fn into_target(place: PrefixExp, line: u32) -> Result<Expr> {
    match place {
        PrefixExp::Place(Expr::Name(name)) => Ok(Expr::Var(Var { value: name.value })),
        PrefixExp::Place(exp) => Ok(exp),
        PrefixExp::FunctionCall(_) | PrefixExp::Parenthesized(_) => {
            Err(Error::InvalidTarget { line })
        }
    }
}

fn check_arity(line: u32, varlist: &[Expr], explist: &[Expr]) -> Result<()> {
    if varlist.len() == explist.len() {
        Ok(())
    } else {
        Err(Error::AssignArity {
            line,
            targets: varlist.len(),
            values: explist.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(input: &str) -> Program {
        let mut diagnostics = Diagnostics::new();
        let program = parse_str(input, &mut diagnostics).unwrap();
        assert!(diagnostics.is_empty());
        program
    }

    fn parse_err(input: &str) -> Error {
        let mut diagnostics = Diagnostics::new();
        parse_str(input, &mut diagnostics).unwrap_err()
    }

    /// Parses a single assignment statement and returns its only value.
    fn single_exp(input: &str) -> Expr {
        let mut program = parse_ok(input);
        assert_eq!(program.stmtlist.len(), 1);
        match program.stmtlist.pop() {
            Some(Stmt::Assignment(mut assign)) => {
                assert_eq!(assign.explist.len(), 1);
                assign.explist.remove(0)
            }
            other => panic!("expected an assignment, got {:?}", other),
        }
    }

    fn num(x: f64) -> Expr {
        Expr::Number(x)
    }

    fn name(s: &str) -> Expr {
        Name::new(s).into()
    }

    fn var(s: &str) -> Expr {
        Expr::Var(Var::new(s))
    }

    fn bin(left: Expr, op: BinOp, right: Expr) -> Expr {
        Binop::new(left, op, right).into()
    }

    fn assign(target: &str, value: Expr) -> Stmt {
        Stmt::Assignment(Assignment {
            varlist: vec![var(target)],
            explist: vec![value],
            local: false,
        })
    }

    #[test]
    fn test01() {
        let expected = bin(num(1.0), BinOp::Add, bin(num(2.0), BinOp::Mul, num(3.0)));
        assert_eq!(single_exp("x = 1 + 2 * 3;"), expected);
    }

    #[test]
    fn test02() {
        let expected = bin(num(2.0), BinOp::Pow, bin(num(3.0), BinOp::Pow, num(2.0)));
        assert_eq!(single_exp("x = 2 ^ 3 ^ 2;"), expected);
    }

    #[test]
    fn test03() {
        assert_eq!(single_exp("x = -5;"), num(-5.0));
        assert_eq!(single_exp("x = -y;"), Expr::Neg(Box::new(name("y"))));
    }

    #[test]
    fn test04() {
        // Left-associative chains fold all the way.
        let expected = bin(
            bin(bin(num(1.0), BinOp::Sub, num(2.0)), BinOp::Sub, num(3.0)),
            BinOp::Add,
            num(4.0),
        );
        assert_eq!(single_exp("x = 1 - 2 - 3 + 4"), expected);
        let expected = bin(
            bin(name("a"), BinOp::Mul, name("b")),
            BinOp::Div,
            name("c"),
        );
        assert_eq!(single_exp("x = a * b / c"), expected);
    }

    #[test]
    fn test05() {
        let expected = bin(
            name("a"),
            BinOp::Or,
            bin(
                name("b"),
                BinOp::And,
                bin(name("c"), BinOp::Less, name("d")),
            ),
        );
        assert_eq!(single_exp("x = a or b and c < d"), expected);
    }

    #[test]
    fn test06() {
        // `..` is right associative and binds tighter than `+`.
        let expected = bin(
            num(1.0),
            BinOp::Add,
            bin(
                name("a"),
                BinOp::Concat,
                bin(name("b"), BinOp::Concat, name("c")),
            ),
        );
        assert_eq!(single_exp("x = 1 + a .. b .. c"), expected);
    }

    #[test]
    fn test07() {
        // Unary operators bind looser than `^`, so the literal isn't folded.
        let expected = Expr::Neg(Box::new(bin(num(5.0), BinOp::Pow, num(2.0))));
        assert_eq!(single_exp("x = -5^2"), expected);
        let expected = bin(
            Expr::Not(Box::new(name("a"))),
            BinOp::Equal,
            name("b"),
        );
        assert_eq!(single_exp("x = not a == b"), expected);
        let expected = bin(num(2.0), BinOp::Pow, num(-3.0));
        assert_eq!(single_exp("x = 2 ^ -3"), expected);
    }

    #[test]
    fn test08() {
        let program = parse_ok("if a then b = 1 elseif c then b = 2 else b = 3 end");
        let expected = Stmt::If(If {
            cond: name("a"),
            stmtlist: vec![assign("b", num(1.0))],
            elsepart: vec![Stmt::If(If {
                cond: name("c"),
                stmtlist: vec![assign("b", num(2.0))],
                elsepart: vec![assign("b", num(3.0))],
            })],
        });
        assert_eq!(program.stmtlist, [expected]);
    }

    #[test]
    fn test09() {
        let err = parse_err("x = ;");
        assert_eq!(
            err,
            Error::Unexpected {
                line: 1,
                text: ";".into()
            }
        );
        let err = parse_err("x = 1\ny = 2 +\n;");
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test10() {
        assert_eq!(parse_err("x ="), Error::UnexpectedEof);
        assert_eq!(parse_err("while true do"), Error::UnexpectedEof);
        let err = parse_err("if a b = 1 end");
        assert_eq!(
            err,
            Error::Expect {
                line: 1,
                text: "b".into(),
                expected: TokenKind::Then
            }
        );
    }

    #[test]
    fn test11() {
        let program = parse_ok("local a, b local c, d = 1, 'two'");
        let expected = [
            Stmt::Assignment(Assignment {
                varlist: vec![var("a"), var("b")],
                explist: vec![Expr::Nil, Expr::Nil],
                local: true,
            }),
            Stmt::Assignment(Assignment {
                varlist: vec![var("c"), var("d")],
                explist: vec![num(1.0), Expr::String("two".into())],
                local: true,
            }),
        ];
        assert_eq!(program.stmtlist, expected);
    }

    #[test]
    fn test12() {
        assert_eq!(
            parse_err("a, b = 1"),
            Error::AssignArity {
                line: 1,
                targets: 2,
                values: 1
            }
        );
        assert_eq!(parse_err("f() = 1"), Error::InvalidTarget { line: 1 });
        assert_eq!(parse_err("x, (y) = 1, 2"), Error::InvalidTarget { line: 1 });
    }

    #[test]
    fn test13() {
        let program = parse_ok("for i = 1, 10 do print(i) end");
        let expected = Stmt::For(For {
            assign: Assignment {
                varlist: vec![var("i")],
                explist: vec![num(1.0)],
                local: true,
            },
            limit: num(10.0),
            step: num(1.0),
            stmtlist: vec![Stmt::CallFunction(call(name("print"), vec![name("i")]))],
        });
        assert_eq!(program.stmtlist, [expected]);

        let program = parse_ok("for i = 10, 1, -1 do end");
        match &program.stmtlist[0] {
            Stmt::For(node) => assert_eq!(node.step, num(-1.0)),
            other => panic!("expected a for loop, got {:?}", other),
        }
    }

    #[test]
    fn test14() {
        let program = parse_ok("for k, v in pairs(t) do break end");
        let expected = Stmt::Forin(Forin {
            namelist: vec![Name::new("k"), Name::new("v")],
            exprlist: vec![call(name("pairs"), vec![name("t")]).into()],
            stmtlist: vec![Stmt::Break],
        });
        assert_eq!(program.stmtlist, [expected]);
    }

    #[test]
    fn test15() {
        let program = parse_ok("function obj:method(a, b) return a + b end");
        let expected = Stmt::DefFunction(DefFunction {
            function: Function {
                value: Name::new("obj.method"),
                funcbody: FunctionBody {
                    params: vec![Name::new("a"), Name::new("b")],
                    stmtlist: vec![Stmt::Return(vec![bin(name("a"), BinOp::Add, name("b"))])],
                },
            },
            local: false,
        });
        assert_eq!(program.stmtlist, [expected]);

        let program = parse_ok("local function f() return end");
        let expected = Stmt::DefFunction(DefFunction {
            function: Function {
                value: Name::new("f"),
                funcbody: FunctionBody {
                    params: Vec::new(),
                    stmtlist: vec![Stmt::Return(Vec::new())],
                },
            },
            local: true,
        });
        assert_eq!(program.stmtlist, [expected]);
    }

    #[test]
    fn test16() {
        let program = parse_ok("function a.b.c() end");
        match &program.stmtlist[0] {
            Stmt::DefFunction(def) => assert_eq!(def.function.value, Name::new("a.b.c")),
            other => panic!("expected a function, got {:?}", other),
        }
    }

    #[test]
    fn test17() {
        let expected = Expr::Table(vec![
            TableData {
                value: name("x"),
                exp: num(1.0),
            },
            TableData {
                value: Expr::String("y".into()),
                exp: num(2.0),
            },
            TableData {
                value: name("z"),
                exp: Expr::Table(Vec::new()),
            },
        ]);
        assert_eq!(single_exp("t = {x = 1, ['y'] = 2, z = {},}"), expected);
        assert!(matches!(parse_err("t = {,}"), Error::Unexpected { .. }));
    }

    #[test]
    fn test18() {
        // Dotted names stay names; indexing builds a `CallTable`.
        let program = parse_ok("a.b.c = t[1].x");
        let expected = Stmt::Assignment(Assignment {
            varlist: vec![var("a.b.c")],
            explist: vec![CallTable {
                table: Box::new(
                    CallTable {
                        table: Box::new(name("t")),
                        field: Box::new(num(1.0)),
                    }
                    .into(),
                ),
                field: Box::new(Expr::String("x".into())),
            }
            .into()],
            local: false,
        });
        assert_eq!(program.stmtlist, [expected]);
    }

    #[test]
    fn test19() {
        let program = parse_ok("t[i] = 0; io.write('x'); f{a = 1}");
        let expected = [
            Stmt::Assignment(Assignment {
                varlist: vec![CallTable {
                    table: Box::new(name("t")),
                    field: Box::new(name("i")),
                }
                .into()],
                explist: vec![num(0.0)],
                local: false,
            }),
            Stmt::CallFunction(call(name("io.write"), vec![Expr::String("x".into())])),
            Stmt::CallFunction(call(
                name("f"),
                vec![Expr::Table(vec![TableData {
                    value: name("a"),
                    exp: num(1.0),
                }])],
            )),
        ];
        assert_eq!(program.stmtlist, expected);
    }

    #[test]
    fn test20() {
        let program = parse_ok("while x < 10 do x = x + 1 end repeat x = x - 1 until x == 0 do end");
        assert_eq!(program.stmtlist.len(), 3);
        let kinds: Vec<_> = program.stmtlist.iter().map(Node::kind).collect();
        assert_eq!(
            kinds,
            [
                crate::ast::NodeKind::While,
                crate::ast::NodeKind::Repeat,
                crate::ast::NodeKind::Do
            ]
        );
    }

    #[test]
    fn test21() {
        let expected = Expr::Function(FunctionBody {
            params: vec![Name::new("n")],
            stmtlist: vec![Stmt::Return(vec![bin(name("n"), BinOp::Mul, num(2.0))])],
        });
        assert_eq!(single_exp("double = function (n) return n * 2 end"), expected);
    }

    #[test]
    fn test22() {
        // Nothing may follow a `return` in the same block.
        assert!(matches!(
            parse_err("return 1 x = 2"),
            Error::Unexpected { .. }
        ));
        assert!(matches!(
            parse_err("do return x = 1 end"),
            Error::Expect { .. }
        ));
    }

    #[test]
    fn test23() {
        let expected = call(call(name("f"), vec![num(1.0)]).into(), Vec::new());
        assert_eq!(single_exp("x = f(1)()"), Expr::CallFunction(expected));
        assert_eq!(single_exp("x = (1 + 2)"), bin(num(1.0), BinOp::Add, num(2.0)));
        assert_eq!(single_exp("x = 0x10"), num(16.0));
        assert_eq!(single_exp(r#"x = "a\nb""#), Expr::String("a\nb".into()));
    }

    #[test]
    fn test24() {
        let tokens = vec![
            Token::new(TokenKind::Name, "x", 1),
            Token::new(TokenKind::Assign, "=", 1),
            Token::new(TokenKind::True, "true", 2),
        ];
        let program = parse(tokens).unwrap();
        assert_eq!(program.stmtlist, [assign("x", Expr::Boolean(true))]);
        assert_eq!(parse(Vec::<Token>::new()).unwrap(), Program::default());
    }
}
