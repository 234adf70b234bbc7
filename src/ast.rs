//! The abstract syntax tree produced by the parser.
//!
//! Every node owns its children. A finished tree is only ever read; the
//! parser is the one place nodes are built or changed.

mod visit;

pub use visit::{Node, NodeKind, Role, Visitor};

use std::fmt::{self, Display, Formatter};

/// The root of every tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub stmtlist: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Assignment(Assignment),
    CallFunction(CallFunction),
    /// `do ... end`
    Do(Vec<Stmt>),
    While(While),
    Repeat(Repeat),
    If(If),
    For(For),
    Forin(Forin),
    DefFunction(DefFunction),
    /// `return`, with a possibly empty list of values.
    Return(Vec<Expr>),
    Break,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Nil,
    Boolean(bool),
    Number(f64),
    String(String),
    Name(Name),
    /// Only appears as an assignment target.
    Var(Var),
    Not(Box<Expr>),
    /// Arithmetic negation. Negated number literals are folded into a
    /// `Number` instead.
    Neg(Box<Expr>),
    Binop(Binop),
    Table(Vec<TableData>),
    CallTable(CallTable),
    CallFunction(CallFunction),
    /// An anonymous `function (...) ... end`.
    Function(FunctionBody),
}

/// A name, or a dotted path of names such as `a.b.c`.
#[derive(Clone, Debug, PartialEq)]
pub struct Name {
    pub value: String,
}

/// An assignment target that is a name or dotted path.
#[derive(Clone, Debug, PartialEq)]
pub struct Var {
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Binop {
    pub left: Box<Expr>,
    pub operator: BinOp,
    pub right: Box<Expr>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    Or,
    And,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    NotEqual,
    Equal,
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

/// One `key = exp` entry of a table constructor. For `name = exp` the key
/// is a `Name`; for `[exp] = exp` it is the bracketed expression.
#[derive(Clone, Debug, PartialEq)]
pub struct TableData {
    pub value: Expr,
    pub exp: Expr,
}

/// `table[field]`, or `table.field` when `table` is not a plain name.
#[derive(Clone, Debug, PartialEq)]
pub struct CallTable {
    pub table: Box<Expr>,
    pub field: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CallFunction {
    pub value: Box<Expr>,
    pub explist: Vec<Expr>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionBody {
    pub params: Vec<Name>,
    pub stmtlist: Vec<Stmt>,
}

/// A named function. Method names (`a:b`) are stored as `a.b`.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub value: Name,
    pub funcbody: FunctionBody,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DefFunction {
    pub function: Function,
    pub local: bool,
}

/// Targets and values are matched up by position, so `varlist` and
/// `explist` always have the same length.
#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub varlist: Vec<Expr>,
    pub explist: Vec<Expr>,
    pub local: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct While {
    pub cond: Expr,
    pub stmtlist: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Repeat {
    pub stmtlist: Vec<Stmt>,
    pub cond: Expr,
}

/// An `elseif` is stored as a nested `If`, alone in `elsepart`.
#[derive(Clone, Debug, PartialEq)]
pub struct If {
    pub cond: Expr,
    pub stmtlist: Vec<Stmt>,
    pub elsepart: Vec<Stmt>,
}

/// A numeric `for`. `assign` binds the loop variable to the start value.
#[derive(Clone, Debug, PartialEq)]
pub struct For {
    pub assign: Assignment,
    pub limit: Expr,
    pub step: Expr,
    pub stmtlist: Vec<Stmt>,
}

/// A generic `for ... in`.
#[derive(Clone, Debug, PartialEq)]
pub struct Forin {
    pub namelist: Vec<Name>,
    pub exprlist: Vec<Expr>,
    pub stmtlist: Vec<Stmt>,
}

impl Name {
    pub fn new(value: impl Into<String>) -> Self {
        Name {
            value: value.into(),
        }
    }

    /// Extends the path with one more `.segment`.
    pub(crate) fn with_segment(mut self, segment: &str) -> Self {
        self.value.push('.');
        self.value.push_str(segment);
        self
    }
}

impl Var {
    pub fn new(value: impl Into<String>) -> Self {
        Var {
            value: value.into(),
        }
    }
}

impl BinOp {
    /// The operator as written in source.
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Or => "or",
            BinOp::And => "and",
            BinOp::Less => "<",
            BinOp::Greater => ">",
            BinOp::LessEqual => "<=",
            BinOp::GreaterEqual => ">=",
            BinOp::NotEqual => "~=",
            BinOp::Equal => "==",
            BinOp::Concat => "..",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Pow => "^",
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Binop {
    pub fn new(left: Expr, operator: BinOp, right: Expr) -> Self {
        Binop {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }
}

impl From<Name> for Expr {
    fn from(name: Name) -> Self {
        Expr::Name(name)
    }
}

impl From<Binop> for Expr {
    fn from(binop: Binop) -> Self {
        Expr::Binop(binop)
    }
}

impl From<CallTable> for Expr {
    fn from(call: CallTable) -> Self {
        Expr::CallTable(call)
    }
}

impl From<CallFunction> for Expr {
    fn from(call: CallFunction) -> Self {
        Expr::CallFunction(call)
    }
}
