//! Double dispatch over the tree.
//!
//! A node's `accept` matches on its own variant and calls the matching
//! `visit_*` method. Every `visit_*` method has a default that forwards to
//! [`Visitor::visit_node`], so a visitor only has to handle the variants it
//! cares about.

use std::fmt::{self, Display, Formatter};

use super::{
    Assignment, Binop, CallFunction, CallTable, DefFunction, Expr, For, Forin, Function,
    FunctionBody, If, Name, Program, Repeat, Stmt, TableData, Var, While,
};

/// The variant of a node, without its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Number,
    Nil,
    Boolean,
    String,
    Name,
    Var,
    Not,
    Neg,
    Binop,
    Table,
    TableData,
    CallTable,
    CallFunction,
    FunctionBody,
    Function,
    DefFunction,
    Do,
    Assignment,
    While,
    Repeat,
    Return,
    Break,
    If,
    For,
    Forin,
}

/// The position a node holds in its parent. Passed along with every visit so
/// that visitors can label the edge they came in on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    None,
    /// The condition of an `if`, `while` or `repeat`.
    Cond,
    /// The function being called.
    Call,
    /// An argument of a call.
    Arg,
    /// The name of a defined function.
    Func,
    /// A function parameter.
    Param,
    /// The table being indexed.
    Table,
    /// The key used to index a table.
    Field,
}

pub trait Node {
    fn kind(&self) -> NodeKind;

    /// Calls the `visitor` method for this node's variant.
    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V, role: Role) -> V::Output;
}

pub trait Visitor {
    type Output;

    /// Handles any variant that has no more specific method.
    fn visit_node(&mut self, kind: NodeKind, role: Role) -> Self::Output;

    fn visit_program(&mut self, _program: &Program, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Program, role)
    }

    fn visit_number(&mut self, _value: f64, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Number, role)
    }

    fn visit_nil(&mut self, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Nil, role)
    }

    fn visit_boolean(&mut self, _value: bool, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Boolean, role)
    }

    fn visit_string(&mut self, _value: &str, role: Role) -> Self::Output {
        self.visit_node(NodeKind::String, role)
    }

    fn visit_name(&mut self, _name: &Name, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Name, role)
    }

    fn visit_var(&mut self, _var: &Var, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Var, role)
    }

    fn visit_not(&mut self, _value: &Expr, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Not, role)
    }

    fn visit_neg(&mut self, _value: &Expr, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Neg, role)
    }

    fn visit_binop(&mut self, _binop: &Binop, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Binop, role)
    }

    fn visit_table(&mut self, _data: &[TableData], role: Role) -> Self::Output {
        self.visit_node(NodeKind::Table, role)
    }

    fn visit_table_data(&mut self, _data: &TableData, role: Role) -> Self::Output {
        self.visit_node(NodeKind::TableData, role)
    }

    fn visit_call_table(&mut self, _call: &CallTable, role: Role) -> Self::Output {
        self.visit_node(NodeKind::CallTable, role)
    }

    fn visit_call_function(&mut self, _call: &CallFunction, role: Role) -> Self::Output {
        self.visit_node(NodeKind::CallFunction, role)
    }

    fn visit_function_body(&mut self, _body: &FunctionBody, role: Role) -> Self::Output {
        self.visit_node(NodeKind::FunctionBody, role)
    }

    fn visit_function(&mut self, _function: &Function, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Function, role)
    }

    fn visit_def_function(&mut self, _def: &DefFunction, role: Role) -> Self::Output {
        self.visit_node(NodeKind::DefFunction, role)
    }

    fn visit_do(&mut self, _stmtlist: &[Stmt], role: Role) -> Self::Output {
        self.visit_node(NodeKind::Do, role)
    }

    fn visit_assignment(&mut self, _assign: &Assignment, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Assignment, role)
    }

    fn visit_while(&mut self, _node: &While, role: Role) -> Self::Output {
        self.visit_node(NodeKind::While, role)
    }

    fn visit_repeat(&mut self, _node: &Repeat, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Repeat, role)
    }

    fn visit_return(&mut self, _exprlist: &[Expr], role: Role) -> Self::Output {
        self.visit_node(NodeKind::Return, role)
    }

    fn visit_break(&mut self, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Break, role)
    }

    fn visit_if(&mut self, _node: &If, role: Role) -> Self::Output {
        self.visit_node(NodeKind::If, role)
    }

    fn visit_for(&mut self, _node: &For, role: Role) -> Self::Output {
        self.visit_node(NodeKind::For, role)
    }

    fn visit_forin(&mut self, _node: &Forin, role: Role) -> Self::Output {
        self.visit_node(NodeKind::Forin, role)
    }
}

impl Node for Program {
    fn kind(&self) -> NodeKind {
        NodeKind::Program
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V, role: Role) -> V::Output {
        visitor.visit_program(self, role)
    }
}

impl Node for Stmt {
    fn kind(&self) -> NodeKind {
        match self {
            Stmt::Assignment(_) => NodeKind::Assignment,
            Stmt::CallFunction(_) => NodeKind::CallFunction,
            Stmt::Do(_) => NodeKind::Do,
            Stmt::While(_) => NodeKind::While,
            Stmt::Repeat(_) => NodeKind::Repeat,
            Stmt::If(_) => NodeKind::If,
            Stmt::For(_) => NodeKind::For,
            Stmt::Forin(_) => NodeKind::Forin,
            Stmt::DefFunction(_) => NodeKind::DefFunction,
            Stmt::Return(_) => NodeKind::Return,
            Stmt::Break => NodeKind::Break,
        }
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V, role: Role) -> V::Output {
        match self {
            Stmt::Assignment(assign) => visitor.visit_assignment(assign, role),
            Stmt::CallFunction(call) => visitor.visit_call_function(call, role),
            Stmt::Do(stmtlist) => visitor.visit_do(stmtlist, role),
            Stmt::While(node) => visitor.visit_while(node, role),
            Stmt::Repeat(node) => visitor.visit_repeat(node, role),
            Stmt::If(node) => visitor.visit_if(node, role),
            Stmt::For(node) => visitor.visit_for(node, role),
            Stmt::Forin(node) => visitor.visit_forin(node, role),
            Stmt::DefFunction(def) => visitor.visit_def_function(def, role),
            Stmt::Return(exprlist) => visitor.visit_return(exprlist, role),
            Stmt::Break => visitor.visit_break(role),
        }
    }
}

impl Node for Expr {
    fn kind(&self) -> NodeKind {
        match self {
            Expr::Nil => NodeKind::Nil,
            Expr::Boolean(_) => NodeKind::Boolean,
            Expr::Number(_) => NodeKind::Number,
            Expr::String(_) => NodeKind::String,
            Expr::Name(_) => NodeKind::Name,
            Expr::Var(_) => NodeKind::Var,
            Expr::Not(_) => NodeKind::Not,
            Expr::Neg(_) => NodeKind::Neg,
            Expr::Binop(_) => NodeKind::Binop,
            Expr::Table(_) => NodeKind::Table,
            Expr::CallTable(_) => NodeKind::CallTable,
            Expr::CallFunction(_) => NodeKind::CallFunction,
            Expr::Function(_) => NodeKind::FunctionBody,
        }
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V, role: Role) -> V::Output {
        match self {
            Expr::Nil => visitor.visit_nil(role),
            Expr::Boolean(value) => visitor.visit_boolean(*value, role),
            Expr::Number(value) => visitor.visit_number(*value, role),
            Expr::String(value) => visitor.visit_string(value, role),
            Expr::Name(name) => visitor.visit_name(name, role),
            Expr::Var(var) => visitor.visit_var(var, role),
            Expr::Not(value) => visitor.visit_not(value, role),
            Expr::Neg(value) => visitor.visit_neg(value, role),
            Expr::Binop(binop) => visitor.visit_binop(binop, role),
            Expr::Table(data) => visitor.visit_table(data, role),
            Expr::CallTable(call) => visitor.visit_call_table(call, role),
            Expr::CallFunction(call) => visitor.visit_call_function(call, role),
            Expr::Function(body) => visitor.visit_function_body(body, role),
        }
    }
}

impl Node for Name {
    fn kind(&self) -> NodeKind {
        NodeKind::Name
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V, role: Role) -> V::Output {
        visitor.visit_name(self, role)
    }
}

impl Node for TableData {
    fn kind(&self) -> NodeKind {
        NodeKind::TableData
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V, role: Role) -> V::Output {
        visitor.visit_table_data(self, role)
    }
}

impl Node for FunctionBody {
    fn kind(&self) -> NodeKind {
        NodeKind::FunctionBody
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V, role: Role) -> V::Output {
        visitor.visit_function_body(self, role)
    }
}

impl Node for Function {
    fn kind(&self) -> NodeKind {
        NodeKind::Function
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V, role: Role) -> V::Output {
        visitor.visit_function(self, role)
    }
}

impl Node for Assignment {
    fn kind(&self) -> NodeKind {
        NodeKind::Assignment
    }

    fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V, role: Role) -> V::Output {
        visitor.visit_assignment(self, role)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Role::None => "",
            Role::Cond => "cond",
            Role::Call => "call",
            Role::Arg => "arg",
            Role::Func => "func",
            Role::Param => "args",
            Role::Table => "table",
            Role::Field => "field",
        };
        f.write_str(s)
    }
}
