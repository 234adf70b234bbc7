//! Graphviz output for syntax trees.

use crate::ast::{
    Assignment, Binop, CallFunction, CallTable, DefFunction, Expr, For, Forin, Function,
    FunctionBody, If, Name, Node, NodeKind, Program, Repeat, Role, Stmt, TableData, Var, Visitor,
    While,
};

/// Builds a `digraph AST` with one box per node, numbered `n01`, `n02`, ...
/// in the order they are visited.
#[derive(Debug, Default)]
pub struct DotRender {
    body: String,
    id: u32,
}

impl DotRender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders a whole program as DOT text.
    #[tracing::instrument(skip_all, fields(statements = program.stmtlist.len()))]
    pub fn render(program: &Program) -> String {
        let mut renderer = Self::new();
        program.accept(&mut renderer, Role::None);
        tracing::debug!(nodes = renderer.id, "rendered tree");
        renderer.finish()
    }

    /// Wraps the nodes and edges emitted so far in a graph.
    pub fn finish(self) -> String {
        let mut out = String::from("digraph AST {\n");
        out.push_str("\tnode [shape=box style=filled color=lightblue2]\n");
        out.push_str(&self.body);
        out.push_str("}\n");
        out
    }

    fn node(&mut self, label: &str, color: &str) -> String {
        self.id += 1;
        let name = format!("n{:02}", self.id);
        self.body.push_str(&format!(
            "\t{} [label=\"{}\" color={}]\n",
            name,
            escape(label),
            color
        ));
        name
    }

    fn edge(&mut self, from: &str, to: &str) {
        self.body.push_str(&format!("\t{} -> {}\n", from, to));
    }

    fn child<N: Node + ?Sized>(&mut self, parent: &str, child: &N, role: Role) {
        let to = child.accept(self, role);
        self.edge(parent, &to);
    }

    fn children<N: Node>(&mut self, parent: &str, children: &[N], role: Role) {
        for child in children {
            self.child(parent, child, role);
        }
    }
}

/// The edge role in front of a label, on its own line.
fn prefix(role: Role) -> String {
    match role {
        Role::None => String::new(),
        Role::Cond => "cond:\n".to_string(),
        role => format!("{}\n", role),
    }
}

fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

impl Visitor for DotRender {
    type Output = String;

    fn visit_node(&mut self, kind: NodeKind, role: Role) -> String {
        let label = format!("{}{:?}", prefix(role), kind);
        self.node(&label, "orange")
    }

    fn visit_program(&mut self, program: &Program, _role: Role) -> String {
        let name = self.node("Program", "green");
        self.children(&name, &program.stmtlist, Role::None);
        name
    }

    fn visit_number(&mut self, value: f64, role: Role) -> String {
        let label = format!("{}constant\nvalue: {}", prefix(role), value);
        self.node(&label, "orange")
    }

    fn visit_nil(&mut self, role: Role) -> String {
        let label = format!("{}Nil", prefix(role));
        self.node(&label, "orange")
    }

    fn visit_boolean(&mut self, value: bool, role: Role) -> String {
        let label = format!("{}{}", prefix(role), value);
        self.node(&label, "orange")
    }

    fn visit_string(&mut self, value: &str, role: Role) -> String {
        let label = format!("{}string: {}", prefix(role), value);
        self.node(&label, "yellow")
    }

    fn visit_name(&mut self, name: &Name, role: Role) -> String {
        let label = format!("{}name: {}", prefix(role), name.value);
        self.node(&label, "cyan3")
    }

    fn visit_var(&mut self, var: &Var, role: Role) -> String {
        let label = format!("{}variable\nname: {}", prefix(role), var.value);
        self.node(&label, "darkolivegreen3")
    }

    fn visit_not(&mut self, value: &Expr, role: Role) -> String {
        let name = self.node(&format!("{}Not", prefix(role)), "coral");
        self.child(&name, value, Role::None);
        name
    }

    fn visit_neg(&mut self, value: &Expr, role: Role) -> String {
        let name = self.node(&format!("{}Neg", prefix(role)), "coral");
        self.child(&name, value, Role::None);
        name
    }

    fn visit_binop(&mut self, binop: &Binop, role: Role) -> String {
        let label = format!("{}binop\nop: {}", prefix(role), binop.operator);
        let name = self.node(&label, "lightblue");
        self.child(&name, binop.left.as_ref(), Role::None);
        self.child(&name, binop.right.as_ref(), Role::None);
        name
    }

    fn visit_table(&mut self, data: &[TableData], role: Role) -> String {
        let name = self.node(&format!("{}Table", prefix(role)), "lightblue");
        self.children(&name, data, Role::None);
        name
    }

    fn visit_table_data(&mut self, data: &TableData, _role: Role) -> String {
        let name = self.node("Data", "orange");
        self.child(&name, &data.value, Role::None);
        self.child(&name, &data.exp, Role::None);
        name
    }

    fn visit_call_table(&mut self, call: &CallTable, role: Role) -> String {
        let name = self.node(&format!("{}CallTable", prefix(role)), "limegreen");
        self.child(&name, call.field.as_ref(), Role::Field);
        self.child(&name, call.table.as_ref(), Role::Table);
        name
    }

    fn visit_call_function(&mut self, call: &CallFunction, role: Role) -> String {
        let name = self.node(&format!("{}CallFunction", prefix(role)), "limegreen");
        self.child(&name, call.value.as_ref(), Role::Call);
        self.children(&name, &call.explist, Role::Arg);
        name
    }

    fn visit_function_body(&mut self, body: &FunctionBody, role: Role) -> String {
        let name = self.node(&format!("{}Function\nbody:", prefix(role)), "orange");
        self.children(&name, &body.params, Role::Param);
        self.children(&name, &body.stmtlist, Role::None);
        name
    }

    fn visit_function(&mut self, function: &Function, _role: Role) -> String {
        let name = self.node("Function", "lightblue");
        self.child(&name, &function.value, Role::Func);
        self.child(&name, &function.funcbody, Role::None);
        name
    }

    fn visit_def_function(&mut self, def: &DefFunction, _role: Role) -> String {
        let label = if def.local {
            "DefLocalFunction"
        } else {
            "DefFunction"
        };
        let name = self.node(label, "limegreen");
        self.child(&name, &def.function, Role::None);
        name
    }

    fn visit_do(&mut self, stmtlist: &[Stmt], _role: Role) -> String {
        let name = self.node("Do", "lightblue");
        self.children(&name, stmtlist, Role::None);
        name
    }

    fn visit_assignment(&mut self, assign: &Assignment, _role: Role) -> String {
        let label = if assign.local {
            "Local assign"
        } else {
            "assign"
        };
        let name = self.node(label, "lightblue");
        // Each target is followed by the value it receives.
        for (var, exp) in assign.varlist.iter().zip(&assign.explist) {
            self.child(&name, var, Role::None);
            self.child(&name, exp, Role::None);
        }
        name
    }

    fn visit_while(&mut self, node: &While, _role: Role) -> String {
        let name = self.node("While", "lightblue");
        self.child(&name, &node.cond, Role::Cond);
        self.children(&name, &node.stmtlist, Role::None);
        name
    }

    fn visit_repeat(&mut self, node: &Repeat, _role: Role) -> String {
        let name = self.node("Repeat", "lightblue");
        self.children(&name, &node.stmtlist, Role::None);
        self.child(&name, &node.cond, Role::Cond);
        name
    }

    fn visit_return(&mut self, exprlist: &[Expr], _role: Role) -> String {
        let name = self.node("Return", "pink");
        self.children(&name, exprlist, Role::None);
        name
    }

    fn visit_break(&mut self, _role: Role) -> String {
        self.node("Break", "pink")
    }

    fn visit_if(&mut self, node: &If, _role: Role) -> String {
        let name = self.node("If\nthen, cond, else:", "lightblue");
        self.children(&name, &node.stmtlist, Role::None);
        self.child(&name, &node.cond, Role::Cond);
        self.children(&name, &node.elsepart, Role::None);
        name
    }

    fn visit_for(&mut self, node: &For, _role: Role) -> String {
        let name = self.node("For", "lightblue");
        self.child(&name, &node.limit, Role::None);
        self.child(&name, &node.step, Role::None);
        self.child(&name, &node.assign, Role::None);
        self.children(&name, &node.stmtlist, Role::None);
        name
    }

    fn visit_forin(&mut self, node: &Forin, _role: Role) -> String {
        let name = self.node("Forin", "lightblue");
        self.children(&name, &node.namelist, Role::None);
        self.children(&name, &node.exprlist, Role::None);
        self.children(&name, &node.stmtlist, Role::None);
        name
    }
}
