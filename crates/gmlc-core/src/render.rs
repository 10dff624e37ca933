//! Debug rendering of AST nodes as an indented tree.
//!
//! This is what the CLI prints after a successful parse. The format is
//! stable and deterministic: a `|---Kind` header per node, `+Field` lines
//! for children, `: -` for absent optional fields, and `(n)` counts on
//! list fields.

use crate::ast::{AstKind, Block, BlockStmt, Case, Node, VarDecl};

/// Render a node (and everything under it) to a string.
pub fn render(node: &Node) -> String {
    let mut tree = Tree::default();
    tree.node(node);
    tree.out
}

#[derive(Default)]
struct Tree {
    out: String,
    indent: usize,
}

impl Tree {
    fn head(&mut self, kind: AstKind) {
        if self.indent > 0 {
            self.out.push_str(&"|   ".repeat(self.indent - 1));
            self.out.push_str("|---");
        }
        self.out.push_str(&kind.to_string());
        self.out.push('\n');
    }

    fn field_line(&mut self, name: &str, suffix: &str) {
        self.out.push_str(&"|   ".repeat(self.indent));
        self.out.push('+');
        self.out.push_str(name);
        self.out.push_str(suffix);
        self.out.push('\n');
    }

    fn text(&mut self, name: &str, value: &str) {
        self.field_line(name, &format!(": {value}"));
    }

    fn opt_text(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(v) => self.text(name, v),
            None => self.field_line(name, ": -"),
        }
    }

    fn child(&mut self, name: &str, node: &Node) {
        self.field_line(name, "");
        self.indent += 1;
        self.node(node);
        self.indent -= 1;
    }

    fn opt_child(&mut self, name: &str, node: Option<&Node>) {
        match node {
            Some(n) => self.child(name, n),
            None => self.field_line(name, ": -"),
        }
    }

    fn list(&mut self, name: &str, nodes: &[Node]) {
        self.field_line(name, &format!("({})", nodes.len()));
        self.indent += 1;
        for n in nodes {
            self.node(n);
        }
        self.indent -= 1;
    }

    fn block(&mut self, name: &str, block: &Block) {
        self.list(name, &block.stmts);
    }

    fn var_decl(&mut self, v: &VarDecl) {
        self.head(AstKind::VarDecl);
        self.text("Keyword", &v.keyword.value);
        self.text("Name", &v.name.value);
        self.opt_child("Value", v.value.as_deref());
    }

    fn block_stmt(&mut self, kind: AstKind, b: &BlockStmt) {
        self.head(kind);
        self.child("Condition", &b.cond);
        self.child("Body", &b.body);
    }

    fn case(&mut self, c: &Case) {
        self.head(AstKind::Case);
        self.opt_child("Value", c.value.as_ref());
        self.list("Code", &c.body);
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::Script(s) => {
                self.head(AstKind::Script);
                self.list("Children", &s.children);
            }
            // Blocks render their statements directly; the brace pair
            // carries no information of its own.
            Node::Block(b) => {
                for stmt in &b.stmts {
                    self.node(stmt);
                }
            }
            Node::Ident(s)
            | Node::LitString(s)
            | Node::LitNumber(s)
            | Node::LitBool(s) => {
                self.head(node.kind());
                self.text("Value", &s.token.value);
            }
            Node::LitArray(a) => {
                self.head(AstKind::LitArray);
                self.list("Items", &a.items);
            }
            Node::LitStruct(s) => {
                self.head(AstKind::LitStruct);
                self.field_line("Fields", &format!("({})", s.fields.len()));
                self.indent += 1;
                for field in &s.fields {
                    self.head(AstKind::StructField);
                    self.text("Name", &field.name.value);
                    self.opt_child("Value", field.value.as_ref());
                }
                self.indent -= 1;
            }
            Node::Enum(e) => {
                self.head(AstKind::Enum);
                self.text("Name", &e.name.value);
                self.field_line("Members", &format!("({})", e.members.len()));
                self.indent += 1;
                for member in &e.members {
                    self.text("Name", &member.name.value);
                    self.opt_child("Value", member.value.as_ref());
                }
                self.indent -= 1;
            }
            Node::VarDecl(v) => self.var_decl(v),
            Node::Assign(b) | Node::Binop(b) => {
                self.head(node.kind());
                self.text("Operator", b.op.kind.name());
                self.child("Left", &b.left);
                self.child("Right", &b.right);
            }
            Node::UnopPrefix(u) | Node::UnopPostfix(u) => {
                self.head(node.kind());
                self.text("Operator", u.op.kind.name());
                self.child("Value", &u.value);
            }
            Node::Ternary(t) => {
                self.head(AstKind::Ternary);
                self.child("Cond", &t.cond);
                self.child("OnTrue", &t.on_true);
                self.child("OnFalse", &t.on_false);
            }
            Node::Call(c) => {
                self.head(AstKind::Call);
                self.child("Function", &c.func);
                self.list("Params", &c.args);
            }
            Node::Attr(a) => {
                self.head(AstKind::Attr);
                self.child("Value", &a.value);
                self.text("Name", &a.name.value);
            }
            Node::Access(a) => {
                self.head(AstKind::Access);
                self.text("Type", a.accessor.kind.name());
                self.child("Value", &a.value);
                self.child("Access", &a.index);
                self.opt_child("SecondAccess", a.second.as_deref());
            }
            Node::FuncDecl(f) => {
                self.head(AstKind::FuncDecl);
                self.opt_text("Name", f.name.as_ref().map(|t| t.value.as_str()));
                self.field_line("Args", &format!("({})", f.args.len()));
                self.indent += 1;
                for arg in &f.args {
                    self.head(AstKind::Arg);
                    self.text("Name", &arg.name.value);
                    self.opt_child("Default", arg.default.as_ref());
                }
                self.indent -= 1;
                self.text("IsConstructor", if f.is_constructor { "true" } else { "false" });
                match &f.parent {
                    Some(parent) => {
                        self.field_line("Parent", "");
                        self.indent += 1;
                        self.node(&Node::Call(parent.clone()));
                        self.indent -= 1;
                    }
                    None => self.field_line("Parent", ": -"),
                }
                self.block("Body", &f.body);
            }
            Node::If(i) => {
                self.head(AstKind::If);
                self.child("Condition", &i.head.cond);
                self.child("Body", &i.head.body);
                self.field_line("Elseifs", &format!("({})", i.elseifs.len()));
                self.indent += 1;
                for elif in &i.elseifs {
                    self.child("Condition", &elif.cond);
                    self.child("Body", &elif.body);
                }
                self.indent -= 1;
                self.opt_child("Else", i.else_body.as_deref());
            }
            Node::For(f) => {
                self.head(AstKind::For);
                self.field_line("Assign", "");
                self.indent += 1;
                self.var_decl(&f.init);
                self.indent -= 1;
                self.child("Cond", &f.cond);
                self.child("Oper", &f.step);
                self.child("Body", &f.body);
            }
            Node::While(b) => self.block_stmt(AstKind::While, b),
            Node::With(b) => self.block_stmt(AstKind::With, b),
            Node::Repeat(b) => self.block_stmt(AstKind::Repeat, b),
            Node::DoUntil(b) => self.block_stmt(AstKind::DoUntil, b),
            Node::Switch(s) => {
                self.head(AstKind::Switch);
                self.child("Value", &s.subject);
                self.field_line("Cases", &format!("({})", s.cases.len()));
                self.indent += 1;
                for case in &s.cases {
                    self.case(case);
                }
                self.indent -= 1;
            }
            Node::TryCatch(t) => {
                self.head(AstKind::TryCatch);
                self.block("TryBlock", &t.try_block);
                match &t.catch {
                    Some(catch) => {
                        self.text("CatchIdent", &catch.ident.value);
                        self.block("CatchBlock", &catch.block);
                    }
                    None => self.field_line("CatchBlock", ": -"),
                }
                match &t.finally {
                    Some(fin) => self.block("FinallyBlock", fin),
                    None => self.field_line("FinallyBlock", ": -"),
                }
            }
            Node::Return(k) | Node::New(k) | Node::Delete(k) | Node::Continue(k)
            | Node::Break(k) => {
                self.head(node.kind());
                self.opt_child("Value", k.value.as_deref());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;
    use crate::macros::{clean_tokens, MacroTable};
    use crate::parser::parse_script;

    fn render_source(src: &str) -> String {
        let tokens = clean_tokens(scan(src).unwrap(), &MacroTable::new());
        render(&parse_script(&tokens).unwrap())
    }

    #[test]
    fn renders_var_decl_with_binop() {
        let out = render_source("var x = 1 + 2;");
        assert_eq!(
            out,
            "Script\n\
             +Children(1)\n\
             |---VarDecl\n\
             |   +Keyword: var\n\
             |   +Name: x\n\
             |   +Value\n\
             |   |---Binop\n\
             |   |   +Operator: PLUS\n\
             |   |   +Left\n\
             |   |   |---LitNumber\n\
             |   |   |   +Value: 1\n\
             |   |   +Right\n\
             |   |   |---LitNumber\n\
             |   |   |   +Value: 2\n"
        );
    }

    #[test]
    fn absent_optionals_render_as_dash() {
        let out = render_source("return;");
        assert!(out.contains("|---Return\n|   +Value: -\n"), "{out}");
    }

    #[test]
    fn rendering_is_deterministic() {
        let src = "switch (x) { case 1: a(); break; default: b(); }";
        assert_eq!(render_source(src), render_source(src));
    }
}
