//! Indented text rendering of a syntax tree, used by `dbs parse`.

use std::fmt::Write;

use super::{ExprId, ExprKind, Literal, PostfixOp, StmtId, StmtKind, SyntaxTree};
use crate::StringInterner;

impl SyntaxTree {
    /// Render every top-level item, one node per line.
    pub fn dump(&self, interner: &StringInterner) -> String {
        let mut printer = Printer {
            tree: self,
            interner,
            out: String::new(),
        };
        for &item in self.items() {
            printer.stmt(item, 0);
        }
        printer.out
    }
}

struct Printer<'a> {
    tree: &'a SyntaxTree,
    interner: &'a StringInterner,
    out: String,
}

impl Printer<'_> {
    fn line(&mut self, depth: usize, text: &str) {
        let _ = writeln!(self.out, "{:width$}{text}", "", width = depth * 2);
    }

    fn block(&mut self, label: &str, body: &[StmtId], depth: usize) {
        self.line(depth, label);
        for &id in body {
            self.stmt(id, depth + 1);
        }
    }

    fn stmt(&mut self, id: StmtId, depth: usize) {
        let tree = self.tree;
        let interner = self.interner;
        let name = |n| interner.lookup(n);
        match &tree.stmt(id).kind {
            StmtKind::Write(args) => {
                let args: Vec<_> = args.iter().map(|&a| self.expr(a)).collect();
                self.line(depth, &format!("Write {}", args.join(", ")));
            }
            StmtKind::Assign { target, value } => {
                let text = format!("Assign {} = {}", self.expr(*target), self.expr(*value));
                self.line(depth, &text);
            }
            StmtKind::LocalDecl(n) => self.line(depth, &format!("Local {}", name(*n))),
            StmtKind::LocalAssign { name: n, value } => {
                let text = format!("Local {} = {}", name(*n), self.expr(*value));
                self.line(depth, &text);
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let label = format!("If {}", self.expr(*cond));
                self.block(&label, then_branch, depth);
                if !else_branch.is_empty() {
                    self.block("Else", else_branch, depth);
                }
            }
            StmtKind::For {
                var,
                start,
                end,
                step,
                body,
            } => {
                let mut label = format!(
                    "For {} = {} To {}",
                    name(*var),
                    self.expr(*start),
                    self.expr(*end)
                );
                if let Some(step) = step {
                    let _ = write!(label, " Step {}", self.expr(*step));
                }
                self.block(&label, body, depth);
            }
            StmtKind::DoWhile { cond, body } => {
                let label = format!("DoWhile {}", self.expr(*cond));
                self.block(&label, body, depth);
            }
            StmtKind::Break => self.line(depth, "Break"),
            StmtKind::Return(value) => match value {
                Some(v) => {
                    let text = format!("Return {}", self.expr(*v));
                    self.line(depth, &text);
                }
                None => self.line(depth, "Return"),
            },
            StmtKind::With { target, body } => {
                let label = format!("With {}", self.expr(*target));
                self.block(&label, body, depth);
            }
            StmtKind::WithAssign { path, value } => {
                let path: Vec<_> = path.iter().map(|&n| name(n)).collect();
                let text = format!("WithAssign .{} = {}", path.join("."), self.expr(*value));
                self.line(depth, &text);
            }
            StmtKind::Parameter(names) => {
                let names: Vec<_> = names.iter().map(|&n| name(n)).collect();
                self.line(depth, &format!("Parameter {}", names.join(", ")));
            }
            StmtKind::Expr(e) => {
                let text = format!("Expr {}", self.expr(*e));
                self.line(depth, &text);
            }
            StmtKind::Delete(n) => self.line(depth, &format!("Delete {}", name(*n))),
            StmtKind::CreateFile(path) => match path {
                Some(p) => {
                    let text = format!("CreateFile {}", self.expr(*p));
                    self.line(depth, &text);
                }
                None => self.line(depth, "CreateFile"),
            },
            StmtKind::ClassDecl(class) => {
                let label = match class.parent {
                    Some(parent) => format!("Class {} Of {}", name(class.name), name(parent)),
                    None => format!("Class {}", name(class.name)),
                };
                self.block(&label, &class.members, depth);
            }
            StmtKind::MethodDecl(method) => {
                let params: Vec<_> = method.params.iter().map(|&n| name(n)).collect();
                let label = format!("Method {}({})", name(method.name), params.join(", "));
                self.block(&label, &method.body, depth);
            }
            StmtKind::PropertyDecl { name: n, default } => match default {
                Some(d) => {
                    let text = format!("Property {} = {}", name(*n), self.expr(*d));
                    self.line(depth, &text);
                }
                None => self.line(depth, &format!("Property {}", name(*n))),
            },
            StmtKind::Call(e) => {
                let text = format!("Call {}", self.expr(*e));
                self.line(depth, &text);
            }
        }
    }

    fn list(&self, ids: &[ExprId], sep: &str) -> String {
        ids.iter()
            .map(|&id| self.expr(id))
            .collect::<Vec<_>>()
            .join(sep)
    }

    fn expr(&self, id: ExprId) -> String {
        let name = |n| self.interner.lookup(n);
        match &self.tree.expr(id).kind {
            ExprKind::LogicalOr(ops) => format!("({})", self.list(ops, " OR ")),
            ExprKind::LogicalAnd(ops) => format!("({})", self.list(ops, " AND ")),
            ExprKind::LogicalNot(e) => format!("(NOT {})", self.expr(*e)),
            ExprKind::Comparison { left, op, right } => {
                format!("({} {op} {})", self.expr(*left), self.expr(*right))
            }
            ExprKind::Additive { first, rest } => {
                let mut s = format!("({}", self.expr(*first));
                for (op, e) in rest {
                    let _ = write!(s, " {} {}", op.as_str(), self.expr(*e));
                }
                s.push(')');
                s
            }
            ExprKind::Multiplicative { first, rest } => {
                let mut s = format!("({}", self.expr(*first));
                for (op, e) in rest {
                    let _ = write!(s, " {} {}", op.as_str(), self.expr(*e));
                }
                s.push(')');
                s
            }
            ExprKind::Negate(e) => format!("(-{})", self.expr(*e)),
            ExprKind::Postfix { base, ops } => {
                let mut s = self.expr(*base);
                for op in ops {
                    match op {
                        PostfixOp::Member { name: n, .. } => {
                            let _ = write!(s, ".{}", name(*n));
                        }
                        PostfixOp::Call { args, .. } => {
                            let _ = write!(s, "({})", self.list(args, ", "));
                        }
                    }
                }
                s
            }
            ExprKind::New { class, args } => {
                format!("NEW {}({})", name(*class), self.list(args, ", "))
            }
            ExprKind::HandlerList(items) => format!("[{}]", self.list(items, "; ")),
            ExprKind::Literal(lit) => match lit {
                Literal::Number(n) => format!("{n}"),
                Literal::Text(t) => format!("{t:?}"),
                Literal::Bool(true) => ".T.".to_string(),
                Literal::Bool(false) => ".F.".to_string(),
                Literal::Null => "NULL".to_string(),
            },
            ExprKind::Ident(n) => name(*n).to_string(),
            ExprKind::This => "THIS".to_string(),
            ExprKind::Super => "SUPER".to_string(),
            ExprKind::Paren(e) => self.expr(*e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ExprKind, Literal, StmtKind, SyntaxTree};
    use crate::{Span, StringInterner};

    #[test]
    fn dump_renders_nested_blocks() {
        let interner = StringInterner::new();
        let mut tree = SyntaxTree::new();
        let x = interner.intern("x");
        let one = tree.alloc_expr(ExprKind::Literal(Literal::Number(1.0)), Span::DUMMY);
        let ident = tree.alloc_expr(ExprKind::Ident(x), Span::DUMMY);
        let write = tree.alloc_stmt(StmtKind::Write(vec![ident]), Span::DUMMY);
        let three = tree.alloc_expr(ExprKind::Literal(Literal::Number(3.0)), Span::DUMMY);
        let for_loop = tree.alloc_stmt(
            StmtKind::For {
                var: x,
                start: one,
                end: three,
                step: None,
                body: vec![write],
            },
            Span::DUMMY,
        );
        tree.push_item(for_loop);

        assert_eq!(tree.dump(&interner), "For X = 1 To 3\n  Write X\n");
    }
}
