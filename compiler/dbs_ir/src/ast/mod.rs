//! Syntax tree for dbscript programs.
//!
//! Nodes live in a flat arena ([`SyntaxTree`]) and refer to each other by
//! [`StmtId`] / [`ExprId`]. Every node carries a [`Span`] into the
//! preprocessed source. The evaluator only relies on the node kinds and
//! their typed children, never on concrete syntax.

mod dump;
mod expr;
mod stmt;

pub use expr::{AddOp, CompareOp, Expr, ExprKind, Literal, MulOp, PostfixOp};
pub use stmt::{ClassDecl, MethodDecl, Stmt, StmtKind};

use crate::Span;

/// Index of a statement in its [`SyntaxTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct StmtId(u32);

/// Index of an expression in its [`SyntaxTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ExprId(u32);

/// Arena holding every node of one program.
#[derive(Debug, Default)]
pub struct SyntaxTree {
    stmts: Vec<Stmt>,
    exprs: Vec<Expr>,
    items: Vec<StmtId>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId(u32::try_from(self.stmts.len()).unwrap_or(u32::MAX));
        self.stmts.push(Stmt { kind, span });
        id
    }

    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(u32::try_from(self.exprs.len()).unwrap_or(u32::MAX));
        self.exprs.push(Expr { kind, span });
        id
    }

    /// Append a top-level item (statement or class declaration).
    pub fn push_item(&mut self, id: StmtId) {
        self.items.push(id);
    }

    /// Top-level items in source order.
    pub fn items(&self) -> &[StmtId] {
        &self.items
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.0 as usize]
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.0 as usize]
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_returns_sequential_ids() {
        let mut tree = SyntaxTree::new();
        let one = tree.alloc_expr(ExprKind::Literal(Literal::Number(1.0)), Span::new(0, 1));
        let two = tree.alloc_expr(ExprKind::Literal(Literal::Number(2.0)), Span::new(2, 3));
        assert_ne!(one, two);
        assert_eq!(tree.expr(two).span, Span::new(2, 3));

        let stmt = tree.alloc_stmt(StmtKind::Write(vec![one, two]), Span::new(0, 3));
        tree.push_item(stmt);
        assert_eq!(tree.items(), &[stmt]);
        assert_eq!(tree.stmt_count(), 1);
        assert_eq!(tree.expr_count(), 2);
    }
}
