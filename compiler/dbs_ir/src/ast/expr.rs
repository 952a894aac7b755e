//! Expression nodes.

use std::fmt;

use super::ExprId;
use crate::{Name, Span};

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    /// `a OR b OR ...`, two or more operands.
    LogicalOr(Vec<ExprId>),
    /// `a AND b AND ...`, two or more operands.
    LogicalAnd(Vec<ExprId>),
    LogicalNot(ExprId),
    /// A single comparison; comparisons do not chain.
    Comparison {
        left: ExprId,
        op: CompareOp,
        right: ExprId,
    },
    /// Left fold of `first (op operand)*`.
    Additive {
        first: ExprId,
        rest: Vec<(AddOp, ExprId)>,
    },
    Multiplicative {
        first: ExprId,
        rest: Vec<(MulOp, ExprId)>,
    },
    Negate(ExprId),
    /// Member accesses and calls applied left to right to `base`.
    Postfix { base: ExprId, ops: Vec<PostfixOp> },
    New { class: Name, args: Vec<ExprId> },
    /// `a ; b ; c` on the right of an event assignment.
    HandlerList(Vec<ExprId>),
    Literal(Literal),
    Ident(Name),
    This,
    Super,
    Paren(ExprId),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PostfixOp {
    /// `.name` or `::name`.
    Member { name: Name, span: Span },
    Call { args: Vec<ExprId>, span: Span },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CompareOp {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum AddOp {
    Add,
    Sub,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum MulOp {
    Mul,
    Div,
}

impl CompareOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::NotEq => "!=",
            CompareOp::Lt => "<",
            CompareOp::LtEq => "<=",
            CompareOp::Gt => ">",
            CompareOp::GtEq => ">=",
        }
    }
}

impl AddOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AddOp::Add => "+",
            AddOp::Sub => "-",
        }
    }
}

impl MulOp {
    pub fn as_str(self) -> &'static str {
        match self {
            MulOp::Mul => "*",
            MulOp::Div => "/",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
