//! Statement nodes.

use super::{ExprId, StmtId};
use crate::{Name, Span};

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    /// `WRITE a, b` / `? a, b`
    Write(Vec<ExprId>),
    /// `target = value`; the target shape is checked at run time.
    Assign { target: ExprId, value: ExprId },
    /// `LOCAL x`
    LocalDecl(Name),
    /// `LOCAL x = value`
    LocalAssign { name: Name, value: ExprId },
    If {
        cond: ExprId,
        then_branch: Vec<StmtId>,
        else_branch: Vec<StmtId>,
    },
    For {
        var: Name,
        start: ExprId,
        end: ExprId,
        step: Option<ExprId>,
        body: Vec<StmtId>,
    },
    DoWhile { cond: ExprId, body: Vec<StmtId> },
    Break,
    Return(Option<ExprId>),
    With { target: ExprId, body: Vec<StmtId> },
    /// Assignment to a path relative to the innermost `WITH` receiver.
    WithAssign { path: Vec<Name>, value: ExprId },
    /// `PARAMETER a, b`
    Parameter(Vec<Name>),
    Expr(ExprId),
    /// `DELETE name`
    Delete(Name),
    /// `CREATE FILE [path]`
    CreateFile(Option<ExprId>),
    ClassDecl(ClassDecl),
    MethodDecl(MethodDecl),
    PropertyDecl { name: Name, default: Option<ExprId> },
    /// `CALL target(args)`
    Call(ExprId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassDecl {
    pub name: Name,
    pub parent: Option<Name>,
    /// Methods, properties and init statements in source order.
    pub members: Vec<StmtId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MethodDecl {
    pub name: Name,
    pub params: Vec<Name>,
    pub body: Vec<StmtId>,
}
