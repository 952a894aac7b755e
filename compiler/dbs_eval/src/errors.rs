//! Runtime errors and their constructors.
//!
//! Every evaluation failure is an [`EvalError`] carrying the span of the
//! node that failed. Constructors live here so messages stay in one place.

use dbs_diagnostic::{Diagnostic, ErrorCode};
use dbs_ir::Span;
use thiserror::Error;

use crate::backend::BackendError;

/// Result of evaluating an expression or statement.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EvalErrorKind {
    UndefinedName,
    UnknownClass,
    MemberNotFound,
    MethodNotFound,
    InvalidSuperCall,
    InvalidLValue,
    BreakOutsideLoop,
    ReturnOutsideMethod,
    TypeMismatch,
    DivisionByZero,
    NotCallable,
    ZeroStep,
    LoopLimit,
    DelegateTargetDropped,
    Backend,
    RecursiveDefault,
}

impl EvalErrorKind {
    pub fn error_code(self) -> ErrorCode {
        match self {
            EvalErrorKind::UndefinedName => ErrorCode::E3001,
            EvalErrorKind::UnknownClass => ErrorCode::E3002,
            EvalErrorKind::MemberNotFound => ErrorCode::E3003,
            EvalErrorKind::MethodNotFound => ErrorCode::E3004,
            EvalErrorKind::InvalidSuperCall => ErrorCode::E3005,
            EvalErrorKind::InvalidLValue => ErrorCode::E3006,
            EvalErrorKind::BreakOutsideLoop => ErrorCode::E3007,
            EvalErrorKind::ReturnOutsideMethod => ErrorCode::E3008,
            EvalErrorKind::TypeMismatch => ErrorCode::E3010,
            EvalErrorKind::DivisionByZero => ErrorCode::E3011,
            EvalErrorKind::NotCallable => ErrorCode::E3012,
            EvalErrorKind::ZeroStep => ErrorCode::E3013,
            EvalErrorKind::LoopLimit => ErrorCode::E3014,
            EvalErrorKind::DelegateTargetDropped => ErrorCode::E3015,
            EvalErrorKind::Backend => ErrorCode::E3016,
            EvalErrorKind::RecursiveDefault => ErrorCode::E3017,
        }
    }
}

/// A runtime failure.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub message: String,
    pub span: Span,
    pub notes: Vec<String>,
}

impl EvalError {
    #[cold]
    pub fn new(kind: EvalErrorKind, message: impl Into<String>, span: Span) -> Self {
        EvalError {
            kind,
            message: message.into(),
            span,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn error_code(&self) -> ErrorCode {
        self.kind.error_code()
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.error_code())
            .with_message(self.message.clone())
            .with_label(self.span, "here");
        for note in &self.notes {
            diag = diag.with_note(note.clone());
        }
        diag
    }
}

// Name resolution

#[cold]
pub fn undefined_name(name: &str, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::UndefinedName,
        format!("undefined name `{name}`"),
        span,
    )
}

#[cold]
pub fn unknown_class(name: &str, known: &[&str], span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::UnknownClass,
        format!("unknown class `{name}`"),
        span,
    )
    .with_note(format!("known classes: {}", known.join(", ")))
}

// Members and methods

#[cold]
pub fn member_not_found(member: &str, owner: &str, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::MemberNotFound,
        format!("`{owner}` has no member `{member}`"),
        span,
    )
}

#[cold]
pub fn method_not_found(method: &str, class: &str, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::MethodNotFound,
        format!("class `{class}` has no method `{method}`"),
        span,
    )
}

#[cold]
pub fn invalid_super_call(reason: &str, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::InvalidSuperCall,
        format!("invalid SUPER call: {reason}"),
        span,
    )
}

#[cold]
pub fn not_callable(type_name: &str, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::NotCallable,
        format!("a {type_name} value cannot be called"),
        span,
    )
}

#[cold]
pub fn delegate_target_dropped(method: &str, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::DelegateTargetDropped,
        format!("the object behind delegate `{method}` no longer exists"),
        span,
    )
}

// Statements

#[cold]
pub fn invalid_lvalue(span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::InvalidLValue,
        "cannot assign to this expression",
        span,
    )
}

#[cold]
pub fn break_outside_loop(span: Span) -> EvalError {
    EvalError::new(EvalErrorKind::BreakOutsideLoop, "BREAK outside a loop", span)
}

#[cold]
pub fn return_outside_method(span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::ReturnOutsideMethod,
        "RETURN outside a method",
        span,
    )
}

#[cold]
pub fn zero_step(span: Span) -> EvalError {
    EvalError::new(EvalErrorKind::ZeroStep, "FOR loop with STEP 0", span)
}

#[cold]
pub fn loop_limit(limit: usize, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::LoopLimit,
        format!("DO WHILE ran more than {limit} iterations"),
        span,
    )
}

// Operators

#[cold]
pub fn type_mismatch(message: impl Into<String>, span: Span) -> EvalError {
    EvalError::new(EvalErrorKind::TypeMismatch, message, span)
}

#[cold]
pub fn binary_type_mismatch(op: &str, left: &str, right: &str, span: Span) -> EvalError {
    type_mismatch(format!("cannot apply `{op}` to {left} and {right}"), span)
}

#[cold]
pub fn division_by_zero(span: Span) -> EvalError {
    EvalError::new(EvalErrorKind::DivisionByZero, "division by zero", span)
}

// Classes

#[cold]
pub fn recursive_default(class: &str, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::RecursiveDefault,
        format!("property defaults of class `{class}` construct `{class}` again"),
        span,
    )
}

// Backend

#[cold]
pub fn backend_failure(err: &BackendError, span: Span) -> EvalError {
    EvalError::new(
        EvalErrorKind::Backend,
        format!("UI backend failed: {err}"),
        span,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_runtime_codes() {
        assert_eq!(undefined_name("x", Span::DUMMY).error_code(), ErrorCode::E3001);
        assert_eq!(break_outside_loop(Span::DUMMY).error_code(), ErrorCode::E3007);
        assert_eq!(
            backend_failure(&BackendError::new("gone"), Span::DUMMY).error_code(),
            ErrorCode::E3016
        );
    }

    #[test]
    fn unknown_class_lists_known_classes() {
        let err = unknown_class("FOO", &["DIALOG", "FORM"], Span::new(4, 7));
        let diag = err.to_diagnostic();
        assert_eq!(diag.message, "unknown class `FOO`");
        assert_eq!(diag.notes, vec!["known classes: DIALOG, FORM".to_string()]);
        assert_eq!(diag.primary_span(), Some(Span::new(4, 7)));
    }
}
