//! Parse errors.

use dbs_diagnostic::{Diagnostic, ErrorCode};
use dbs_ir::{Span, TokenKind};
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub message: String,
    /// Where the parser stopped.
    pub span: Span,
    /// Opening keyword of an unclosed block.
    pub opened_at: Option<Span>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            opened_at: None,
        }
    }

    #[cold]
    pub fn unexpected_token(span: Span, expected: &str, found: &TokenKind) -> Self {
        ParseError::new(
            ErrorCode::E1010,
            format!("expected {expected}, found {}", found.display_name()),
            span,
        )
    }

    #[cold]
    pub fn expected_expression(span: Span, found: &TokenKind) -> Self {
        ParseError::new(
            ErrorCode::E1011,
            format!("expected an expression, found {}", found.display_name()),
            span,
        )
    }

    #[cold]
    pub fn unclosed_block(span: Span, opener: &str, closer: &str, opened_at: Span) -> Self {
        ParseError {
            opened_at: Some(opened_at),
            ..ParseError::new(
                ErrorCode::E1012,
                format!("{opener} block is missing its {closer}"),
                span,
            )
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        self.code
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, "here");
        match self.opened_at {
            Some(open) => diag.with_secondary_label(open, "block opened here"),
            None => diag,
        }
    }
}
