//! Lexer errors.

use dbs_diagnostic::{Diagnostic, ErrorCode};
use dbs_ir::Span;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{kind}")]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum LexErrorKind {
    #[error("invalid character `{0}`")]
    InvalidCharacter(char),
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedBlockComment,
}

impl LexError {
    #[cold]
    pub fn invalid_character(span: Span, found: char) -> Self {
        LexError {
            span,
            kind: LexErrorKind::InvalidCharacter(found),
        }
    }

    #[cold]
    pub fn unterminated_string(span: Span) -> Self {
        LexError {
            span,
            kind: LexErrorKind::UnterminatedString,
        }
    }

    #[cold]
    pub fn unterminated_block_comment(span: Span) -> Self {
        LexError {
            span,
            kind: LexErrorKind::UnterminatedBlockComment,
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::InvalidCharacter(_) => ErrorCode::E1001,
            LexErrorKind::UnterminatedString => ErrorCode::E1002,
            LexErrorKind::UnterminatedBlockComment => ErrorCode::E1003,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.error_code()).with_message(self.to_string());
        match self.kind {
            LexErrorKind::InvalidCharacter(_) => {
                diag.with_label(Span::point(self.span.start), "not valid here")
            }
            LexErrorKind::UnterminatedString => diag
                .with_label(self.span, "string starts here")
                .with_note("strings end on the line they start on"),
            LexErrorKind::UnterminatedBlockComment => diag
                .with_label(Span::new(self.span.start, self.span.start + 2), "comment opened here")
                .with_note("block comments nest; every `/*` needs its own `*/`"),
        }
    }
}
