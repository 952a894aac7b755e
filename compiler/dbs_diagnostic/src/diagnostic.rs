//! Core diagnostic types.

use std::fmt;

use dbs_ir::Span;

use crate::ErrorCode;

#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A span in the preprocessed text with an explanation.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub message: String,
    pub is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: true,
        }
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Label {
            span,
            message: message.into(),
            is_primary: false,
        }
    }
}

/// Where a line of preprocessed text came from.
///
/// Included files are spliced into one text, so byte offsets alone cannot
/// name the file a statement was written in.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Origin {
    pub file: String,
    /// 1-based line in `file`.
    pub line: u32,
}

/// A reportable error or warning.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub severity: Severity,
    pub message: String,
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
    /// Location for errors raised before any span exists (preprocessor
    /// errors point at a file and line directly).
    pub location: Option<Origin>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
            location: None,
        }
    }

    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.location = Some(Origin {
            file: file.into(),
            line,
        });
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels.iter().find(|l| l.is_primary).map(|l| l.span)
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_labels_and_notes() {
        let diag = Diagnostic::error(ErrorCode::E3001)
            .with_message("undefined name 'COUNTER'")
            .with_label(Span::new(10, 17), "not found in any scope")
            .with_secondary_label(Span::new(0, 4), "inside this method")
            .with_note("names are case-insensitive");

        assert!(diag.is_error());
        assert_eq!(diag.primary_span(), Some(Span::new(10, 17)));
        assert_eq!(diag.labels.len(), 2);
        assert_eq!(diag.notes, vec!["names are case-insensitive".to_string()]);
    }

    #[test]
    fn display_is_one_line_summary() {
        let diag = Diagnostic::error(ErrorCode::E0001).with_message("circular include");
        assert_eq!(diag.to_string(), "error[E0001]: circular include");
    }

    #[test]
    fn location_is_optional() {
        let diag = Diagnostic::warning(ErrorCode::E0004);
        assert!(diag.location.is_none());
        assert!(!diag.is_error());
        let diag = diag.with_location("main.prg", 3);
        assert_eq!(
            diag.location,
            Some(Origin {
                file: "main.prg".to_string(),
                line: 3
            })
        );
    }
}
