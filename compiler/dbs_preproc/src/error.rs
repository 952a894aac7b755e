//! Preprocessor errors.

use std::path::{Path, PathBuf};

use dbs_diagnostic::{Diagnostic, ErrorCode};
use thiserror::Error;

/// Fatal preprocessing failure. Aborts loading the program.
#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("circular include detected: {}", format_chain(chain))]
    CircularInclude { chain: Vec<PathBuf> },

    #[error("include file not found: \"{name}\" (from {}:{line})", from.display())]
    IncludeNotFound {
        name: String,
        from: PathBuf,
        line: u32,
        searched: Vec<PathBuf>,
    },

    #[error("malformed function-like #define")]
    MalformedDefine { file: PathBuf, line: u32 },

    /// `name` is the open conditional's name for a missing `#endif`, and
    /// `None` for a stray `#else`/`#endif`.
    #[error("{}", unbalanced_message(directive, name.as_deref(), file, *line))]
    UnbalancedConditional {
        directive: &'static str,
        name: Option<String>,
        file: PathBuf,
        line: u32,
    },

    #[error("multiple #else for one conditional")]
    DuplicateElse { file: PathBuf, line: u32 },

    #[error("macro {name} expects {expected} argument(s), got {found}")]
    MacroArity {
        name: String,
        expected: usize,
        found: usize,
        file: PathBuf,
        line: u32,
    },

    #[error("macro expansion did not settle after {passes} passes")]
    ExpansionLimit {
        passes: usize,
        file: PathBuf,
        line: u32,
    },

    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn unbalanced_message(directive: &str, name: Option<&str>, file: &Path, line: u32) -> String {
    match name {
        Some(name) => format!(
            "missing #endif for {directive} {name} (opened at {}:{line})",
            file.display()
        ),
        None => format!("{directive} without #ifdef/#ifndef"),
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl PreprocessError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::CircularInclude { .. } => ErrorCode::E0001,
            Self::IncludeNotFound { .. } => ErrorCode::E0002,
            Self::MalformedDefine { .. } => ErrorCode::E0003,
            Self::UnbalancedConditional { .. } => ErrorCode::E0004,
            Self::DuplicateElse { .. } => ErrorCode::E0005,
            Self::MacroArity { .. } => ErrorCode::E0006,
            Self::ExpansionLimit { .. } => ErrorCode::E0007,
            Self::Io { .. } => ErrorCode::E0008,
        }
    }

    /// File and 1-based line the error points at, if it has one.
    pub fn location(&self) -> Option<(&Path, u32)> {
        match self {
            Self::IncludeNotFound { from, line, .. } => Some((from, *line)),
            Self::MalformedDefine { file, line }
            | Self::UnbalancedConditional { file, line, .. }
            | Self::DuplicateElse { file, line }
            | Self::MacroArity { file, line, .. }
            | Self::ExpansionLimit { file, line, .. } => Some((file, *line)),
            Self::CircularInclude { .. } | Self::Io { .. } => None,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.error_code()).with_message(self.to_string());
        if let Some((file, line)) = self.location() {
            diag = diag.with_location(file.display().to_string(), line);
        }
        match self {
            Self::IncludeNotFound { searched, .. } if !searched.is_empty() => {
                let dirs: Vec<_> = searched.iter().map(|p| p.display().to_string()).collect();
                diag = diag.with_note(format!("searched: {}", dirs.join(", ")));
            }
            Self::UnbalancedConditional { name: Some(_), .. } => {
                diag = diag.with_note("every #ifdef/#ifndef needs a matching #endif in the same file");
            }
            Self::ExpansionLimit { .. } => {
                diag = diag.with_note("a macro probably expands to itself");
            }
            _ => {}
        }
        diag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_include_names_chain() {
        let err = PreprocessError::CircularInclude {
            chain: vec!["a.prg".into(), "b.h".into(), "a.prg".into()],
        };
        assert_eq!(
            err.to_string(),
            "circular include detected: a.prg -> b.h -> a.prg"
        );
        assert_eq!(err.error_code(), ErrorCode::E0001);
        assert!(err.location().is_none());
    }

    #[test]
    fn missing_endif_names_opening_directive() {
        let err = PreprocessError::UnbalancedConditional {
            directive: "#ifndef",
            name: Some("GUARD".to_string()),
            file: "main.prg".into(),
            line: 7,
        };
        assert_eq!(
            err.to_string(),
            "missing #endif for #ifndef GUARD (opened at main.prg:7)"
        );
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E0004);
        assert_eq!(diag.location.map(|o| o.line), Some(7));
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn stray_endif_has_no_opening_directive() {
        let err = PreprocessError::UnbalancedConditional {
            directive: "#endif",
            name: None,
            file: "main.prg".into(),
            line: 3,
        };
        assert_eq!(err.to_string(), "#endif without #ifdef/#ifndef");
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, ErrorCode::E0004);
        assert!(diag.notes.is_empty());
    }
}
