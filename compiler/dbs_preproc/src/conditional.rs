//! Conditional-compilation frames.

use std::path::{Path, PathBuf};

use crate::error::PreprocessError;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum CondKind {
    Ifdef,
    Ifndef,
}

impl CondKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            CondKind::Ifdef => "#ifdef",
            CondKind::Ifndef => "#ifndef",
        }
    }
}

#[derive(Debug)]
struct CondFrame {
    parent_active: bool,
    this_active: bool,
    seen_else: bool,
    kind: CondKind,
    name: String,
    line: u32,
}

/// Stack of open `#ifdef`/`#ifndef` frames for one file.
///
/// An empty stack means every line is active.
#[derive(Debug)]
pub(crate) struct CondStack {
    file: PathBuf,
    frames: Vec<CondFrame>,
}

impl CondStack {
    pub(crate) fn new(file: &Path) -> Self {
        CondStack {
            file: file.to_path_buf(),
            frames: Vec::new(),
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.frames
            .last()
            .is_none_or(|top| top.parent_active && top.this_active)
    }

    /// Open a frame. Frames are pushed inside inactive regions too so
    /// nesting stays balanced.
    pub(crate) fn open(&mut self, kind: CondKind, name: &str, defined: bool, line: u32) {
        let this_active = match kind {
            CondKind::Ifdef => defined,
            CondKind::Ifndef => !defined,
        };
        self.frames.push(CondFrame {
            parent_active: self.is_active(),
            this_active,
            seen_else: false,
            kind,
            name: name.to_string(),
            line,
        });
    }

    pub(crate) fn flip_else(&mut self, line: u32) -> Result<(), PreprocessError> {
        let Some(top) = self.frames.last_mut() else {
            return Err(PreprocessError::UnbalancedConditional {
                directive: "#else",
                name: None,
                file: self.file.clone(),
                line,
            });
        };
        if top.seen_else {
            return Err(PreprocessError::DuplicateElse {
                file: self.file.clone(),
                line,
            });
        }
        top.seen_else = true;
        top.this_active = !top.this_active;
        Ok(())
    }

    pub(crate) fn close(&mut self, line: u32) -> Result<(), PreprocessError> {
        match self.frames.pop() {
            Some(_) => Ok(()),
            None => Err(PreprocessError::UnbalancedConditional {
                directive: "#endif",
                name: None,
                file: self.file.clone(),
                line,
            }),
        }
    }

    /// End-of-file check: the innermost open frame is reported.
    pub(crate) fn finish(mut self) -> Result<(), PreprocessError> {
        match self.frames.pop() {
            None => Ok(()),
            Some(top) => Err(PreprocessError::UnbalancedConditional {
                directive: top.kind.as_str(),
                name: Some(top.name),
                file: self.file,
                line: top.line,
            }),
        }
    }
}
