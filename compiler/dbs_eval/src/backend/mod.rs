//! UI backend abstraction.
//!
//! The evaluator never talks to a widget toolkit directly. Native base
//! classes (`FORM`, `DIALOG`, `PUSHBUTTON`) obtain a [`BackendHandle`] from
//! a [`Backend`], and recognized property writes, event bindings and
//! `OPEN` are forwarded to it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

use crate::value::{format_number, FontValue};

/// Opaque widget handle issued by a backend.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BackendHandle(u32);

impl BackendHandle {
    pub const fn new(raw: u32) -> Self {
        BackendHandle(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for BackendHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Value forwarded for a recognized property.
#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    /// `LEFT`/`TOP`/`WIDTH`/`HEIGHT`, always applied together.
    Geometry {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    /// `TEXT`, `CAPTION` or `TITLE`.
    Text(String),
    Font(FontValue),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Geometry {
                left,
                top,
                width,
                height,
            } => write!(
                f,
                "{},{} {}x{}",
                format_number(*left),
                format_number(*top),
                format_number(*width),
                format_number(*height)
            ),
            PropertyValue::Text(text) => write!(f, "{text:?}"),
            PropertyValue::Font(font) => {
                write!(f, "{:?} {}", font.family, format_number(font.size))?;
                for (on, flag) in [
                    (font.bold, "bold"),
                    (font.italic, "italic"),
                    (font.underline, "underline"),
                ] {
                    if on {
                        write!(f, " {flag}")?;
                    }
                }
                Ok(())
            }
        }
    }
}

/// Failure reported by a backend.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    #[cold]
    pub fn new(message: impl Into<String>) -> Self {
        BackendError {
            message: message.into(),
        }
    }
}

/// Widget toolkit seam.
pub trait Backend {
    /// Create the native widget for `base_class` (`FORM`, `DIALOG`,
    /// `PUSHBUTTON`), optionally inside `parent`.
    fn create_backend(
        &mut self,
        base_class: &str,
        parent: Option<BackendHandle>,
    ) -> Result<BackendHandle, BackendError>;

    fn apply_property(
        &mut self,
        handle: BackendHandle,
        name: &str,
        value: &PropertyValue,
    ) -> Result<(), BackendError>;

    fn bind_event(&mut self, handle: BackendHandle, event: &str) -> Result<(), BackendError>;

    fn unbind_event(&mut self, handle: BackendHandle, event: &str) -> Result<(), BackendError>;

    fn show(&mut self, handle: BackendHandle, modal: bool) -> Result<(), BackendError>;

    /// Open an editor for `path` (empty when none was given).
    fn create_file(&mut self, path: &str) -> Result<(), BackendError>;
}

/// Backend without effects. Handles are still issued so objects behave
/// the same as with a real toolkit.
#[derive(Debug, Default)]
pub struct NullBackend {
    next: u32,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for NullBackend {
    fn create_backend(
        &mut self,
        _base_class: &str,
        _parent: Option<BackendHandle>,
    ) -> Result<BackendHandle, BackendError> {
        self.next += 1;
        Ok(BackendHandle(self.next))
    }

    fn apply_property(
        &mut self,
        _handle: BackendHandle,
        _name: &str,
        _value: &PropertyValue,
    ) -> Result<(), BackendError> {
        Ok(())
    }

    fn bind_event(&mut self, _handle: BackendHandle, _event: &str) -> Result<(), BackendError> {
        Ok(())
    }

    fn unbind_event(&mut self, _handle: BackendHandle, _event: &str) -> Result<(), BackendError> {
        Ok(())
    }

    fn show(&mut self, _handle: BackendHandle, _modal: bool) -> Result<(), BackendError> {
        Ok(())
    }

    fn create_file(&mut self, _path: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

/// One call received by a [`RecordingBackend`].
#[derive(Clone, Debug, PartialEq)]
pub enum BackendCall {
    Create {
        handle: BackendHandle,
        base_class: String,
        parent: Option<BackendHandle>,
    },
    ApplyProperty {
        handle: BackendHandle,
        name: String,
        value: PropertyValue,
    },
    BindEvent {
        handle: BackendHandle,
        event: String,
    },
    UnbindEvent {
        handle: BackendHandle,
        event: String,
    },
    Show {
        handle: BackendHandle,
        modal: bool,
    },
    CreateFile {
        path: String,
    },
}

impl fmt::Display for BackendCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendCall::Create {
                handle,
                base_class,
                parent: Some(parent),
            } => write!(f, "create {handle} {base_class} in {parent}"),
            BackendCall::Create {
                handle,
                base_class,
                parent: None,
            } => write!(f, "create {handle} {base_class}"),
            BackendCall::ApplyProperty {
                handle,
                name,
                value,
            } => write!(f, "set {handle} {name} = {value}"),
            BackendCall::BindEvent { handle, event } => write!(f, "bind {handle} {event}"),
            BackendCall::UnbindEvent { handle, event } => write!(f, "unbind {handle} {event}"),
            BackendCall::Show { handle, modal } => {
                write!(f, "show {handle}{}", if *modal { " modal" } else { "" })
            }
            BackendCall::CreateFile { path } => write!(f, "create file {path:?}"),
        }
    }
}

#[derive(Debug, Default)]
struct Recording {
    next: u32,
    calls: Vec<BackendCall>,
}

/// Backend that records every call.
///
/// Clones share one log, so a caller can keep a clone while the
/// interpreter owns the other.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    recording: Rc<RefCell<Recording>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.recording.borrow().calls.clone()
    }

    /// Recorded calls rendered one per line.
    pub fn transcript(&self) -> Vec<String> {
        self.recording
            .borrow()
            .calls
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    fn record(&self, call: BackendCall) {
        self.recording.borrow_mut().calls.push(call);
    }
}

impl Backend for RecordingBackend {
    fn create_backend(
        &mut self,
        base_class: &str,
        parent: Option<BackendHandle>,
    ) -> Result<BackendHandle, BackendError> {
        let handle = {
            let mut recording = self.recording.borrow_mut();
            recording.next += 1;
            BackendHandle(recording.next)
        };
        self.record(BackendCall::Create {
            handle,
            base_class: base_class.to_string(),
            parent,
        });
        Ok(handle)
    }

    fn apply_property(
        &mut self,
        handle: BackendHandle,
        name: &str,
        value: &PropertyValue,
    ) -> Result<(), BackendError> {
        self.record(BackendCall::ApplyProperty {
            handle,
            name: name.to_string(),
            value: value.clone(),
        });
        Ok(())
    }

    fn bind_event(&mut self, handle: BackendHandle, event: &str) -> Result<(), BackendError> {
        self.record(BackendCall::BindEvent {
            handle,
            event: event.to_string(),
        });
        Ok(())
    }

    fn unbind_event(&mut self, handle: BackendHandle, event: &str) -> Result<(), BackendError> {
        self.record(BackendCall::UnbindEvent {
            handle,
            event: event.to_string(),
        });
        Ok(())
    }

    fn show(&mut self, handle: BackendHandle, modal: bool) -> Result<(), BackendError> {
        self.record(BackendCall::Show { handle, modal });
        Ok(())
    }

    fn create_file(&mut self, path: &str) -> Result<(), BackendError> {
        self.record(BackendCall::CreateFile {
            path: path.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests;
