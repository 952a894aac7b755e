//! Diagnostic reporting for every dbscript phase.
//!
//! Each phase keeps its own error type and converts it into a
//! [`Diagnostic`] at the reporting boundary:
//!
//! - an [`ErrorCode`] for searchability (first digit names the phase),
//! - a message saying what went wrong,
//! - labelled spans saying where,
//! - notes adding context.
//!
//! Rendering is done by [`emitter::TerminalEmitter`], which resolves spans
//! to `file:line:col` through a [`span_utils::LineOffsetTable`] and, for
//! preprocessed text, a per-line [`Origin`] table.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Origin, Severity};
pub use error_code::{parse_error_code, ErrorCode};
