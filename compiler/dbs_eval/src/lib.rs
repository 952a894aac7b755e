//! dbscript evaluator.
//!
//! This crate runs a parsed [`SyntaxTree`](dbs_ir::ast::SyntaxTree): it
//! collects class declarations into a [`ClassRegistry`], then walks the
//! top-level statements.
//!
//! # Architecture
//!
//! - [`Value`]: runtime values; objects, delegates and fonts are shared
//!   references
//! - [`ScopeStack`]: variable frames, global at the bottom
//! - [`ClassCollector`]: the collect pass, single inheritance and cycle
//!   checks
//! - [`Interpreter`]: statement execution, member chains, events
//! - [`Backend`]: the widget toolkit seam; [`RecordingBackend`] records
//!   calls for tests and tracing
//!
//! Evaluation is single-threaded; values are `Rc`-based and `!Send`.

pub mod backend;
pub mod class_registry;
mod environment;
pub mod errors;
pub mod interpreter;
mod operators;
mod print_handler;
pub mod value;

pub use backend::{
    Backend, BackendCall, BackendError, BackendHandle, NullBackend, PropertyValue,
    RecordingBackend,
};
pub use class_registry::{
    ClassCollector, ClassDef, ClassId, ClassRegistry, MethodDef, NativeBase, PropertyDef,
    SemanticError,
};
pub use environment::{Frame, ScopeStack};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::{
    is_event, Flow, Interpreter, InterpreterBuilder, InterpreterConfig, RunError, ThisEntry,
    WithEntry, DEFAULT_MAX_LOOP_ITERATIONS, EVENT_NAMES,
};
pub use operators::{
    evaluate_additive, evaluate_comparison, evaluate_multiplicative, evaluate_negate,
};
pub use print_handler::{
    buffer_handler, silent_handler, stdout_handler, BufferPrintHandler, PrintHandlerImpl,
    SharedPrintHandler, StdoutPrintHandler,
};
pub use value::{Delegate, FontRef, FontValue, Instance, InstanceRef, Value};
