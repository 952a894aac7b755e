//! Tree-walking interpreter for dbscript.
//!
//! # Architecture
//!
//! A program runs in two passes over one [`SyntaxTree`]:
//!
//! 1. **collect**: [`ClassCollector`] registers every class declaration
//!    and the interpreter evaluates property defaults, once per class on
//!    first use, in a scratch frame.
//! 2. **exec**: top-level statements run in source order. Class
//!    declarations are skipped, so code may `NEW` a class declared below.
//!
//! Statement execution returns a [`Flow`]; `BREAK` and `RETURN` travel as
//! values, not errors. All interpreter state (frames, receiver stacks,
//! registry, backend) lives in one [`Interpreter`]; scope guards pop what an
//! invocation pushed on every exit path.
//!
//! - `exec` - statements
//! - `eval` - expressions and member chains
//! - `calls` - method invocation, delegates, `SUPER::`
//! - `construct` - `NEW`
//! - `properties` - property writes and backend effects
//! - `events` - event dispatch

mod builder;
mod calls;
mod construct;
mod eval;
mod events;
mod exec;
mod properties;
mod scope_guard;

pub use builder::InterpreterBuilder;
pub use events::{is_event, EVENT_NAMES};

use thiserror::Error;

use dbs_diagnostic::{Diagnostic, ErrorCode};
use dbs_ir::ast::SyntaxTree;
use dbs_ir::StringInterner;

use crate::backend::Backend;
use crate::class_registry::{ClassCollector, ClassId, ClassRegistry, SemanticError};
use crate::environment::ScopeStack;
use crate::errors::{EvalError, EvalResult};
use crate::print_handler::SharedPrintHandler;
use crate::value::InstanceRef;
use crate::Value;

/// Default cap on `DO WHILE` iterations.
pub const DEFAULT_MAX_LOOP_ITERATIONS: usize = 1_000_000;

/// Tunables for one interpreter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// A `DO WHILE` running more iterations than this fails with a
    /// loop-limit error.
    pub max_loop_iterations: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_loop_iterations: DEFAULT_MAX_LOOP_ITERATIONS,
        }
    }
}

/// How a statement finished.
#[derive(Clone, Debug, Default)]
pub enum Flow {
    #[default]
    Normal,
    Break,
    Return(Value),
}

/// Receiver of the executing method or init block.
#[derive(Clone, Debug)]
pub struct ThisEntry {
    pub instance: InstanceRef,
    /// Class declaring the executing code; `SUPER::` starts at its parent.
    pub class: ClassId,
}

/// Implicit receiver of a `WITH` block.
#[derive(Clone, Debug)]
pub struct WithEntry {
    pub receiver: Value,
    /// Object whose `FONT` is re-applied after edits through a font
    /// receiver.
    pub owner: Option<InstanceRef>,
}

/// Per-invocation execution state, reset at method and init boundaries.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ExecContext {
    /// Enclosing loops in the current invocation.
    pub(crate) loop_depth: usize,
    pub(crate) in_method: bool,
    /// `WITH` entries below this index belong to callers.
    pub(crate) with_base: usize,
}

/// Failure of a whole program run.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RunError {
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    #[error(transparent)]
    Runtime(#[from] EvalError),
}

impl RunError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            RunError::Semantic(err) => err.error_code(),
            RunError::Runtime(err) => err.error_code(),
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            RunError::Semantic(err) => err.to_diagnostic(),
            RunError::Runtime(err) => err.to_diagnostic(),
        }
    }
}

/// The evaluator.
pub struct Interpreter<'a> {
    tree: &'a SyntaxTree,
    interner: &'a StringInterner,
    registry: ClassRegistry,
    scopes: ScopeStack,
    this_stack: Vec<ThisEntry>,
    with_stack: Vec<WithEntry>,
    context: ExecContext,
    backend: Box<dyn Backend + 'a>,
    print_handler: SharedPrintHandler,
    config: InterpreterConfig,
    /// Classes whose property defaults are being evaluated.
    pending_defaults: Vec<ClassId>,
}

impl<'a> Interpreter<'a> {
    /// Interpreter with a [`NullBackend`](crate::NullBackend) printing to
    /// stdout.
    pub fn new(tree: &'a SyntaxTree, interner: &'a StringInterner) -> Self {
        InterpreterBuilder::new(tree, interner).build()
    }

    /// Collect classes, then execute the program.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self) -> Result<(), RunError> {
        self.collect()?;
        self.exec_program()?;
        Ok(())
    }

    /// Pass 1: register classes and evaluate their property defaults.
    ///
    /// Defaults are evaluated per class on first use, so a default may
    /// construct a class declared further down.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn collect(&mut self) -> Result<(), RunError> {
        self.registry = ClassCollector::new(self.tree, self.interner).collect()?;
        let ids: Vec<ClassId> = self.registry.ids().collect();
        for id in ids {
            let span = self.registry.get(id).span;
            self.ensure_defaults(id, span)?;
        }
        Ok(())
    }

    /// Pass 2: run top-level statements in order, stopping at the first
    /// error.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn exec_program(&mut self) -> EvalResult<()> {
        let tree = self.tree;
        for &item in tree.items() {
            if matches!(tree.stmt(item).kind, dbs_ir::ast::StmtKind::ClassDecl(_)) {
                continue;
            }
            self.context = ExecContext::default();
            self.exec_stmt(item)?;
        }
        tracing::debug!(frames = self.scopes.depth(), "program finished");
        Ok(())
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn interner(&self) -> &'a StringInterner {
        self.interner
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    /// Value of a global variable, for hosts and tests.
    pub fn global(&self, name: &str) -> Option<Value> {
        let name = self.interner.get(name)?;
        self.scopes.global(name).cloned()
    }

    /// The innermost `WITH` entry of the current invocation.
    fn active_with(&self) -> Option<&WithEntry> {
        if self.with_stack.len() > self.context.with_base {
            self.with_stack.last()
        } else {
            None
        }
    }

    fn name(&self, name: dbs_ir::Name) -> &'static str {
        self.interner.lookup(name)
    }
}

#[cfg(test)]
mod tests;
