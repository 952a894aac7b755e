//! `InterpreterBuilder` for creating an Interpreter with a chosen backend,
//! print handler and limits.

use dbs_ir::ast::SyntaxTree;
use dbs_ir::StringInterner;

use super::{ExecContext, Interpreter, InterpreterConfig};
use crate::backend::{Backend, NullBackend};
use crate::class_registry::ClassRegistry;
use crate::environment::ScopeStack;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// Defaults: a [`NullBackend`], output to stdout and
/// [`InterpreterConfig::default`].
pub struct InterpreterBuilder<'a> {
    tree: &'a SyntaxTree,
    interner: &'a StringInterner,
    backend: Option<Box<dyn Backend + 'a>>,
    print_handler: Option<SharedPrintHandler>,
    config: InterpreterConfig,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(tree: &'a SyntaxTree, interner: &'a StringInterner) -> Self {
        Self {
            tree,
            interner,
            backend: None,
            print_handler: None,
            config: InterpreterConfig::default(),
        }
    }

    /// Set the UI backend receiving widget calls.
    #[must_use]
    pub fn backend(mut self, backend: impl Backend + 'a) -> Self {
        self.backend = Some(Box::new(backend));
        self
    }

    /// Set the print handler for `WRITE` output.
    ///
    /// Use `buffer_handler()` to capture output in tests.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    /// Shorthand for overriding only the `DO WHILE` iteration cap.
    #[must_use]
    pub fn max_loop_iterations(mut self, limit: usize) -> Self {
        self.config.max_loop_iterations = limit;
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        Interpreter {
            tree: self.tree,
            interner: self.interner,
            registry: ClassRegistry::with_builtins(),
            scopes: ScopeStack::new(),
            this_stack: Vec::new(),
            with_stack: Vec::new(),
            context: ExecContext::default(),
            backend: self
                .backend
                .unwrap_or_else(|| Box::new(NullBackend::new())),
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            config: self.config,
            pending_defaults: Vec::new(),
        }
    }
}
