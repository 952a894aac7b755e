//! RAII scope guards for the interpreter's stacks.
//!
//! An invocation pushes a frame and usually a receiver; a `WITH` block
//! pushes an implicit receiver. [`ScopedInterpreter`] records what was
//! pushed and pops it on drop, so early returns through `?` leave the
//! stacks balanced.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`,
//! so the body runs through the guard like through the interpreter.

use std::ops::{Deref, DerefMut};

use super::{ExecContext, Interpreter, ThisEntry, WithEntry};
use crate::environment::Frame;

/// Guard popping whatever its constructor pushed.
pub(crate) struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
    frame: bool,
    this: bool,
    with: bool,
    /// Context to restore on drop.
    saved: ExecContext,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        if self.with {
            self.interpreter.with_stack.pop();
        }
        if self.this {
            self.interpreter.this_stack.pop();
        }
        if self.frame {
            self.interpreter.scopes.pop();
        }
        self.interpreter.context = self.saved;
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Enter a method body, init block or event handler.
    ///
    /// Loop depth restarts at zero and `WITH` receivers of the caller are
    /// hidden until the guard drops.
    pub(crate) fn scoped_invocation(
        &mut self,
        frame: Frame,
        this: Option<ThisEntry>,
        in_method: bool,
    ) -> ScopedInterpreter<'_, 'a> {
        let saved = self.context;
        self.scopes.push(frame);
        let has_this = this.is_some();
        if let Some(entry) = this {
            self.this_stack.push(entry);
        }
        self.context = ExecContext {
            loop_depth: 0,
            in_method,
            with_base: self.with_stack.len(),
        };
        ScopedInterpreter {
            interpreter: self,
            frame: true,
            this: has_this,
            with: false,
            saved,
        }
    }

    /// Enter a `WITH` block.
    pub(crate) fn scoped_with(&mut self, entry: WithEntry) -> ScopedInterpreter<'_, 'a> {
        let saved = self.context;
        self.with_stack.push(entry);
        ScopedInterpreter {
            interpreter: self,
            frame: false,
            this: false,
            with: true,
            saved,
        }
    }
}

#[cfg(test)]
mod tests {
    use dbs_ir::ast::SyntaxTree;
    use dbs_ir::{Name, StringInterner};

    use super::*;
    use crate::Value;

    #[test]
    fn invocation_guard_restores_stacks() {
        let tree = SyntaxTree::new();
        let interner = StringInterner::new();
        let mut interp = Interpreter::new(&tree, &interner);
        interp.context.loop_depth = 2;
        {
            let scoped = interp.scoped_invocation(Frame::new(Name::INIT), None, true);
            assert_eq!(scoped.scopes.depth(), 2);
            assert_eq!(scoped.context.loop_depth, 0);
            assert!(scoped.context.in_method);
        }
        assert_eq!(interp.scopes.depth(), 1);
        assert_eq!(interp.context.loop_depth, 2);
        assert!(!interp.context.in_method);
    }

    #[test]
    fn with_guard_pops_receiver() {
        let tree = SyntaxTree::new();
        let interner = StringInterner::new();
        let mut interp = Interpreter::new(&tree, &interner);
        {
            let scoped = interp.scoped_with(WithEntry {
                receiver: Value::Number(1.0),
                owner: None,
            });
            assert!(scoped.active_with().is_some());
        }
        assert!(interp.with_stack.is_empty());
    }
}
