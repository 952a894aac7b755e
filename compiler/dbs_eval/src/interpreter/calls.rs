//! Method invocation, delegate calls and `SUPER::` dispatch.

use std::rc::Rc;

use dbs_ir::{Name, Span};

use super::{Flow, Interpreter, ThisEntry};
use crate::backend::BackendHandle;
use crate::class_registry::{ClassId, MethodDef, NativeBase};
use crate::environment::Frame;
use crate::errors::{
    backend_failure, delegate_target_dropped, invalid_super_call, method_not_found, not_callable,
    undefined_name, EvalResult,
};
use crate::value::{Delegate, InstanceRef};
use crate::Value;

impl Interpreter<'_> {
    /// Whether instances of `class` answer the built-in `OPEN`.
    pub(crate) fn can_open(&self, class: ClassId) -> bool {
        matches!(
            self.registry.native_base(class),
            Some(NativeBase::Form | NativeBase::Dialog)
        )
    }

    /// Invoke `name` on `target`, looking the method up from `start`
    /// (the target's own class when `None`).
    pub(crate) fn invoke_method(
        &mut self,
        target: &InstanceRef,
        name: Name,
        args: Vec<Value>,
        start: Option<ClassId>,
        span: Span,
    ) -> EvalResult {
        let class = start.unwrap_or_else(|| target.borrow().class());
        let method = self.registry.find_method(class, name).cloned();
        match method {
            Some(method) => self.run_method(target, &method, args),
            None if name == Name::OPEN && self.can_open(class) => self.open_native(target, span),
            None => {
                let class_name = self.registry.get(class).name;
                Err(method_not_found(self.name(name), self.name(class_name), span))
            }
        }
    }

    fn run_method(
        &mut self,
        target: &InstanceRef,
        method: &Rc<MethodDef>,
        args: Vec<Value>,
    ) -> EvalResult {
        tracing::debug!(
            method = self.name(method.name),
            args = args.len(),
            "invoke"
        );
        let mut frame = Frame::new(method.name);
        frame.define(Name::THIS, Value::Instance(target.clone()));
        frame.define(Name::SELF, Value::Instance(target.clone()));
        for (index, &param) in method.params.iter().enumerate() {
            frame.define(param, args.get(index).cloned().unwrap_or_default());
        }
        let entry = ThisEntry {
            instance: target.clone(),
            class: method.class,
        };

        let mut scoped = self.scoped_invocation(frame.with_args(args), Some(entry), true);
        match scoped.exec_block(&method.body)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal | Flow::Break => Ok(Value::Null),
        }
    }

    /// Built-in `OPEN`: show the widget, modally when `MODAL` is truthy.
    fn open_native(&mut self, target: &InstanceRef, span: Span) -> EvalResult {
        let (handle, modal): (Option<BackendHandle>, bool) = {
            let inst = target.borrow();
            (
                inst.handle(),
                inst.prop(Name::MODAL).is_some_and(Value::is_truthy),
            )
        };
        if let Some(handle) = handle {
            tracing::debug!(%handle, modal, "open");
            self.backend
                .show(handle, modal)
                .map_err(|err| backend_failure(&err, span))?;
        }
        Ok(Value::Null)
    }

    /// `receiver.name(args)`: class method, native `OPEN`, then a delegate
    /// or handler list stored in the property.
    pub(crate) fn call_member(
        &mut self,
        receiver: &Value,
        name: Name,
        args: Vec<Value>,
        span: Span,
    ) -> EvalResult {
        let Value::Instance(instance) = receiver else {
            let callee = self.get_member(receiver, name, span)?;
            return self.call_value(&callee, args, span);
        };
        let (class, class_name) = {
            let inst = instance.borrow();
            (inst.class(), inst.class_name())
        };
        if self.registry.find_method(class, name).is_some()
            || (name == Name::OPEN && self.can_open(class))
        {
            return self.invoke_method(instance, name, args, None, span);
        }
        let stored = instance.borrow().prop(name).cloned();
        match stored {
            Some(callee @ (Value::Delegate(_) | Value::HandlerList(_))) => {
                self.call_value(&callee, args, span)
            }
            Some(other) => Err(not_callable(other.type_name(), span)),
            None => Err(method_not_found(
                self.name(name),
                self.name(class_name),
                span,
            )),
        }
    }

    /// Call a delegate, or every delegate of a handler list in order. A
    /// handler list yields the last handler's result.
    pub(crate) fn call_value(&mut self, callee: &Value, args: Vec<Value>, span: Span) -> EvalResult {
        match callee {
            Value::Delegate(delegate) => self.call_delegate(delegate, args, span),
            Value::HandlerList(handlers) => {
                let handlers = Rc::clone(handlers);
                let mut last = Value::Null;
                for delegate in handlers.iter() {
                    last = self.call_delegate(delegate, args.clone(), span)?;
                }
                Ok(last)
            }
            other => Err(not_callable(other.type_name(), span)),
        }
    }

    pub(crate) fn call_delegate(
        &mut self,
        delegate: &Delegate,
        args: Vec<Value>,
        span: Span,
    ) -> EvalResult {
        let Some(target) = delegate.target() else {
            return Err(delegate_target_dropped(self.name(delegate.method()), span));
        };
        self.invoke_method(&target, delegate.method(), args, delegate.start(), span)
    }

    /// `Name(args)`: a delegate held in a variable (or a member of the
    /// `WITH` receiver), else a method of the current `THIS`.
    pub(crate) fn call_bare(&mut self, name: Name, args: Vec<Value>, span: Span) -> EvalResult {
        if let Some(callee) = self.lookup_value(name) {
            return self.call_value(&callee, args, span);
        }
        if let Some(this) = self.this_stack.last().map(|entry| entry.instance.clone()) {
            let class = this.borrow().class();
            if self.registry.find_method(class, name).is_some() {
                return self.invoke_method(&this, name, args, None, span);
            }
        }
        Err(undefined_name(self.name(name), span))
    }

    /// Receiver and lookup start for `SUPER::`.
    fn super_target(&self, span: Span) -> EvalResult<(InstanceRef, ClassId)> {
        let Some(entry) = self.this_stack.last() else {
            return Err(invalid_super_call("no method is executing", span));
        };
        let class = self.registry.get(entry.class);
        let Some(parent) = class.parent else {
            return Err(invalid_super_call(
                &format!("class `{}` has no parent", self.name(class.name)),
                span,
            ));
        };
        Ok((entry.instance.clone(), parent))
    }

    /// `SUPER::name(args)`.
    pub(crate) fn call_super(&mut self, name: Name, args: Vec<Value>, span: Span) -> EvalResult {
        let (target, parent) = self.super_target(span)?;
        self.invoke_method(&target, name, args, Some(parent), span)
    }

    /// `SUPER::name` without a call: a delegate starting lookup at the
    /// parent.
    pub(crate) fn super_delegate(&self, name: Name, span: Span) -> EvalResult {
        let (target, parent) = self.super_target(span)?;
        if self.registry.find_method(parent, name).is_none()
            && !(name == Name::OPEN && self.can_open(parent))
        {
            let parent_name = self.registry.get(parent).name;
            return Err(method_not_found(
                self.name(name),
                self.name(parent_name),
                span,
            ));
        }
        Ok(Value::Delegate(Delegate::new(&target, name, Some(parent))))
    }
}
