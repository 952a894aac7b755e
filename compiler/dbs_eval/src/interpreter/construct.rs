//! `NEW Class(args)`.

use dbs_ir::{Name, Span};

use super::{Interpreter, ThisEntry};
use crate::class_registry::{ClassId, PropertyDef};
use crate::environment::Frame;
use crate::errors::{
    backend_failure, recursive_default, type_mismatch, unknown_class, EvalResult,
};
use crate::value::{FontRef, FontValue, Instance, InstanceRef};
use crate::Value;

impl Interpreter<'_> {
    /// Instantiate `class`: backend widget, property defaults and init
    /// statements base to derived, then `INIT` with `args`.
    pub(crate) fn construct(&mut self, class: Name, args: Vec<Value>, span: Span) -> EvalResult {
        if class == Name::FONT {
            return construct_font(&args, span);
        }
        let Some(id) = self.registry.lookup(class) else {
            let known = self.registry.class_names(self.interner);
            return Err(unknown_class(self.name(class), &known, span));
        };
        tracing::debug!(class = self.name(class), args = args.len(), "instantiate");

        let instance = InstanceRef::new(Instance::new(id, class));
        if let Some(native) = self.registry.native_base(id) {
            // Only a native class created directly takes a parent widget.
            let parent = if self.registry.get(id).native.is_some() {
                args.first()
                    .and_then(Value::as_instance)
                    .and_then(|parent| parent.borrow().handle())
            } else {
                None
            };
            let handle = self
                .backend
                .create_backend(native.as_str(), parent)
                .map_err(|err| backend_failure(&err, span))?;
            instance.borrow_mut().set_handle(handle);
        }

        let chain = self.registry.chain(id);
        for &ancestor in &chain {
            self.ensure_defaults(ancestor, span)?;
            let defaults = self.registry.get(ancestor).defaults.clone();
            for (name, value) in defaults.unwrap_or_default() {
                let value = match value {
                    Value::Font(font) => Value::Font(font.duplicate()),
                    other => other,
                };
                self.set_property(&instance, name, value, span)?;
            }
        }

        for &ancestor in &chain {
            let (name, init) = {
                let def = self.registry.get(ancestor);
                (def.name, def.init.clone())
            };
            if init.is_empty() {
                continue;
            }
            let mut frame = Frame::new(name);
            frame.define(Name::THIS, Value::Instance(instance.clone()));
            frame.define(Name::SELF, Value::Instance(instance.clone()));
            let entry = ThisEntry {
                instance: instance.clone(),
                class: ancestor,
            };
            let mut scoped = self.scoped_invocation(frame, Some(entry), false);
            scoped.exec_block(&init)?;
        }

        if self.registry.find_method(id, Name::INIT).is_some() {
            self.invoke_method(&instance, Name::INIT, args, None, span)?;
        }
        Ok(Value::Instance(instance))
    }

    /// Evaluate the property defaults of `id` once, on first use.
    pub(crate) fn ensure_defaults(&mut self, id: ClassId, span: Span) -> EvalResult<()> {
        let (name, properties) = {
            let class = self.registry.get(id);
            if class.defaults.is_some() {
                return Ok(());
            }
            (class.name, class.properties.clone())
        };
        if self.pending_defaults.contains(&id) {
            return Err(recursive_default(self.name(name), span));
        }
        self.pending_defaults.push(id);
        let defaults = self.eval_defaults(name, &properties);
        self.pending_defaults.pop();
        self.registry.set_defaults(id, defaults?);
        Ok(())
    }

    fn eval_defaults(
        &mut self,
        class: Name,
        properties: &[PropertyDef],
    ) -> EvalResult<Vec<(Name, Value)>> {
        let mut defaults = Vec::with_capacity(properties.len());
        let mut scoped = self.scoped_invocation(Frame::new(class), None, false);
        for property in properties {
            let value = match property.default {
                Some(expr) => scoped.eval_expr(expr)?,
                None => Value::Null,
            };
            defaults.push((property.name, value));
        }
        Ok(defaults)
    }
}

/// `NEW FONT([family [, size [, bold [, italic [, underline]]]]])`.
fn construct_font(args: &[Value], span: Span) -> EvalResult {
    let mut font = FontValue::default();
    match args.first() {
        None | Some(Value::Null) => {}
        Some(Value::Text(family)) => font.family.clone_from(family),
        Some(other) => {
            return Err(type_mismatch(
                format!("font family must be text, found {}", other.type_name()),
                span,
            ))
        }
    }
    match args.get(1) {
        None | Some(Value::Null) => {}
        Some(Value::Number(size)) => font.size = *size,
        Some(other) => {
            return Err(type_mismatch(
                format!("font size must be a number, found {}", other.type_name()),
                span,
            ))
        }
    }
    let flag = |index: usize| args.get(index).is_some_and(Value::is_truthy);
    font.bold = flag(2);
    font.italic = flag(3);
    font.underline = flag(4);
    Ok(Value::Font(FontRef::new(font)))
}
