//! Property writes and their backend effects.
//!
//! Every property write on an object goes through
//! [`Interpreter::set_property`]. Recognized names are forwarded to the
//! backend when the object has a widget:
//!
//! | Property | Forwarded as |
//! |----------|--------------|
//! | `LEFT`, `TOP`, `WIDTH`, `HEIGHT` | geometry, all four at once |
//! | `TEXT`, `CAPTION`, `TITLE` | display text |
//! | `FONT` | font spec |
//! | event names | bind / unbind |

use dbs_ir::{Name, Span};

use super::events::is_event;
use super::Interpreter;
use crate::backend::PropertyValue;
use crate::errors::{backend_failure, member_not_found, type_mismatch, EvalResult};
use crate::value::{FontMemberError, FontRef, InstanceRef};
use crate::Value;

impl Interpreter<'_> {
    pub(crate) fn set_property(
        &mut self,
        instance: &InstanceRef,
        name: Name,
        value: Value,
        span: Span,
    ) -> EvalResult<()> {
        if is_event(name) {
            return self.set_event(instance, name, value, span);
        }
        let forwarded = self.backend_property(instance, name, &value, span)?;
        match &value {
            Value::Instance(child) if !child.ptr_eq(instance) => {
                self.adopt_child(instance, name, child, span)?;
            }
            _ => instance.borrow_mut().remove_child(name),
        }
        instance.borrow_mut().set_prop(name, value);

        let handle = instance.borrow().handle();
        if let (Some(handle), Some(forwarded)) = (handle, forwarded) {
            let property = self.name(name);
            self.backend
                .apply_property(handle, property, &forwarded)
                .map_err(|err| backend_failure(&err, span))?;
        }
        Ok(())
    }

    /// Backend payload for writing `value` to `name`, or `None` when the
    /// object has no widget or the name is stored only.
    fn backend_property(
        &self,
        instance: &InstanceRef,
        name: Name,
        value: &Value,
        span: Span,
    ) -> EvalResult<Option<PropertyValue>> {
        if instance.borrow().handle().is_none() {
            return Ok(None);
        }
        let property = match name {
            Name::LEFT | Name::TOP | Name::WIDTH | Name::HEIGHT => {
                let component = |part: Name, default: f64| -> EvalResult<f64> {
                    let stored;
                    let current = if part == name {
                        value
                    } else {
                        stored = instance.borrow().prop(part).cloned().unwrap_or_default();
                        &stored
                    };
                    match current {
                        Value::Null => Ok(default),
                        Value::Number(n) => Ok(*n),
                        other => Err(type_mismatch(
                            format!(
                                "`{}` must be a number, found {}",
                                self.name(part),
                                other.type_name()
                            ),
                            span,
                        )),
                    }
                };
                PropertyValue::Geometry {
                    left: component(Name::LEFT, 0.0)?,
                    top: component(Name::TOP, 0.0)?,
                    width: component(Name::WIDTH, 100.0)?,
                    height: component(Name::HEIGHT, 100.0)?,
                }
            }
            Name::TEXT | Name::CAPTION | Name::TITLE => {
                PropertyValue::Text(value.display(self.interner))
            }
            Name::FONT => match value {
                Value::Font(font) => PropertyValue::Font(font.borrow().clone()),
                Value::Null => return Ok(None),
                other => {
                    return Err(type_mismatch(
                        format!("`FONT` must be a font, found {}", other.type_name()),
                        span,
                    ))
                }
            },
            _ => return Ok(None),
        };
        Ok(Some(property))
    }

    /// Record `child` under `name`; a child without a font takes a copy of
    /// the parent's.
    fn adopt_child(
        &mut self,
        parent: &InstanceRef,
        name: Name,
        child: &InstanceRef,
        span: Span,
    ) -> EvalResult<()> {
        let parent_font = match parent.borrow().prop(Name::FONT) {
            Some(Value::Font(font)) => Some(font.duplicate()),
            _ => None,
        };
        let child_has_font = child.borrow().has_prop(Name::FONT);
        if let (Some(font), false) = (parent_font, child_has_font) {
            self.set_property(child, Name::FONT, Value::Font(font), span)?;
        }
        parent.borrow_mut().add_child(name, child.clone());
        Ok(())
    }

    /// Store an event handler and (un)bind it on the widget.
    fn set_event(
        &mut self,
        instance: &InstanceRef,
        name: Name,
        value: Value,
        span: Span,
    ) -> EvalResult<()> {
        let bind = match &value {
            Value::Null => false,
            Value::Delegate(_) | Value::HandlerList(_) => true,
            other => {
                return Err(type_mismatch(
                    format!(
                        "event `{}` takes a delegate or handler list, found {}",
                        self.name(name),
                        other.type_name()
                    ),
                    span,
                ))
            }
        };
        instance.borrow_mut().set_prop(name, value);

        let Some(handle) = instance.borrow().handle() else {
            return Ok(());
        };
        let event = self.name(name);
        let result = if bind {
            self.backend.bind_event(handle, event)
        } else {
            self.backend.unbind_event(handle, event)
        };
        result.map_err(|err| backend_failure(&err, span))
    }

    pub(crate) fn set_font_member(
        &self,
        font: &FontRef,
        name: Name,
        value: &Value,
        span: Span,
    ) -> EvalResult<()> {
        let result = font.borrow_mut().set_member(name, value, self.interner);
        result.map_err(|err| match err {
            FontMemberError::Unknown => member_not_found(self.name(name), "FONT", span),
            FontMemberError::ExpectedNumber => type_mismatch(
                format!("font `{}` must be a number", self.name(name)),
                span,
            ),
        })
    }

    /// Send the owner's current `FONT` to its widget again.
    pub(crate) fn reapply_font(&mut self, owner: &InstanceRef, span: Span) -> EvalResult<()> {
        let (handle, font) = {
            let inst = owner.borrow();
            let font = match inst.prop(Name::FONT) {
                Some(Value::Font(font)) => Some(font.borrow().clone()),
                _ => None,
            };
            (inst.handle(), font)
        };
        let (Some(handle), Some(font)) = (handle, font) else {
            return Ok(());
        };
        tracing::debug!(%handle, "re-applying FONT");
        self.backend
            .apply_property(handle, "FONT", &PropertyValue::Font(font))
            .map_err(|err| backend_failure(&err, span))
    }
}
