//! Event dispatch.

use dbs_ir::{Name, Span};

use super::Interpreter;
use crate::errors::EvalResult;
use crate::value::{Delegate, InstanceRef};
use crate::Value;

/// Property names that hold event handlers.
pub const EVENT_NAMES: [Name; 11] = [
    Name::ONCLICK,
    Name::ONDBLCLICK,
    Name::ONMOUSEDOWN,
    Name::ONMOUSEUP,
    Name::ONMOUSEMOVE,
    Name::ONMOUSELBUTTON,
    Name::ONMOUSERBUTTON,
    Name::ONKEYDOWN,
    Name::ONKEYUP,
    Name::ONGOTFOCUS,
    Name::ONLOSTFOCUS,
];

pub fn is_event(name: Name) -> bool {
    EVENT_NAMES.contains(&name)
}

/// Mouse and key events pass the host's payload after the sender.
fn takes_payload(name: Name) -> bool {
    matches!(
        name,
        Name::ONMOUSEDOWN
            | Name::ONMOUSEUP
            | Name::ONMOUSEMOVE
            | Name::ONMOUSELBUTTON
            | Name::ONMOUSERBUTTON
            | Name::ONKEYDOWN
            | Name::ONKEYUP
    )
}

impl Interpreter<'_> {
    /// Run the handlers stored in `instance`'s `event` property, in
    /// registration order, with `[sender]` (plus `payload` for mouse and
    /// key events) as arguments.
    ///
    /// A `RETURN` ends only its own handler. The first error stops
    /// dispatch and is returned.
    #[tracing::instrument(level = "debug", skip(self, instance, payload))]
    pub fn fire_event(
        &mut self,
        instance: &InstanceRef,
        event: &str,
        payload: Vec<Value>,
    ) -> EvalResult<()> {
        let Some(name) = self.interner.get(event).filter(|&name| is_event(name)) else {
            return Ok(());
        };
        let stored = instance.borrow().prop(name).cloned();
        let handlers: Vec<Delegate> = match stored {
            Some(Value::Delegate(delegate)) => vec![delegate],
            Some(Value::HandlerList(list)) => list.to_vec(),
            _ => return Ok(()),
        };

        let mut args = vec![Value::Instance(instance.clone())];
        if takes_payload(name) {
            args.extend(payload);
        }
        tracing::debug!(handlers = handlers.len(), "dispatch");
        for handler in &handlers {
            self.call_delegate(handler, args.clone(), Span::DUMMY)?;
        }
        Ok(())
    }
}
