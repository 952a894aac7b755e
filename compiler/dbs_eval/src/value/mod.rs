//! Runtime values and the object model.
//!
//! Instances are shared by reference (`Rc<RefCell<_>>`): several variables
//! and properties may alias one object. Delegates hold a weak reference to
//! their target so handler cycles (instance, handler, same instance) do not
//! keep objects alive. Fonts are shared the same way, so `WITH (x.Font)`
//! edits the object the owner holds.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use dbs_ir::{Name, StringInterner};
use rustc_hash::FxHashMap;

use crate::backend::BackendHandle;
use crate::class_registry::ClassId;

/// A runtime value.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Instance(InstanceRef),
    Delegate(Delegate),
    Font(FontRef),
    /// Ordered event handlers (`a ; b`).
    HandlerList(Rc<[Delegate]>),
}

impl Value {
    /// Null, zero, empty text and `.F.` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty(),
            Value::Instance(_) | Value::Delegate(_) | Value::Font(_) | Value::HandlerList(_) => {
                true
            }
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "logical",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Instance(_) => "object",
            Value::Delegate(_) => "delegate",
            Value::Font(_) => "font",
            Value::HandlerList(_) => "handler list",
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_instance(&self) -> Option<&InstanceRef> {
        match self {
            Value::Instance(inst) => Some(inst),
            _ => None,
        }
    }

    /// Text shown by `WRITE` and used by `+` concatenation.
    pub fn display(&self, interner: &StringInterner) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => ".T.".to_string(),
            Value::Bool(false) => ".F.".to_string(),
            Value::Number(n) => format_number(*n),
            Value::Text(s) => s.clone(),
            Value::Instance(inst) => {
                format!("[{} object]", interner.lookup(inst.borrow().class_name()))
            }
            Value::Delegate(d) => format!("[delegate {}]", interner.lookup(d.method())),
            Value::Font(font) => {
                let font = font.borrow();
                format!("{} {}", font.family, format_number(font.size))
            }
            Value::HandlerList(list) => format!("[{} handlers]", list.len()),
        }
    }

    /// Equality for `=`/`==` across kinds: scalars by value, reference
    /// kinds by identity, different kinds never equal.
    pub fn equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            #[expect(clippy::float_cmp, reason = "script equality is exact")]
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Instance(a), Value::Instance(b)) => a.ptr_eq(b),
            (Value::Delegate(a), Value::Delegate(b)) => a.same_as(b),
            (Value::Font(a), Value::Font(b)) => a.ptr_eq(b),
            (Value::HandlerList(a), Value::HandlerList(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.same_as(y))
            }
            _ => false,
        }
    }
}

/// Integral numbers print without a fractional part.
pub fn format_number(n: f64) -> String {
    format!("{n}")
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// An object: class, optional backend widget, properties and children.
#[derive(Debug)]
pub struct Instance {
    class: ClassId,
    class_name: Name,
    handle: Option<BackendHandle>,
    props: FxHashMap<Name, Value>,
    children: FxHashMap<Name, InstanceRef>,
}

impl Instance {
    pub fn new(class: ClassId, class_name: Name) -> Self {
        Instance {
            class,
            class_name,
            handle: None,
            props: FxHashMap::default(),
            children: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn class(&self) -> ClassId {
        self.class
    }

    #[inline]
    pub fn class_name(&self) -> Name {
        self.class_name
    }

    #[inline]
    pub fn handle(&self) -> Option<BackendHandle> {
        self.handle
    }

    pub fn set_handle(&mut self, handle: BackendHandle) {
        self.handle = Some(handle);
    }

    pub fn prop(&self, name: Name) -> Option<&Value> {
        self.props.get(&name)
    }

    pub fn has_prop(&self, name: Name) -> bool {
        self.props.contains_key(&name)
    }

    pub fn set_prop(&mut self, name: Name, value: Value) {
        self.props.insert(name, value);
    }

    /// Child object held under the property `name`.
    pub fn child(&self, name: Name) -> Option<&InstanceRef> {
        self.children.get(&name)
    }

    pub fn add_child(&mut self, name: Name, child: InstanceRef) {
        self.children.insert(name, child);
    }

    pub fn remove_child(&mut self, name: Name) {
        self.children.remove(&name);
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Shared handle to an [`Instance`].
#[derive(Clone)]
pub struct InstanceRef(Rc<RefCell<Instance>>);

impl InstanceRef {
    pub fn new(instance: Instance) -> Self {
        InstanceRef(Rc::new(RefCell::new(instance)))
    }

    #[inline]
    pub fn borrow(&self) -> Ref<'_, Instance> {
        self.0.borrow()
    }

    #[inline]
    pub fn borrow_mut(&self) -> RefMut<'_, Instance> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &InstanceRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> Weak<RefCell<Instance>> {
        Rc::downgrade(&self.0)
    }
}

impl fmt::Debug for InstanceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inst) => write!(f, "InstanceRef({:?})", inst.class_name()),
            Err(_) => f.write_str("InstanceRef(<borrowed>)"),
        }
    }
}

/// A method bound to a target object, not yet invoked.
#[derive(Clone)]
pub struct Delegate {
    target: Weak<RefCell<Instance>>,
    method: Name,
    /// Class to start method lookup at; set for `SUPER::M` references.
    start: Option<ClassId>,
}

impl Delegate {
    pub fn new(target: &InstanceRef, method: Name, start: Option<ClassId>) -> Self {
        Delegate {
            target: target.downgrade(),
            method,
            start,
        }
    }

    #[inline]
    pub fn method(&self) -> Name {
        self.method
    }

    #[inline]
    pub fn start(&self) -> Option<ClassId> {
        self.start
    }

    /// The target, if it is still alive.
    pub fn target(&self) -> Option<InstanceRef> {
        self.target.upgrade().map(InstanceRef)
    }

    pub fn same_as(&self, other: &Delegate) -> bool {
        self.method == other.method && self.start == other.start && self.target.ptr_eq(&other.target)
    }
}

impl fmt::Debug for Delegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("method", &self.method)
            .field("start", &self.start)
            .field("alive", &(self.target.strong_count() > 0))
            .finish()
    }
}

/// Font style value.
#[derive(Clone, Debug, PartialEq)]
pub struct FontValue {
    pub family: String,
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for FontValue {
    fn default() -> Self {
        FontValue {
            family: "Arial".to_string(),
            size: 10.0,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

/// Why a font member write was rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FontMemberError {
    Unknown,
    ExpectedNumber,
}

impl FontValue {
    /// Read `NAME`/`FAMILY`, `SIZE`, `BOLD`, `ITALIC` or `UNDERLINE`.
    pub fn member(&self, name: Name) -> Option<Value> {
        let value = match name {
            Name::NAME | Name::FAMILY => Value::Text(self.family.clone()),
            Name::SIZE => Value::Number(self.size),
            Name::BOLD => Value::Bool(self.bold),
            Name::ITALIC => Value::Bool(self.italic),
            Name::UNDERLINE => Value::Bool(self.underline),
            _ => return None,
        };
        Some(value)
    }

    pub fn set_member(
        &mut self,
        name: Name,
        value: &Value,
        interner: &StringInterner,
    ) -> Result<(), FontMemberError> {
        match name {
            Name::NAME | Name::FAMILY => self.family = value.display(interner),
            Name::SIZE => self.size = value.as_number().ok_or(FontMemberError::ExpectedNumber)?,
            Name::BOLD => self.bold = value.is_truthy(),
            Name::ITALIC => self.italic = value.is_truthy(),
            Name::UNDERLINE => self.underline = value.is_truthy(),
            _ => return Err(FontMemberError::Unknown),
        }
        Ok(())
    }
}

/// Shared handle to a [`FontValue`].
#[derive(Clone, Debug)]
pub struct FontRef(Rc<RefCell<FontValue>>);

impl FontRef {
    pub fn new(font: FontValue) -> Self {
        FontRef(Rc::new(RefCell::new(font)))
    }

    pub fn borrow(&self) -> Ref<'_, FontValue> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, FontValue> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &FontRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Independent copy; class defaults are copied per instance.
    #[must_use]
    pub fn duplicate(&self) -> Self {
        FontRef::new(self.borrow().clone())
    }
}

#[cfg(test)]
mod tests;
