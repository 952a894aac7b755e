//! Variable frames.
//!
//! A [`ScopeStack`] is an ordered list of [`Frame`]s, innermost last. The
//! bottom frame is the global frame and is never popped. Names are
//! interned upper-case, so lookups are case-insensitive.

use rustc_hash::FxHashMap;

use dbs_ir::Name;

use crate::Value;

/// One activation: a method body, an init block or the global program.
#[derive(Debug, Default)]
pub struct Frame {
    name: Name,
    vars: FxHashMap<Name, Value>,
    /// Call arguments, read by `PARAMETER`.
    args: Vec<Value>,
}

impl Frame {
    pub fn new(name: Name) -> Self {
        Frame {
            name,
            vars: FxHashMap::default(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn name(&self) -> Name {
        self.name
    }

    pub fn define(&mut self, name: Name, value: Value) {
        self.vars.insert(name, value);
    }

    pub fn get(&self, name: Name) -> Option<&Value> {
        self.vars.get(&name)
    }

    pub fn contains(&self, name: Name) -> bool {
        self.vars.contains_key(&name)
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

/// Stack of frames with the global frame at the bottom.
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        ScopeStack {
            frames: vec![Frame::new(Name::EMPTY)],
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[inline]
    pub fn push(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    /// Pop the innermost frame. The global frame stays.
    #[inline]
    pub fn pop(&mut self) -> Option<Frame> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    fn innermost(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// First binding from innermost to outermost.
    pub fn get(&self, name: Name) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    pub fn contains(&self, name: Name) -> bool {
        self.frames.iter().any(|frame| frame.contains(name))
    }

    /// Update the nearest frame holding `name`, else bind it in the
    /// innermost frame.
    pub fn set(&mut self, name: Name, value: Value) {
        match self.frames.iter_mut().rev().find(|frame| frame.contains(name)) {
            Some(frame) => frame.define(name, value),
            None => self.innermost().define(name, value),
        }
    }

    /// `LOCAL`: always binds in the innermost frame.
    pub fn define_local(&mut self, name: Name, value: Value) {
        self.innermost().define(name, value);
    }

    /// `DELETE`: drop the nearest binding.
    pub fn remove(&mut self, name: Name) -> Option<Value> {
        self.frames
            .iter_mut()
            .rev()
            .find_map(|frame| frame.vars.remove(&name))
    }

    /// Arguments of the innermost frame.
    pub fn args(&self) -> &[Value] {
        self.frames.last().map_or(&[][..], Frame::args)
    }

    pub fn global(&self, name: Name) -> Option<&Value> {
        self.frames.first().and_then(|frame| frame.get(name))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
