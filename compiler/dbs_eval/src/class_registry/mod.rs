//! Class definitions and the collect pass.
//!
//! [`ClassCollector`] walks the top-level class declarations once and
//! builds a [`ClassRegistry`]: an arena of [`ClassDef`]s addressed by
//! [`ClassId`], with parent links resolved to ids. The built-in native
//! classes `FORM`, `DIALOG` and `PUSHBUTTON` are registered first. After
//! the interpreter fills in property defaults the registry is read-only.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use thiserror::Error;

use dbs_diagnostic::{Diagnostic, ErrorCode};
use dbs_ir::ast::{ExprId, StmtId, StmtKind, SyntaxTree};
use dbs_ir::{Name, Span, StringInterner};

use crate::Value;

/// Index of a class in its [`ClassRegistry`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassId(u32);

impl ClassId {
    #[cfg(test)]
    pub(crate) const fn from_raw(raw: u32) -> Self {
        ClassId(raw)
    }

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Toolkit widget behind a native class.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NativeBase {
    Form,
    Dialog,
    PushButton,
}

impl NativeBase {
    pub const ALL: [NativeBase; 3] = [NativeBase::Form, NativeBase::Dialog, NativeBase::PushButton];

    pub fn name(self) -> Name {
        match self {
            NativeBase::Form => Name::FORM,
            NativeBase::Dialog => Name::DIALOG,
            NativeBase::PushButton => Name::PUSHBUTTON,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NativeBase::Form => "FORM",
            NativeBase::Dialog => "DIALOG",
            NativeBase::PushButton => "PUSHBUTTON",
        }
    }
}

#[derive(Debug)]
pub struct MethodDef {
    pub name: Name,
    pub params: Vec<Name>,
    pub body: Vec<StmtId>,
    /// Class that declares the method; `SUPER::` starts at its parent.
    pub class: ClassId,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct PropertyDef {
    pub name: Name,
    pub default: Option<ExprId>,
    pub span: Span,
}

#[derive(Debug)]
pub struct ClassDef {
    pub name: Name,
    pub parent_name: Option<Name>,
    pub parent: Option<ClassId>,
    pub methods: FxHashMap<Name, Rc<MethodDef>>,
    /// `PROPERTY` declarations in source order.
    pub properties: Vec<PropertyDef>,
    /// Evaluated property defaults; `None` until the interpreter first
    /// needs them.
    pub defaults: Option<Vec<(Name, Value)>>,
    /// Class-body statements run once per instance before `INIT`.
    pub init: Vec<StmtId>,
    pub native: Option<NativeBase>,
    pub span: Span,
}

impl ClassDef {
    fn native(base: NativeBase) -> Self {
        ClassDef {
            name: base.name(),
            parent_name: None,
            parent: None,
            methods: FxHashMap::default(),
            properties: Vec::new(),
            defaults: Some(Vec::new()),
            init: Vec::new(),
            native: Some(base),
            span: Span::DUMMY,
        }
    }
}

/// Errors found while collecting classes.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SemanticError {
    #[error("`{member}` is declared twice in class `{class}`")]
    DuplicateMember {
        class: String,
        member: String,
        span: Span,
        first: Span,
    },
    #[error("class `{name}` is declared twice")]
    DuplicateClass {
        name: String,
        span: Span,
        first: Option<Span>,
    },
    #[error("class `{class}` inherits from unknown class `{parent}`")]
    UnknownParent {
        class: String,
        parent: String,
        span: Span,
    },
    #[error("class `{class}` inherits from itself: {}", .chain.join(" -> "))]
    InheritanceCycle {
        class: String,
        chain: Vec<String>,
        span: Span,
    },
}

impl SemanticError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            SemanticError::DuplicateMember { .. } => ErrorCode::E2001,
            SemanticError::DuplicateClass { .. } => ErrorCode::E2002,
            SemanticError::UnknownParent { .. } => ErrorCode::E2003,
            SemanticError::InheritanceCycle { .. } => ErrorCode::E2004,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            SemanticError::DuplicateMember { span, .. }
            | SemanticError::DuplicateClass { span, .. }
            | SemanticError::UnknownParent { span, .. }
            | SemanticError::InheritanceCycle { span, .. } => *span,
        }
    }

    #[cold]
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.error_code())
            .with_message(self.to_string())
            .with_label(self.span(), "declared here");
        match self {
            SemanticError::DuplicateMember { first, .. }
            | SemanticError::DuplicateClass {
                first: Some(first),
                ..
            } => diag.with_secondary_label(*first, "first declared here"),
            SemanticError::DuplicateClass { first: None, .. } => {
                diag.with_note("built-in class names cannot be redeclared")
            }
            SemanticError::UnknownParent { .. } | SemanticError::InheritanceCycle { .. } => diag,
        }
    }
}

/// All classes of one program.
#[derive(Debug)]
pub struct ClassRegistry {
    classes: Vec<ClassDef>,
    by_name: FxHashMap<Name, ClassId>,
}

impl ClassRegistry {
    /// Registry holding only the native classes.
    pub fn with_builtins() -> Self {
        let mut registry = ClassRegistry {
            classes: Vec::new(),
            by_name: FxHashMap::default(),
        };
        for base in NativeBase::ALL {
            registry.insert(ClassDef::native(base));
        }
        registry
    }

    fn insert(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId(u32::try_from(self.classes.len()).unwrap_or(u32::MAX));
        self.by_name.insert(def.name, id);
        self.classes.push(def);
        id
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn lookup(&self, name: Name) -> Option<ClassId> {
        self.by_name.get(&name).copied()
    }

    #[inline]
    pub fn get(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = ClassId> + '_ {
        (0..self.classes.len()).map(|i| ClassId(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    pub(crate) fn set_defaults(&mut self, id: ClassId, defaults: Vec<(Name, Value)>) {
        self.classes[id.index()].defaults = Some(defaults);
    }

    /// Ancestors, root first, ending with `id`.
    pub fn chain(&self, id: ClassId) -> Vec<ClassId> {
        let mut chain = vec![id];
        let mut current = self.get(id).parent;
        while let Some(parent) = current {
            if chain.contains(&parent) {
                break;
            }
            chain.push(parent);
            current = self.get(parent).parent;
        }
        chain.reverse();
        chain
    }

    /// Method lookup from `start` up through the parent chain.
    pub fn find_method(&self, start: ClassId, name: Name) -> Option<&Rc<MethodDef>> {
        self.chain(start)
            .into_iter()
            .rev()
            .find_map(|id| self.get(id).methods.get(&name))
    }

    /// Nearest native base class in the chain of `id`.
    pub fn native_base(&self, id: ClassId) -> Option<NativeBase> {
        self.chain(id)
            .into_iter()
            .rev()
            .find_map(|id| self.get(id).native)
    }

    #[cfg(test)]
    pub(crate) fn descends_from(&self, id: ClassId, ancestor: Name) -> bool {
        self.chain(id)
            .into_iter()
            .any(|id| self.get(id).name == ancestor)
    }

    /// Class names, sorted, for diagnostics.
    pub fn class_names<'i>(&self, interner: &'i StringInterner) -> Vec<&'i str> {
        let mut names: Vec<_> = self
            .classes
            .iter()
            .map(|class| interner.lookup(class.name))
            .collect();
        names.sort_unstable();
        names
    }
}

/// The collect pass: registers every top-level class declaration.
pub struct ClassCollector<'a> {
    tree: &'a SyntaxTree,
    interner: &'a StringInterner,
    registry: ClassRegistry,
}

impl<'a> ClassCollector<'a> {
    pub fn new(tree: &'a SyntaxTree, interner: &'a StringInterner) -> Self {
        ClassCollector {
            tree,
            interner,
            registry: ClassRegistry::with_builtins(),
        }
    }

    #[tracing::instrument(level = "debug", skip_all)]
    pub fn collect(mut self) -> Result<ClassRegistry, SemanticError> {
        let tree = self.tree;
        for &item in tree.items() {
            let stmt = tree.stmt(item);
            if let StmtKind::ClassDecl(decl) = &stmt.kind {
                self.register(decl, stmt.span)?;
            }
        }
        self.resolve_parents()?;
        self.check_cycles()?;
        tracing::debug!(classes = self.registry.len(), "classes collected");
        Ok(self.registry)
    }

    fn name(&self, name: Name) -> String {
        self.interner.lookup(name).to_string()
    }

    fn register(
        &mut self,
        decl: &dbs_ir::ast::ClassDecl,
        span: Span,
    ) -> Result<(), SemanticError> {
        if let Some(existing) = self.registry.lookup(decl.name) {
            let existing = self.registry.get(existing);
            return Err(SemanticError::DuplicateClass {
                name: self.name(decl.name),
                span,
                first: existing.native.is_none().then_some(existing.span),
            });
        }
        if decl.name == Name::FONT {
            return Err(SemanticError::DuplicateClass {
                name: self.name(decl.name),
                span,
                first: None,
            });
        }

        let id = ClassId(u32::try_from(self.registry.len()).unwrap_or(u32::MAX));
        let mut methods: FxHashMap<Name, Rc<MethodDef>> = FxHashMap::default();
        let mut properties: Vec<PropertyDef> = Vec::new();
        let mut seen: FxHashMap<Name, Span> = FxHashMap::default();
        let mut init = Vec::new();

        let tree = self.tree;
        for &member in &decl.members {
            let stmt = tree.stmt(member);
            let declared = match &stmt.kind {
                StmtKind::MethodDecl(method) => {
                    methods.insert(
                        method.name,
                        Rc::new(MethodDef {
                            name: method.name,
                            params: method.params.clone(),
                            body: method.body.clone(),
                            class: id,
                            span: stmt.span,
                        }),
                    );
                    method.name
                }
                StmtKind::PropertyDecl { name, default } => {
                    properties.push(PropertyDef {
                        name: *name,
                        default: *default,
                        span: stmt.span,
                    });
                    *name
                }
                _ => {
                    init.push(member);
                    continue;
                }
            };
            if let Some(first) = seen.insert(declared, stmt.span) {
                return Err(SemanticError::DuplicateMember {
                    class: self.name(decl.name),
                    member: self.name(declared),
                    span: stmt.span,
                    first,
                });
            }
        }

        tracing::debug!(
            class = self.interner.lookup(decl.name),
            methods = methods.len(),
            properties = properties.len(),
            init = init.len(),
            "registered class"
        );
        self.registry.insert(ClassDef {
            name: decl.name,
            parent_name: decl.parent,
            parent: None,
            methods,
            properties,
            defaults: None,
            init,
            native: None,
            span,
        });
        Ok(())
    }

    fn resolve_parents(&mut self) -> Result<(), SemanticError> {
        for index in 0..self.registry.classes.len() {
            let Some(parent_name) = self.registry.classes[index].parent_name else {
                continue;
            };
            let Some(parent) = self.registry.lookup(parent_name) else {
                let class = &self.registry.classes[index];
                return Err(SemanticError::UnknownParent {
                    class: self.name(class.name),
                    parent: self.name(parent_name),
                    span: class.span,
                });
            };
            self.registry.classes[index].parent = Some(parent);
        }
        Ok(())
    }

    fn check_cycles(&self) -> Result<(), SemanticError> {
        for id in self.registry.ids() {
            let mut path = vec![id];
            let mut current = self.registry.get(id).parent;
            while let Some(parent) = current {
                if parent == id {
                    path.push(parent);
                    let class = self.registry.get(id);
                    return Err(SemanticError::InheritanceCycle {
                        class: self.name(class.name),
                        chain: path
                            .iter()
                            .map(|&c| self.name(self.registry.get(c).name))
                            .collect(),
                        span: class.span,
                    });
                }
                if path.contains(&parent) {
                    // Cycle above this class; reported when its members are visited.
                    break;
                }
                path.push(parent);
                current = self.registry.get(parent).parent;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
