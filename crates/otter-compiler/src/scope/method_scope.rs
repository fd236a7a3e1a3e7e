use otter_core::{AccessModifier, DataType, ScopeKind, Variable};

use crate::memory::Memory;

use super::{ClassId, TableId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Constructor,
}

/// A method or constructor declaration.
#[derive(Debug, Clone)]
pub struct MethodScope {
    pub name: String,
    pub kind: MethodKind,
    pub access: AccessModifier,
    pub class: ClassId,
    /// Parameter names in declaration order; the variables live in `locals`.
    pub parameters: Vec<String>,
    /// `None` for void methods.
    pub return_type: Option<DataType>,
    /// GLOBAL cell the callee stores its result in.
    pub return_slot: Option<Variable>,
    /// Index of the first quadruple of the body.
    pub entry: usize,
    pub locals: TableId,
    pub memory: Memory,
    /// Set when the declaration was rejected; nothing can call it.
    pub detached: bool,
    /// Whether the body contains a `return e`.
    pub returns_value: bool,
}

impl MethodScope {
    pub fn new(
        name: impl Into<String>,
        kind: MethodKind,
        access: AccessModifier,
        class: ClassId,
        locals: TableId,
        entry: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            access,
            class,
            parameters: Vec::new(),
            return_type: None,
            return_slot: None,
            entry,
            locals,
            memory: Memory::new(ScopeKind::Local),
            detached: false,
            returns_value: false,
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MethodKind::Constructor
    }

    pub fn is_void(&self) -> bool {
        self.return_type.is_none()
    }

    pub fn is_private(&self) -> bool {
        self.access == AccessModifier::Private
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}
