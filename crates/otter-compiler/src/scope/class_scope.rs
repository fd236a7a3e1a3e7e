use crate::memory::Memory;

use super::{ClassId, TableId};

/// A class declaration.
///
/// Both tables are chained to the parent class's tables, so inherited
/// attributes and methods resolve without copying. The INSTANCE allocator
/// starts as a copy of the parent's, so a subclass's own attributes never
/// overlap the ones it inherits.
#[derive(Debug, Clone)]
pub struct ClassScope {
    pub name: String,
    pub parent: Option<ClassId>,
    /// Attribute table; the root class chains it to the global variables.
    pub attributes: TableId,
    /// Method table, keyed by method name and constructor key.
    pub methods: TableId,
    pub memory: Memory,
    /// Set when the declaration was rejected; nothing inside is reachable.
    pub detached: bool,
}

impl ClassScope {
    pub fn new(
        name: impl Into<String>,
        parent: Option<ClassId>,
        attributes: TableId,
        methods: TableId,
        memory: Memory,
    ) -> Self {
        Self {
            name: name.into(),
            parent,
            attributes,
            methods,
            memory,
            detached: false,
        }
    }

    pub fn detach(mut self) -> Self {
        self.detached = true;
        self
    }
}
