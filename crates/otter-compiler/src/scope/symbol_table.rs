//! Symbol tables with parent-chain lookup.
//!
//! Tables live in a [`TableArena`] and refer to their parent by [`TableId`].
//! A lookup walks from a table through its ancestors; an insertion fails if
//! the name is visible anywhere along that chain, so names never shadow.

use rustc_hash::FxHashMap;

/// Index of a table inside its arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

/// One name → symbol mapping.
#[derive(Debug, Clone)]
pub struct SymbolTable<T> {
    name: String,
    parent: Option<TableId>,
    entries: FxHashMap<String, T>,
}

impl<T> SymbolTable<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<TableId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Name already visible from the table an insertion targeted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    /// Table the name was found in.
    pub found_in: String,
}

/// Owner of every table of one symbol kind.
#[derive(Debug, Clone)]
pub struct TableArena<T> {
    tables: Vec<SymbolTable<T>>,
}

impl<T> Default for TableArena<T> {
    fn default() -> Self {
        Self { tables: Vec::new() }
    }
}

impl<T> TableArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table chained to `parent`.
    pub fn create(&mut self, name: impl Into<String>, parent: Option<TableId>) -> TableId {
        let id = TableId(self.tables.len());
        self.tables.push(SymbolTable {
            name: name.into(),
            parent,
            entries: FxHashMap::default(),
        });
        id
    }

    pub fn table(&self, id: TableId) -> &SymbolTable<T> {
        &self.tables[id.0]
    }

    /// Ids from `id` up to the root of its chain.
    pub fn chain(&self, id: TableId) -> impl Iterator<Item = TableId> + '_ {
        std::iter::successors(Some(id), move |current| self.tables[current.0].parent)
    }

    /// Find `name` in `id` or any ancestor.
    pub fn search(&self, id: TableId, name: &str) -> Option<&T> {
        self.chain(id).find_map(|table| self.get(table, name))
    }

    /// Find `name` in `id` only.
    pub fn get(&self, id: TableId, name: &str) -> Option<&T> {
        self.tables[id.0].entries.get(name)
    }

    pub fn get_mut(&mut self, id: TableId, name: &str) -> Option<&mut T> {
        self.tables[id.0].entries.get_mut(name)
    }

    /// Insert `value` under `name` unless the name is already visible.
    pub fn add(&mut self, id: TableId, name: impl Into<String>, value: T) -> Result<(), Duplicate> {
        let name = name.into();
        if let Some(owner) = self
            .chain(id)
            .find(|table| self.tables[table.0].entries.contains_key(&name))
        {
            return Err(Duplicate {
                found_in: self.tables[owner.0].name.clone(),
            });
        }
        self.tables[id.0].entries.insert(name, value);
        Ok(())
    }
}
