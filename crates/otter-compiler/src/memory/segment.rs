//! Per-scope address allocator.

use otter_core::{Address, CompilationError, SEGMENT_SIZE, ScopeKind, TypeKind};

/// Hands out addresses inside one scope segment, one counter per type.
///
/// Counters only grow (until [`reset`](Memory::reset)), so no two variables
/// allocated from the same `Memory` ever share an address. Cloning a
/// `Memory` lets a subclass continue its parent's INSTANCE numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Memory {
    scope: ScopeKind,
    counters: [u32; TypeKind::ALL.len()],
}

impl Memory {
    pub fn new(scope: ScopeKind) -> Self {
        Self {
            scope,
            counters: [0; TypeKind::ALL.len()],
        }
    }

    pub fn scope(&self) -> ScopeKind {
        self.scope
    }

    /// Number of slots of `kind` handed out so far.
    pub fn used(&self, kind: TypeKind) -> u32 {
        self.counters[kind.index()]
    }

    /// Next free address of `kind`.
    pub fn next_available(&mut self, kind: TypeKind) -> Result<Address, CompilationError> {
        let counter = &mut self.counters[kind.index()];
        let address = Address::new(self.scope, kind, *counter)?;
        *counter += 1;
        log::debug!("allocated {} {} address {}", self.scope, kind, address);
        Ok(address)
    }

    /// Reserve `count` contiguous slots of `kind` and return the first.
    pub fn next_chunk(&mut self, kind: TypeKind, count: u32) -> Result<Address, CompilationError> {
        if kind == TypeKind::ArrayPointer {
            return Err(CompilationError::internal(
                "array pointers cannot be allocated in chunks",
            ));
        }
        let counter = &mut self.counters[kind.index()];
        let first = Address::new(self.scope, kind, *counter)?;
        let end = counter.saturating_add(count);
        if end > SEGMENT_SIZE {
            return Err(CompilationError::OutOfMemory {
                scope: self.scope,
                kind,
            });
        }
        *counter = end;
        log::debug!(
            "allocated {count} {} {} slots starting at {}",
            self.scope,
            kind,
            first
        );
        Ok(first)
    }

    /// Forget every allocation.
    pub fn reset(&mut self) {
        self.counters = [0; TypeKind::ALL.len()];
    }
}
