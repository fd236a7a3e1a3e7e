//! Compile-time address allocation.
//!
//! - [`Memory`]: monotonic per-type counters for one scope segment
//! - [`ConstMemory`]: the CONSTANT segment, deduplicated by literal value
//! - [`CompilationMemory`]: the allocators that live for a whole compilation
//!
//! LOCAL memory belongs to each method and INSTANCE memory to each class; both
//! are owned by their scopes, not by the registry.

mod constant;
mod segment;

pub use constant::ConstMemory;
pub use segment::Memory;

use otter_core::ScopeKind;

/// GLOBAL, CONSTANT and TEMPORARY allocators for one compilation.
#[derive(Debug, Clone)]
pub struct CompilationMemory {
    pub global: Memory,
    pub constants: ConstMemory,
    pub temporaries: Memory,
}

impl Default for CompilationMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilationMemory {
    pub fn new() -> Self {
        Self {
            global: Memory::new(ScopeKind::Global),
            constants: ConstMemory::new(),
            temporaries: Memory::new(ScopeKind::Temporary),
        }
    }

    /// Start a fresh TEMPORARY numbering for the next method body.
    pub fn reset_temporaries(&mut self) {
        self.temporaries.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otter_core::{DataType, TypeKind};

    #[test]
    fn registry_segments() {
        let mut memory = CompilationMemory::new();
        assert_eq!(memory.global.next_available(TypeKind::Int).unwrap().to_raw(), 0);
        assert_eq!(
            memory.temporaries.next_available(TypeKind::Bool).unwrap().to_raw(),
            34_000
        );
        let five = memory.constants.get_or_insert("5", &DataType::Int).unwrap();
        assert_eq!(five.address.to_raw(), 20_000);

        memory.reset_temporaries();
        assert_eq!(
            memory.temporaries.next_available(TypeKind::Bool).unwrap().to_raw(),
            34_000
        );
        // Globals are not affected.
        assert_eq!(memory.global.next_available(TypeKind::Int).unwrap().to_raw(), 1);
    }
}
