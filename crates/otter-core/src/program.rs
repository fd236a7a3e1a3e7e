//! The finished output of compilation.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::address::Address;
use crate::quad::{OpCode, Quad};
use crate::value::Value;

/// Literal values keyed by their CONSTANT address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantTable {
    values: FxHashMap<Address, Value>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, address: Address, value: Value) {
        self.values.insert(address, value);
    }

    pub fn get(&self, address: Address) -> Option<&Value> {
        self.values.get(&address)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries sorted by address.
    pub fn sorted(&self) -> Vec<(Address, &Value)> {
        let mut entries: Vec<_> = self.values.iter().map(|(a, v)| (*a, v)).collect();
        entries.sort_by_key(|(address, _)| *address);
        entries
    }
}

/// A quadruple array ready for the virtual machine.
///
/// Instruction 0 is always the jump to the entry constructor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledProgram {
    quads: Vec<Quad>,
    constants: ConstantTable,
}

impl CompiledProgram {
    pub fn new(quads: Vec<Quad>, constants: ConstantTable) -> Self {
        Self { quads, constants }
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn constants(&self) -> &ConstantTable {
        &self.constants
    }

    pub fn get(&self, ip: usize) -> Option<&Quad> {
        self.quads.get(ip)
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Opcode sequence, handy for asserting on code shape.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.quads.iter().map(Quad::opcode).collect()
    }
}

impl fmt::Display for CompiledProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, quad) in self.quads.iter().enumerate() {
            writeln!(f, "{index:>4}  {quad}")?;
        }
        if !self.constants.is_empty() {
            writeln!(f, "constants:")?;
            for (address, value) in self.constants.sorted() {
                writeln!(f, "{address:>8}  {value}")?;
            }
        }
        Ok(())
    }
}
