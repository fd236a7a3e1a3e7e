//! Constant allocator with value deduplication.

use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;

use otter_core::{
    Address, CompilationError, ConstantTable, DataType, ScopeKind, Value, Variable,
};

use super::Memory;

/// Hashable identity of a parsed literal.
///
/// Floats are keyed through [`OrderedFloat`] so `2.0` and `2.00` share a slot.
/// Because the variant carries the type, `5` as INT and `5` as FLOAT never do.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ConstantKey {
    Int(i64),
    Float(OrderedFloat<f64>),
    Bool(bool),
    Str(String),
}

impl ConstantKey {
    fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Int(v) => Some(ConstantKey::Int(*v)),
            Value::Float(v) => Some(ConstantKey::Float(OrderedFloat(*v))),
            Value::Bool(v) => Some(ConstantKey::Bool(*v)),
            Value::Str(s) => Some(ConstantKey::Str(s.clone())),
            Value::Object(_) | Value::Pointer(_) => None,
        }
    }
}

/// The CONSTANT segment: the only memory populated at compile time.
#[derive(Debug, Clone)]
pub struct ConstMemory {
    memory: Memory,
    addresses: FxHashMap<ConstantKey, Address>,
    table: ConstantTable,
}

impl Default for ConstMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstMemory {
    pub fn new() -> Self {
        Self {
            memory: Memory::new(ScopeKind::Constant),
            addresses: FxHashMap::default(),
            table: ConstantTable::new(),
        }
    }

    /// Address of the literal, allocating it on first use.
    ///
    /// The returned variable is named after the literal text.
    pub fn get_or_insert(
        &mut self,
        literal: &str,
        data_type: &DataType,
    ) -> Result<Variable, CompilationError> {
        let invalid = || CompilationError::InvalidLiteral {
            literal: literal.to_string(),
            data_type: data_type.to_string(),
        };
        let value = Value::parse_literal(literal, data_type).ok_or_else(invalid)?;
        let key = ConstantKey::of(&value).ok_or_else(invalid)?;

        let address = match self.addresses.get(&key) {
            Some(address) => {
                log::debug!("reusing constant {literal} at {address}");
                *address
            }
            None => {
                let address = self.memory.next_available(data_type.kind())?;
                self.addresses.insert(key, address);
                self.table.insert(address, value);
                address
            }
        };
        Ok(Variable::new(literal, data_type.clone(), address))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn table(&self) -> &ConstantTable {
        &self.table
    }

    pub fn into_table(self) -> ConstantTable {
        self.table
    }
}
