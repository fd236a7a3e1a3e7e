//! Declarative entities built while traversing declarations.
//!
//! - [`symbol_table`]: arena of chained name → symbol tables
//! - [`ClassScope`]: a class with its attribute and method tables
//! - [`MethodScope`]: a method or constructor with its locals

mod class_scope;
mod method_scope;
pub mod symbol_table;

pub use class_scope::ClassScope;
pub use method_scope::{MethodKind, MethodScope};
pub use symbol_table::{SymbolTable, TableArena, TableId};

/// Index of a class in the compilation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassId(pub(crate) usize);

/// Index of a method in the compilation context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(pub(crate) usize);

/// Method-table key of a class's constructor.
///
/// `@` cannot start an identifier, so this never collides with a user method.
pub fn constructor_key(class: &str) -> String {
    format!("@{class}")
}
