//! Otter Compiler
//!
//! Semantic analysis and quadruple generation, driven one callback at a time
//! by an external parse-tree walker.
//!
//! ## Architecture
//!
//! - **Declarations** register classes, methods and variables in chained
//!   symbol tables and hand out segmented addresses.
//! - **Code generation** type-checks every operation against a static table
//!   and appends quadruples, back-patching jumps as blocks close.
//!
//! ## Modules
//!
//! - [`memory`]: segmented address allocators
//! - [`scope`]: symbol tables, class and method scopes
//! - [`context`]: all declarative state of one compilation
//! - [`operators`]: the type-compatibility oracle
//! - [`emit`]: quadruple array, back-patching and jump bookkeeping
//! - [`options`]: compiler configuration
//!
//! ## Example
//!
//! ```
//! use otter_compiler::Compiler;
//!
//! let mut compiler = Compiler::new();
//! compiler.add_class("Main", None).unwrap();
//! compiler.add_constructor("Main", "public").unwrap();
//! compiler.add_variable("x", "int").unwrap();
//! compiler.push_variable("x").unwrap();
//! compiler.push_operator("=").unwrap();
//! compiler.push_constant("int", "5").unwrap();
//! compiler.assign().unwrap();
//! compiler.end_method().unwrap();
//! compiler.end_class();
//!
//! let program = compiler.finish().unwrap();
//! assert_eq!(program.constants().len(), 1);
//! ```

mod calls;
mod compiler;
pub mod context;
mod decl;
pub mod emit;
mod expr;
pub mod memory;
pub mod operators;
pub mod options;
pub mod scope;
mod stmt;

pub use calls::CallTarget;
pub use compiler::Compiler;
pub use context::CompilationContext;
pub use emit::{JumpManager, QuadEmitter};
pub use memory::{CompilationMemory, ConstMemory, Memory};
pub use operators::{verify, verify_unary};
pub use options::CompilerOptions;
pub use scope::{ClassId, ClassScope, MethodId, MethodScope};

// Re-export the shared types for convenience
pub use otter_core::{CompilationError, CompilationErrors, CompiledProgram};
