//! Otter Core
//!
//! Types shared by the compiler and the virtual machine.
//!
//! ## Modules
//!
//! - [`address`]: segmented address space (scope segments and type segments)
//! - [`data_type`]: static types
//! - [`operator`]: operator symbols
//! - [`variable`]: variables, access modifiers and array dimensions
//! - [`quad`]: the quadruple instruction set
//! - [`value`]: runtime values
//! - [`program`]: the compiled program handed to the VM
//! - [`error`]: error types for both phases

pub mod address;
pub mod data_type;
pub mod error;
pub mod operator;
pub mod program;
pub mod quad;
pub mod value;
pub mod variable;

pub use address::{Address, SEGMENT_SIZE, ScopeKind, TypeKind, strip_scope_prefix};
pub use data_type::DataType;
pub use error::{AddressError, CompilationError, CompilationErrors, RuntimeError};
pub use operator::Operator;
pub use program::{CompiledProgram, ConstantTable};
pub use quad::{EraTarget, OpCode, Quad};
pub use value::{ObjectRef, Value};
pub use variable::{AccessModifier, Dimension, Variable};
