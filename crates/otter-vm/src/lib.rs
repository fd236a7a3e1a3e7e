//! Otter Virtual Machine
//!
//! Executes the quadruples produced by `otter-compiler`.
//!
//! ## Modules
//!
//! - [`memory`]: segment stores, activation records and the object heap
//! - [`console`]: the I/O seam behind `READ` and `WRITE`
//! - [`options`]: VM configuration
//!
//! ## Example
//!
//! ```
//! use otter_core::{CompiledProgram, ConstantTable, Quad};
//! use otter_vm::{BufferedConsole, VirtualMachine};
//!
//! let program = CompiledProgram::new(
//!     vec![Quad::Goto { target: Some(1) }, Quad::EndFunc],
//!     ConstantTable::new(),
//! );
//! let mut console = BufferedConsole::new();
//! VirtualMachine::new(program).run(&mut console).unwrap();
//! assert!(console.output().is_empty());
//! ```

pub mod console;
pub mod memory;
mod ops;
pub mod options;
mod vm;

pub use console::{BufferedConsole, Console, StdConsole};
pub use memory::{Frame, Heap, RuntimeMemory, SegmentStore};
pub use options::VmOptions;
pub use vm::VirtualMachine;

pub use otter_core::RuntimeError;
