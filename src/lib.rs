//! Otter
//!
//! Semantic analysis, quadruple generation and a virtual machine for the
//! Otter language.
//!
//! A parse-tree walker drives a [`Compiler`] one callback per construct.
//! [`Compiler::finish`] yields a [`CompiledProgram`] (or every semantic error
//! found) and a [`VirtualMachine`] runs it against a [`Console`].
//!
//! ```
//! use otter::prelude::*;
//!
//! let mut compiler = Compiler::new();
//! compiler.add_class("Main", None).unwrap();
//! compiler.add_constructor("Main", "public").unwrap();
//! compiler.push_constant("string", "\"hello\"").unwrap();
//! compiler.write_quad().unwrap();
//! compiler.end_method().unwrap();
//! compiler.end_class();
//!
//! let mut console = BufferedConsole::new();
//! otter::execute(compiler, &mut console).unwrap();
//! assert_eq!(console.output(), ["hello"]);
//! ```

use thiserror::Error;

pub use otter_compiler::{CallTarget, Compiler, CompilerOptions};
pub use otter_core::{
    CompilationError, CompilationErrors, CompiledProgram, Quad, RuntimeError, Value,
};
pub use otter_vm::{BufferedConsole, Console, StdConsole, VirtualMachine, VmOptions};

// Sub-crates, for callers that need more than the facade
pub use otter_compiler;
pub use otter_core;
pub use otter_vm;

pub mod prelude {
    pub use crate::{OtterError, execute};
    pub use otter_compiler::{CallTarget, Compiler, CompilerOptions};
    pub use otter_core::{
        CompilationError, CompilationErrors, CompiledProgram, OpCode, Quad, RuntimeError, Value,
    };
    pub use otter_vm::{BufferedConsole, Console, StdConsole, VirtualMachine, VmOptions};
}

/// Anything that stops a program from running to completion.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OtterError {
    /// Semantic errors; the program never ran.
    #[error("compilation failed:\n{0}")]
    Compilation(#[from] CompilationErrors),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Finish `compiler` and run the program with default VM options.
///
/// Any semantic error suppresses execution.
pub fn execute<C: Console>(
    compiler: Compiler,
    console: &mut C,
) -> Result<VirtualMachine, OtterError> {
    execute_with_options(compiler, VmOptions::default(), console)
}

pub fn execute_with_options<C: Console>(
    compiler: Compiler,
    options: VmOptions,
    console: &mut C,
) -> Result<VirtualMachine, OtterError> {
    let program = compiler.finish()?;
    let mut vm = VirtualMachine::with_options(program, options);
    vm.run(console)?;
    Ok(vm)
}
