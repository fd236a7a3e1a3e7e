//! The callback surface a parse-tree walker drives.
//!
//! A [`Compiler`] is created before traversal, receives one call per
//! syntactic construct and is consumed by [`Compiler::finish`]. The callbacks
//! are grouped by concern:
//!
//! - declarations (`decl`)
//! - expressions and array indexing (`expr`)
//! - statements (`stmt`)
//! - method calls (`calls`)
//!
//! Every callback returns `Result`; any error is also kept in the error list
//! so [`finish`](Compiler::finish) can report all of them. After a failed
//! declaration the compiler stays usable so traversal can go on.

use otter_core::{
    CompilationError, CompilationErrors, CompiledProgram, DataType, Operator, Quad, ScopeKind,
    TypeKind, Variable,
};

use crate::calls::PendingCall;
use crate::context::CompilationContext;
use crate::emit::{JumpManager, QuadEmitter};
use crate::expr::DimOperand;
use crate::options::CompilerOptions;

pub(crate) type Result<T> = std::result::Result<T, CompilationError>;

/// Index of the jump to the entry constructor.
pub(crate) const ENTRY_JUMP: usize = 0;

/// Whether a value can be stored into `variable`: constants never, and
/// temporaries only when they point at an array element.
pub(crate) fn is_writable(variable: &Variable) -> bool {
    match variable.address.scope {
        ScopeKind::Constant => false,
        ScopeKind::Temporary => variable.is_pointer(),
        _ => true,
    }
}

/// Semantic analyzer and quadruple generator for one program.
#[derive(Debug)]
pub struct Compiler {
    pub(crate) options: CompilerOptions,
    pub(crate) ctx: CompilationContext,
    pub(crate) emitter: QuadEmitter,
    pub(crate) jumps: JumpManager,
    pub(crate) operands: Vec<Variable>,
    pub(crate) operators: Vec<Operator>,
    pub(crate) dim_operands: Vec<DimOperand>,
    pub(crate) calls: Vec<PendingCall>,
    pub(crate) entry_patched: bool,
    errors: CompilationErrors,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::with_options(CompilerOptions::default())
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        let mut emitter = QuadEmitter::new();
        emitter.emit(Quad::Goto { target: None });
        Self {
            options,
            ctx: CompilationContext::new(),
            emitter,
            jumps: JumpManager::new(),
            operands: Vec::new(),
            operators: Vec::new(),
            dim_operands: Vec::new(),
            calls: Vec::new(),
            entry_patched: false,
            errors: CompilationErrors::new(),
        }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Errors reported so far.
    pub fn errors(&self) -> &CompilationErrors {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Quadruples emitted so far.
    pub fn quads(&self) -> &[Quad] {
        self.emitter.quads()
    }

    pub fn context(&self) -> &CompilationContext {
        &self.ctx
    }

    /// Top of the operand stack.
    pub fn peek_operand(&self) -> Option<&Variable> {
        self.operands.last()
    }

    /// Hand over the finished program, or every error reported.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn finish(mut self) -> std::result::Result<CompiledProgram, CompilationErrors> {
        if !self.entry_patched {
            self.errors.push(CompilationError::MissingEntryPoint {
                class: self.options.entry_class.clone(),
            });
        }
        if !self.errors.is_empty() {
            log::debug!("compilation failed with {} error(s)", self.errors.len());
            return Err(self.errors);
        }
        let quads = self.emitter.into_quads();
        let constants = self.ctx.into_memory().constants.into_table();
        log::debug!(
            "compiled {} quadruples and {} constants",
            quads.len(),
            constants.len()
        );
        Ok(CompiledProgram::new(quads, constants))
    }

    // ==========================================================================
    // Internal helpers
    // ==========================================================================

    /// Run a callback body and keep a copy of its error.
    pub(crate) fn track<T>(&mut self, body: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = body(self);
        if let Err(error) = &result {
            log::debug!("semantic error: {error}");
            self.errors.push(error.clone());
        }
        result
    }

    pub(crate) fn pop_operand(&mut self) -> Result<Variable> {
        self.operands
            .pop()
            .ok_or_else(|| CompilationError::internal("operand stack is empty"))
    }

    pub(crate) fn pop_operator(&mut self) -> Result<Operator> {
        self.operators
            .pop()
            .ok_or_else(|| CompilationError::internal("operator stack is empty"))
    }

    /// Pop the fake bottom that isolates a group on the operator stack.
    pub(crate) fn pop_fake_bottom(&mut self) -> Result<()> {
        match self.pop_operator()? {
            Operator::FakeBottom => Ok(()),
            other => Err(CompilationError::internal(format!(
                "expected '(' on the operator stack, found '{other}'"
            ))),
        }
    }

    /// A fresh TEMPORARY of `data_type`.
    pub(crate) fn new_temp(&mut self, data_type: DataType) -> Result<Variable> {
        let address = self
            .ctx
            .memory_mut()
            .temporaries
            .next_available(data_type.kind())?;
        Ok(Variable::new(format!("t{address}"), data_type, address))
    }

    /// A fresh ARRAY_POINTER temporary designating an element of `element`.
    pub(crate) fn new_pointer(&mut self, element: DataType) -> Result<Variable> {
        let address = self
            .ctx
            .memory_mut()
            .temporaries
            .next_available(TypeKind::ArrayPointer)?;
        Ok(Variable::new(format!("p{address}"), element, address))
    }
}
