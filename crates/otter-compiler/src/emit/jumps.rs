//! Jump bookkeeping for control flow.
//!
//! Tracks the indices of pending forward jumps waiting for a back-patch and
//! a stack of loop contexts holding each loop's start index (the target of
//! its closing backward jump).

use otter_core::{CompilationError, Quad};

/// One loop being compiled.
#[derive(Debug, Default)]
pub struct LoopContext {
    /// Index of the first condition quadruple.
    pub start: usize,
    /// For-loop increment, generated before the body and emitted after it.
    pub increment: Vec<Quad>,
}

/// Pending jumps and open loops, innermost last.
#[derive(Debug, Default)]
pub struct JumpManager {
    pending: Vec<usize>,
    loops: Vec<LoopContext>,
}

impl JumpManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a jump whose target is not known yet.
    pub fn push_pending(&mut self, index: usize) {
        self.pending.push(index);
    }

    pub fn pop_pending(&mut self) -> Result<usize, CompilationError> {
        self.pending
            .pop()
            .ok_or_else(|| CompilationError::internal("no pending jump to resolve"))
    }

    /// Enter a loop whose condition starts at `start`.
    pub fn enter_loop(&mut self, start: usize) {
        self.loops.push(LoopContext {
            start,
            increment: Vec::new(),
        });
    }

    /// Exit the current loop.
    pub fn exit_loop(&mut self) -> Result<LoopContext, CompilationError> {
        self.loops
            .pop()
            .ok_or_else(|| CompilationError::internal("not inside a loop"))
    }

    /// The innermost loop.
    pub fn current_loop_mut(&mut self) -> Result<&mut LoopContext, CompilationError> {
        self.loops
            .last_mut()
            .ok_or_else(|| CompilationError::internal("not inside a loop"))
    }
}
