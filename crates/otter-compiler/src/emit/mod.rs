//! Quadruple emission.
//!
//! [`QuadEmitter`] owns the append-only quadruple array. The one exception
//! to append-only is [`QuadEmitter::patch`], the single place a pending jump
//! target gets filled in.
//!
//! Emission can be temporarily redirected into a side buffer
//! ([`QuadEmitter::begin_deferred`]); the for-loop uses this to generate its
//! increment before the body but place it after.

mod jumps;

pub use jumps::{JumpManager, LoopContext};

use otter_core::{CompilationError, Quad};

type Result<T> = std::result::Result<T, CompilationError>;

/// Append-only quadruple array with back-patching.
#[derive(Debug, Default)]
pub struct QuadEmitter {
    quads: Vec<Quad>,
    deferred: Option<Vec<Quad>>,
}

impl QuadEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a quadruple and return its index.
    ///
    /// While deferring, the quadruple goes to the side buffer and the
    /// returned index is its position there.
    pub fn emit(&mut self, quad: Quad) -> usize {
        if let Some(buffer) = self.deferred.as_mut() {
            log::trace!("deferred {quad}");
            buffer.push(quad);
            return buffer.len() - 1;
        }
        let index = self.quads.len();
        log::trace!("{index:>4}  {quad}");
        self.quads.push(quad);
        index
    }

    /// Index the next emitted quadruple will get.
    pub fn next_index(&self) -> usize {
        self.quads.len()
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    /// Fill in the target of the pending jump at `index`.
    pub fn patch(&mut self, index: usize, target: usize) -> Result<()> {
        let quad = self
            .quads
            .get_mut(index)
            .ok_or_else(|| CompilationError::internal(format!("no quadruple at {index}")))?;
        if !quad.set_jump_target(target) {
            return Err(CompilationError::internal(format!(
                "quadruple {index} is not a pending jump"
            )));
        }
        log::trace!("patched {index} -> {target}");
        Ok(())
    }

    /// Fill in the pending jump at `index` with the next index.
    pub fn patch_to_next(&mut self, index: usize) -> Result<()> {
        let target = self.next_index();
        self.patch(index, target)
    }

    /// Redirect emission into a side buffer.
    pub fn begin_deferred(&mut self) -> Result<()> {
        if self.deferred.is_some() {
            return Err(CompilationError::internal("deferred emission already active"));
        }
        self.deferred = Some(Vec::new());
        Ok(())
    }

    /// Stop redirecting and hand back what was buffered.
    pub fn end_deferred(&mut self) -> Result<Vec<Quad>> {
        self.deferred
            .take()
            .ok_or_else(|| CompilationError::internal("no deferred emission active"))
    }

    /// Append previously buffered quadruples.
    pub fn append(&mut self, quads: Vec<Quad>) {
        for quad in quads {
            self.emit(quad);
        }
    }

    pub fn into_quads(self) -> Vec<Quad> {
        self.quads
    }
}
