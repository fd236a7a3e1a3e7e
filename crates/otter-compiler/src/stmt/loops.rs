//! Loops.
//!
//! `while`:
//!
//! ```text
//! start: cond
//!        GOTOF ──┐
//!        body    │
//!        GOTO start
//!        ... ◄───┘
//! ```
//!
//! `for` generates its increment between the condition and the body but
//! emits it after the body, so the net order is condition, body, increment,
//! jump back.

use otter_core::Quad;

use crate::compiler::{Compiler, Result};

impl Compiler {
    /// Mark the start of a `while` condition.
    pub fn start_while(&mut self) {
        let start = self.emitter.next_index();
        self.jumps.enter_loop(start);
    }

    /// Close a `while` body.
    pub fn end_while(&mut self) -> Result<()> {
        self.track(|c| c.close_loop())
    }

    /// Mark the start of a `for` condition (after its initializer).
    pub fn start_for(&mut self) {
        self.start_while();
    }

    /// The condition is complete; buffer the increment that follows.
    pub fn start_for_increment(&mut self) -> Result<()> {
        self.track(|c| {
            c.emit_conditional_jump(false)?;
            c.emitter.begin_deferred()
        })
    }

    /// The increment is complete; the body follows.
    pub fn start_for_body(&mut self) -> Result<()> {
        self.track(|c| {
            let increment = c.emitter.end_deferred()?;
            c.jumps.current_loop_mut()?.increment = increment;
            Ok(())
        })
    }

    /// Close a `for` body: increment, jump back, exit.
    pub fn end_for(&mut self) -> Result<()> {
        self.track(|c| c.close_loop())
    }

    fn close_loop(&mut self) -> Result<()> {
        let exit = self.jumps.pop_pending()?;
        let context = self.jumps.exit_loop()?;
        self.emitter.append(context.increment);
        self.emitter.emit(Quad::Goto {
            target: Some(context.start),
        });
        self.emitter.patch_to_next(exit)
    }
}
