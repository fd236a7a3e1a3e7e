//! Conditional jumps and their back-patching.
//!
//! ```text
//! if (c) { A } else { B }
//!
//!     GOTOF c ──┐
//!     A         │
//!     GOTO ─────┼──┐
//!     B   ◄─────┘  │
//!     ...  ◄───────┘
//! ```

use otter_core::{CompilationError, DataType, Quad};

use crate::compiler::{Compiler, Result};

impl Compiler {
    /// Pop the condition and emit a pending conditional jump.
    ///
    /// `unless` jumps when the condition is true, everything else when it
    /// is false.
    pub fn start_condition(&mut self, is_unless: bool) -> Result<()> {
        self.track(|c| c.emit_conditional_jump(is_unless))
    }

    pub(crate) fn emit_conditional_jump(&mut self, is_unless: bool) -> Result<()> {
        let condition = self.pop_operand()?;
        if condition.data_type != DataType::Bool {
            return Err(CompilationError::ConditionNotBool {
                found: condition.data_type.to_string(),
            });
        }
        let quad = if is_unless {
            Quad::GotoT {
                condition,
                target: None,
            }
        } else {
            Quad::GotoF {
                condition,
                target: None,
            }
        };
        let index = self.emitter.emit(quad);
        self.jumps.push_pending(index);
        Ok(())
    }

    /// Close the `then` block and open the `else` block.
    pub fn else_quad(&mut self) -> Result<()> {
        self.track(|c| {
            let skip_else = c.emitter.emit(Quad::Goto { target: None });
            let condition_jump = c.jumps.pop_pending()?;
            c.emitter.patch_to_next(condition_jump)?;
            c.jumps.push_pending(skip_else);
            Ok(())
        })
    }

    /// Emit a pending unconditional jump, resolved by the next
    /// [`end_condition`](Compiler::end_condition).
    pub fn goto_quad(&mut self) -> Result<()> {
        self.track(|c| {
            let index = c.emitter.emit(Quad::Goto { target: None });
            c.jumps.push_pending(index);
            Ok(())
        })
    }

    /// Resolve the innermost pending jump to the next quadruple.
    pub fn end_condition(&mut self) -> Result<()> {
        self.track(|c| {
            let pending = c.jumps.pop_pending()?;
            c.emitter.patch_to_next(pending)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otter_core::OpCode;

    fn in_method() -> Compiler {
        let mut compiler = Compiler::new();
        compiler.add_class("Main", None).unwrap();
        compiler.add_constructor("Main", "public").unwrap();
        compiler.add_variable("x", "int").unwrap();
        compiler
    }

    fn push_comparison(c: &mut Compiler) {
        c.push_variable("x").unwrap();
        c.push_operator(">").unwrap();
        c.push_constant("int", "0").unwrap();
        c.check_pending_relational().unwrap();
    }

    fn write_x(c: &mut Compiler) {
        c.push_variable("x").unwrap();
        c.write_quad().unwrap();
    }

    #[test]
    fn if_patches_past_the_block() {
        let mut c = in_method();
        push_comparison(&mut c);
        c.start_condition(false).unwrap();
        write_x(&mut c);
        c.end_condition().unwrap();

        // 1: >, 2: GOTOF, 3: WRITE
        assert_eq!(c.quads()[2].opcode(), OpCode::GotoF);
        assert_eq!(c.quads()[2].jump_target(), Some(4));
    }

    #[test]
    fn else_jumps_over_the_else_block() {
        let mut c = in_method();
        push_comparison(&mut c);
        c.start_condition(false).unwrap();
        write_x(&mut c);
        c.else_quad().unwrap();
        write_x(&mut c);
        c.end_condition().unwrap();

        // 1: >, 2: GOTOF, 3: WRITE, 4: GOTO, 5: WRITE
        assert_eq!(c.quads()[2].jump_target(), Some(5));
        assert_eq!(c.quads()[4].opcode(), OpCode::Goto);
        assert_eq!(c.quads()[4].jump_target(), Some(6));
    }

    #[test]
    fn unless_uses_gotot() {
        let mut c = in_method();
        push_comparison(&mut c);
        c.start_condition(true).unwrap();
        c.end_condition().unwrap();
        assert_eq!(c.quads()[2].opcode(), OpCode::GotoT);
    }

    #[test]
    fn condition_must_be_bool() {
        let mut c = in_method();
        c.push_variable("x").unwrap();
        assert_eq!(
            c.start_condition(false),
            Err(CompilationError::ConditionNotBool {
                found: "int".into()
            })
        );
    }

    #[test]
    fn goto_is_resolved_by_end_condition() {
        let mut c = in_method();
        c.goto_quad().unwrap();
        write_x(&mut c);
        c.end_condition().unwrap();
        assert_eq!(c.quads()[1].jump_target(), Some(3));
        assert!(c.end_condition().is_err());
    }
}
