use otter_core::{CompilationError, DataType, Quad};

use crate::compiler::{Compiler, Result, is_writable};

impl Compiler {
    /// `read x`: read one input line into the top operand.
    pub fn read_quad(&mut self) -> Result<()> {
        self.track(|c| {
            let target = c.pop_operand()?;
            if !is_writable(&target) {
                return Err(CompilationError::NotAssignable { name: target.name });
            }
            if let DataType::Object(class) = &target.data_type {
                return Err(CompilationError::NoUnaryOperator {
                    op: "read".to_string(),
                    operand: class.clone(),
                });
            }
            c.emitter.emit(Quad::Read { target });
            Ok(())
        })
    }

    /// `write e`: print the top operand.
    pub fn write_quad(&mut self) -> Result<()> {
        self.track(|c| {
            let source = c.pop_operand()?;
            c.emitter.emit(Quad::Write { source });
            Ok(())
        })
    }
}
