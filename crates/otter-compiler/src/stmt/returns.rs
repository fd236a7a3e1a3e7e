use otter_core::{CompilationError, Operator, Quad};

use crate::compiler::{Compiler, Result};
use crate::operators::verify;

impl Compiler {
    /// `return` or `return e`.
    ///
    /// With a value, the value is copied into the method's GLOBAL return
    /// slot before `RETURN`.
    pub fn return_quad(&mut self, with_value: bool) -> Result<()> {
        self.track(|c| {
            let id = c.ctx.require_method("return")?;
            let method = c.ctx.method(id);
            if method.is_constructor() {
                let class = c.ctx.class(method.class).name.clone();
                if with_value {
                    c.pop_operand()?;
                }
                return Err(CompilationError::ReturnInConstructor { class });
            }
            let name = method.name.clone();
            let slot = method.return_slot.clone();

            match (with_value, slot) {
                (true, Some(slot)) => {
                    let value = c.pop_operand()?;
                    verify(&slot.data_type, &value.data_type, Operator::Assign).ok_or_else(
                        || CompilationError::NoOperator {
                            op: "return".to_string(),
                            left: slot.data_type.to_string(),
                            right: value.data_type.to_string(),
                        },
                    )?;
                    c.emitter.emit(Quad::Assign {
                        source: value,
                        target: slot,
                    });
                    c.ctx.method_mut(id).returns_value = true;
                }
                (true, None) => {
                    c.pop_operand()?;
                    return Err(CompilationError::UnexpectedReturnValue { method: name });
                }
                (false, Some(slot)) => {
                    return Err(CompilationError::MissingReturnValue {
                        method: name,
                        expected: slot.data_type.to_string(),
                    });
                }
                (false, None) => {}
            }
            c.emitter.emit(Quad::Return);
            Ok(())
        })
    }
}
