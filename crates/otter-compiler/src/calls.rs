//! Method calls.
//!
//! ## Calling convention
//!
//! ```text
//! ERA      instance  method     ; before the arguments
//! PARAM    arg       formal     ; one per argument (per element for arrays)
//! GOSUB    method    entry
//! =        slot      temp       ; non-void callees only
//! ```
//!
//! A call opens an isolated group on the operator stack, so argument
//! expressions never reduce operators of the enclosing expression. Calls
//! nest: each open call is a [`PendingCall`] on its own stack.

use otter_core::{CompilationError, DataType, EraTarget, Operator, Quad, Variable};

use crate::compiler::{Compiler, Result};
use crate::operators::verify;
use crate::scope::MethodId;

/// Instance a call is made through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    /// `ClassName(...)`: construct a new instance.
    Constructor,
    /// `self.method(...)`.
    SelfInstance,
    /// `obj.method(...)` where `obj` is an object variable.
    Variable(String),
    /// `arr[i].method(...)`; the element pointer is on the operand stack.
    Indexed(String),
}

impl CallTarget {
    /// Interpret the instance text a driver passes along with a call.
    pub fn parse(instance: Option<&str>) -> Self {
        match instance {
            None => CallTarget::Constructor,
            Some("self") => CallTarget::SelfInstance,
            Some(text) => match text.split_once('[') {
                Some((name, _)) => CallTarget::Indexed(name.trim().to_string()),
                None => CallTarget::Variable(text.to_string()),
            },
        }
    }

    fn label(&self) -> &str {
        match self {
            CallTarget::Constructor => "new instance",
            CallTarget::SelfInstance => "self",
            CallTarget::Variable(name) | CallTarget::Indexed(name) => name,
        }
    }
}

/// A call between its `ERA` and its `GOSUB`.
#[derive(Debug, Clone)]
pub(crate) struct PendingCall {
    method: MethodId,
    /// Arguments bound so far.
    bound: usize,
    /// Operand stack height when the call opened.
    operand_base: usize,
    /// Dimension-operand stack height when the call opened.
    dim_base: usize,
}

/// Callee and instance of a call, before anything is emitted.
struct ResolvedCall {
    method: MethodId,
    era: EraTarget,
}

impl Compiler {
    /// Check that `method` may be called through `target`.
    ///
    /// Private methods may only be called through `self`.
    pub fn check_access_modifier(&mut self, target: &CallTarget, method: &str) -> Result<()> {
        self.track(|c| c.resolve_call(target, method).map(|_| ()))
    }

    /// Emit `ERA` and open a call.
    pub fn allocate_call_frame(&mut self, target: &CallTarget, method: &str) -> Result<()> {
        self.track(|c| {
            let resolved = c.resolve_call(target, method)?;
            if matches!(target, CallTarget::Indexed(_)) {
                c.pop_operand()?;
            }
            let callee = c.ctx.method(resolved.method).name.clone();
            c.emitter.emit(Quad::Era {
                target: resolved.era,
                method: callee,
            });
            c.calls.push(PendingCall {
                method: resolved.method,
                bound: 0,
                operand_base: c.operands.len(),
                dim_base: c.dim_operands.len(),
            });
            c.operators.push(Operator::FakeBottom);
            Ok(())
        })
    }

    /// Bind the argument just evaluated to the next formal parameter.
    pub fn bind_call_argument(&mut self) -> Result<()> {
        self.track(|c| {
            let call = c
                .calls
                .last_mut()
                .ok_or_else(|| CompilationError::internal("argument outside of a call"))?;
            let position = call.bound;
            call.bound += 1;
            let (method, operand_base, dim_base) = (call.method, call.operand_base, call.dim_base);

            let formals = c.ctx.parameters(method)?;
            let method_name = c.ctx.method(method).name.clone();
            let argument = c.pop_argument(operand_base, dim_base)?;

            // Excess arguments are consumed and reported on completion.
            let Some(formal) = formals.get(position) else {
                return Ok(());
            };
            let mismatch = |found: &Variable| CompilationError::ArgumentTypeMismatch {
                method: method_name.clone(),
                position: position + 1,
                expected: describe(formal),
                found: describe(found),
            };

            if formal.is_array() {
                let same_shape = argument.data_type == formal.data_type
                    && argument.dimensions == formal.dimensions;
                if !same_shape {
                    return Err(mismatch(&argument));
                }
                let size = formal.size().ok_or_else(|| {
                    CompilationError::internal(format!("array '{}' has no size", formal.name))
                })?;
                for offset in 0..size {
                    c.emitter.emit(Quad::Param {
                        source: argument.element(offset)?,
                        target: formal.element(offset)?,
                    });
                }
                return Ok(());
            }

            if argument.is_array()
                || verify(&formal.data_type, &argument.data_type, Operator::Assign).is_none()
            {
                return Err(mismatch(&argument));
            }
            c.emitter.emit(Quad::Param {
                source: argument,
                target: formal.clone(),
            });
            Ok(())
        })
    }

    /// Emit `GOSUB`, close the call and push its result, if any.
    pub fn complete_method_call(&mut self) -> Result<()> {
        self.track(|c| {
            let call = c
                .calls
                .pop()
                .ok_or_else(|| CompilationError::internal("no call to complete"))?;
            c.pop_fake_bottom()?;

            let method = c.ctx.method(call.method);
            let name = method.name.clone();
            if call.bound != method.arity() {
                return Err(CompilationError::ArgumentCountMismatch {
                    name,
                    expected: method.arity(),
                    got: call.bound,
                });
            }
            let entry = method.entry;
            let slot = method.return_slot.clone();

            c.emitter.emit(Quad::Gosub {
                method: name,
                entry,
            });
            if let Some(slot) = slot {
                let result = c.new_temp(slot.data_type.clone())?;
                c.emitter.emit(Quad::Assign {
                    source: slot,
                    target: result.clone(),
                });
                c.operands.push(result);
            }
            Ok(())
        })
    }

    // ==========================================================================
    // Helpers
    // ==========================================================================

    fn resolve_call(&self, target: &CallTarget, method: &str) -> Result<ResolvedCall> {
        let (method_id, era) = match target {
            CallTarget::Constructor => (
                self.ctx.find_constructor(method)?,
                EraTarget::Constructor {
                    class: method.to_string(),
                },
            ),
            CallTarget::SelfInstance => {
                let class = self.ctx.require_class(method)?;
                let id = self.ctx.find_method(class, method).ok_or_else(|| {
                    CompilationError::UnknownMethod {
                        method: method.to_string(),
                        class: self.ctx.class(class).name.clone(),
                    }
                })?;
                (id, EraTarget::SelfInstance)
            }
            CallTarget::Variable(name) => {
                let variable = self.ctx.lookup_variable(name)?;
                let class = object_class(variable)?;
                (
                    self.ctx.find_method_on(class, method)?,
                    EraTarget::Instance(variable.clone()),
                )
            }
            CallTarget::Indexed(name) => {
                let element = self
                    .operands
                    .last()
                    .filter(|operand| operand.is_pointer())
                    .ok_or_else(|| {
                        CompilationError::internal(format!("'{name}' has not been indexed"))
                    })?;
                let class = object_class(element)?;
                (
                    self.ctx.find_method_on(class, method)?,
                    EraTarget::Instance(element.clone()),
                )
            }
        };

        if self.ctx.method(method_id).is_private() && *target != CallTarget::SelfInstance {
            return Err(CompilationError::PrivateMethodAccess {
                method: method.to_string(),
                instance: target.label().to_string(),
            });
        }
        Ok(ResolvedCall {
            method: method_id,
            era,
        })
    }

    /// Pop the argument of the current call: a whole array if the last
    /// thing pushed was an unindexed array, the top operand otherwise.
    fn pop_argument(&mut self, operand_base: usize, dim_base: usize) -> Result<Variable> {
        let array_pending = self.dim_operands.len() > dim_base
            && self.operators.last() == Some(&Operator::FakeBottom)
            && self
                .dim_operands
                .last()
                .is_some_and(|operand| operand.dim == 0);
        if array_pending && self.operands.len() == operand_base {
            let operand = self
                .dim_operands
                .pop()
                .ok_or_else(|| CompilationError::internal("dimension stack is empty"))?;
            self.pop_fake_bottom()?;
            return Ok(operand.variable);
        }
        if self.operands.len() <= operand_base {
            return Err(CompilationError::internal("argument has no value"));
        }
        self.pop_operand()
    }
}

fn object_class(variable: &Variable) -> Result<&str> {
    match &variable.data_type {
        DataType::Object(class) if !variable.is_array() => Ok(class),
        _ => Err(CompilationError::NotAnObject {
            name: variable.name.clone(),
        }),
    }
}

fn describe(variable: &Variable) -> String {
    if variable.is_array() {
        let dims: String = variable
            .dimensions
            .iter()
            .map(|d| format!("[{}]", d.size))
            .collect();
        format!("{}{dims}", variable.data_type)
    } else {
        variable.data_type.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otter_core::{OpCode, ScopeKind};

    /// `Calc` with `add(int a, int b) -> int` and private `secret()`,
    /// then `Main` positioned inside its constructor with `calc: Calc`.
    fn setup() -> Compiler {
        let mut c = Compiler::new();
        c.add_class("Calc", None).unwrap();
        c.add_constructor("Calc", "public").unwrap();
        c.end_method().unwrap();
        c.add_method("add", "public").unwrap();
        c.add_argument("a", "int").unwrap();
        c.add_argument("b", "int").unwrap();
        c.add_return_type("int").unwrap();
        c.push_variable("a").unwrap();
        c.push_operator("+").unwrap();
        c.push_variable("b").unwrap();
        c.check_pending_sum_sub().unwrap();
        c.return_quad(true).unwrap();
        c.end_method().unwrap();
        c.add_method("secret", "private").unwrap();
        c.end_method().unwrap();
        c.add_method("reveal", "public").unwrap();
        let target = CallTarget::SelfInstance;
        c.allocate_call_frame(&target, "secret").unwrap();
        c.complete_method_call().unwrap();
        c.end_method().unwrap();
        c.end_class();

        c.add_class("Main", None).unwrap();
        c.add_constructor("Main", "public").unwrap();
        c.add_variable("calc", "Calc").unwrap();
        c
    }

    fn call_add(c: &mut Compiler, args: &[&str]) -> Result<()> {
        c.allocate_call_frame(&CallTarget::Variable("calc".into()), "add")?;
        for arg in args {
            c.push_constant("int", arg)?;
            c.bind_call_argument()?;
        }
        c.complete_method_call()
    }

    #[test]
    fn parse_call_targets() {
        assert_eq!(CallTarget::parse(None), CallTarget::Constructor);
        assert_eq!(CallTarget::parse(Some("self")), CallTarget::SelfInstance);
        assert_eq!(
            CallTarget::parse(Some("p")),
            CallTarget::Variable("p".into())
        );
        assert_eq!(
            CallTarget::parse(Some("people[i + 1]")),
            CallTarget::Indexed("people".into())
        );
    }

    #[test]
    fn call_protocol() {
        let mut c = setup();
        let start = c.quads().len();
        call_add(&mut c, &["1", "2"]).unwrap();

        let ops: Vec<OpCode> = c.quads()[start..].iter().map(|q| q.opcode()).collect();
        assert_eq!(
            ops,
            vec![
                OpCode::Era,
                OpCode::Param,
                OpCode::Param,
                OpCode::Gosub,
                OpCode::Assign
            ]
        );
        let result = c.peek_operand().unwrap();
        assert_eq!(result.data_type, DataType::Int);
        assert_eq!(result.address.scope, ScopeKind::Temporary);
    }

    #[test]
    fn arity_is_checked() {
        let mut c = setup();
        assert_eq!(
            call_add(&mut c, &["1"]),
            Err(CompilationError::ArgumentCountMismatch {
                name: "add".into(),
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            call_add(&mut c, &["1", "2", "3"]),
            Err(CompilationError::ArgumentCountMismatch {
                name: "add".into(),
                expected: 2,
                got: 3
            })
        );
    }

    #[test]
    fn argument_types_are_checked() {
        let mut c = setup();
        let calc = CallTarget::Variable("calc".into());
        c.allocate_call_frame(&calc, "add").unwrap();
        c.push_constant("string", "\"x\"").unwrap();
        assert!(matches!(
            c.bind_call_argument(),
            Err(CompilationError::ArgumentTypeMismatch { position: 1, .. })
        ));
    }

    #[test]
    fn private_methods_are_rejected_before_era() {
        let mut c = setup();
        let before = c.quads().len();
        let target = CallTarget::Variable("calc".into());
        assert!(matches!(
            c.check_access_modifier(&target, "secret"),
            Err(CompilationError::PrivateMethodAccess { .. })
        ));
        assert!(matches!(
            c.allocate_call_frame(&target, "secret"),
            Err(CompilationError::PrivateMethodAccess { .. })
        ));
        assert_eq!(c.quads().len(), before);
        assert!(
            c.quads()
                .iter()
                .filter(|q| q.opcode() == OpCode::Era)
                .all(|q| matches!(q, Quad::Era { target: EraTarget::SelfInstance, .. }))
        );
    }

    #[test]
    fn constructor_call_yields_an_object() {
        let mut c = setup();
        c.push_variable("calc").unwrap();
        c.push_operator("=").unwrap();
        let target = CallTarget::Constructor;
        c.allocate_call_frame(&target, "Calc").unwrap();
        c.complete_method_call().unwrap();
        c.assign().unwrap();
        assert!(c.errors().is_empty());
    }

    #[test]
    fn unknown_methods_and_non_objects() {
        let mut c = setup();
        c.add_variable("n", "int").unwrap();
        assert!(matches!(
            c.allocate_call_frame(&CallTarget::Variable("calc".into()), "mul"),
            Err(CompilationError::UnknownMethod { .. })
        ));
        assert!(matches!(
            c.allocate_call_frame(&CallTarget::Variable("n".into()), "add"),
            Err(CompilationError::NotAnObject { .. })
        ));
    }

    #[test]
    fn call_arguments_do_not_reduce_outer_operators() {
        // 2 * calc.add(3, 4)
        let mut c = setup();
        c.push_constant("int", "2").unwrap();
        c.push_operator("*").unwrap();
        let calc = CallTarget::Variable("calc".into());
        c.allocate_call_frame(&calc, "add").unwrap();
        c.push_constant("int", "3").unwrap();
        c.check_pending_mul_div().unwrap();
        c.bind_call_argument().unwrap();
        c.push_constant("int", "4").unwrap();
        c.check_pending_mul_div().unwrap();
        c.bind_call_argument().unwrap();
        c.complete_method_call().unwrap();
        c.check_pending_mul_div().unwrap();

        assert_eq!(c.quads().last().map(|q| q.opcode()), Some(OpCode::Mul));
        assert!(c.errors().is_empty());
    }

    #[test]
    fn whole_arrays_are_passed_element_wise() {
        let mut c = Compiler::new();
        c.add_class("Main", None).unwrap();
        c.add_method("sum", "public").unwrap();
        c.add_argument("values", "int").unwrap();
        c.add_dimension(3).unwrap();
        c.finalize_dimensions().unwrap();
        c.end_method().unwrap();

        c.add_constructor("Main", "public").unwrap();
        c.add_variable("data", "int").unwrap();
        c.add_dimension(3).unwrap();
        c.finalize_dimensions().unwrap();

        let start = c.quads().len();
        c.allocate_call_frame(&CallTarget::SelfInstance, "sum").unwrap();
        c.push_variable("data").unwrap();
        c.bind_call_argument().unwrap();
        c.complete_method_call().unwrap();

        let params: Vec<(u32, u32)> = c.quads()[start..]
            .iter()
            .filter_map(|q| match q {
                Quad::Param { source, target } => {
                    Some((source.address.to_raw(), target.address.to_raw()))
                }
                _ => None,
            })
            .collect();
        assert_eq!(params, vec![(10_000, 10_000), (10_001, 10_001), (10_002, 10_002)]);
        assert!(c.operators.is_empty());
    }
}
