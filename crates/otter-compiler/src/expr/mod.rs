//! Expression callbacks.
//!
//! Expressions are evaluated with two stacks: operands (typed variables)
//! and operators. The driver pushes operands and operators as it walks the
//! tree and calls a precedence checkpoint after each sub-expression of that
//! precedence level. A checkpoint reduces the top operator only if it
//! belongs to the checkpoint's tier, so higher-precedence operators are
//! always reduced first.
//!
//! An opening parenthesis pushes [`Operator::FakeBottom`], which no tier
//! matches; that keeps a parenthesized group (and every call argument list
//! and array index) from reducing operators outside it.

mod arrays;

pub(crate) use arrays::DimOperand;

use otter_core::{CompilationError, DataType, Operator, Quad};

use crate::compiler::{Compiler, Result, is_writable};
use crate::operators::{verify, verify_unary};

impl Compiler {
    // ==========================================================================
    // Operands and operators
    // ==========================================================================

    /// Push an operator symbol (`+`, `and`, `=`, ...).
    pub fn push_operator(&mut self, symbol: &str) -> Result<()> {
        self.track(|c| {
            let op = Operator::from_symbol(symbol).ok_or_else(|| {
                CompilationError::UnknownOperator {
                    symbol: symbol.to_string(),
                }
            })?;
            c.operators.push(op);
            Ok(())
        })
    }

    /// Push a literal of a primitive type.
    pub fn push_constant(&mut self, type_name: &str, literal: &str) -> Result<()> {
        self.track(|c| {
            let data_type =
                DataType::primitive(type_name).ok_or_else(|| CompilationError::InvalidLiteral {
                    literal: literal.to_string(),
                    data_type: type_name.to_string(),
                })?;
            let constant = c
                .ctx
                .memory_mut()
                .constants
                .get_or_insert(literal, &data_type)?;
            c.operands.push(constant);
            Ok(())
        })
    }

    /// Push a variable visible from the current scope.
    ///
    /// Arrays go to the dimension-operand stack instead and open an
    /// isolated group for their indices.
    pub fn push_variable(&mut self, name: &str) -> Result<()> {
        self.track(|c| {
            let variable = c.ctx.lookup_variable(name)?.clone();
            if variable.is_array() {
                let base = c.operands.len();
                c.dim_operands.push(DimOperand::new(variable, base));
                c.operators.push(Operator::FakeBottom);
            } else {
                c.operands.push(variable);
            }
            Ok(())
        })
    }

    pub fn open_paren(&mut self) {
        self.operators.push(Operator::FakeBottom);
    }

    pub fn close_paren(&mut self) -> Result<()> {
        self.track(|c| c.pop_fake_bottom())
    }

    // ==========================================================================
    // Precedence checkpoints
    // ==========================================================================

    /// Reduce a pending `+` or `-`.
    pub fn check_pending_sum_sub(&mut self) -> Result<()> {
        self.track(|c| c.reduce_if(Operator::is_additive))
    }

    /// Reduce a pending `*` or `/`.
    pub fn check_pending_mul_div(&mut self) -> Result<()> {
        self.track(|c| c.reduce_if(Operator::is_multiplicative))
    }

    /// Reduce a pending comparison.
    pub fn check_pending_relational(&mut self) -> Result<()> {
        self.track(|c| c.reduce_if(Operator::is_relational))
    }

    /// Reduce a pending `and` or `or`.
    pub fn check_pending_and_or(&mut self) -> Result<()> {
        self.track(|c| c.reduce_if(Operator::is_logical))
    }

    /// Reduce a pending `not`.
    pub fn check_pending_not(&mut self) -> Result<()> {
        self.track(|c| {
            if c.operators.last() != Some(&Operator::Not) {
                return Ok(());
            }
            let op = c.pop_operator()?;
            let operand = c.pop_operand()?;
            let result_type = verify_unary(&operand.data_type, op).ok_or_else(|| {
                CompilationError::NoUnaryOperator {
                    op: op.symbol().to_string(),
                    operand: operand.data_type.to_string(),
                }
            })?;
            let result = c.new_temp(result_type)?;
            c.emitter.emit(Quad::Not {
                operand,
                result: result.clone(),
            });
            c.operands.push(result);
            Ok(())
        })
    }

    fn reduce_if(&mut self, tier: fn(Operator) -> bool) -> Result<()> {
        match self.operators.last() {
            Some(op) if tier(*op) => {}
            _ => return Ok(()),
        }
        let op = self.pop_operator()?;
        let right = self.pop_operand()?;
        let left = self.pop_operand()?;
        let result_type = verify(&left.data_type, &right.data_type, op).ok_or_else(|| {
            CompilationError::NoOperator {
                op: op.symbol().to_string(),
                left: left.data_type.to_string(),
                right: right.data_type.to_string(),
            }
        })?;
        let result = self.new_temp(result_type)?;
        self.emitter.emit(Quad::Binary {
            op,
            left,
            right,
            result: result.clone(),
        });
        self.operands.push(result);
        Ok(())
    }

    // ==========================================================================
    // Assignment
    // ==========================================================================

    /// Emit `target = source` for the two topmost operands.
    pub fn assign(&mut self) -> Result<()> {
        self.track(|c| {
            match c.pop_operator()? {
                Operator::Assign => {}
                other => {
                    return Err(CompilationError::internal(format!(
                        "expected '=' on the operator stack, found '{other}'"
                    )));
                }
            }
            let source = c.pop_operand()?;
            let target = c.pop_operand()?;
            if !is_writable(&target) {
                return Err(CompilationError::NotAssignable { name: target.name });
            }
            verify(&target.data_type, &source.data_type, Operator::Assign).ok_or_else(|| {
                CompilationError::NoOperator {
                    op: Operator::Assign.symbol().to_string(),
                    left: target.data_type.to_string(),
                    right: source.data_type.to_string(),
                }
            })?;
            c.emitter.emit(Quad::Assign { source, target });
            Ok(())
        })
    }
}
