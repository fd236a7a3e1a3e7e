//! Array index linearization.
//!
//! For `a[i][j]` with axes `(n0, n1)` the generator emits:
//!
//! ```text
//! VER_ACCS  i  0  n0
//! PROD_LIT  i  m0 t1        ; every axis but the last
//! VER_ACCS  j  0  n1
//! +         t1 j  t2
//! ADD_LIT   t2 base(a) p    ; p is an ARRAY_POINTER temporary
//! ```
//!
//! Reads and writes through `p` dereference it exactly once at runtime.

use otter_core::{CompilationError, DataType, Operator, Quad, Variable};

use crate::compiler::{Compiler, Result};

/// An array being indexed.
#[derive(Debug, Clone)]
pub(crate) struct DimOperand {
    pub variable: Variable,
    /// Number of indices applied so far.
    pub dim: usize,
    /// Linear offset accumulated so far.
    pub offset: Option<Variable>,
    /// Operand stack height when the array was pushed.
    pub operand_base: usize,
}

impl DimOperand {
    pub fn new(variable: Variable, operand_base: usize) -> Self {
        Self {
            variable,
            dim: 0,
            offset: None,
            operand_base,
        }
    }
}

impl Compiler {
    /// Apply the index on top of the operand stack to the array being
    /// indexed.
    pub fn resolve_array_index(&mut self) -> Result<()> {
        self.track(|c| {
            let index = c.pop_operand()?;
            // Anything left above the array's base is a scalar being indexed.
            let base = c.dim_operands.last().map_or(0, |operand| operand.operand_base);
            if c.operands.len() > base {
                let scalar = c.pop_operand()?;
                return Err(CompilationError::NotIndexable { name: scalar.name });
            }
            let operand = c
                .dim_operands
                .last()
                .ok_or_else(|| CompilationError::internal("no array is being indexed"))?;
            let array = &operand.variable;
            let Some(dimension) = array.dimensions.get(operand.dim).copied() else {
                return Err(CompilationError::NotIndexable {
                    name: array.name.clone(),
                });
            };
            if index.data_type != DataType::Int {
                return Err(CompilationError::NoOperator {
                    op: "[]".to_string(),
                    left: array.data_type.to_string(),
                    right: index.data_type.to_string(),
                });
            }
            let is_last = operand.dim + 1 == array.dimensions.len();
            let previous = operand.offset.clone();

            c.emitter.emit(Quad::VerAccs {
                index: index.clone(),
                lower: 0,
                upper: i64::from(dimension.size),
            });

            let term = if is_last {
                index
            } else {
                let scaled = c.new_temp(DataType::Int)?;
                c.emitter.emit(Quad::ProdLit {
                    operand: index,
                    factor: i64::from(dimension.m),
                    result: scaled.clone(),
                });
                scaled
            };

            let offset = match previous {
                Some(previous) => {
                    let sum = c.new_temp(DataType::Int)?;
                    c.emitter.emit(Quad::Binary {
                        op: Operator::Add,
                        left: previous,
                        right: term,
                        result: sum.clone(),
                    });
                    sum
                }
                None => term,
            };

            let operand = c
                .dim_operands
                .last_mut()
                .ok_or_else(|| CompilationError::internal("no array is being indexed"))?;
            operand.dim += 1;
            operand.offset = Some(offset);
            Ok(())
        })
    }

    /// Turn the fully indexed array into an ARRAY_POINTER operand.
    pub fn complete_array_index(&mut self) -> Result<()> {
        self.track(|c| {
            let operand = c
                .dim_operands
                .pop()
                .ok_or_else(|| CompilationError::internal("no array is being indexed"))?;
            c.pop_fake_bottom()?;

            let array = operand.variable;
            let expected = array.dimensions.len();
            let offset = match operand.offset {
                Some(offset) if operand.dim == expected => offset,
                _ => {
                    return Err(CompilationError::IncompleteIndex {
                        name: array.name,
                        expected,
                        got: operand.dim,
                    });
                }
            };

            let pointer = c.new_pointer(array.data_type.clone())?;
            c.emitter.emit(Quad::AddLit {
                operand: offset,
                base: array.address.to_raw(),
                result: pointer.clone(),
            });
            c.operands.push(pointer);
            Ok(())
        })
    }
}
