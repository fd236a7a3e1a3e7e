//! Type-compatibility oracle.
//!
//! A static table from operator and operand types to the result type. The
//! generator consults it before emitting any operation; `None` means the
//! combination is a semantic error.

use otter_core::{DataType, Operator};

/// Result type of `left op right`, or `None` if the combination is invalid.
pub fn verify(left: &DataType, right: &DataType, op: Operator) -> Option<DataType> {
    use otter_core::DataType::{Bool, Float, Int};

    match op {
        // Objects only assign to the same class.
        Operator::Assign => (left == right).then(|| left.clone()),

        Operator::Add | Operator::Sub | Operator::Mul => match (left, right) {
            (Int, Int) => Some(Int),
            (Int | Float, Int | Float) => Some(Float),
            _ => None,
        },

        // Division never yields an int.
        Operator::Div => (left.is_numeric() && right.is_numeric()).then_some(Float),

        Operator::Less | Operator::Greater | Operator::LessEqual | Operator::GreaterEqual => {
            match (left, right) {
                (Int | Float, Int | Float) | (DataType::String, DataType::String) => Some(Bool),
                _ => None,
            }
        }

        Operator::Equal | Operator::NotEqual => match (left, right) {
            (Int | Float, Int | Float)
            | (DataType::String, DataType::String)
            | (Bool, Bool) => Some(Bool),
            _ => None,
        },

        Operator::And | Operator::Or => matches!((left, right), (Bool, Bool)).then_some(Bool),

        Operator::Not | Operator::FakeBottom => None,
    }
}

/// Result type of `op operand` for unary operators.
pub fn verify_unary(operand: &DataType, op: Operator) -> Option<DataType> {
    match (op, operand) {
        (Operator::Not, DataType::Bool) => Some(DataType::Bool),
        _ => None,
    }
}
