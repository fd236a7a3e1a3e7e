//! Arithmetic, comparison and logic on runtime values.

use std::cmp::Ordering;

use otter_core::{Operator, RuntimeError, Value};

/// `left op right`.
pub(crate) fn binary(op: Operator, left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    match op {
        Operator::Add => arithmetic(op, left, right, i64::checked_add, |a, b| a + b),
        Operator::Sub => arithmetic(op, left, right, i64::checked_sub, |a, b| a - b),
        Operator::Mul => arithmetic(op, left, right, i64::checked_mul, |a, b| a * b),
        Operator::Div => divide(left, right),
        Operator::Less => compare(op, left, right).map(|o| Value::Bool(o == Ordering::Less)),
        Operator::Greater => compare(op, left, right).map(|o| Value::Bool(o == Ordering::Greater)),
        Operator::LessEqual => {
            compare(op, left, right).map(|o| Value::Bool(o != Ordering::Greater))
        }
        Operator::GreaterEqual => {
            compare(op, left, right).map(|o| Value::Bool(o != Ordering::Less))
        }
        Operator::Equal => equals(op, left, right).map(Value::Bool),
        Operator::NotEqual => equals(op, left, right).map(|eq| Value::Bool(!eq)),
        Operator::And | Operator::Or => match (left, right) {
            (Value::Bool(a), Value::Bool(b)) => Ok(Value::Bool(if op == Operator::And {
                *a && *b
            } else {
                *a || *b
            })),
            _ => Err(mismatch(op, left, right)),
        },
        Operator::Not | Operator::Assign | Operator::FakeBottom => Err(mismatch(op, left, right)),
    }
}

/// `not operand`.
pub(crate) fn not(operand: &Value) -> Result<Value, RuntimeError> {
    match operand {
        Value::Bool(v) => Ok(Value::Bool(!v)),
        other => Err(RuntimeError::TypeMismatch {
            op: Operator::Not.symbol().to_string(),
            left: other.type_name(),
            right: "nothing",
        }),
    }
}

fn arithmetic(
    op: Operator,
    left: &Value,
    right: &Value,
    int: fn(i64, i64) -> Option<i64>,
    float: fn(f64, f64) -> f64,
) -> Result<Value, RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => {
            int(*a, *b)
                .map(Value::Int)
                .ok_or_else(|| RuntimeError::IntegerOverflow {
                    op: op.symbol().to_string(),
                })
        }
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(float(a, b))),
            _ => Err(mismatch(op, left, right)),
        },
    }
}

fn divide(left: &Value, right: &Value) -> Result<Value, RuntimeError> {
    let (Some(a), Some(b)) = (left.as_f64(), right.as_f64()) else {
        return Err(mismatch(Operator::Div, left, right));
    };
    if b == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Float(a / b))
}

fn compare(op: Operator, left: &Value, right: &Value) -> Result<Ordering, RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b).ok_or_else(|| mismatch(op, left, right)),
            _ => Err(mismatch(op, left, right)),
        },
    }
}

fn equals(op: Operator, left: &Value, right: &Value) -> Result<bool, RuntimeError> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Str(a), Value::Str(b)) => Ok(a == b),
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Object(a), Value::Object(b)) => Ok(a == b),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => Ok(a == b),
            _ => Err(mismatch(op, left, right)),
        },
    }
}

fn mismatch(op: Operator, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::TypeMismatch {
        op: op.symbol().to_string(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_arithmetic_stays_int() {
        assert_eq!(
            binary(Operator::Add, &Value::Int(2), &Value::Int(3)),
            Ok(Value::Int(5))
        );
        assert_eq!(
            binary(Operator::Mul, &Value::Int(-4), &Value::Int(3)),
            Ok(Value::Int(-12))
        );
    }

    #[test]
    fn mixed_arithmetic_promotes() {
        assert_eq!(
            binary(Operator::Sub, &Value::Int(1), &Value::Float(0.5)),
            Ok(Value::Float(0.5))
        );
    }

    #[test]
    fn division_always_yields_float() {
        assert_eq!(
            binary(Operator::Div, &Value::Int(7), &Value::Int(2)),
            Ok(Value::Float(3.5))
        );
        assert_eq!(
            binary(Operator::Div, &Value::Int(1), &Value::Int(0)),
            Err(RuntimeError::DivisionByZero)
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert!(matches!(
            binary(Operator::Add, &Value::Int(i64::MAX), &Value::Int(1)),
            Err(RuntimeError::IntegerOverflow { .. })
        ));
    }

    #[test]
    fn comparisons() {
        assert_eq!(
            binary(Operator::Less, &Value::Int(1), &Value::Float(1.5)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            binary(Operator::GreaterEqual, &Value::Int(2), &Value::Int(2)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            binary(
                Operator::Less,
                &Value::Str("a".into()),
                &Value::Str("b".into())
            ),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            binary(Operator::Equal, &Value::Int(2), &Value::Float(2.0)),
            Ok(Value::Bool(true))
        );
        assert_eq!(
            binary(Operator::NotEqual, &Value::Bool(true), &Value::Bool(false)),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn logic() {
        assert_eq!(
            binary(Operator::And, &Value::Bool(true), &Value::Bool(false)),
            Ok(Value::Bool(false))
        );
        assert_eq!(
            binary(Operator::Or, &Value::Bool(true), &Value::Bool(false)),
            Ok(Value::Bool(true))
        );
        assert_eq!(not(&Value::Bool(true)), Ok(Value::Bool(false)));
    }

    #[test]
    fn mismatches_name_the_operand_types() {
        assert_eq!(
            binary(Operator::Add, &Value::Bool(true), &Value::Int(1)),
            Err(RuntimeError::TypeMismatch {
                op: "+".into(),
                left: "bool",
                right: "int"
            })
        );
        assert!(not(&Value::Int(1)).is_err());
    }
}
