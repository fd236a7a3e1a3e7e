//! Runtime values.
//!
//! Constants are parsed into [`Value`]s at compile time and every memory
//! cell in the VM holds one.

use std::fmt;

use crate::address::Address;
use crate::data_type::DataType;

/// Handle to an object on the VM heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub usize);

/// A value stored in a memory cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Object(ObjectRef),
    /// Contents of an array-pointer cell: the element it designates.
    Pointer(Address),
}

impl Value {
    /// Parse literal text for a declared primitive type.
    ///
    /// String literals may arrive with or without their surrounding quotes.
    pub fn parse_literal(text: &str, data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::String => {
                let unquoted = text
                    .strip_prefix('"')
                    .and_then(|rest| rest.strip_suffix('"'))
                    .unwrap_or(text);
                Some(Value::Str(unquoted.to_string()))
            }
            _ => Self::parse_input(text, data_type),
        }
    }

    /// Parse a line read at runtime. Strings are kept verbatim.
    pub fn parse_input(text: &str, data_type: &DataType) -> Option<Self> {
        match data_type {
            DataType::Int => text.trim().parse().ok().map(Value::Int),
            DataType::Float => text.trim().parse().ok().map(Value::Float),
            DataType::Bool => match text.trim() {
                "true" => Some(Value::Bool(true)),
                "false" => Some(Value::Bool(false)),
                _ => None,
            },
            DataType::String => Some(Value::Str(text.to_string())),
            DataType::Object(_) => None,
        }
    }

    /// Name of the variant, used in runtime diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "string",
            Value::Object(_) => "object",
            Value::Pointer(_) => "array_pointer",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view, promoting ints.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<ObjectRef> {
        match self {
            Value::Object(obj) => Some(*obj),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Str(s) => f.write_str(s),
            Value::Object(ObjectRef(id)) => write!(f, "<object #{id}>"),
            Value::Pointer(address) => write!(f, "&{address}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_literals() {
        assert_eq!(
            Value::parse_literal("42", &DataType::Int),
            Some(Value::Int(42))
        );
        assert_eq!(
            Value::parse_literal("2.5", &DataType::Float),
            Some(Value::Float(2.5))
        );
        assert_eq!(
            Value::parse_literal("5", &DataType::Float),
            Some(Value::Float(5.0))
        );
        assert_eq!(
            Value::parse_literal("true", &DataType::Bool),
            Some(Value::Bool(true))
        );
        assert_eq!(
            Value::parse_literal("\"hi there\"", &DataType::String),
            Some(Value::Str("hi there".into()))
        );
        assert_eq!(Value::parse_literal("4.5", &DataType::Int), None);
        assert_eq!(Value::parse_literal("yes", &DataType::Bool), None);
    }

    #[test]
    fn input_strings_keep_their_quotes() {
        assert_eq!(
            Value::parse_input("\"quoted\"", &DataType::String),
            Some(Value::Str("\"quoted\"".into()))
        );
        assert_eq!(
            Value::parse_input(" 7 ", &DataType::Int),
            Some(Value::Int(7))
        );
        assert_eq!(
            Value::parse_input("7", &DataType::Object("Node".into())),
            None
        );
    }

    #[test]
    fn display() {
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Float(2.0).to_string(), "2.0");
        assert_eq!(Value::Float(0.5).to_string(), "0.5");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Str("otter".into()).to_string(), "otter");
        assert_eq!(Value::Object(ObjectRef(2)).to_string(), "<object #2>");
    }

    #[test]
    fn numeric_views() {
        assert_eq!(Value::Int(2).as_f64(), Some(2.0));
        assert_eq!(Value::Float(2.5).as_int(), None);
        assert_eq!(Value::Str("1".into()).as_f64(), None);
    }
}
