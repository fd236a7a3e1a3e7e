//! Static types of Otter values.

use std::fmt;

use crate::address::TypeKind;

/// The declared type of a variable, parameter, attribute or temporary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataType {
    Int,
    Float,
    Bool,
    String,
    /// An instance of the named class.
    Object(String),
}

impl DataType {
    /// Resolve a primitive type name.
    pub fn primitive(name: &str) -> Option<Self> {
        match name {
            "int" => Some(DataType::Int),
            "float" => Some(DataType::Float),
            "bool" => Some(DataType::Bool),
            "string" => Some(DataType::String),
            _ => None,
        }
    }

    /// Resolve a type name, treating anything that is not a primitive as a
    /// class name. Whether the class exists is for the caller to check.
    pub fn from_name(name: &str) -> Self {
        Self::primitive(name).unwrap_or_else(|| DataType::Object(name.to_string()))
    }

    /// Storage kind for cells of this type.
    pub fn kind(&self) -> TypeKind {
        match self {
            DataType::Int => TypeKind::Int,
            DataType::Float => TypeKind::Float,
            DataType::Bool => TypeKind::Bool,
            DataType::String => TypeKind::String,
            DataType::Object(_) => TypeKind::Object,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    /// Class name for object types.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            DataType::Object(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => f.write_str("int"),
            DataType::Float => f.write_str("float"),
            DataType::Bool => f.write_str("bool"),
            DataType::String => f.write_str("string"),
            DataType::Object(name) => f.write_str(name),
        }
    }
}
