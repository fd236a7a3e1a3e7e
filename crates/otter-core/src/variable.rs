//! Variables and array dimensions.

use std::fmt;

use crate::address::Address;
use crate::data_type::DataType;
use crate::error::AddressError;

/// Visibility of attributes and methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AccessModifier {
    #[default]
    Public,
    Private,
}

impl AccessModifier {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "public" => Some(AccessModifier::Public),
            "private" => Some(AccessModifier::Private),
            _ => None,
        }
    }
}

impl fmt::Display for AccessModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessModifier::Public => f.write_str("public"),
            AccessModifier::Private => f.write_str("private"),
        }
    }
}

/// One axis of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    /// Number of elements along this axis.
    pub size: u32,
    /// Elements skipped by one step along this axis.
    pub m: u32,
}

impl Dimension {
    pub fn new(size: u32) -> Self {
        Self { size, m: 1 }
    }
}

/// A named, typed storage location.
///
/// Temporaries and constants are variables too; their name is either a
/// generated label or the literal text.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub data_type: DataType,
    pub address: Address,
    pub access: Option<AccessModifier>,
    /// Array axes, outermost first. Empty for scalars.
    pub dimensions: Vec<Dimension>,
}

impl Variable {
    pub fn new(name: impl Into<String>, data_type: DataType, address: Address) -> Self {
        Self {
            name: name.into(),
            data_type,
            address,
            access: None,
            dimensions: Vec::new(),
        }
    }

    pub fn with_access(mut self, access: AccessModifier) -> Self {
        self.access = Some(access);
        self
    }

    pub fn is_array(&self) -> bool {
        !self.dimensions.is_empty()
    }

    pub fn is_private(&self) -> bool {
        self.access == Some(AccessModifier::Private)
    }

    /// Whether this is an array-pointer temporary.
    pub fn is_pointer(&self) -> bool {
        self.address.is_pointer()
    }

    /// Total number of cells, 1 for scalars. `None` when the product of the
    /// axes does not fit in a `u32`.
    pub fn size(&self) -> Option<u32> {
        self.dimensions
            .iter()
            .try_fold(1u32, |total, d| total.checked_mul(d.size))
    }

    pub fn add_dimension(&mut self, size: u32) {
        self.dimensions.push(Dimension::new(size));
    }

    /// Compute each axis multiplier once every axis is known and return the
    /// total number of cells, or `None` if it overflows.
    pub fn populate_dimensions(&mut self) -> Option<u32> {
        let mut stride = 1u32;
        for dimension in self.dimensions.iter_mut().rev() {
            dimension.m = stride;
            stride = stride.checked_mul(dimension.size)?;
        }
        Some(stride)
    }

    /// The `index`-th flattened element as a scalar variable.
    pub fn element(&self, index: u32) -> Result<Variable, AddressError> {
        Ok(Variable {
            name: format!("{}[{index}]", self.name),
            data_type: self.data_type.clone(),
            address: self.address.offset_by(index)?,
            access: self.access,
            dimensions: Vec::new(),
        })
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}
