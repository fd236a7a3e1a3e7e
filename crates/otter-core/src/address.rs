//! Address space model.
//!
//! Every storage cell handed out by the compiler is identified by an
//! [`Address`]: a storage class ([`ScopeKind`]), a primitive kind
//! ([`TypeKind`]) and an offset inside that `(scope, kind)` segment.
//!
//! The tagged form is what the compiler and the VM pass around. The flat
//! integer form ([`Address::to_raw`]) is what shows up in quadruple listings
//! and what array linearization does arithmetic on:
//!
//! ```text
//! GLOBAL     0 ..  9999   INT FLOAT BOOL STRING OBJECT
//! LOCAL  10000 .. 19999   INT FLOAT BOOL STRING OBJECT
//! CONST  20000 .. 29999   INT FLOAT BOOL STRING
//! TEMP   30000 .. 41999   INT FLOAT BOOL STRING OBJECT ARRAY_POINTER
//! INST   42000 .. 51999   INT FLOAT BOOL STRING OBJECT
//! ```
//!
//! Inside a scope, each type owns [`SEGMENT_SIZE`] consecutive slots.

use std::fmt;

use crate::error::AddressError;

/// Number of slots in one `(scope, type)` segment.
pub const SEGMENT_SIZE: u32 = 2000;

// ============================================================================
// Scopes
// ============================================================================

/// Storage class of an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeKind {
    /// Top-level variables and method return slots.
    Global,
    /// Parameters and locals of one method call.
    Local,
    /// Literals, populated at compile time.
    Constant,
    /// Intermediate results, owned by one method call.
    Temporary,
    /// Attributes of the active object.
    Instance,
}

impl ScopeKind {
    /// All scopes, in address order.
    pub const ALL: [ScopeKind; 5] = [
        ScopeKind::Global,
        ScopeKind::Local,
        ScopeKind::Constant,
        ScopeKind::Temporary,
        ScopeKind::Instance,
    ];

    /// First raw address of this scope.
    pub const fn base(self) -> u32 {
        match self {
            ScopeKind::Global => 0,
            ScopeKind::Local => 10_000,
            ScopeKind::Constant => 20_000,
            ScopeKind::Temporary => 30_000,
            ScopeKind::Instance => 42_000,
        }
    }

    /// Number of raw addresses covered by this scope.
    pub const fn width(self) -> u32 {
        match self {
            ScopeKind::Temporary => 6 * SEGMENT_SIZE,
            _ => 5 * SEGMENT_SIZE,
        }
    }

    /// Whether cells of `kind` can live in this scope.
    pub fn supports(self, kind: TypeKind) -> bool {
        match kind {
            TypeKind::ArrayPointer => self == ScopeKind::Temporary,
            TypeKind::Object => self != ScopeKind::Constant,
            _ => true,
        }
    }

    /// Lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Local => "local",
            ScopeKind::Constant => "constant",
            ScopeKind::Temporary => "temporary",
            ScopeKind::Instance => "instance",
        }
    }

    fn contains(self, raw: u32) -> bool {
        raw >= self.base() && raw - self.base() < self.width()
    }

    /// Find the scope a raw address belongs to.
    pub fn of_raw(raw: u32) -> Result<Self, AddressError> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.contains(raw))
            .ok_or(AddressError::Unrecognized(raw))
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Type kinds
// ============================================================================

/// Storage kind of an address.
///
/// This is the kind of *cell*, not the static type of the value: an
/// `ArrayPointer` cell holds the address of an element whose static type is
/// tracked separately by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeKind {
    Int,
    Float,
    Bool,
    String,
    Object,
    ArrayPointer,
}

impl TypeKind {
    /// All kinds, in segment order.
    pub const ALL: [TypeKind; 6] = [
        TypeKind::Int,
        TypeKind::Float,
        TypeKind::Bool,
        TypeKind::String,
        TypeKind::Object,
        TypeKind::ArrayPointer,
    ];

    /// Offset of this kind's segment from the scope base.
    pub const fn base(self) -> u32 {
        match self {
            TypeKind::Int => 0,
            TypeKind::Float => SEGMENT_SIZE,
            TypeKind::Bool => 2 * SEGMENT_SIZE,
            TypeKind::String => 3 * SEGMENT_SIZE,
            TypeKind::Object => 4 * SEGMENT_SIZE,
            TypeKind::ArrayPointer => 5 * SEGMENT_SIZE,
        }
    }

    /// Position of this kind in [`TypeKind::ALL`].
    pub const fn index(self) -> usize {
        (self.base() / SEGMENT_SIZE) as usize
    }

    /// Lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            TypeKind::Int => "int",
            TypeKind::Float => "float",
            TypeKind::Bool => "bool",
            TypeKind::String => "string",
            TypeKind::Object => "object",
            TypeKind::ArrayPointer => "array_pointer",
        }
    }

    fn of_scope_offset(offset: u32) -> Option<Self> {
        Self::ALL.get((offset / SEGMENT_SIZE) as usize).copied()
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Address
// ============================================================================

/// A resolved storage location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    pub scope: ScopeKind,
    pub kind: TypeKind,
    pub offset: u32,
}

impl Address {
    /// Build an address, validating the `(scope, kind)` pair and the offset.
    pub fn new(scope: ScopeKind, kind: TypeKind, offset: u32) -> Result<Self, AddressError> {
        if !scope.supports(kind) {
            return Err(AddressError::Unsupported { scope, kind });
        }
        if offset >= SEGMENT_SIZE {
            return Err(AddressError::SegmentOverflow {
                scope,
                kind,
                offset,
            });
        }
        Ok(Self {
            scope,
            kind,
            offset,
        })
    }

    /// First address of a `(scope, kind)` segment.
    pub fn segment_start(scope: ScopeKind, kind: TypeKind) -> Result<Self, AddressError> {
        Self::new(scope, kind, 0)
    }

    /// Flat integer form of this address.
    pub const fn to_raw(self) -> u32 {
        self.scope.base() + self.kind.base() + self.offset
    }

    /// Recover the tagged form of a raw address.
    pub fn from_raw(raw: u32) -> Result<Self, AddressError> {
        let scope = ScopeKind::of_raw(raw)?;
        let in_scope = raw - scope.base();
        let kind = TypeKind::of_scope_offset(in_scope).ok_or(AddressError::Unrecognized(raw))?;
        if !scope.supports(kind) {
            return Err(AddressError::Unrecognized(raw));
        }
        Ok(Self {
            scope,
            kind,
            offset: in_scope - kind.base(),
        })
    }

    /// The address `delta` cells further into the same segment.
    pub fn offset_by(self, delta: u32) -> Result<Self, AddressError> {
        let offset = self
            .offset
            .checked_add(delta)
            .ok_or(AddressError::SegmentOverflow {
                scope: self.scope,
                kind: self.kind,
                offset: u32::MAX,
            })?;
        Self::new(self.scope, self.kind, offset)
    }

    /// Whether reads and writes through this cell dereference once.
    pub fn is_pointer(self) -> bool {
        self.kind == TypeKind::ArrayPointer
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_raw())
    }
}

/// Remove the scope base from a raw address, leaving the type segment
/// offset plus the cell offset.
pub fn strip_scope_prefix(raw: u32) -> Result<u32, AddressError> {
    Ok(raw - ScopeKind::of_raw(raw)?.base())
}
