//! Error types for every phase.
//!
//! ## Error Hierarchy
//!
//! ```text
//! AddressError       - a raw address or (scope, type) pair outside the layout
//! CompilationError   - semantic errors raised while generating quadruples
//! CompilationErrors  - ordered collection reported at the end of compilation
//! RuntimeError       - fatal errors raised by the virtual machine
//! ```

use thiserror::Error;

use crate::address::{ScopeKind, TypeKind};

// ============================================================================
// Address Errors
// ============================================================================

/// An address that does not fit the address space layout.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// A raw address outside every known range.
    #[error("address {0} is outside every known memory range")]
    Unrecognized(u32),

    /// A type segment that does not exist in the scope.
    #[error("{scope} memory has no {kind} segment")]
    Unsupported { scope: ScopeKind, kind: TypeKind },

    /// An offset past the end of its segment.
    #[error("offset {offset} overflows the {scope} {kind} segment")]
    SegmentOverflow {
        scope: ScopeKind,
        kind: TypeKind,
        offset: u32,
    },
}

// ============================================================================
// Compilation Errors
// ============================================================================

/// Semantic errors detected while generating quadruples.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompilationError {
    /// A class inherits from a class that was never declared.
    #[error("parent class '{parent}' of '{class}' does not exist")]
    ParentClassNotFound { class: String, parent: String },

    /// A name already visible in the scope chain was declared again.
    #[error("symbol '{name}' already exists in scope '{scope}'")]
    DuplicateSymbol { name: String, scope: String },

    /// A type name that is neither primitive nor a declared class.
    #[error("unknown type '{name}'")]
    UnknownType { name: String },

    /// A variable that is not visible from the current scope.
    #[error("unknown variable '{name}'")]
    UnknownVariable { name: String },

    /// A method that the class (or its ancestors) does not define.
    #[error("unknown method '{method}' on class '{class}'")]
    UnknownMethod { method: String, class: String },

    /// An operator symbol the generator does not understand.
    #[error("unknown operator '{symbol}'")]
    UnknownOperator { symbol: String },

    /// An access modifier other than `public` or `private`.
    #[error("unknown access modifier '{name}'")]
    UnknownAccessModifier { name: String },

    /// A literal whose text does not parse for its declared type.
    #[error("invalid {data_type} literal '{literal}'")]
    InvalidLiteral { literal: String, data_type: String },

    /// No entry in the type-compatibility table for this operation.
    #[error("no operator '{op}' for types '{left}' and '{right}'")]
    NoOperator {
        op: String,
        left: String,
        right: String,
    },

    /// No entry in the type-compatibility table for this unary operation.
    #[error("no operator '{op}' for type '{operand}'")]
    NoUnaryOperator { op: String, operand: String },

    /// A condition that is not a bool.
    #[error("condition must be bool, found '{found}'")]
    ConditionNotBool { found: String },

    /// A constant or other read-only operand on the left of `=`.
    #[error("'{name}' cannot be assigned to")]
    NotAssignable { name: String },

    /// A constructor whose name differs from its class.
    #[error("constructor '{name}' must have the same name as the class '{class}'")]
    ConstructorNameMismatch { name: String, class: String },

    /// A call with the wrong number of arguments.
    #[error("{name} expects {expected} argument(s), got {got}")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// An argument whose type does not match its parameter.
    #[error("argument {position} of {method} expects '{expected}', got '{found}'")]
    ArgumentTypeMismatch {
        method: String,
        position: usize,
        expected: String,
        found: String,
    },

    /// A private method called through another instance.
    #[error("method '{method}' is private and cannot be called on '{instance}'")]
    PrivateMethodAccess { method: String, instance: String },

    /// A method called on something that is not an object.
    #[error("'{name}' is not an object")]
    NotAnObject { name: String },

    /// `return` inside a constructor.
    #[error("constructor of '{class}' cannot have a return statement")]
    ReturnInConstructor { class: String },

    /// `return` without a value in a method that declares a return type.
    #[error("method '{method}' must return a value of type '{expected}'")]
    MissingReturnValue { method: String, expected: String },

    /// `return <value>` in a void method.
    #[error("void method '{method}' cannot return a value")]
    UnexpectedReturnValue { method: String },

    /// A statement that needs an enclosing method outside of one.
    #[error("'{construct}' is only allowed inside a method")]
    NoEnclosingMethod { construct: String },

    /// A member declared outside of a class body.
    #[error("'{member}' must be declared inside a class")]
    NoEnclosingClass { member: String },

    /// Indexing a variable that is not an array, or indexing it too often.
    #[error("'{name}' cannot be indexed")]
    NotIndexable { name: String },

    /// An array access that stopped before the last axis.
    #[error("'{name}' needs {expected} index(es), got {got}")]
    IncompleteIndex {
        name: String,
        expected: usize,
        got: usize,
    },

    /// An array axis with no elements.
    #[error("dimension of '{name}' must be positive, got {size}")]
    InvalidDimension { name: String, size: u32 },

    /// The entry class never declared its constructor.
    #[error("entry point constructor for class '{class}' was never declared")]
    MissingEntryPoint { class: String },

    /// A `(scope, type)` segment ran out of slots.
    #[error("too many variables for {scope} {kind} memory")]
    OutOfMemory { scope: ScopeKind, kind: TypeKind },

    /// The generator's own bookkeeping went wrong.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl CompilationError {
    pub fn internal(message: impl Into<String>) -> Self {
        CompilationError::Internal {
            message: message.into(),
        }
    }
}

impl From<AddressError> for CompilationError {
    fn from(error: AddressError) -> Self {
        match error {
            AddressError::SegmentOverflow { scope, kind, .. } => {
                CompilationError::OutOfMemory { scope, kind }
            }
            other => CompilationError::internal(other.to_string()),
        }
    }
}

/// Ordered collection of semantic errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilationErrors {
    errors: Vec<CompilationError>,
}

impl CompilationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: CompilationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompilationError> {
        self.errors.iter()
    }

    pub fn as_slice(&self) -> &[CompilationError] {
        &self.errors
    }

    pub fn into_vec(self) -> Vec<CompilationError> {
        self.errors
    }
}

impl IntoIterator for CompilationErrors {
    type Item = CompilationError;
    type IntoIter = std::vec::IntoIter<CompilationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a CompilationErrors {
    type Item = &'a CompilationError;
    type IntoIter = std::slice::Iter<'a, CompilationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl From<CompilationError> for CompilationErrors {
    fn from(error: CompilationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl std::fmt::Display for CompilationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompilationErrors {}

// ============================================================================
// Runtime Errors
// ============================================================================

/// Fatal errors raised while executing quadruples.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    /// An array index outside its axis.
    #[error("segmentation fault: index {index} is out of range [{lower}, {upper})")]
    IndexOutOfBounds { index: i64, lower: i64, upper: i64 },

    /// An address outside the layout.
    #[error(transparent)]
    Address(#[from] AddressError),

    /// A cell read before anything was stored in it.
    #[error("read of uninitialized address {address}")]
    UninitializedRead { address: u32 },

    /// Operand values an instruction cannot combine.
    #[error("cannot apply '{op}' to {left} and {right}")]
    TypeMismatch {
        op: String,
        left: &'static str,
        right: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in '{op}'")]
    IntegerOverflow { op: String },

    /// A method called through a variable holding no object.
    #[error("'{name}' does not hold an object")]
    NullReference { name: String },

    /// A write into the constant segment.
    #[error("cannot write to constant address {address}")]
    WriteToConstant { address: u32 },

    /// Too many nested calls.
    #[error("stack overflow: call depth exceeded {depth}")]
    StackOverflow { depth: usize },

    /// Input that does not parse for the target's type.
    #[error("invalid input '{input}' for {expected}")]
    InvalidInput { input: String, expected: String },

    /// Console failure.
    #[error("i/o error: {0}")]
    Io(String),

    /// The instruction stream violates the calling convention.
    #[error("malformed program at instruction {ip}: {message}")]
    MalformedProgram { ip: usize, message: String },
}

impl From<std::io::Error> for RuntimeError {
    fn from(error: std::io::Error) -> Self {
        RuntimeError::Io(error.to_string())
    }
}
