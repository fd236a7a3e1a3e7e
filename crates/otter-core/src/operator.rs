//! Operators as they arrive from the front end.

use std::fmt;

/// An operator symbol pushed onto the generator's operator stack.
///
/// `FakeBottom` is the sentinel pushed for an opening parenthesis; it stops
/// every precedence checkpoint from reaching operators outside the group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Sub,
    Mul,
    Div,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Equal,
    NotEqual,
    And,
    Or,
    Not,
    Assign,
    FakeBottom,
}

impl Operator {
    /// Parse a source-level operator symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => Operator::Add,
            "-" => Operator::Sub,
            "*" => Operator::Mul,
            "/" => Operator::Div,
            "<" => Operator::Less,
            ">" => Operator::Greater,
            "<=" => Operator::LessEqual,
            ">=" => Operator::GreaterEqual,
            "==" => Operator::Equal,
            "!=" => Operator::NotEqual,
            "and" => Operator::And,
            "or" => Operator::Or,
            "not" => Operator::Not,
            "=" => Operator::Assign,
            "(" => Operator::FakeBottom,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
            Operator::Less => "<",
            Operator::Greater => ">",
            Operator::LessEqual => "<=",
            Operator::GreaterEqual => ">=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::And => "and",
            Operator::Or => "or",
            Operator::Not => "not",
            Operator::Assign => "=",
            Operator::FakeBottom => "(",
        }
    }

    /// `+` and `-`.
    pub fn is_additive(self) -> bool {
        matches!(self, Operator::Add | Operator::Sub)
    }

    /// `*` and `/`.
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Mul | Operator::Div)
    }

    /// Ordering and equality comparisons.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            Operator::Less
                | Operator::Greater
                | Operator::LessEqual
                | Operator::GreaterEqual
                | Operator::Equal
                | Operator::NotEqual
        )
    }

    /// `and` and `or`.
    pub fn is_logical(self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }

    /// Operators that combine two operands into a new value.
    pub fn is_binary(self) -> bool {
        self.is_additive() || self.is_multiplicative() || self.is_relational() || self.is_logical()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
