//! The quadruple instruction set.
//!
//! Each [`Quad`] variant is one opcode with its operands. Operands are
//! [`Variable`]s (typed addresses), raw integers (jump targets, literal
//! factors, base addresses) or method names.
//!
//! The only in-place mutation a quadruple ever sees after being emitted is
//! the back-patch of a pending jump target ([`Quad::set_jump_target`]).

use std::fmt;

use crate::operator::Operator;
use crate::variable::Variable;

/// Opcode tags, one per [`Quad`] variant (binary operators are split out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
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
    Goto,
    GotoF,
    GotoT,
    Read,
    Write,
    VerAccs,
    ProdLit,
    AddLit,
    Era,
    Param,
    Gosub,
    Return,
    EndConstructor,
    EndFunc,
}

impl OpCode {
    /// Mnemonic used in listings.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Add => "+",
            OpCode::Sub => "-",
            OpCode::Mul => "*",
            OpCode::Div => "/",
            OpCode::Less => "<",
            OpCode::Greater => ">",
            OpCode::LessEqual => "<=",
            OpCode::GreaterEqual => ">=",
            OpCode::Equal => "==",
            OpCode::NotEqual => "!=",
            OpCode::And => "and",
            OpCode::Or => "or",
            OpCode::Not => "not",
            OpCode::Assign => "=",
            OpCode::Goto => "GOTO",
            OpCode::GotoF => "GOTOF",
            OpCode::GotoT => "GOTOT",
            OpCode::Read => "READ",
            OpCode::Write => "WRITE",
            OpCode::VerAccs => "VER_ACCS",
            OpCode::ProdLit => "PROD_LIT",
            OpCode::AddLit => "ADD_LIT",
            OpCode::Era => "ERA",
            OpCode::Param => "PARAM",
            OpCode::Gosub => "GOSUB",
            OpCode::Return => "RETURN",
            OpCode::EndConstructor => "END_CONSTRUCTOR",
            OpCode::EndFunc => "END_FUNC",
        }
    }

    fn of_operator(op: Operator) -> Self {
        match op {
            Operator::Add => OpCode::Add,
            Operator::Sub => OpCode::Sub,
            Operator::Mul => OpCode::Mul,
            Operator::Div => OpCode::Div,
            Operator::Less => OpCode::Less,
            Operator::Greater => OpCode::Greater,
            Operator::LessEqual => OpCode::LessEqual,
            Operator::GreaterEqual => OpCode::GreaterEqual,
            Operator::Equal => OpCode::Equal,
            Operator::NotEqual => OpCode::NotEqual,
            Operator::And => OpCode::And,
            Operator::Or => OpCode::Or,
            Operator::Not => OpCode::Not,
            Operator::Assign | Operator::FakeBottom => OpCode::Assign,
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whose instance a new activation record runs against.
#[derive(Debug, Clone, PartialEq)]
pub enum EraTarget {
    /// Allocate a fresh instance of the class.
    Constructor { class: String },
    /// Reuse the caller's instance.
    SelfInstance,
    /// Use the object stored in this variable (possibly an array pointer).
    Instance(Variable),
}

impl fmt::Display for EraTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EraTarget::Constructor { class } => write!(f, "new {class}"),
            EraTarget::SelfInstance => f.write_str("self"),
            EraTarget::Instance(var) => write!(f, "{var}"),
        }
    }
}

/// One four-address instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Quad {
    /// `result = left op right`
    Binary {
        op: Operator,
        left: Variable,
        right: Variable,
        result: Variable,
    },
    /// `result = not operand`
    Not { operand: Variable, result: Variable },
    /// `target = source`
    Assign { source: Variable, target: Variable },
    /// Unconditional jump. `None` until back-patched.
    Goto { target: Option<usize> },
    /// Jump when `condition` is false.
    GotoF {
        condition: Variable,
        target: Option<usize>,
    },
    /// Jump when `condition` is true.
    GotoT {
        condition: Variable,
        target: Option<usize>,
    },
    /// Read one input line into `target`.
    Read { target: Variable },
    /// Print `source`.
    Write { source: Variable },
    /// Fail unless `lower <= index < upper`.
    VerAccs {
        index: Variable,
        lower: i64,
        upper: i64,
    },
    /// `result = operand * factor`
    ProdLit {
        operand: Variable,
        factor: i64,
        result: Variable,
    },
    /// `result = &cell(base + operand)`; `result` is an array pointer.
    AddLit {
        operand: Variable,
        base: u32,
        result: Variable,
    },
    /// Prepare an activation record for `method`.
    Era { target: EraTarget, method: String },
    /// Copy `source` into formal `target` of the pending record.
    Param { source: Variable, target: Variable },
    /// Call `method` at `entry`.
    Gosub { method: String, entry: usize },
    /// Return to the caller.
    Return,
    /// Store the active instance into `slot` and return.
    EndConstructor { slot: Variable },
    /// End of a method body.
    EndFunc,
}

impl Quad {
    pub fn opcode(&self) -> OpCode {
        match self {
            Quad::Binary { op, .. } => OpCode::of_operator(*op),
            Quad::Not { .. } => OpCode::Not,
            Quad::Assign { .. } => OpCode::Assign,
            Quad::Goto { .. } => OpCode::Goto,
            Quad::GotoF { .. } => OpCode::GotoF,
            Quad::GotoT { .. } => OpCode::GotoT,
            Quad::Read { .. } => OpCode::Read,
            Quad::Write { .. } => OpCode::Write,
            Quad::VerAccs { .. } => OpCode::VerAccs,
            Quad::ProdLit { .. } => OpCode::ProdLit,
            Quad::AddLit { .. } => OpCode::AddLit,
            Quad::Era { .. } => OpCode::Era,
            Quad::Param { .. } => OpCode::Param,
            Quad::Gosub { .. } => OpCode::Gosub,
            Quad::Return => OpCode::Return,
            Quad::EndConstructor { .. } => OpCode::EndConstructor,
            Quad::EndFunc => OpCode::EndFunc,
        }
    }

    /// Jump target of a GOTO-family quadruple.
    pub fn jump_target(&self) -> Option<usize> {
        match self {
            Quad::Goto { target } | Quad::GotoF { target, .. } | Quad::GotoT { target, .. } => {
                *target
            }
            _ => None,
        }
    }

    /// Whether this is a GOTO-family quadruple still waiting for its target.
    pub fn is_pending_jump(&self) -> bool {
        matches!(
            self,
            Quad::Goto { target: None }
                | Quad::GotoF { target: None, .. }
                | Quad::GotoT { target: None, .. }
        )
    }

    /// Fill in a pending jump target.
    ///
    /// Returns `false` if this is not a pending GOTO-family quadruple; the
    /// instruction is left untouched in that case.
    pub fn set_jump_target(&mut self, resolved: usize) -> bool {
        match self {
            Quad::Goto { target } | Quad::GotoF { target, .. } | Quad::GotoT { target, .. }
                if target.is_none() =>
            {
                *target = Some(resolved);
                true
            }
            _ => false,
        }
    }
}

fn target_text(target: &Option<usize>) -> String {
    target.map_or_else(|| "?".to_string(), |t| t.to_string())
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.opcode().name();
        let (a, b, c) = match self {
            Quad::Binary {
                left,
                right,
                result,
                ..
            } => (left.to_string(), right.to_string(), result.to_string()),
            Quad::Not { operand, result } => {
                (operand.to_string(), String::new(), result.to_string())
            }
            Quad::Assign { source, target } => {
                (source.to_string(), String::new(), target.to_string())
            }
            Quad::Goto { target } => (String::new(), String::new(), target_text(target)),
            Quad::GotoF { condition, target } | Quad::GotoT { condition, target } => {
                (condition.to_string(), String::new(), target_text(target))
            }
            Quad::Read { target } => (String::new(), String::new(), target.to_string()),
            Quad::Write { source } => (String::new(), String::new(), source.to_string()),
            Quad::VerAccs {
                index,
                lower,
                upper,
            } => (index.to_string(), lower.to_string(), upper.to_string()),
            Quad::ProdLit {
                operand,
                factor,
                result,
            } => (operand.to_string(), factor.to_string(), result.to_string()),
            Quad::AddLit {
                operand,
                base,
                result,
            } => (operand.to_string(), base.to_string(), result.to_string()),
            Quad::Era { target, method } => (target.to_string(), method.clone(), String::new()),
            Quad::Param { source, target } => {
                (source.to_string(), String::new(), target.to_string())
            }
            Quad::Gosub { method, entry } => (method.clone(), String::new(), entry.to_string()),
            Quad::Return | Quad::EndFunc => (String::new(), String::new(), String::new()),
            Quad::EndConstructor { slot } => (String::new(), String::new(), slot.to_string()),
        };
        write!(f, "{name:<16}{a:>10}{b:>10}{c:>10}")
    }
}
