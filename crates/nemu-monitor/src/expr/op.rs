use crate::Error;
use std::fmt;

/// How operators of the same precedence group together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    /// `a - b - c` is `(a - b) - c`.
    Left,
    /// `**a` is `*(*a)`.
    Right,
}

/// An operator which can split an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Prefix `*`, reading a 32-bit word from memory.
    Deref,
    /// A binary operator.
    Binary(BinaryOp),
}

impl Op {
    /// Precedence level of the operator. A larger number binds more loosely.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Deref => 2,
            Self::Binary(op) => match op {
                BinaryOp::Mul | BinaryOp::Div => 3,
                BinaryOp::Add | BinaryOp::Sub => 4,
                BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Lte | BinaryOp::Gte => 6,
                BinaryOp::Eq | BinaryOp::Neq => 7,
                BinaryOp::And => 11,
            },
        }
    }

    /// Associativity of the operator.
    pub fn assoc(self) -> Assoc {
        match self {
            Self::Deref => Assoc::Right,
            Self::Binary(..) => Assoc::Left,
        }
    }

    /// Test if `self`, found to the right of `current`, should take over as
    /// the operator which splits the expression.
    ///
    /// The loosest binding operator splits. Among equals, left-associative
    /// operators split at the rightmost one and right-associative operators
    /// at the leftmost one.
    pub fn splits_before(self, current: Op) -> bool {
        match self.precedence().cmp(&current.precedence()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Equal => self.assoc() == Assoc::Left,
            std::cmp::Ordering::Less => false,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deref => "*".fmt(fmt),
            Self::Binary(op) => op.fmt(fmt),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Mul,
    Div,
    Add,
    Sub,
    Lt,
    Gt,
    Lte,
    Gte,
    Eq,
    Neq,
    And,
}

impl BinaryOp {
    /// Apply the operation to the two arguments.
    ///
    /// Arithmetic wraps around at 32 bits. Comparisons and `&&` produce `0`
    /// or `1`.
    pub fn apply(self, lhs: u32, rhs: u32) -> Result<u32, Error> {
        Ok(match self {
            Self::Add => lhs.wrapping_add(rhs),
            Self::Sub => lhs.wrapping_sub(rhs),
            Self::Mul => lhs.wrapping_mul(rhs),
            Self::Div => lhs.checked_div(rhs).ok_or(Error::DivideByZero)?,
            Self::Lt => u32::from(lhs < rhs),
            Self::Gt => u32::from(lhs > rhs),
            Self::Lte => u32::from(lhs <= rhs),
            Self::Gte => u32::from(lhs >= rhs),
            Self::Eq => u32::from(lhs == rhs),
            Self::Neq => u32::from(lhs != rhs),
            Self::And => u32::from(lhs != 0 && rhs != 0),
        })
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Mul => "*".fmt(fmt),
            Self::Div => "/".fmt(fmt),
            Self::Add => "+".fmt(fmt),
            Self::Sub => "-".fmt(fmt),
            Self::Lt => "<".fmt(fmt),
            Self::Gt => ">".fmt(fmt),
            Self::Lte => "<=".fmt(fmt),
            Self::Gte => ">=".fmt(fmt),
            Self::Eq => "==".fmt(fmt),
            Self::Neq => "!=".fmt(fmt),
            Self::And => "&&".fmt(fmt),
        }
    }
}
