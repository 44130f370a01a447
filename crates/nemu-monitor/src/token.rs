use crate::{expr::op::BinaryOp, expr::Op, Register};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// A decimal literal, like `42`.
    Decimal(String),
    /// A hex literal like `0x2a`, stored without its prefix.
    Hex(String),
    /// A register reference, like `$eax`.
    Register(Register),
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*` in a position where it multiplies.
    Star,
    /// `*` in prefix position, reading memory.
    Deref,
    /// `/`
    Slash,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Lte,
    /// `>=`
    Gte,
    /// `==`
    Eq,
    /// `!=`
    Neq,
    /// `&&`
    And,
}

impl Token {
    /// Test if the token is a literal or a register.
    pub fn is_operand(&self) -> bool {
        match self {
            Self::Decimal(..) | Self::Hex(..) | Self::Register(..) => true,
            _ => false,
        }
    }

    /// Test if a `*` following this token multiplies rather than dereferences.
    pub fn ends_operand(&self) -> bool {
        self.is_operand() || *self == Self::CloseParen
    }

    /// The operator this token represents, if any.
    pub fn op(&self) -> Option<Op> {
        let op = match self {
            Self::Deref => return Some(Op::Deref),
            Self::Plus => BinaryOp::Add,
            Self::Minus => BinaryOp::Sub,
            Self::Star => BinaryOp::Mul,
            Self::Slash => BinaryOp::Div,
            Self::Lt => BinaryOp::Lt,
            Self::Gt => BinaryOp::Gt,
            Self::Lte => BinaryOp::Lte,
            Self::Gte => BinaryOp::Gte,
            Self::Eq => BinaryOp::Eq,
            Self::Neq => BinaryOp::Neq,
            Self::And => BinaryOp::And,
            _ => return None,
        };

        Some(Op::Binary(op))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decimal(digits) => digits.fmt(fmt),
            Self::Hex(digits) => write!(fmt, "0x{}", digits),
            Self::Register(register) => write!(fmt, "${}", register),
            Self::Plus => "+".fmt(fmt),
            Self::Minus => "-".fmt(fmt),
            Self::Star | Self::Deref => "*".fmt(fmt),
            Self::Slash => "/".fmt(fmt),
            Self::OpenParen => "(".fmt(fmt),
            Self::CloseParen => ")".fmt(fmt),
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
