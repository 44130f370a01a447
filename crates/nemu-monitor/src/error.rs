use crate::{lexer, utils::Hex, Register};
use std::ops::Range;
use thiserror::Error;

/// The category of a failure, as seen by the command layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input could not be split into tokens.
    Tokenize,
    /// Tokens do not form an expression.
    Parse,
    /// A register or memory operand could not be resolved.
    Resolve,
    /// Division by zero.
    Arithmetic,
    /// No free watchpoint slots.
    PoolExhausted,
    /// No active watchpoint with the given id.
    UnknownWatchpoint,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Tokenize(#[from] lexer::Error),
    #[error("too many tokens in expression (limit is {0})")]
    TooManyTokens(usize),
    #[error("empty expression at tokens {}..{}", .0.start, .0.end)]
    Empty(Range<usize>),
    #[error("unbalanced parentheses at tokens {}..{}", .0.start, .0.end)]
    UnbalancedParens(Range<usize>),
    #[error("no operator found at tokens {}..{}", .0.start, .0.end)]
    NoOperator(Range<usize>),
    #[error("expression nests too deeply (limit is {0})")]
    TooDeep(usize),
    #[error("unexpected token `{token}` at {index}")]
    UnexpectedToken { index: usize, token: String },
    #[error("dereference at {0} cannot take a left operand")]
    MisplacedDeref(usize),
    #[error("bad literal `{0}`")]
    BadLiteral(String),
    #[error("unrecognized register `{0}`")]
    UnknownRegister(Register),
    #[error("memory address {0} out of bound")]
    AddressOutOfBounds(Hex),
    #[error("failed to read memory at {0}")]
    MemoryRead(Hex),
    #[error("division by zero")]
    DivideByZero,
    #[error("no free watchpoints (capacity is {0})")]
    PoolExhausted(usize),
    #[error("no watchpoint with id {0}")]
    UnknownWatchpoint(usize),
}

impl Error {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Tokenize(..) | Self::TooManyTokens(..) => ErrorKind::Tokenize,
            Self::Empty(..)
            | Self::UnbalancedParens(..)
            | Self::NoOperator(..)
            | Self::TooDeep(..)
            | Self::UnexpectedToken { .. }
            | Self::MisplacedDeref(..)
            | Self::BadLiteral(..) => ErrorKind::Parse,
            Self::UnknownRegister(..) | Self::AddressOutOfBounds(..) | Self::MemoryRead(..) => {
                ErrorKind::Resolve
            }
            Self::DivideByZero => ErrorKind::Arithmetic,
            Self::PoolExhausted(..) => ErrorKind::PoolExhausted,
            Self::UnknownWatchpoint(..) => ErrorKind::UnknownWatchpoint,
        }
    }
}
