//! Evaluation of debugger expressions over a token stream.
//!
//! Expressions are not parsed into a tree. Instead each range of tokens is
//! split at its _main operator_, the loosest binding operator outside of any
//! parentheses, and both halves are evaluated recursively.

use crate::{lexer, utils::Hex, Config, Error, Resolver, Token};
use log::{debug, trace};
use std::{num::IntErrorKind, ops::Range};

pub use self::op::{Assoc, BinaryOp, Op};

pub mod op;

/// Width of a dereferenced memory read, in bytes.
const DEREF_WIDTH: usize = 4;

/// Tokenize and evaluate an expression.
pub fn evaluate<R>(input: &str, resolver: &R, config: &Config) -> Result<u32, Error>
where
    R: ?Sized + Resolver,
{
    let tokens = lexer::tokenize(input, config.max_tokens)?;
    Evaluator::new(&tokens, resolver, config).eval_all()
}

/// Evaluates ranges of an owned token stream.
pub struct Evaluator<'a, R>
where
    R: ?Sized,
{
    tokens: &'a [Token],
    resolver: &'a R,
    /// Exclusive upper bound of addresses which can be dereferenced.
    memory_limit: u32,
    /// How deep operators and groups may nest.
    max_depth: usize,
}

impl<'a, R> Evaluator<'a, R>
where
    R: ?Sized + Resolver,
{
    pub fn new(tokens: &'a [Token], resolver: &'a R, config: &Config) -> Self {
        Self {
            tokens,
            resolver,
            memory_limit: config.memory_limit,
            max_depth: config.max_depth,
        }
    }

    /// Evaluate the whole token stream.
    pub fn eval_all(&self) -> Result<u32, Error> {
        self.eval(0..self.tokens.len())
    }

    /// Evaluate the given range of tokens.
    pub fn eval(&self, range: Range<usize>) -> Result<u32, Error> {
        self.eval_nested(range, 0)
    }

    fn eval_nested(&self, range: Range<usize>, depth: usize) -> Result<u32, Error> {
        trace!("eval {}..{} (depth {})", range.start, range.end, depth);

        if depth > self.max_depth {
            return Err(Error::TooDeep(self.max_depth));
        }

        if range.start >= range.end {
            return Err(Error::Empty(range));
        }

        if range.end - range.start == 1 {
            return self.operand(range.start);
        }

        if self.is_enclosed(range.clone()) {
            return self.eval_nested(range.start + 1..range.end - 1, depth + 1);
        }

        let (index, op) = self.main_op(range.clone())?;
        debug!("main operator `{}` at {}", op, index);

        match op {
            Op::Deref => {
                if index != range.start {
                    return Err(Error::MisplacedDeref(index));
                }

                let address = self.eval_nested(index + 1..range.end, depth + 1)?;
                self.deref(address)
            }
            Op::Binary(op) => {
                // NB: both sides are always evaluated, `&&` doesn't short-circuit.
                let lhs = self.eval_nested(range.start..index, depth + 1)?;
                let rhs = self.eval_nested(index + 1..range.end, depth + 1)?;
                op.apply(lhs, rhs)
            }
        }
    }

    /// Evaluate a single token.
    fn operand(&self, index: usize) -> Result<u32, Error> {
        match &self.tokens[index] {
            Token::Decimal(digits) => literal(digits, 10),
            Token::Hex(digits) => literal(digits, 16),
            Token::Register(register) => self
                .resolver
                .read_register(*register)
                .ok_or(Error::UnknownRegister(*register)),
            token => Err(Error::UnexpectedToken {
                index,
                token: token.to_string(),
            }),
        }
    }

    /// Read a word of memory at the given address.
    fn deref(&self, address: u32) -> Result<u32, Error> {
        if address >= self.memory_limit {
            return Err(Error::AddressOutOfBounds(Hex(address)));
        }

        self.resolver
            .read_memory(address, DEREF_WIDTH)
            .ok_or(Error::MemoryRead(Hex(address)))
    }

    /// Test if the range is a single parenthesized group, like `(1 + 2)` but
    /// not `(1) + (2)`.
    fn is_enclosed(&self, range: Range<usize>) -> bool {
        let last = range.end - 1;

        if self.tokens[range.start] != Token::OpenParen || self.tokens[last] != Token::CloseParen {
            return false;
        }

        let mut depth = 0usize;

        for i in range {
            match self.tokens[i] {
                Token::OpenParen => depth += 1,
                Token::CloseParen => {
                    depth = match depth.checked_sub(1) {
                        Some(depth) => depth,
                        None => return false,
                    };

                    if depth == 0 && i != last {
                        return false;
                    }
                }
                _ => (),
            }
        }

        depth == 0
    }

    /// Find the operator which splits the given range.
    fn main_op(&self, range: Range<usize>) -> Result<(usize, Op), Error> {
        let mut depth = 0usize;
        let mut current: Option<(usize, Op)> = None;

        for i in range.clone() {
            let token = &self.tokens[i];

            match token {
                Token::OpenParen => {
                    depth += 1;
                    continue;
                }
                Token::CloseParen => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| Error::UnbalancedParens(range.clone()))?;
                    continue;
                }
                _ => (),
            }

            if depth > 0 {
                continue;
            }

            let op = match token.op() {
                Some(op) => op,
                None => continue,
            };

            current = match current {
                Some((_, c)) if !op.splits_before(c) => current,
                _ => Some((i, op)),
            };
        }

        if depth != 0 {
            return Err(Error::UnbalancedParens(range));
        }

        current.ok_or(Error::NoOperator(range))
    }
}

/// Parse literal digits into a 32-bit value.
///
/// Values wider than 32 bits are truncated, and values which don't fit in 64
/// bits saturate before being truncated.
fn literal(digits: &str, radix: u32) -> Result<u32, Error> {
    let value = match u64::from_str_radix(digits, radix) {
        Ok(value) => value,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
        Err(..) => return Err(Error::BadLiteral(digits.to_string())),
    };

    Ok(value as u32)
}
