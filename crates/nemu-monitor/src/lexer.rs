use crate::{Register, Token};
use std::{borrow::Cow, str};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{} at position {}", .description, .pos)]
pub struct Error {
    /// Description of the error.
    description: Cow<'static, str>,
    /// Offset into the expression which caused the error.
    pos: usize,
}

impl Error {
    /// Offset into the expression which caused the error.
    pub fn pos(&self) -> usize {
        self.pos
    }
}

/// Iterate over an input string and emits tokens.
///
/// Whitespace is skipped. Two-character operators are matched before their
/// one-character prefixes, and hex literals before decimal ones.
#[derive(Debug)]
pub struct Lexer<'a> {
    /// The raw input.
    input: &'a str,
    /// Iterator over the input.
    iter: str::CharIndices<'a>,
    /// First character lookahead.
    c1: Option<(usize, char)>,
    /// Second character lookahead.
    c2: Option<(usize, char)>,
    /// Third character lookahead.
    c3: Option<(usize, char)>,
    /// Shared buffer used for buffering things.
    /// Note: remember to avoid using recursively.
    buf: String,
}

impl<'a> Lexer<'a> {
    /// Construct a new lexer for the given string.
    pub fn new(input: &'a str) -> Lexer<'a> {
        let mut iter = input.char_indices();

        let c1 = iter.next();
        let c2 = iter.next();
        let c3 = iter.next();

        Lexer {
            input,
            iter,
            c1,
            c2,
            c3,
            buf: String::with_capacity(32),
        }
    }

    /// Advance the iterator one step.
    pub fn step(&mut self) {
        self.c1 = self.c2.take();
        self.c2 = self.c3.take();
        self.c3 = self.iter.next();
    }

    /// Advance the iterate `n` number of steps.
    ///
    /// Returns the position stepped to.
    pub fn step_n(&mut self, n: usize) -> usize {
        for _ in 0..n {
            self.step();
        }

        self.pos()
    }

    /// Peek a single character.
    pub fn peek(&self) -> Option<(usize, char)> {
        self.c1
    }

    /// Peek two characters.
    pub fn peek2(&self) -> Option<(usize, char, char)> {
        match (self.c1, self.c2) {
            (Some((p, c1)), Some((_, c2))) => Some((p, c1, c2)),
            _ => None,
        }
    }

    /// Peek three characters.
    pub fn peek3(&self) -> Option<(usize, char, Option<char>, Option<char>)> {
        let (p, c1) = self.c1?;
        Some((p, c1, self.c2.map(|(_, c)| c), self.c3.map(|(_, c)| c)))
    }

    /// Get the current position of the iterator.
    /// Used for error handling.
    pub fn pos(&self) -> usize {
        // NB: if we don't have the first lookahead character, we are at the end of the string.
        self.c1
            .map(|(pos, _)| pos)
            .unwrap_or_else(|| self.input.len())
    }

    /// Format an error with a correct description and position.
    pub fn err(&self, description: impl Into<Cow<'static, str>>) -> Error {
        Error {
            description: description.into(),
            pos: self.pos(),
        }
    }

    /// Scan a run of digits in the given radix.
    fn scan_digits(&mut self, radix: u32) -> String {
        self.buf.clear();

        while let Some((_, c)) = self.peek() {
            if !c.is_digit(radix) {
                break;
            }

            self.buf.push(c);
            self.step();
        }

        self.buf.clone()
    }

    /// Scan a register reference, with the lookahead at the `$` sigil.
    ///
    /// Three-letter names are tried before two-letter ones, so `$eax` is never
    /// read as `$ea` followed by garbage.
    fn scan_register(&mut self) -> Result<Register, Error> {
        let start = self.pos();
        self.step();

        if let Some((_, a, Some(b), Some(c))) = self.peek3() {
            self.buf.clear();
            self.buf.extend(&[a, b, c]);

            if let Ok(register) = self.buf.parse::<Register>() {
                self.step_n(3);
                return Ok(register);
            }
        }

        if let Some((_, a, b)) = self.peek2() {
            self.buf.clear();
            self.buf.extend(&[a, b]);

            if let Ok(register) = self.buf.parse::<Register>() {
                self.step_n(2);
                return Ok(register);
            }
        }

        Err(Error {
            description: "expected register name after `$`".into(),
            pos: start,
        })
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<(usize, Token, usize), Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let two = match self.peek3() {
                Some((s, '=', Some('='), _)) => Some((s, Token::Eq)),
                Some((s, '!', Some('='), _)) => Some((s, Token::Neq)),
                Some((s, '&', Some('&'), _)) => Some((s, Token::And)),
                Some((s, '>', Some('='), _)) => Some((s, Token::Gte)),
                Some((s, '<', Some('='), _)) => Some((s, Token::Lte)),
                Some((s, '0', Some('x'), Some(c))) if c.is_ascii_hexdigit() => {
                    self.step_n(2);
                    let digits = self.scan_digits(16);
                    let e = self.pos();
                    return Some(Ok((s, Token::Hex(digits), e)));
                }
                _ => None,
            };

            if let Some((s, token)) = two {
                let e = self.step_n(2);
                return Some(Ok((s, token, e)));
            }

            let (s, c) = self.peek()?;

            let token = match c {
                ' ' | '\t' => {
                    self.step();
                    continue;
                }
                '0'..='9' => {
                    let digits = self.scan_digits(10);
                    let e = self.pos();
                    return Some(Ok((s, Token::Decimal(digits), e)));
                }
                '$' => {
                    let register = match self.scan_register() {
                        Ok(register) => register,
                        Err(e) => return Some(Err(e)),
                    };

                    let e = self.pos();
                    return Some(Ok((s, Token::Register(register), e)));
                }
                '+' => Token::Plus,
                '-' => Token::Minus,
                '*' => Token::Star,
                '/' => Token::Slash,
                '(' => Token::OpenParen,
                ')' => Token::CloseParen,
                '<' => Token::Lt,
                '>' => Token::Gt,
                c => return Some(Err(self.err(format!("unexpected character `{}`", c)))),
            };

            self.step();
            let e = self.pos();
            return Some(Ok((s, token, e)));
        }
    }
}

/// Tokenize an expression, failing if it produces more than `max_tokens`
/// tokens.
///
/// Every `*` which can't be a multiplication, because it comes first or
/// follows something other than an operand or `)`, is turned into
/// [Token::Deref].
pub fn tokenize(input: &str, max_tokens: usize) -> Result<Vec<Token>, crate::Error> {
    let mut tokens = Vec::new();

    for result in Lexer::new(input) {
        let (s, token, e) = result?;

        if tokens.len() >= max_tokens {
            return Err(crate::Error::TooManyTokens(max_tokens));
        }

        log::trace!("token #{} at {}..{}: {}", tokens.len(), s, e, token);
        tokens.push(token);
    }

    mark_derefs(&mut tokens);
    Ok(tokens)
}

fn mark_derefs(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        if tokens[i] != Token::Star {
            continue;
        }

        if i == 0 || !tokens[i - 1].ends_operand() {
            tokens[i] = Token::Deref;
        }
    }
}
