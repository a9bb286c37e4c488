//! Pattern tokenizer and infix-to-postfix conversion.
//!
//! Patterns are read byte by byte. The supported syntax is deliberately
//! small: literals, `\x` escapes, `.`, bracketed classes with ranges,
//! grouping with `(` `)`, alternation with `|` and the postfix operators
//! `*`, `+` and `?`. Concatenation is implicit and is made explicit here so
//! that the Thompson compiler only ever sees a flat postfix sequence.

use std::fmt;

use crate::{CompileError, CompileResult};

/// One unit of the postfix program consumed by the compiler.
///
/// Character classes are already expanded: a `Class` holds every member
/// byte in the order it was written, so nothing downstream needs to know
/// about range syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Literal(u8),
    Class(Vec<u8>),
    Any,
    Concat,
    Union,
    Star,
    Plus,
    Question,
}

/// The operator tokens, used for precedence decisions and error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Union,
    Concat,
    Star,
    Plus,
    Question,
}

impl Operator {
    fn precedence(self) -> u8 {
        match self {
            Operator::Star | Operator::Plus | Operator::Question => 3,
            Operator::Concat => 2,
            Operator::Union => 1,
        }
    }

    fn is_unary(self) -> bool {
        matches!(self, Operator::Star | Operator::Plus | Operator::Question)
    }

    fn token(self) -> Token {
        match self {
            Operator::Union => Token::Union,
            Operator::Concat => Token::Concat,
            Operator::Star => Token::Star,
            Operator::Plus => Token::Plus,
            Operator::Question => Token::Question,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Union => "union",
            Operator::Concat => "concatenation",
            Operator::Star => "star",
            Operator::Plus => "plus",
            Operator::Question => "question",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RawToken {
    Operand(Token),
    Op(Operator),
    LParen,
    RParen,
}

impl RawToken {
    fn begins_operand(&self) -> bool {
        matches!(self, RawToken::Operand(_) | RawToken::LParen)
    }

    fn ends_operand(&self) -> bool {
        match self {
            RawToken::Operand(_) | RawToken::RParen => true,
            RawToken::Op(op) => op.is_unary(),
            RawToken::LParen => false,
        }
    }
}

/// Converts `pattern` into postfix order, honoring precedence
/// (postfix operators, then concatenation, then union) and inserting the
/// implicit concatenations.
pub fn to_postfix(pattern: &str) -> CompileResult<Vec<Token>> {
    let tokens = tokenize(pattern.as_bytes())?;
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<RawToken> = Vec::new();

    for token in tokens {
        match token {
            RawToken::Operand(operand) => output.push(operand),
            RawToken::LParen => stack.push(RawToken::LParen),
            RawToken::RParen => loop {
                match stack.pop() {
                    Some(RawToken::LParen) => break,
                    Some(RawToken::Op(op)) => output.push(op.token()),
                    Some(_) | None => return Err(CompileError::MismatchedParens),
                }
            },
            RawToken::Op(op) => {
                while let Some(RawToken::Op(top)) = stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(top.token());
                    stack.pop();
                }
                stack.push(RawToken::Op(op));
            }
        }
    }

    while let Some(top) = stack.pop() {
        match top {
            RawToken::Op(op) => output.push(op.token()),
            _ => return Err(CompileError::MismatchedParens),
        }
    }
    trace!("postfix for {:?}: {} tokens", pattern, output.len());
    Ok(output)
}

fn tokenize(pattern: &[u8]) -> CompileResult<Vec<RawToken>> {
    let mut raw = Vec::with_capacity(pattern.len());
    let mut i = 0;
    while i < pattern.len() {
        let b = pattern[i];
        let token = match b {
            b if b.is_ascii_whitespace() => {
                i += 1;
                continue;
            }
            b'\\' => {
                let escaped = *pattern.get(i + 1).ok_or(CompileError::DanglingEscape)?;
                i += 1;
                RawToken::Operand(Token::Literal(escaped))
            }
            b'.' => RawToken::Operand(Token::Any),
            b'|' => RawToken::Op(Operator::Union),
            b'*' => RawToken::Op(Operator::Star),
            b'+' => RawToken::Op(Operator::Plus),
            b'?' => RawToken::Op(Operator::Question),
            b'(' => RawToken::LParen,
            b')' => RawToken::RParen,
            b'[' => {
                let (members, close) = parse_class(pattern, i)?;
                i = close;
                RawToken::Operand(Token::Class(members))
            }
            b => RawToken::Operand(Token::Literal(b)),
        };
        raw.push(token);
        i += 1;
    }

    let mut tokens = Vec::with_capacity(raw.len() * 2);
    let mut iter = raw.into_iter().peekable();
    while let Some(token) = iter.next() {
        let concat = match iter.peek() {
            Some(next) => token.ends_operand() && next.begins_operand(),
            None => false,
        };
        tokens.push(token);
        if concat {
            tokens.push(RawToken::Op(Operator::Concat));
        }
    }
    Ok(tokens)
}

/// Reads the class opened at `open` and returns its members along with the
/// index of the closing `]`.
fn parse_class(pattern: &[u8], open: usize) -> CompileResult<(Vec<u8>, usize)> {
    let mut members: Vec<u8> = Vec::new();
    let mut i = open + 1;
    while i < pattern.len() {
        let b = pattern[i];
        let last = members.last().copied();
        match (b, last, pattern.get(i + 1).copied()) {
            (b']', Some(_), _) => return Ok((members, i)),
            (b'-', Some(lo), Some(hi)) if hi != b']' => {
                members.pop();
                let (lo, hi) = if lo > hi { (hi, lo) } else { (lo, hi) };
                members.extend(lo..=hi);
                i += 2;
            }
            _ => {
                members.push(b);
                i += 1;
            }
        }
    }
    Err(CompileError::UnterminatedClass)
}
