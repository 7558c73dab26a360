// Arithmetic for `%EXPRESSION` entries.
// Supports: integer and float literals, + - * / // % **, unary + and -, parentheses.
// Integers stay integers except under `/` and negative powers, which produce floats.

use std::fmt;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MathError {
    #[error("unexpected character '{0}' at {1}")]
    UnexpectedChar(char, usize),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("result too large")]
    Overflow,
    #[error("result is not a real number")]
    NotReal,
    #[error("empty expression")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
}

impl Value {
    fn as_f64(self) -> f64 {
        match self {
            Value::Int(i) => i as f64,
            Value::Float(f) => f,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps the trailing ".0" on integral floats and switches to
            // exponent form at the same magnitudes as Python's repr.
            Value::Float(x) => {
                let repr = format!("{x:?}");
                match repr.split_once('e') {
                    Some((mantissa, exp)) => {
                        let (sign, digits) = match exp.strip_prefix('-') {
                            Some(digits) => ('-', digits),
                            None => ('+', exp),
                        };
                        write!(f, "{mantissa}e{sign}{digits:0>2}")
                    }
                    None => f.write_str(&repr),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Number(Value),
    Neg(Box<Expr>),
    BinaryOp {
        op: Op,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Op {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Value),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    SlashSlash,
    Percent,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(v) => write!(f, "number {v}"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::StarStar => f.write_str("'**'"),
            Token::Slash => f.write_str("'/'"),
            Token::SlashSlash => f.write_str("'//'"),
            Token::Percent => f.write_str("'%'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

/// Parse and evaluate an arithmetic expression.
pub fn evaluate(input: &str) -> Result<Value, MathError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(MathError::Empty);
    }
    let (expr, pos) = parse_add_sub(&tokens, 0)?;
    if let Some(extra) = tokens.get(pos) {
        return Err(MathError::UnexpectedToken(extra.to_string()));
    }
    finite(eval(&expr)?)
}

fn finite(value: Value) -> Result<Value, MathError> {
    match value {
        Value::Float(x) if x.is_nan() => Err(MathError::NotReal),
        Value::Float(x) if x.is_infinite() => Err(MathError::Overflow),
        v => Ok(v),
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, MathError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' => {
                tokens.push(Token::Plus);
                chars.next();
            }
            '-' => {
                tokens.push(Token::Minus);
                chars.next();
            }
            '%' => {
                tokens.push(Token::Percent);
                chars.next();
            }
            '(' => {
                tokens.push(Token::LParen);
                chars.next();
            }
            ')' => {
                tokens.push(Token::RParen);
                chars.next();
            }
            '*' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '*').is_some() {
                    tokens.push(Token::StarStar);
                } else {
                    tokens.push(Token::Star);
                }
            }
            '/' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '/').is_some() {
                    tokens.push(Token::SlashSlash);
                } else {
                    tokens.push(Token::Slash);
                }
            }
            '0'..='9' | '.' => {
                let mut literal = String::new();
                let mut is_float = false;
                while let Some((_, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit() || c == '.' || c == '_') {
                    is_float |= c == '.';
                    if c != '_' {
                        literal.push(c);
                    }
                }
                // Exponent: 1e3, 2.5E-2
                if let Some((_, e)) = chars.next_if(|&(_, c)| c == 'e' || c == 'E') {
                    is_float = true;
                    literal.push(e);
                    if let Some((_, sign)) = chars.next_if(|&(_, c)| c == '+' || c == '-') {
                        literal.push(sign);
                    }
                    while let Some((_, d)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
                        literal.push(d);
                    }
                }
                tokens.push(Token::Number(parse_number(&literal, is_float)?));
            }
            other => return Err(MathError::UnexpectedChar(other, i)),
        }
    }

    Ok(tokens)
}

fn parse_number(literal: &str, is_float: bool) -> Result<Value, MathError> {
    let invalid = || MathError::InvalidNumber(literal.to_string());
    if is_float {
        literal.parse::<f64>().map(Value::Float).map_err(|_| invalid())
    } else {
        match literal.parse::<i64>() {
            Ok(i) => Ok(Value::Int(i)),
            Err(e) if matches!(e.kind(), std::num::IntErrorKind::PosOverflow) => {
                Err(MathError::Overflow)
            }
            Err(_) => Err(invalid()),
        }
    }
}

// Lowest precedence: + and -
fn parse_add_sub(tokens: &[Token], pos: usize) -> Result<(Expr, usize), MathError> {
    let (mut left, mut pos) = parse_mul_div(tokens, pos)?;

    while let Some(token) = tokens.get(pos) {
        let op = match token {
            Token::Plus => Op::Add,
            Token::Minus => Op::Sub,
            _ => break,
        };
        let (right, new_pos) = parse_mul_div(tokens, pos + 1)?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

fn parse_mul_div(tokens: &[Token], pos: usize) -> Result<(Expr, usize), MathError> {
    let (mut left, mut pos) = parse_unary(tokens, pos)?;

    while let Some(token) = tokens.get(pos) {
        let op = match token {
            Token::Star => Op::Mul,
            Token::Slash => Op::Div,
            Token::SlashSlash => Op::FloorDiv,
            Token::Percent => Op::Mod,
            _ => break,
        };
        let (right, new_pos) = parse_unary(tokens, pos + 1)?;
        left = Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        };
        pos = new_pos;
    }

    Ok((left, pos))
}

// Unary sign binds looser than **, so -2**2 is -(2**2).
fn parse_unary(tokens: &[Token], pos: usize) -> Result<(Expr, usize), MathError> {
    match tokens.get(pos) {
        Some(Token::Minus) => {
            let (operand, pos) = parse_unary(tokens, pos + 1)?;
            Ok((Expr::Neg(Box::new(operand)), pos))
        }
        Some(Token::Plus) => parse_unary(tokens, pos + 1),
        _ => parse_power(tokens, pos),
    }
}

// Right-associative: 2**3**2 is 2**(3**2).
fn parse_power(tokens: &[Token], pos: usize) -> Result<(Expr, usize), MathError> {
    let (base, pos) = parse_primary(tokens, pos)?;
    if let Some(Token::StarStar) = tokens.get(pos) {
        let (exponent, pos) = parse_unary(tokens, pos + 1)?;
        return Ok((
            Expr::BinaryOp {
                op: Op::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
            },
            pos,
        ));
    }
    Ok((base, pos))
}

fn parse_primary(tokens: &[Token], pos: usize) -> Result<(Expr, usize), MathError> {
    match tokens.get(pos) {
        Some(Token::Number(v)) => Ok((Expr::Number(*v), pos + 1)),
        Some(Token::LParen) => {
            let (inner, pos) = parse_add_sub(tokens, pos + 1)?;
            match tokens.get(pos) {
                Some(Token::RParen) => Ok((inner, pos + 1)),
                Some(other) => Err(MathError::UnexpectedToken(other.to_string())),
                None => Err(MathError::UnexpectedEnd),
            }
        }
        Some(other) => Err(MathError::UnexpectedToken(other.to_string())),
        None => Err(MathError::UnexpectedEnd),
    }
}

fn eval(expr: &Expr) -> Result<Value, MathError> {
    match expr {
        Expr::Number(v) => Ok(*v),
        Expr::Neg(inner) => match eval(inner)? {
            Value::Int(i) => i.checked_neg().map(Value::Int).ok_or(MathError::Overflow),
            Value::Float(f) => Ok(Value::Float(-f)),
        },
        Expr::BinaryOp { op, left, right } => apply(*op, eval(left)?, eval(right)?),
    }
}

fn apply(op: Op, a: Value, b: Value) -> Result<Value, MathError> {
    use Value::{Float, Int};

    match (op, a, b) {
        (Op::Add, Int(x), Int(y)) => x.checked_add(y).map(Int).ok_or(MathError::Overflow),
        (Op::Sub, Int(x), Int(y)) => x.checked_sub(y).map(Int).ok_or(MathError::Overflow),
        (Op::Mul, Int(x), Int(y)) => x.checked_mul(y).map(Int).ok_or(MathError::Overflow),
        (Op::FloorDiv, Int(x), Int(y)) => {
            if y == 0 {
                return Err(MathError::DivisionByZero);
            }
            let q = x.checked_div(y).ok_or(MathError::Overflow)?;
            let floored = if x % y != 0 && ((x < 0) != (y < 0)) { q - 1 } else { q };
            Ok(Int(floored))
        }
        (Op::Mod, Int(x), Int(y)) => {
            if y == 0 {
                return Err(MathError::DivisionByZero);
            }
            let r = x.checked_rem(y).ok_or(MathError::Overflow)?;
            // Result takes the sign of the divisor.
            Ok(Int(if r != 0 && ((r < 0) != (y < 0)) { r + y } else { r }))
        }
        (Op::Pow, Int(x), Int(y)) if y >= 0 => {
            let exp = u32::try_from(y).map_err(|_| MathError::Overflow)?;
            x.checked_pow(exp).map(Int).ok_or(MathError::Overflow)
        }
        (op, a, b) => apply_float(op, a.as_f64(), b.as_f64()),
    }
}

fn apply_float(op: Op, x: f64, y: f64) -> Result<Value, MathError> {
    let v = match op {
        Op::Add => x + y,
        Op::Sub => x - y,
        Op::Mul => x * y,
        Op::Div | Op::FloorDiv | Op::Mod if y == 0.0 => return Err(MathError::DivisionByZero),
        Op::Div => x / y,
        Op::FloorDiv => (x / y).floor(),
        Op::Mod => {
            let r = x % y;
            if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
                r + y
            } else {
                r
            }
        }
        Op::Pow => x.powf(y),
    };
    finite(Value::Float(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(input: &str) -> String {
        evaluate(input).unwrap().to_string()
    }

    #[test]
    fn integer_arithmetic() {
        assert_eq!(show("2+2"), "4");
        assert_eq!(show("2 * (3 + 4)"), "14");
        assert_eq!(show("10 - 2 - 3"), "5");
        assert_eq!(show("1_000 * 3"), "3000");
    }

    #[test]
    fn true_division_is_float() {
        assert_eq!(show("7/2"), "3.5");
        assert_eq!(show("4/2"), "2.0");
    }

    #[test]
    fn floor_division_and_modulo_follow_divisor_sign() {
        assert_eq!(show("7//2"), "3");
        assert_eq!(show("-7//2"), "-4");
        assert_eq!(show("7%3"), "1");
        assert_eq!(show("-7%3"), "2");
        assert_eq!(show("7%-3"), "-2");
        assert_eq!(show("7.5//2"), "3.0");
    }

    #[test]
    fn power_precedence() {
        assert_eq!(show("2**10"), "1024");
        assert_eq!(show("-2**2"), "-4");
        assert_eq!(show("2**3**2"), "512");
        assert_eq!(show("2**-1"), "0.5");
        assert_eq!(show("2*3**2"), "18");
    }

    #[test]
    fn float_literals() {
        assert_eq!(show("0.1 + 0.2"), "0.30000000000000004");
        assert_eq!(show(".5 * 4"), "2.0");
        assert_eq!(show("1e3"), "1000.0");
        assert_eq!(show("-(1.5)"), "-1.5");
    }

    #[test]
    fn errors() {
        assert_eq!(evaluate(""), Err(MathError::Empty));
        assert_eq!(evaluate("2+"), Err(MathError::UnexpectedEnd));
        assert_eq!(evaluate("(1"), Err(MathError::UnexpectedEnd));
        assert_eq!(evaluate("1/0"), Err(MathError::DivisionByZero));
        assert_eq!(evaluate("1%0"), Err(MathError::DivisionByZero));
        assert_eq!(evaluate("2**200"), Err(MathError::Overflow));
        assert!(matches!(
            evaluate("2 x 3"),
            Err(MathError::UnexpectedChar('x', 2))
        ));
        assert!(matches!(evaluate("1 2"), Err(MathError::UnexpectedToken(_))));
        assert!(matches!(evaluate("1..2"), Err(MathError::InvalidNumber(_))));
    }

    #[test]
    fn non_finite_floats_are_errors() {
        assert_eq!(evaluate("2.0**2000"), Err(MathError::Overflow));
        assert_eq!(evaluate("1e308 * 10 - 1e308 * 10"), Err(MathError::Overflow));
        assert_eq!(evaluate("1e400"), Err(MathError::Overflow));
        assert_eq!(evaluate("(-8)**0.5"), Err(MathError::NotReal));
    }

    #[test]
    fn exponent_form_matches_python_repr() {
        assert_eq!(show("1e16"), "1e+16");
        assert_eq!(show("10.0**16"), "1e+16");
        assert_eq!(show("2.5e20"), "2.5e+20");
        assert_eq!(show("1/8e6"), "1.25e-07");
        assert_eq!(show("1e15"), "1000000000000000.0");
        assert_eq!(show("0.0001"), "0.0001");
        assert_eq!(show("-1e16"), "-1e+16");
    }
}
