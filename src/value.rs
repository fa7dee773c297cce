use std::cmp::Ordering;
use std::fmt;

use crate::data_type::DataType;
use crate::error::{Error, Result};

/// Represents a single cell value stored in a table.
///
/// This enum wraps all supported scalar types into a single type that can be
/// passed around the engine. Every value is produced by reading a raw command
/// token through [Value::parse], so a value's variant always matches the type
/// of the column it is headed for.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A 32-bit signed integer value.
    Int(i32),
    /// A 32-bit floating-point value.
    Float(f32),
    /// A single byte, rendered as one character.
    Char(u8),
    /// A text value of arbitrary length; columns clip it to their declared
    /// capacity when storing it.
    Varchar(String),
}

/// Comparison operator of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
    Ne,
}

impl CompareOp {
    /// Reads an operator token. Exactly `=`, `>`, `>=`, `<`, `<=` and `!=`
    /// are accepted; anything else (including `==`) is a syntax error.
    pub fn parse(token: &str) -> Result<Self> {
        match token {
            "=" => Ok(Self::Eq),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            "!=" => Ok(Self::Ne),
            _ => Err(Error::Syntax(format!(
                "unrecognized comparison operator '{token}'"
            ))),
        }
    }
}

/// Reads the longest leading base-10 integer out of `text`: optional ASCII
/// whitespace, optional sign, then digits. Anything after the digits is
/// ignored; no digits at all yields 0; values beyond the `i32` range
/// saturate at the bounds.
pub fn parse_int(text: &str) -> i32 {
    let bytes = text.as_bytes();
    let mut index = 0;
    while index < bytes.len() && bytes[index].is_ascii_whitespace() {
        index += 1;
    }
    let mut negative = false;
    if index < bytes.len() && (bytes[index] == b'+' || bytes[index] == b'-') {
        negative = bytes[index] == b'-';
        index += 1;
    }
    let cap = i64::from(i32::MAX) + 1;
    let mut magnitude: i64 = 0;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        magnitude = magnitude * 10 + i64::from(bytes[index] - b'0');
        if magnitude > cap {
            magnitude = cap;
        }
        index += 1;
    }
    let signed = if negative { -magnitude } else { magnitude };
    signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Reads the longest leading base-10 float out of `text`: optional ASCII
/// whitespace and sign, a decimal mantissa (digits with at most one `.`),
/// and an optional exponent. The exponent is only consumed when at least one
/// digit follows it. No mantissa digits yields 0.0; overflow yields
/// infinity. Alphabetic spellings such as `inf` or `nan` are not recognized.
pub fn parse_float(text: &str) -> f32 {
    let bytes = text.as_bytes();
    let mut start = 0;
    while start < bytes.len() && bytes[start].is_ascii_whitespace() {
        start += 1;
    }
    let mut index = start;
    if index < bytes.len() && (bytes[index] == b'+' || bytes[index] == b'-') {
        index += 1;
    }
    let mut mantissa_digits = 0;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        index += 1;
        mantissa_digits += 1;
    }
    if index < bytes.len() && bytes[index] == b'.' {
        index += 1;
        while index < bytes.len() && bytes[index].is_ascii_digit() {
            index += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return 0.0;
    }
    let mut end = index;
    if index < bytes.len() && (bytes[index] == b'e' || bytes[index] == b'E') {
        let mut exp_end = index + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    text[start..end].parse().unwrap_or(0.0)
}

impl Value {
    /// Reads a raw command token as a value of the given type.
    ///
    /// This never fails: numeric tokens use the forgiving partial parse of
    /// [parse_int] / [parse_float], a Char takes the first byte of the token
    /// (or a space when the token is empty), and a Varchar keeps the token
    /// text as is.
    pub fn parse(data_type: DataType, literal: &str) -> Self {
        match data_type {
            DataType::Int => Value::Int(parse_int(literal)),
            DataType::Float => Value::Float(parse_float(literal)),
            DataType::Char => {
                Value::Char(literal.as_bytes().first().copied().unwrap_or(b' '))
            }
            DataType::Varchar(_) => Value::Varchar(literal.to_string()),
        }
    }

    /// Evaluates `self op other` for two values of the same variant.
    ///
    /// Ints and floats compare numerically, chars by byte ordinal, varchars
    /// byte-wise lexicographically. Values of different variants are never
    /// ordered, so only `Ne` holds between them.
    pub fn compare(&self, op: CompareOp, other: &Value) -> bool {
        let ordering = match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Char(a), Value::Char(b)) => a.partial_cmp(b),
            (Value::Varchar(a), Value::Varchar(b)) => a.partial_cmp(b),
            _ => None,
        };
        match op {
            CompareOp::Eq => ordering == Some(Ordering::Equal),
            CompareOp::Ne => ordering != Some(Ordering::Equal),
            CompareOp::Gt => ordering == Some(Ordering::Greater),
            CompareOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            CompareOp::Lt => ordering == Some(Ordering::Less),
            CompareOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        }
    }

    /// Returns the inner integer value if this is a [Value::Int].
    /// Otherwise, returns `None`.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the inner float value if this is a [Value::Float].
    /// Otherwise, returns `None`.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the inner byte if this is a [Value::Char].
    /// Otherwise, returns `None`.
    pub fn as_char(&self) -> Option<u8> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// Returns a reference to the inner text if this is a [Value::Varchar].
    /// Otherwise, returns `None`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Varchar(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Renders the value the way DISPLAY prints a cell: ints in decimal,
    /// floats with the default float formatting, chars as one character,
    /// varchars as their raw text.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Char(c) => write!(f, "{}", *c as char),
            Value::Varchar(s) => f.write_str(s),
        }
    }
}
