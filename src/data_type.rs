use std::fmt;

/// Represents the supported data types in a table schema.
/// These types define the structure of columns and how literals are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// A 32-bit signed integer.
    Int,
    /// A 32-bit floating-point number.
    Float,
    /// A single byte, rendered as one character.
    Char,
    /// Variable-length text with a declared byte capacity.
    /// Two varchar types compare equal only when their capacities match.
    Varchar(usize),
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "INT"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Char => write!(f, "CHAR"),
            DataType::Varchar(capacity) => write!(f, "VARCHAR({capacity})"),
        }
    }
}
