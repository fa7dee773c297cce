use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;

/// Physical storage for column cells.
/// Each variant wraps a vector of one concrete type, so cells live in
/// contiguous memory (columnar storage) with no per-cell tagging.
#[derive(Debug, Clone)]
pub enum ColumnData {
    /// Vector of 32-bit integers.
    Int(Vec<i32>),
    /// Vector of 32-bit floats.
    Float(Vec<f32>),
    /// Vector of single bytes.
    Char(Vec<u8>),
    /// Vector of owned strings, each at most the declared capacity long.
    Varchar(Vec<String>),
}

/// The primary-key column a foreign column points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
}

/// Represents a column within a table.
/// It combines metadata (name, type, key flags) with the actual cells.
#[derive(Debug, Clone)]
pub struct Column {
    /// The name of the column.
    pub name: String,
    /// The logical data type of the column.
    pub data_type: DataType,
    /// Whether the column is part of the table's primary key.
    pub is_primary: bool,
    /// The primary column this one references, when it is a foreign column.
    pub foreign: Option<ForeignKey>,
    /// The actual values stored in the column.
    pub data: ColumnData,
}

/// Clips `text` to at most `max_bytes`, backing off to a character boundary.
fn clip(mut text: String, max_bytes: usize) -> String {
    if text.len() > max_bytes {
        let mut cut = max_bytes;
        while cut > 0 && !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}

impl Column {
    /// Creates a new, empty column with the given metadata.
    /// The underlying storage is initialized according to the data type.
    pub fn new(
        name: String,
        data_type: DataType,
        is_primary: bool,
        foreign: Option<ForeignKey>,
    ) -> Self {
        let data = match data_type {
            DataType::Int => ColumnData::Int(vec![]),
            DataType::Float => ColumnData::Float(vec![]),
            DataType::Char => ColumnData::Char(vec![]),
            DataType::Varchar(_) => ColumnData::Varchar(vec![]),
        };
        Self {
            name,
            data_type,
            is_primary,
            foreign,
            data,
        }
    }

    /// Returns the number of cells currently stored in the column.
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Int(cells) => cells.len(),
            ColumnData::Float(cells) => cells.len(),
            ColumnData::Char(cells) => cells.len(),
            ColumnData::Varchar(cells) => cells.len(),
        }
    }

    /// Returns true if there is no cell in the column, else false.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends a new value to the end of the column.
    ///
    /// # Errors
    /// Returns an error if the value's variant does not match the column's
    /// data type.
    ///
    /// # Behavior
    /// Varchar values longer than the declared capacity are clipped before
    /// being stored.
    pub fn push(&mut self, value: Value) -> Result<()> {
        match (&mut self.data, value) {
            (ColumnData::Int(cells), Value::Int(v)) => cells.push(v),
            (ColumnData::Float(cells), Value::Float(v)) => cells.push(v),
            (ColumnData::Char(cells), Value::Char(v)) => cells.push(v),
            (ColumnData::Varchar(cells), Value::Varchar(v)) => {
                let capacity = match self.data_type {
                    DataType::Varchar(capacity) => capacity,
                    _ => v.len(),
                };
                cells.push(clip(v, capacity));
            }
            (_, value) => {
                return Err(Error::Schema(format!(
                    "value {value:?} does not fit column '{}' of type {}",
                    self.name, self.data_type
                )));
            }
        }
        Ok(())
    }

    /// Retrieves the value at the specified row index.
    ///
    /// Returns `Some(Value)` if the index is valid, or `None` if it is out
    /// of bounds.
    pub fn get(&self, row_idx: usize) -> Option<Value> {
        match &self.data {
            ColumnData::Int(cells) => cells.get(row_idx).copied().map(Value::Int),
            ColumnData::Float(cells) => cells.get(row_idx).copied().map(Value::Float),
            ColumnData::Char(cells) => cells.get(row_idx).copied().map(Value::Char),
            ColumnData::Varchar(cells) => cells.get(row_idx).cloned().map(Value::Varchar),
        }
    }

    /// Replaces the value at the specified row index.
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds or if the value's
    /// variant does not match the column's data type.
    ///
    /// # Behavior
    /// Varchar values are clipped to the declared capacity, like [Column::push].
    pub fn set(&mut self, row_idx: usize, value: Value) -> Result<()> {
        if row_idx >= self.len() {
            return Err(Error::Constraint(format!(
                "row index {row_idx} is out of bounds for column '{}'",
                self.name
            )));
        }
        match (&mut self.data, value) {
            (ColumnData::Int(cells), Value::Int(v)) => cells[row_idx] = v,
            (ColumnData::Float(cells), Value::Float(v)) => cells[row_idx] = v,
            (ColumnData::Char(cells), Value::Char(v)) => cells[row_idx] = v,
            (ColumnData::Varchar(cells), Value::Varchar(v)) => {
                let capacity = match self.data_type {
                    DataType::Varchar(capacity) => capacity,
                    _ => v.len(),
                };
                cells[row_idx] = clip(v, capacity);
            }
            (_, value) => {
                return Err(Error::Schema(format!(
                    "value {value:?} does not fit column '{}' of type {}",
                    self.name, self.data_type
                )));
            }
        }
        Ok(())
    }

    /// Removes the value at the specified row index.
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds.
    pub fn remove(&mut self, row_idx: usize) -> Result<()> {
        if row_idx >= self.len() {
            return Err(Error::Constraint(format!(
                "row index {row_idx} is out of bounds for column '{}'",
                self.name
            )));
        }
        match &mut self.data {
            ColumnData::Int(cells) => {
                cells.remove(row_idx);
            }
            ColumnData::Float(cells) => {
                cells.remove(row_idx);
            }
            ColumnData::Char(cells) => {
                cells.remove(row_idx);
            }
            ColumnData::Varchar(cells) => {
                cells.remove(row_idx);
            }
        }
        Ok(())
    }

    /// Linear scan for an exact match, used to resolve foreign values.
    pub fn contains(&self, value: &Value) -> bool {
        match (&self.data, value) {
            (ColumnData::Int(cells), Value::Int(v)) => cells.contains(v),
            (ColumnData::Float(cells), Value::Float(v)) => cells.contains(v),
            (ColumnData::Char(cells), Value::Char(v)) => cells.contains(v),
            (ColumnData::Varchar(cells), Value::Varchar(v)) => cells.contains(v),
            _ => false,
        }
    }
}
