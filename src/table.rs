use crate::column::{Column, ForeignKey};
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::value::Value;

/// Column definition in the schema
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub data_type: DataType,
    pub is_primary: bool,
    pub foreign: Option<ForeignKey>,
}

/// A named collection of columns, all holding the same number of cells.
/// Columns are defined one at a time, so a table under construction may
/// temporarily have none.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub row_count: usize,
}

impl Table {
    /// Creates an empty table with no columns and no rows.
    pub fn new(name: String) -> Self {
        Self {
            name,
            columns: vec![],
            row_count: 0,
        }
    }

    /// Appends a column built from `def`. The caller is responsible for
    /// validating the definition first.
    pub fn add_column(&mut self, def: ColumnDef) {
        self.columns.push(Column::new(
            def.name,
            def.data_type,
            def.is_primary,
            def.foreign,
        ));
    }

    /// Looks up a column position by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    /// Appends a new row, one value per column in definition order.
    ///
    /// # Errors
    /// Returns an error if the number of values does not match the number
    /// of columns, or if a value's variant does not match its column.
    pub fn push_row(&mut self, values: Vec<Value>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(Error::Schema(format!(
                "row width mismatch on table '{}': {} values for {} columns",
                self.name,
                values.len(),
                self.columns.len()
            )));
        }
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value)?;
        }
        self.row_count += 1;
        Ok(())
    }

    /// Removes the row at `row_idx` from every column.
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds.
    pub fn remove_row(&mut self, row_idx: usize) -> Result<()> {
        if row_idx >= self.row_count {
            return Err(Error::Constraint(format!(
                "row index {row_idx} is out of bounds for table '{}'",
                self.name
            )));
        }
        for column in &mut self.columns {
            column.remove(row_idx)?;
        }
        self.row_count -= 1;
        Ok(())
    }

    /// Collects the row at `row_idx` across all columns, in definition
    /// order. Returns `None` if the index is out of bounds.
    pub fn row(&self, row_idx: usize) -> Option<Vec<Value>> {
        if self.row_count <= row_idx {
            return None;
        }
        self.columns
            .iter()
            .map(|col| col.get(row_idx)) // -> Option<Value>
            .collect()
    }
}
