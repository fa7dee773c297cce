use crate::error::{Error, Result};
use crate::table::Table;
use crate::value::{CompareOp, Value};

/// A single `column op literal` filter condition.
///
/// The literal is kept as raw text and re-parsed against the column's type
/// each time the predicate is evaluated, so a varchar literal longer than
/// the column's capacity compares against stored (clipped) values untouched.
#[derive(Debug, Clone)]
pub struct Predicate {
    pub column: String,
    pub op: CompareOp,
    pub literal: String,
}

impl Predicate {
    /// Builds a predicate against `table`, validating the column name and
    /// the operator token.
    ///
    /// # Errors
    /// Returns an error if the column does not exist on the table or if
    /// the operator token is not one of `= > >= < <= !=`.
    pub fn build(table: &Table, column: &str, op_token: &str, literal: &str) -> Result<Self> {
        if table.column(column).is_none() {
            return Err(Error::ColumnNotFound(format!(
                "{column} on table {}",
                table.name
            )));
        }
        let op = CompareOp::parse(op_token)?;
        Ok(Self {
            column: column.into(),
            op,
            literal: literal.into(),
        })
    }

    /// Evaluates the predicate against one row of `table`.
    pub fn holds(&self, table: &Table, row_idx: usize) -> bool {
        // the column was validated when the predicate was built
        let Some(column) = table.column(&self.column) else {
            return true;
        };
        let Some(cell) = column.get(row_idx) else {
            return true;
        };
        let probe = Value::parse(column.data_type, &self.literal);
        cell.compare(self.op, &probe)
    }
}

/// True when every predicate holds for the row. An empty list matches
/// every row.
pub fn row_matches(predicates: &[Predicate], table: &Table, row_idx: usize) -> bool {
    predicates.iter().all(|p| p.holds(table, row_idx))
}
