use crate::column::ForeignKey;
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::predicate::{self, Predicate};
use crate::table::{ColumnDef, Table};
use crate::value::Value;

/// Longest accepted table or column name, in bytes.
pub const MAX_NAME_LEN: usize = 255;
/// Largest accepted VARCHAR capacity, in bytes.
pub const MAX_VARCHAR_LEN: usize = 255;

/// Materialized result of a selection: the table it came from, the
/// selected column names, and one value vector per matching row.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// One staged `SET` clause of an update, keyed by column position.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub column: usize,
    pub literal: String,
}

/// The set of registered tables, in creation order, together with every
/// operation that must see more than one table at once (foreign-key
/// resolution and referential integrity scans).
#[derive(Debug, Default)]
pub struct Catalog {
    tables: Vec<Table>,
}

impl Catalog {
    pub fn new() -> Self {
        Self { tables: vec![] }
    }

    /// Returns the number of registered tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table names in creation order.
    pub fn names(&self) -> Vec<String> {
        self.tables.iter().map(|table| table.name.clone()).collect()
    }

    /// Looks up a table position by name.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.tables.iter().position(|table| table.name == name)
    }

    /// Borrows the table at `table_idx`.
    pub fn table(&self, table_idx: usize) -> &Table {
        &self.tables[table_idx]
    }

    /// Discards every table.
    pub fn clear(&mut self) {
        self.tables.clear();
    }

    /// Checks that `name` is usable for a new table.
    ///
    /// # Errors
    /// Returns an error if the name is empty, longer than
    /// [MAX_NAME_LEN] bytes, or already taken.
    pub fn validate_table_name(&self, name: &str) -> Result<()> {
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return Err(Error::Schema(format!(
                "table name must be 1 to {MAX_NAME_LEN} characters"
            )));
        }
        if self.find(name).is_some() {
            return Err(Error::Schema(format!("table '{name}' already exists")));
        }
        Ok(())
    }

    /// Registers a fully defined table.
    ///
    /// # Errors
    /// Returns an error if the table's name no longer passes
    /// [Catalog::validate_table_name].
    pub fn register(&mut self, table: Table) -> Result<()> {
        self.validate_table_name(&table.name)?;
        self.tables.push(table);
        Ok(())
    }

    /// Validates a column definition against `table` and the catalog,
    /// then appends the column.
    ///
    /// `table` is a pending table that is not registered yet, so a
    /// foreign column can only target tables that already exist — a
    /// table can never reference itself.
    ///
    /// # Errors
    /// Returns an error if the column name is empty, too long or
    /// duplicated, if a VARCHAR capacity is outside `[1, 255]`, if a key
    /// flag is requested while rows exist, or if a foreign target is
    /// missing, not primary, or of a different type.
    pub fn add_column(&self, table: &mut Table, def: ColumnDef) -> Result<()> {
        if def.name.is_empty() || def.name.len() > MAX_NAME_LEN {
            return Err(Error::Schema(format!(
                "column name must be 1 to {MAX_NAME_LEN} characters"
            )));
        }
        if table.column(&def.name).is_some() {
            return Err(Error::Schema(format!(
                "column '{}' already exists on table '{}'",
                def.name, table.name
            )));
        }
        if let DataType::Varchar(capacity) = def.data_type {
            if capacity == 0 || capacity > MAX_VARCHAR_LEN {
                return Err(Error::Schema(format!(
                    "VARCHAR size must be between 1 and {MAX_VARCHAR_LEN}"
                )));
            }
        }
        if (def.is_primary || def.foreign.is_some()) && table.row_count != 0 {
            return Err(Error::Schema(format!(
                "key columns require an empty table, '{}' has {} rows",
                table.name, table.row_count
            )));
        }
        if let Some(fk) = &def.foreign {
            let Some(target_idx) = self.find(&fk.table) else {
                return Err(Error::TableNotFound(fk.table.clone()));
            };
            let Some(target) = self.tables[target_idx].column(&fk.column) else {
                return Err(Error::ColumnNotFound(format!(
                    "{} on table {}",
                    fk.column, fk.table
                )));
            };
            if !target.is_primary {
                return Err(Error::Schema(format!(
                    "foreign key target {}.{} is not a primary column",
                    fk.table, fk.column
                )));
            }
            if target.data_type != def.data_type {
                return Err(Error::Schema(format!(
                    "foreign key '{}' must have the type of {}.{} ({})",
                    def.name, fk.table, fk.column, target.data_type
                )));
            }
        }
        table.add_column(def);
        Ok(())
    }

    /// Parses one literal per column and appends the row.
    ///
    /// # Errors
    /// Returns an error if the literal count is wrong, if the row's
    /// primary-key tuple duplicates an existing row, or if a foreign
    /// value does not resolve against its target table.
    ///
    /// # Behavior
    /// Key checks run against the literals as supplied; varchar values
    /// are clipped to their column's capacity only when stored.
    pub fn insert_row(&mut self, table_idx: usize, literals: &[String]) -> Result<()> {
        let table = &self.tables[table_idx];
        if literals.len() != table.columns.len() {
            return Err(Error::Syntax(format!(
                "table '{}' expects {} values, got {}",
                table.name,
                table.columns.len(),
                literals.len()
            )));
        }
        let values: Vec<Value> = table
            .columns
            .iter()
            .zip(literals)
            .map(|(column, literal)| Value::parse(column.data_type, literal))
            .collect();
        if Self::duplicates_primary_key(table, &values, None) {
            return Err(Error::Constraint(format!(
                "duplicate primary key on table '{}'",
                table.name
            )));
        }
        self.check_foreign_values(table, &values)?;
        self.tables[table_idx].push_row(values)
    }

    /// Removes one row by index.
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds or the row's
    /// primary-key values are referenced by a foreign column elsewhere.
    pub fn delete_row(&mut self, table_idx: usize, row_idx: usize) -> Result<()> {
        let table = &self.tables[table_idx];
        if row_idx >= table.row_count {
            return Err(Error::Constraint(format!(
                "row index {row_idx} is out of bounds for table '{}'",
                table.name
            )));
        }
        self.row_is_referenced(table, row_idx)?;
        self.tables[table_idx].remove_row(row_idx)
    }

    /// Removes every row of the table. A table with no rows is left
    /// untouched.
    ///
    /// # Errors
    /// Fails before removing anything if any row is referenced by a
    /// foreign column elsewhere.
    pub fn delete_all(&mut self, table_idx: usize) -> Result<()> {
        self.delete_matching(table_idx, &[])
    }

    /// Removes every row satisfying all `predicates`.
    ///
    /// # Behavior
    /// Two phases: first every currently-matching row is checked for
    /// referential blocks, failing the whole statement if any is
    /// referenced. Then rows are removed in ascending order, re-testing
    /// the predicates at each position since indices shift as rows
    /// disappear.
    pub fn delete_matching(&mut self, table_idx: usize, predicates: &[Predicate]) -> Result<()> {
        let table = &self.tables[table_idx];
        for row in 0..table.row_count {
            if predicate::row_matches(predicates, table, row) {
                self.row_is_referenced(table, row)?;
            }
        }
        let mut row = 0;
        while row < self.tables[table_idx].row_count {
            if predicate::row_matches(predicates, &self.tables[table_idx], row) {
                self.tables[table_idx].remove_row(row)?;
            } else {
                row += 1;
            }
        }
        Ok(())
    }

    /// Overlays `assignments` onto the stored row, validates the result,
    /// and applies all of them as one batch.
    ///
    /// # Errors
    /// Returns an error if the index is out of bounds, if the
    /// prospective row duplicates another row's primary-key tuple, if a
    /// reassigned primary column is currently referenced by a foreign
    /// column elsewhere, or if a prospective foreign value does not
    /// resolve.
    pub fn update_row(
        &mut self,
        table_idx: usize,
        row_idx: usize,
        assignments: &[Assignment],
    ) -> Result<()> {
        let table = &self.tables[table_idx];
        let Some(stored) = table.row(row_idx) else {
            return Err(Error::Constraint(format!(
                "row index {row_idx} is out of bounds for table '{}'",
                table.name
            )));
        };
        let mut prospective = stored.clone();
        for assignment in assignments {
            let Some(column) = table.columns.get(assignment.column) else {
                return Err(Error::ColumnNotFound(format!(
                    "column index {} on table {}",
                    assignment.column, table.name
                )));
            };
            prospective[assignment.column] = Value::parse(column.data_type, &assignment.literal);
        }
        if Self::duplicates_primary_key(table, &prospective, Some(row_idx)) {
            return Err(Error::Constraint(format!(
                "duplicate primary key on table '{}'",
                table.name
            )));
        }
        // reassigning a referenced primary value would orphan the rows
        // pointing at it, whatever the new value is
        for assignment in assignments {
            let column = &table.columns[assignment.column];
            if !column.is_primary {
                continue;
            }
            if self.value_is_referenced(&table.name, &column.name, &stored[assignment.column]) {
                return Err(Error::Constraint(format!(
                    "row {row_idx} of table '{}' is referenced by another table",
                    table.name
                )));
            }
        }
        self.check_foreign_values(table, &prospective)?;
        let table = &mut self.tables[table_idx];
        for assignment in assignments {
            let value = prospective[assignment.column].clone();
            table.columns[assignment.column].set(row_idx, value)?;
        }
        Ok(())
    }

    /// Applies `assignments` to every row satisfying all `predicates`,
    /// in ascending index order. Predicates are re-tested against each
    /// row as it stands when its turn comes, so an earlier update can
    /// change whether a later row matches.
    pub fn update_matching(
        &mut self,
        table_idx: usize,
        predicates: &[Predicate],
        assignments: &[Assignment],
    ) -> Result<()> {
        for row in 0..self.tables[table_idx].row_count {
            if predicate::row_matches(predicates, &self.tables[table_idx], row) {
                self.update_row(table_idx, row, assignments)?;
            }
        }
        Ok(())
    }

    /// Collects the named columns of every row satisfying all
    /// `predicates`. Column names are assumed to have been validated.
    pub fn select(
        &self,
        table_idx: usize,
        columns: &[String],
        predicates: &[Predicate],
    ) -> QueryResult {
        let table = &self.tables[table_idx];
        let mut rows = vec![];
        for row in 0..table.row_count {
            if !predicate::row_matches(predicates, table, row) {
                continue;
            }
            let cells = columns
                .iter()
                .filter_map(|name| table.column(name).and_then(|col| col.get(row)))
                .collect();
            rows.push(cells);
        }
        QueryResult {
            table: table.name.clone(),
            columns: columns.to_vec(),
            rows,
        }
    }

    /// True when some existing row matches `values` on every primary
    /// column at once. Tables without primary columns never collide.
    fn duplicates_primary_key(table: &Table, values: &[Value], skip: Option<usize>) -> bool {
        let primaries: Vec<usize> = table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.is_primary)
            .map(|(idx, _)| idx)
            .collect();
        if primaries.is_empty() {
            return false;
        }
        (0..table.row_count)
            .filter(|&row| Some(row) != skip)
            .any(|row| {
                primaries.iter().all(|&idx| {
                    table.columns[idx]
                        .get(row)
                        .is_some_and(|cell| cell == values[idx])
                })
            })
    }

    /// Checks every foreign column of `table` against its target.
    fn check_foreign_values(&self, table: &Table, values: &[Value]) -> Result<()> {
        for (column, value) in table.columns.iter().zip(values) {
            let Some(fk) = &column.foreign else {
                continue;
            };
            if !self.foreign_value_resolves(fk, value) {
                return Err(Error::Constraint(format!(
                    "no row of table '{}' matches foreign value for column '{}'",
                    fk.table, column.name
                )));
            }
        }
        Ok(())
    }

    fn foreign_value_resolves(&self, fk: &ForeignKey, value: &Value) -> bool {
        let Some(target_idx) = self.find(&fk.table) else {
            return false;
        };
        let Some(column) = self.tables[target_idx].column(&fk.column) else {
            return false;
        };
        column.contains(value)
    }

    /// Fails if any primary value of the row is pointed at by a foreign
    /// column of another table.
    fn row_is_referenced(&self, table: &Table, row_idx: usize) -> Result<()> {
        for column in &table.columns {
            if !column.is_primary {
                continue;
            }
            let Some(value) = column.get(row_idx) else {
                continue;
            };
            if self.value_is_referenced(&table.name, &column.name, &value) {
                return Err(Error::Constraint(format!(
                    "row {row_idx} of table '{}' is referenced by another table",
                    table.name
                )));
            }
        }
        Ok(())
    }

    fn value_is_referenced(&self, table_name: &str, column_name: &str, value: &Value) -> bool {
        self.tables
            .iter()
            .filter(|other| other.name != table_name)
            .flat_map(|other| &other.columns)
            .any(|column| {
                column.foreign.as_ref().is_some_and(|fk| {
                    fk.table == table_name && fk.column == column_name && column.contains(value)
                })
            })
    }
}
