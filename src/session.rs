use crate::catalog::{Assignment, Catalog, QueryResult};
use crate::column::ForeignKey;
use crate::data_type::DataType;
use crate::error::{Error, Result};
use crate::predicate::Predicate;
use crate::table::{ColumnDef, Table};
use crate::tokenizer::Tokenizer;
use crate::value;

/// What a line of input produced, for the caller to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Nothing to show; the line was consumed silently.
    None,
    /// Text to echo back.
    Echo(String),
    /// The registered table names, in creation order.
    TableNames(Vec<String>),
    /// A materialized selection.
    Rows(QueryResult),
    /// A request to switch input to the named script file.
    Script(String),
    /// The session is over.
    Quit,
}

/// The multi-line statement currently being built, if any.
enum State {
    Idle,
    DefiningTable {
        pending: Table,
    },
    InsertingRows {
        table: usize,
    },
    Displaying {
        table: usize,
        columns: Vec<String>,
    },
    Deleting {
        table: usize,
    },
    Updating {
        table: usize,
        at: Option<usize>,
        assignments: Vec<Assignment>,
    },
}

/// Line-at-a-time command interpreter over a [Catalog].
///
/// Each line either completes an immediate command or advances the
/// statement being built across lines. Errors reset the session to the
/// idle state and discard any accumulated predicates; whether they end
/// the whole session is the caller's decision.
///
/// # Example
/// ```
/// use relish::session::{Reply, Session};
///
/// let mut session = Session::new();
/// session.feed_line("CREATE users").unwrap();
/// session.feed_line("INT id PRIMARY").unwrap();
/// session.feed_line("END").unwrap();
///
/// assert_eq!(
///     session.feed_line("PEEK").unwrap(),
///     Reply::TableNames(vec!["users".into()])
/// );
/// ```
pub struct Session {
    catalog: Catalog,
    tokenizer: Tokenizer,
    state: State,
    predicates: Vec<Predicate>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            catalog: Catalog::new(),
            tokenizer: Tokenizer::default(),
            state: State::Idle,
            predicates: vec![],
        }
    }

    /// Read access to the tables, mostly for inspection in tests and
    /// embedding callers.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Tokenizes one input line and runs it against the current state.
    ///
    /// # Errors
    /// Any syntax, schema or constraint failure. The statement being
    /// built is abandoned and pending predicates are dropped.
    pub fn feed_line(&mut self, line: &str) -> Result<Reply> {
        let tokens = self.tokenizer.tokenize(line);
        if tokens.is_empty() {
            return Ok(Reply::None);
        }
        let state = std::mem::replace(&mut self.state, State::Idle);
        let outcome = match state {
            State::Idle => self.idle_line(&tokens),
            State::DefiningTable { pending } => self.defining_line(pending, &tokens),
            State::InsertingRows { table } => self.inserting_line(table, &tokens),
            State::Displaying { table, columns } => self.displaying_line(table, columns, &tokens),
            State::Deleting { table } => self.deleting_line(table, &tokens),
            State::Updating {
                table,
                at,
                assignments,
            } => self.updating_line(table, at, assignments, &tokens),
        };
        match outcome {
            Ok((state, reply)) => {
                self.state = state;
                Ok(reply)
            }
            Err(error) => {
                self.predicates.clear();
                Err(error)
            }
        }
    }

    fn idle_line(&mut self, tokens: &[String]) -> Result<(State, Reply)> {
        match tokens[0].as_str() {
            "PRINT" => {
                let [_, text] = tokens else {
                    return Err(Error::Syntax("PRINT takes exactly one token".into()));
                };
                Ok((State::Idle, Reply::Echo(text.clone())))
            }
            "CREATE" => {
                let [_, name] = tokens else {
                    return Err(Error::Syntax("CREATE takes a table name".into()));
                };
                self.catalog.validate_table_name(name)?;
                let pending = Table::new(name.clone());
                Ok((State::DefiningTable { pending }, Reply::None))
            }
            "INSERT" => {
                let [_, name] = tokens else {
                    return Err(Error::Syntax("INSERT takes a table name".into()));
                };
                let table = self.find_table(name)?;
                Ok((State::InsertingRows { table }, Reply::None))
            }
            "DISPLAY" => self.begin_display(tokens),
            "DELETE" => self.begin_delete(tokens),
            "UPDATE" => self.begin_update(tokens),
            "PEEK" => {
                if tokens.len() != 1 {
                    return Err(Error::Syntax("PEEK takes no arguments".into()));
                }
                Ok((State::Idle, Reply::TableNames(self.catalog.names())))
            }
            "CLEAR" => {
                if tokens.len() != 1 {
                    return Err(Error::Syntax("CLEAR takes no arguments".into()));
                }
                self.catalog.clear();
                Ok((State::Idle, Reply::None))
            }
            "SCRIPT" => {
                let [_, path] = tokens else {
                    return Err(Error::Syntax("SCRIPT takes a file path".into()));
                };
                Ok((State::Idle, Reply::Script(path.clone())))
            }
            // END outside a statement ends the whole session
            "END" => Ok((State::Idle, Reply::Quit)),
            other => Err(Error::Syntax(format!("unrecognized command '{other}'"))),
        }
    }

    fn begin_display(&mut self, tokens: &[String]) -> Result<(State, Reply)> {
        if tokens.len() < 4 || tokens[tokens.len() - 2] != "FROM" {
            return Err(Error::Syntax(
                "DISPLAY takes column names or ALL, then FROM and a table".into(),
            ));
        }
        let table = self.find_table(&tokens[tokens.len() - 1])?;
        let columns = if tokens.len() == 4 && tokens[1] == "ALL" {
            self.catalog
                .table(table)
                .columns
                .iter()
                .map(|column| column.name.clone())
                .collect()
        } else {
            let requested = &tokens[1..tokens.len() - 2];
            for name in requested {
                if self.catalog.table(table).column(name).is_none() {
                    return Err(Error::ColumnNotFound(format!(
                        "{name} on table {}",
                        self.catalog.table(table).name
                    )));
                }
            }
            requested.to_vec()
        };
        Ok((State::Displaying { table, columns }, Reply::None))
    }

    fn begin_delete(&mut self, tokens: &[String]) -> Result<(State, Reply)> {
        match tokens {
            [_, from, name] if from == "FROM" => {
                let table = self.find_table(name)?;
                Ok((State::Deleting { table }, Reply::None))
            }
            [_, from, name, at, target] if from == "FROM" && at == "AT" => {
                let table = self.find_table(name)?;
                if target == "ALL" {
                    self.catalog.delete_all(table)?;
                } else {
                    let row = Self::parse_row_index(self.catalog.table(table), target)?;
                    self.catalog.delete_row(table, row)?;
                }
                Ok((State::Idle, Reply::None))
            }
            _ => Err(Error::Syntax(
                "DELETE takes FROM, a table, and an optional AT clause".into(),
            )),
        }
    }

    fn begin_update(&mut self, tokens: &[String]) -> Result<(State, Reply)> {
        match tokens {
            [_, name] => {
                let table = self.find_table(name)?;
                Ok((
                    State::Updating {
                        table,
                        at: None,
                        assignments: vec![],
                    },
                    Reply::None,
                ))
            }
            [_, name, at, index] if at == "AT" => {
                let table = self.find_table(name)?;
                let row = Self::parse_row_index(self.catalog.table(table), index)?;
                Ok((
                    State::Updating {
                        table,
                        at: Some(row),
                        assignments: vec![],
                    },
                    Reply::None,
                ))
            }
            _ => Err(Error::Syntax(
                "UPDATE takes a table and an optional AT clause".into(),
            )),
        }
    }

    fn defining_line(&mut self, mut pending: Table, tokens: &[String]) -> Result<(State, Reply)> {
        match tokens[0].as_str() {
            "END" if tokens.len() == 1 => {
                if pending.columns.is_empty() {
                    return Err(Error::Schema(format!(
                        "table '{}' needs at least one column",
                        pending.name
                    )));
                }
                self.catalog.register(pending)?;
                Ok((State::Idle, Reply::None))
            }
            "INT" | "FLOAT" | "CHAR" | "VARCHAR" => {
                let def = Self::parse_column_def(tokens)?;
                self.catalog.add_column(&mut pending, def)?;
                Ok((State::DefiningTable { pending }, Reply::None))
            }
            other => Err(Error::Schema(format!(
                "unrecognized column type '{other}'"
            ))),
        }
    }

    fn parse_column_def(tokens: &[String]) -> Result<ColumnDef> {
        let (data_type, rest) = match tokens[0].as_str() {
            "VARCHAR" => {
                if tokens.len() < 3 {
                    return Err(Error::Syntax("VARCHAR takes a size and a name".into()));
                }
                let size = value::parse_int(&tokens[1]);
                let capacity = usize::try_from(size).unwrap_or(0);
                (DataType::Varchar(capacity), &tokens[2..])
            }
            "INT" => (DataType::Int, &tokens[1..]),
            "FLOAT" => (DataType::Float, &tokens[1..]),
            "CHAR" => (DataType::Char, &tokens[1..]),
            other => {
                return Err(Error::Schema(format!(
                    "unrecognized column type '{other}'"
                )));
            }
        };
        let (name, is_primary, foreign) = match rest {
            [name] => (name.clone(), false, None),
            [name, flag] if flag == "PRIMARY" => (name.clone(), true, None),
            [name, flag, target_table, target_column] => {
                let foreign = ForeignKey {
                    table: target_table.clone(),
                    column: target_column.clone(),
                };
                match flag.as_str() {
                    "FOREIGN" => (name.clone(), false, Some(foreign)),
                    "PRIMARY/FOREIGN" => (name.clone(), true, Some(foreign)),
                    _ => {
                        return Err(Error::Syntax(format!(
                            "unrecognized key clause '{flag}'"
                        )));
                    }
                }
            }
            _ => {
                return Err(Error::Syntax(
                    "column definition has the wrong shape".into(),
                ));
            }
        };
        Ok(ColumnDef {
            name,
            data_type,
            is_primary,
            foreign,
        })
    }

    fn inserting_line(&mut self, table: usize, tokens: &[String]) -> Result<(State, Reply)> {
        match tokens[0].as_str() {
            "VALUES" => {
                self.catalog.insert_row(table, &tokens[1..])?;
                Ok((State::InsertingRows { table }, Reply::None))
            }
            // trailing tokens after END are tolerated here
            "END" => Ok((State::Idle, Reply::None)),
            other => Err(Error::Syntax(format!(
                "expected VALUES or END, got '{other}'"
            ))),
        }
    }

    fn displaying_line(
        &mut self,
        table: usize,
        columns: Vec<String>,
        tokens: &[String],
    ) -> Result<(State, Reply)> {
        match tokens[0].as_str() {
            "WHERE" => {
                self.push_predicate(table, tokens)?;
                Ok((State::Displaying { table, columns }, Reply::None))
            }
            "END" if tokens.len() == 1 => {
                let predicates = std::mem::take(&mut self.predicates);
                let result = self.catalog.select(table, &columns, &predicates);
                Ok((State::Idle, Reply::Rows(result)))
            }
            "END" => Err(Error::Syntax("END takes no arguments".into())),
            other => Err(Error::Syntax(format!(
                "expected WHERE or END, got '{other}'"
            ))),
        }
    }

    fn deleting_line(&mut self, table: usize, tokens: &[String]) -> Result<(State, Reply)> {
        match tokens[0].as_str() {
            "WHERE" => {
                self.push_predicate(table, tokens)?;
                Ok((State::Deleting { table }, Reply::None))
            }
            "END" if tokens.len() == 1 => {
                let predicates = std::mem::take(&mut self.predicates);
                self.catalog.delete_matching(table, &predicates)?;
                Ok((State::Idle, Reply::None))
            }
            "END" => Err(Error::Syntax("END takes no arguments".into())),
            // other verbs are accepted and ignored while deleting
            _ => Ok((State::Deleting { table }, Reply::None)),
        }
    }

    fn updating_line(
        &mut self,
        table: usize,
        at: Option<usize>,
        mut assignments: Vec<Assignment>,
        tokens: &[String],
    ) -> Result<(State, Reply)> {
        match tokens[0].as_str() {
            "SET" => {
                let [_, column, literal] = tokens else {
                    return Err(Error::Syntax("SET takes a column and a literal".into()));
                };
                let Some(index) = self.catalog.table(table).column_index(column) else {
                    return Err(Error::ColumnNotFound(format!(
                        "{column} on table {}",
                        self.catalog.table(table).name
                    )));
                };
                // a repeated SET for the same column replaces the literal
                match assignments.iter_mut().find(|a| a.column == index) {
                    Some(existing) => existing.literal = literal.clone(),
                    None => assignments.push(Assignment {
                        column: index,
                        literal: literal.clone(),
                    }),
                }
                Ok((
                    State::Updating {
                        table,
                        at,
                        assignments,
                    },
                    Reply::None,
                ))
            }
            "WHERE" => {
                if at.is_some() {
                    return Err(Error::Syntax(
                        "WHERE cannot follow UPDATE with a fixed index".into(),
                    ));
                }
                self.push_predicate(table, tokens)?;
                Ok((
                    State::Updating {
                        table,
                        at,
                        assignments,
                    },
                    Reply::None,
                ))
            }
            "END" if tokens.len() == 1 => {
                let predicates = std::mem::take(&mut self.predicates);
                match at {
                    Some(row) => self.catalog.update_row(table, row, &assignments)?,
                    None => self
                        .catalog
                        .update_matching(table, &predicates, &assignments)?,
                }
                Ok((State::Idle, Reply::None))
            }
            "END" => Err(Error::Syntax("END takes no arguments".into())),
            other => Err(Error::Syntax(format!(
                "expected SET, WHERE or END, got '{other}'"
            ))),
        }
    }

    fn push_predicate(&mut self, table: usize, tokens: &[String]) -> Result<()> {
        let [_, column, op, literal] = tokens else {
            return Err(Error::Syntax(
                "WHERE takes a column, an operator and a literal".into(),
            ));
        };
        let predicate = Predicate::build(self.catalog.table(table), column, op, literal)?;
        self.predicates.push(predicate);
        Ok(())
    }

    fn find_table(&self, name: &str) -> Result<usize> {
        self.catalog
            .find(name)
            .ok_or_else(|| Error::TableNotFound(name.into()))
    }

    fn parse_row_index(table: &Table, token: &str) -> Result<usize> {
        let index = value::parse_int(token);
        let index = usize::try_from(index).map_err(|_| {
            Error::Constraint(format!(
                "row index {index} is out of bounds for table '{}'",
                table.name
            ))
        })?;
        if index >= table.row_count {
            return Err(Error::Constraint(format!(
                "row index {index} is out of bounds for table '{}'",
                table.name
            )));
        }
        Ok(index)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn feed(session: &mut Session, lines: &[&str]) {
        for line in lines {
            session.feed_line(line).unwrap();
        }
    }

    /// `students(id PRIMARY, name, grade)` with three rows.
    fn sample_session() -> Session {
        let mut session = Session::new();
        feed(
            &mut session,
            &[
                "CREATE students",
                "INT id PRIMARY",
                "VARCHAR 16 name",
                "CHAR grade",
                "END",
                "INSERT students",
                "VALUES 1 ana A",
                "VALUES 2 bruno B",
                "VALUES 3 carla A",
                "END",
            ],
        );
        session
    }

    // ─────────────────────────────────────────────────────────────
    // Test 1 : Create, insert, display round trip
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_round_trip() {
        let mut session = sample_session();

        let reply = session.feed_line("DISPLAY ALL FROM students").unwrap();
        assert_eq!(reply, Reply::None);

        let Reply::Rows(result) = session.feed_line("END").unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(result.table, "students");
        assert_eq!(result.columns, vec!["id", "name", "grade"]);
        assert_eq!(result.rows.len(), 3);
        assert_eq!(
            result.rows[0],
            vec![
                Value::Int(1),
                Value::Varchar("ana".into()),
                Value::Char(b'A')
            ]
        );
    }

    // ─────────────────────────────────────────────────────────────
    // Test 2 : PRINT echoes one token, quoted text stays whole
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_print() {
        let mut session = Session::new();

        assert_eq!(
            session.feed_line("PRINT hello").unwrap(),
            Reply::Echo("hello".into())
        );
        assert_eq!(
            session.feed_line("PRINT \"hello there\"").unwrap(),
            Reply::Echo("hello there".into())
        );
        assert!(session.feed_line("PRINT one two").is_err());
    }

    // ─────────────────────────────────────────────────────────────
    // Test 3 : Blank lines are swallowed without touching state
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_blank_lines_preserve_state() {
        let mut session = Session::new();
        feed(
            &mut session,
            &["CREATE t", "", "   \t  ", "INT id", "END"],
        );
        assert_eq!(session.catalog().names(), vec!["t"]);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 4 : Idle errors
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_idle_errors() {
        let mut session = Session::new();

        assert!(matches!(
            session.feed_line("FLY away"),
            Err(Error::Syntax(_))
        ));
        assert!(matches!(
            session.feed_line("INSERT ghost"),
            Err(Error::TableNotFound(_))
        ));
        assert!(matches!(
            session.feed_line("DISPLAY ALL FROM ghost"),
            Err(Error::TableNotFound(_))
        ));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 5 : END in idle ends the session
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_end_quits() {
        let mut session = Session::new();
        assert_eq!(session.feed_line("END").unwrap(), Reply::Quit);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 6 : Table definition rules
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_defining_rules() {
        let mut session = Session::new();

        session.feed_line("CREATE empty").unwrap();
        assert!(matches!(session.feed_line("END"), Err(Error::Schema(_))));

        // the failed statement left the session idle
        session.feed_line("CREATE t").unwrap();
        session.feed_line("INT id PRIMARY").unwrap();
        assert!(matches!(
            session.feed_line("BOOL flag"),
            Err(Error::Schema(_))
        ));

        session.feed_line("CREATE t").unwrap();
        session.feed_line("VARCHAR 8 name").unwrap();
        session.feed_line("END").unwrap();
        assert!(matches!(
            session.feed_line("CREATE t"),
            Err(Error::Schema(_))
        ));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 7 : Column definition shapes
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_column_def_shapes() {
        let mut session = Session::new();
        feed(&mut session, &["CREATE a", "INT id PRIMARY", "END"]);

        // each failure abandons the statement, so re-enter every time
        session.feed_line("CREATE b").unwrap();
        assert!(session.feed_line("VARCHAR 10").is_err());
        session.feed_line("CREATE b").unwrap();
        assert!(session.feed_line("INT x y z").is_err());
        session.feed_line("CREATE b").unwrap();
        assert!(session.feed_line("INT x BACKWARD").is_err());
        session.feed_line("CREATE b").unwrap();
        assert!(session.feed_line("INT aid WRONG a id").is_err());

        session.feed_line("CREATE b").unwrap();
        session.feed_line("INT aid PRIMARY/FOREIGN a id").unwrap();
        session.feed_line("END").unwrap();

        let table = session.catalog().table(1);
        let column = table.column("aid").unwrap();
        assert!(column.is_primary);
        assert_eq!(column.foreign.as_ref().unwrap().table, "a");
    }

    // ─────────────────────────────────────────────────────────────
    // Test 8 : Inserting state
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_inserting_state() {
        let mut session = sample_session();

        session.feed_line("INSERT students").unwrap();
        assert!(matches!(
            session.feed_line("VALUES 4 dora"),
            Err(Error::Syntax(_))
        ));

        session.feed_line("INSERT students").unwrap();
        assert!(matches!(
            session.feed_line("VALUES 1 dup A"),
            Err(Error::Constraint(_))
        ));

        session.feed_line("INSERT students").unwrap();
        session.feed_line("VALUES 4 dora B").unwrap();
        // END tolerates trailing tokens in this state
        session.feed_line("END of input").unwrap();
        assert_eq!(session.catalog().table(0).row_count, 4);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 9 : Display with filters and explicit columns
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_display_where() {
        let mut session = sample_session();

        feed(
            &mut session,
            &["DISPLAY name FROM students", "WHERE grade = A"],
        );
        let Reply::Rows(result) = session.feed_line("END").unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(result.columns, vec!["name"]);
        assert_eq!(
            result.rows,
            vec![
                vec![Value::Varchar("ana".into())],
                vec![Value::Varchar("carla".into())],
            ]
        );

        // predicates were consumed; the next display sees every row
        session.feed_line("DISPLAY id FROM students").unwrap();
        let Reply::Rows(result) = session.feed_line("END").unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(result.rows.len(), 3);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 10 : Display validation
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_display_validation() {
        let mut session = sample_session();

        assert!(matches!(
            session.feed_line("DISPLAY age FROM students"),
            Err(Error::ColumnNotFound(_))
        ));
        assert!(session.feed_line("DISPLAY students").is_err());

        session.feed_line("DISPLAY id name FROM students").unwrap();
        assert!(session.feed_line("END really").is_err());
    }

    // ─────────────────────────────────────────────────────────────
    // Test 11 : Stale predicates are dropped after an error
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_error_clears_predicates() {
        let mut session = sample_session();

        feed(
            &mut session,
            &["DISPLAY ALL FROM students", "WHERE grade = B"],
        );
        assert!(session.feed_line("NONSENSE").is_err());

        session.feed_line("DISPLAY ALL FROM students").unwrap();
        let Reply::Rows(result) = session.feed_line("END").unwrap() else {
            panic!("expected rows");
        };
        assert_eq!(result.rows.len(), 3);
    }

    // ─────────────────────────────────────────────────────────────
    // Test 12 : Immediate delete forms
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_delete_at() {
        let mut session = sample_session();

        session.feed_line("DELETE FROM students AT 1").unwrap();
        assert_eq!(session.catalog().table(0).row_count, 2);

        assert!(matches!(
            session.feed_line("DELETE FROM students AT 9"),
            Err(Error::Constraint(_))
        ));

        session.feed_line("DELETE FROM students AT ALL").unwrap();
        assert_eq!(session.catalog().table(0).row_count, 0);
        // deleting everything from an empty table is a no-op
        session.feed_line("DELETE FROM students AT ALL").unwrap();
    }

    // ─────────────────────────────────────────────────────────────
    // Test 13 : Filtered delete, unknown lines ignored mid-statement
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_delete_where() {
        let mut session = sample_session();

        feed(
            &mut session,
            &[
                "DELETE FROM students",
                "WHERE grade = A",
                "this line is quietly skipped",
                "END",
            ],
        );
        let table = session.catalog().table(0);
        assert_eq!(table.row_count, 1);
        assert_eq!(
            table.row(0),
            Some(vec![
                Value::Int(2),
                Value::Varchar("bruno".into()),
                Value::Char(b'B')
            ])
        );
    }

    // ─────────────────────────────────────────────────────────────
    // Test 14 : Update with a fixed index
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_update_at() {
        let mut session = sample_session();

        feed(
            &mut session,
            &["UPDATE students AT 1", "SET name benjamin", "END"],
        );
        assert_eq!(
            session.catalog().table(0).row(1),
            Some(vec![
                Value::Int(2),
                Value::Varchar("benjamin".into()),
                Value::Char(b'B')
            ])
        );

        assert!(matches!(
            session.feed_line("UPDATE students AT 7"),
            Err(Error::Constraint(_))
        ));

        session.feed_line("UPDATE students AT 0").unwrap();
        assert!(matches!(
            session.feed_line("WHERE id = 1"),
            Err(Error::Syntax(_))
        ));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 15 : Filtered update, repeated SET keeps the last literal
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_update_where_and_set_overwrite() {
        let mut session = sample_session();

        feed(
            &mut session,
            &[
                "UPDATE students",
                "SET grade F",
                "SET grade C",
                "WHERE grade = A",
                "END",
            ],
        );
        let table = session.catalog().table(0);
        assert_eq!(table.row(0).unwrap()[2], Value::Char(b'C'));
        assert_eq!(table.row(1).unwrap()[2], Value::Char(b'B'));
        assert_eq!(table.row(2).unwrap()[2], Value::Char(b'C'));

        session.feed_line("UPDATE students").unwrap();
        assert!(matches!(
            session.feed_line("SET height 12"),
            Err(Error::ColumnNotFound(_))
        ));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 16 : Foreign keys through the command surface
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_foreign_key_flow() {
        let mut session = sample_session();

        feed(
            &mut session,
            &[
                "CREATE awards",
                "INT id PRIMARY",
                "INT student_id FOREIGN students id",
                "END",
                "INSERT awards",
                "VALUES 100 2",
                "END",
            ],
        );

        // student 5 does not exist; the statement is abandoned
        session.feed_line("INSERT awards").unwrap();
        assert!(matches!(
            session.feed_line("VALUES 101 5"),
            Err(Error::Constraint(_))
        ));

        // student 2 is referenced now
        assert!(matches!(
            session.feed_line("DELETE FROM students AT 1"),
            Err(Error::Constraint(_))
        ));
    }

    // ─────────────────────────────────────────────────────────────
    // Test 17 : PEEK, CLEAR and SCRIPT replies
    // ─────────────────────────────────────────────────────────────
    #[test]
    fn test_peek_clear_script() {
        let mut session = sample_session();

        assert_eq!(
            session.feed_line("PEEK").unwrap(),
            Reply::TableNames(vec!["students".into()])
        );
        assert!(session.feed_line("PEEK now").is_err());

        assert_eq!(
            session.feed_line("SCRIPT setup.txt").unwrap(),
            Reply::Script("setup.txt".into())
        );

        session.feed_line("CLEAR").unwrap();
        assert!(session.catalog().is_empty());
        assert_eq!(
            session.feed_line("PEEK").unwrap(),
            Reply::TableNames(vec![])
        );
    }
}
