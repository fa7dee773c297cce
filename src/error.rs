use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while driving a session.
///
/// The driver decides what an error means for the session as a whole; the
/// only failure handled in place (and so never surfaced through this enum)
/// is a `SCRIPT` file that does not open.
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong token count or shape for the current state.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// Bad or duplicate name, bad size, invalid key declaration.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Duplicate primary key, unresolved foreign value, referential block,
    /// or a row index that does not reference an existing row.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Script source misuse, e.g. starting a script from inside a script.
    #[error("Script error: {0}")]
    Script(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
