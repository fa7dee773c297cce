pub mod catalog;
pub mod column;
pub mod data_type;
pub mod error;
pub mod predicate;
pub mod repl;
pub mod session;
pub mod table;
pub mod tokenizer;
pub mod value;

pub use catalog::{Assignment, Catalog, QueryResult};
pub use column::{Column, ColumnData, ForeignKey};
pub use data_type::DataType;
pub use error::{Error, Result};
pub use predicate::Predicate;
pub use repl::Repl;
pub use session::{Reply, Session};
pub use table::{ColumnDef, Table};
pub use tokenizer::Tokenizer;
pub use value::{CompareOp, Value};
