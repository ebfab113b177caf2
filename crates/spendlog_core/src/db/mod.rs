//! SQLite storage bootstrap for the expense store.
//!
//! # Responsibility
//! - Create the store file and `expenses` table on startup.
//! - Hand out short-lived connections to operation handlers.
//!
//! # Invariants
//! - Schema bootstrap is idempotent and never touches existing rows.
//! - Handler connections never create the store file implicitly.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod open;

pub use open::{init_db, open_db, open_db_in_memory, open_db_read_only};

/// Name of the only table in the store.
pub const EXPENSES_TABLE: &str = "expenses";

/// Idempotent DDL for the `expenses` table.
pub const SCHEMA_SQL: &str = include_str!("schema.sql");

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "cannot prepare store at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
