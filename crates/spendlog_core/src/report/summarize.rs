//! Caller-authored summarization queries.
//!
//! # Responsibility
//! - Execute one caller-supplied `SELECT` against the store.
//! - Return rows keyed by the statement's own result column names.
//!
//! # Invariants
//! - In `SummarizeMode::ReadOnly` a statement that SQLite does not report as
//!   read-only is rejected before it runs.
//! - Input holding more than one statement is rejected before anything runs.
//! - Store errors (syntax, unknown column) are passed through unchanged.

use crate::config::SummarizeMode;
use crate::db::DbError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{debug, warn};
use rusqlite::types::ValueRef;
use rusqlite::{Batch, Connection};
use serde_json::{Map, Number, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One result row: column name to JSON value, in column order.
pub type SummaryRow = Map<String, Value>;

pub type SummaryResult<T> = Result<T, SummaryError>;

#[derive(Debug)]
pub enum SummaryError {
    EmptyQuery,
    MultipleStatements,
    /// Statement would modify the store while running in read-only mode.
    NotReadOnly { sql: String },
    Db(DbError),
}

impl Display for SummaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyQuery => write!(f, "summarize query cannot be empty"),
            Self::MultipleStatements => {
                write!(f, "summarize query must contain exactly one statement")
            }
            Self::NotReadOnly { sql } => {
                write!(f, "summarize query must be a read-only SELECT: `{sql}`")
            }
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SummaryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyQuery | Self::MultipleStatements | Self::NotReadOnly { .. } => None,
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for SummaryError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SummaryError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Runs `sql` on `conn` and collects every row.
///
/// The connection is chosen by the caller; pair `ReadOnly` with a
/// connection from `open_db_read_only` so SQLite enforces it as well.
pub fn summarize(
    conn: &Connection,
    sql: &str,
    mode: SummarizeMode,
) -> SummaryResult<Vec<SummaryRow>> {
    let sql = sql.trim();
    if sql.is_empty() {
        return Err(SummaryError::EmptyQuery);
    }

    let mut batch = Batch::new(conn, sql);
    let mut stmt = batch.next()?.ok_or(SummaryError::EmptyQuery)?;
    if batch.next()?.is_some() {
        warn!("event=summarize module=report status=rejected reason=multiple_statements");
        return Err(SummaryError::MultipleStatements);
    }
    if mode == SummarizeMode::ReadOnly && !stmt.readonly() {
        warn!("event=summarize module=report status=rejected reason=not_read_only");
        return Err(SummaryError::NotReadOnly {
            sql: sql.to_string(),
        });
    }

    let columns: Vec<String> = stmt
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut rows = stmt.query([])?;
    let mut collected = Vec::new();
    while let Some(row) = rows.next()? {
        let mut mapped = Map::with_capacity(columns.len());
        for (index, name) in columns.iter().enumerate() {
            mapped.insert(name.clone(), value_to_json(row.get_ref(index)?));
        }
        collected.push(mapped);
    }

    debug!(
        "event=summarize module=report status=ok mode={} columns={} rows={}",
        mode,
        columns.len(),
        collected.len()
    );
    Ok(collected)
}

fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(number) => Value::from(number),
        ValueRef::Real(number) => Number::from_f64(number).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(STANDARD.encode(bytes)),
    }
}
