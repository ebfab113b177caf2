//! Raw store export.
//!
//! # Responsibility
//! - Snapshot the store file as base64 text for transport.
//!
//! # Invariants
//! - The WAL is checkpointed into the main file before the bytes are read.
//! - Export never writes rows; it only folds the WAL into the main file.

use crate::db::{open_db, DbError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// File name reported with every export payload.
pub const EXPORT_FILE_NAME: &str = "expense.db";

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug)]
pub enum ExportError {
    Db(DbError),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Decode(base64::DecodeError),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "cannot read store file `{}`: {source}", path.display())
            }
            Self::Decode(err) => write!(f, "invalid export payload: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Decode(err) => Some(err),
        }
    }
}

impl From<DbError> for ExportError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for ExportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Base64 snapshot of the store file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseExport {
    pub filename: String,
    pub base64: String,
    pub size_bytes: u64,
}

impl DatabaseExport {
    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            filename: EXPORT_FILE_NAME.to_string(),
            base64: STANDARD.encode(bytes),
            size_bytes: bytes.len() as u64,
        }
    }

    /// Decodes the payload back into raw SQLite file bytes.
    pub fn decode(&self) -> ExportResult<Vec<u8>> {
        STANDARD.decode(&self.base64).map_err(ExportError::Decode)
    }
}

/// Checkpoints the WAL and returns the store file as base64.
///
/// Fails when the store does not exist or cannot be read.
pub fn export_database(path: impl AsRef<Path>) -> ExportResult<DatabaseExport> {
    let path = path.as_ref();
    checkpoint(path)?;

    let bytes = std::fs::read(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        "event=export module=export status=ok size_bytes={}",
        bytes.len()
    );
    Ok(DatabaseExport::from_bytes(&bytes))
}

fn checkpoint(path: &Path) -> ExportResult<()> {
    let conn = open_db(path)?;
    let (busy, log_frames, checkpointed): (i64, i64, i64) =
        conn.query_row("PRAGMA wal_checkpoint(TRUNCATE);", [], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?;

    if busy != 0 {
        warn!(
            "event=export_checkpoint module=export status=busy log_frames={} checkpointed={}",
            log_frames, checkpointed
        );
    }
    Ok(())
}
