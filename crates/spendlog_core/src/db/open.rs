//! Connection bootstrap utilities for the expense store.
//!
//! # Responsibility
//! - Initialize the store file (WAL journal + schema) once at startup.
//! - Open per-call read-write or read-only connections for handlers.
//!
//! # Invariants
//! - `init_db` leaves the store in WAL mode with the `expenses` table present.
//! - `open_db`/`open_db_read_only` fail when the store file does not exist.

use super::{DbError, DbResult, SCHEMA_SQL};
use log::{debug, error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::Instant;

/// Ensures the store at `path` exists, uses WAL journaling and carries the
/// `expenses` table.
///
/// Safe to call on every process start; existing rows are left untouched.
///
/// # Side effects
/// - Creates missing parent directories and the store file.
/// - Emits `db_init` logging events with duration and status.
pub fn init_db(path: impl AsRef<Path>) -> DbResult<()> {
    let path = path.as_ref();
    let started_at = Instant::now();
    info!(
        "event=db_init module=db status=start path={}",
        path.display()
    );

    let result = create_parent_dir(path).and_then(|()| {
        let conn = Connection::open(path)?;
        bootstrap_connection(&conn)
    });

    match result {
        Ok(journal_mode) => {
            info!(
                "event=db_init module=db status=ok journal_mode={} duration_ms={}",
                journal_mode,
                started_at.elapsed().as_millis()
            );
            Ok(())
        }
        Err(err) => {
            error!(
                "event=db_init module=db status=error duration_ms={} error_code=db_init_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

/// Opens a read-write connection to an already initialized store.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_existing(
        path.as_ref(),
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        "read_write",
    )
}

/// Opens a read-only connection to an already initialized store.
///
/// Any statement that attempts to write fails inside SQLite.
pub fn open_db_read_only(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_existing(
        path.as_ref(),
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        "read_only",
    )
}

/// Opens an in-memory store with the schema applied.
///
/// Journal mode stays `memory`; WAL only applies to file-backed stores.
pub fn open_db_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory()?;
    bootstrap_connection(&conn)?;
    debug!("event=db_open module=db status=ok mode=memory");
    Ok(conn)
}

fn open_existing(path: &Path, flags: OpenFlags, mode: &str) -> DbResult<Connection> {
    match Connection::open_with_flags(path, flags) {
        Ok(conn) => {
            debug!("event=db_open module=db status=ok mode={mode}");
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={} error_code=db_open_failed error={}",
                mode, err
            );
            Err(err.into())
        }
    }
}

fn create_parent_dir(path: &Path) -> DbResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(|source| DbError::Io {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

fn bootstrap_connection(conn: &Connection) -> DbResult<String> {
    let journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL;", [], |row| row.get(0))?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(journal_mode)
}
