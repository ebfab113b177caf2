//! Core domain logic for spendlog.
//! Owns the expense store, its validation rules and every read/write path.

pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;

pub use config::{ConfigError, ExpenseConfig, SummarizeMode};
pub use db::{init_db, open_db, open_db_in_memory, open_db_read_only, DbError, DbResult};
pub use export::{export_database, DatabaseExport, ExportError, ExportResult};
pub use logging::{default_log_level, init_logging, logging_status, LogSink};
pub use model::expense::{Expense, ExpenseId, ExpenseValidationError, NewExpense};
pub use repo::expense_repo::{ExpenseRepository, RepoError, RepoResult, SqliteExpenseRepository};
pub use report::summarize::{summarize, SummaryError, SummaryResult, SummaryRow};
pub use service::expense_service::{DeleteOutcome, ExpenseService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
