//! Tool handlers over the expense store.
//!
//! # Contract
//! - Sync calls; each runs exactly one statement on its own connection.
//! - The store must already be initialized with `spendlog_core::init_db`.
//! - Store errors are returned with their original text.

use crate::error::{ToolError, ToolResult};
use log::{error, info};
use serde::{Deserialize, Serialize};
use spendlog_core::db::{open_db, open_db_read_only};
use spendlog_core::{
    summarize, DatabaseExport, Expense, ExpenseConfig, ExpenseId, ExpenseService, NewExpense,
    SqliteExpenseRepository, SummarizeMode, SummaryRow,
};
use std::time::Instant;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

/// Response of `add_expense`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddExpenseResponse {
    pub status: String,
    /// Human-readable message carrying the assigned id.
    pub message: String,
    pub id: ExpenseId,
}

/// Response of `delete_expense`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteExpenseResponse {
    /// Always `success`, whether or not a row matched.
    pub status: String,
    pub message: String,
    /// `false` when no row carried the requested id.
    pub deleted: bool,
}

/// Validates and stores one expense.
///
/// Invalid dates are rejected before the store is opened.
pub fn add_expense(config: &ExpenseConfig, expense: &NewExpense) -> ToolResult<AddExpenseResponse> {
    let started_at = Instant::now();
    let result = expense.validate().map_err(ToolError::from).and_then(|()| {
        with_expense_service(config, |service| service.add_expense(expense))
    });
    log_outcome("expense_add", started_at, &result);

    let id = result?;
    Ok(AddExpenseResponse {
        status: STATUS_SUCCESS.to_string(),
        message: format!("Expense added with ID {id}"),
        id,
    })
}

/// Returns every expense ordered by ascending id.
pub fn list_expenses(config: &ExpenseConfig) -> ToolResult<Vec<Expense>> {
    let started_at = Instant::now();
    let result = with_expense_service(config, |service| service.list_expenses());
    log_outcome("expense_list", started_at, &result);
    result
}

/// Deletes the expense with `expense_id`; absent ids still report success.
pub fn delete_expense(
    config: &ExpenseConfig,
    expense_id: ExpenseId,
) -> ToolResult<DeleteExpenseResponse> {
    let started_at = Instant::now();
    let result = with_expense_service(config, |service| service.delete_expense(expense_id));
    log_outcome("expense_delete", started_at, &result);

    let outcome = result?;
    Ok(DeleteExpenseResponse {
        status: STATUS_SUCCESS.to_string(),
        message: format!("Expense with ID {} deleted", outcome.id),
        deleted: outcome.deleted,
    })
}

/// Runs a caller-authored `SELECT` under the configured summarize mode.
///
/// In `read_only` mode the statement runs on a read-only connection and
/// writes are rejected. In `trusted` mode the text is executed verbatim.
pub fn summarize_expenses(
    config: &ExpenseConfig,
    summarize_sql: &str,
) -> ToolResult<Vec<SummaryRow>> {
    let started_at = Instant::now();
    let result = run_summary(config, summarize_sql);
    log_outcome("expense_summarize", started_at, &result);
    result
}

/// Returns the store file as a base64 payload named `expense.db`.
pub fn export_database(config: &ExpenseConfig) -> ToolResult<DatabaseExport> {
    let started_at = Instant::now();
    let result = spendlog_core::export_database(&config.db_path).map_err(ToolError::from);
    log_outcome("database_export", started_at, &result);
    result
}

fn run_summary(config: &ExpenseConfig, summarize_sql: &str) -> ToolResult<Vec<SummaryRow>> {
    let conn = match config.summarize_mode {
        SummarizeMode::ReadOnly => open_db_read_only(&config.db_path)?,
        SummarizeMode::Trusted => open_db(&config.db_path)?,
    };
    Ok(summarize(&conn, summarize_sql, config.summarize_mode)?)
}

fn with_expense_service<T>(
    config: &ExpenseConfig,
    f: impl FnOnce(&ExpenseService<SqliteExpenseRepository<'_>>) -> spendlog_core::RepoResult<T>,
) -> ToolResult<T> {
    let conn = open_db(&config.db_path)?;
    let service = ExpenseService::new(SqliteExpenseRepository::new(&conn));
    Ok(f(&service)?)
}

fn log_outcome<T>(event: &str, started_at: Instant, result: &ToolResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => info!("event={event} module=tools status=ok duration_ms={duration_ms}"),
        Err(err) => error!(
            "event={event} module=tools status=error duration_ms={duration_ms} error={err}"
        ),
    }
}
