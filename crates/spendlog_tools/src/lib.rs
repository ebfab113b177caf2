//! Named tool handlers for the expense store.
//!
//! # Responsibility
//! - Expose `add_expense`, `list_expenses`, `delete_expense`,
//!   `summarize_expenses` and `export_database` as stateless calls.
//! - Translate JSON tool calls into handler invocations and back.
//!
//! # Invariants
//! - Every handler opens its own connection and drops it before returning.
//! - Handlers never panic; failures surface as `ToolError`.

pub mod api;
pub mod dispatch;
mod error;

pub use api::{
    add_expense, delete_expense, export_database, list_expenses, summarize_expenses,
    AddExpenseResponse, DeleteExpenseResponse, STATUS_ERROR, STATUS_SUCCESS,
};
pub use dispatch::{dispatch, dispatch_line, error_envelope, ToolRequest, TOOL_NAMES};
pub use error::{ToolError, ToolResult};
