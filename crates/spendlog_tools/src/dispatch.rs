//! JSON tool-call dispatch.
//!
//! # Responsibility
//! - Route `{"tool": <name>, "arguments": {...}}` requests to handlers.
//! - Encode results, or an `{"status": "error", "message": ...}` envelope.
//!
//! # Invariants
//! - Dispatch always yields a JSON value; it never returns an error.

use crate::api::{self, STATUS_ERROR};
use crate::error::{ToolError, ToolResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use spendlog_core::{ExpenseConfig, ExpenseId, NewExpense};

/// Names accepted in `ToolRequest::tool`.
pub const TOOL_NAMES: [&str; 5] = [
    "add_expense",
    "list_expenses",
    "delete_expense",
    "summarize_expenses",
    "export_database",
];

/// One tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub tool: String,
    /// Omitted or `null` for tools that take no arguments.
    #[serde(default)]
    pub arguments: Value,
}

impl ToolRequest {
    pub fn new(tool: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool: tool.into(),
            arguments,
        }
    }
}

#[derive(Debug, Deserialize)]
struct DeleteArgs {
    expense_id: ExpenseId,
}

#[derive(Debug, Deserialize)]
struct SummarizeArgs {
    summarize_sql: String,
}

/// Runs one request and returns its JSON result or error envelope.
pub fn dispatch(config: &ExpenseConfig, request: &ToolRequest) -> Value {
    call(config, request).unwrap_or_else(|err| error_envelope(&err))
}

/// Parses one JSON request line and dispatches it.
pub fn dispatch_line(config: &ExpenseConfig, line: &str) -> Value {
    match serde_json::from_str::<ToolRequest>(line) {
        Ok(request) => dispatch(config, &request),
        Err(err) => {
            warn!("event=tool_request module=dispatch status=rejected error={err}");
            error_envelope(&ToolError::InvalidRequest(err))
        }
    }
}

/// Error envelope carrying the failure text.
pub fn error_envelope(err: &ToolError) -> Value {
    json!({
        "status": STATUS_ERROR,
        "message": err.to_string(),
    })
}

fn call(config: &ExpenseConfig, request: &ToolRequest) -> ToolResult<Value> {
    match request.tool.as_str() {
        "add_expense" => {
            let expense: NewExpense = arguments(request)?;
            encode(api::add_expense(config, &expense)?)
        }
        "list_expenses" => encode(api::list_expenses(config)?),
        "delete_expense" => {
            let args: DeleteArgs = arguments(request)?;
            encode(api::delete_expense(config, args.expense_id)?)
        }
        "summarize_expenses" => {
            let args: SummarizeArgs = arguments(request)?;
            encode(api::summarize_expenses(config, &args.summarize_sql)?)
        }
        "export_database" => encode(api::export_database(config)?),
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

fn arguments<T: DeserializeOwned>(request: &ToolRequest) -> ToolResult<T> {
    serde_json::from_value(request.arguments.clone()).map_err(|source| {
        ToolError::InvalidArguments {
            tool: request.tool.clone(),
            source,
        }
    })
}

fn encode(value: impl Serialize) -> ToolResult<Value> {
    serde_json::to_value(value).map_err(ToolError::Encode)
}
