use spendlog_core::{DbError, ExpenseValidationError, ExportError, RepoError, SummaryError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ToolResult<T> = Result<T, ToolError>;

/// Failure of a single tool call.
///
/// `Display` forwards the underlying store text unchanged.
#[derive(Debug)]
pub enum ToolError {
    Validation(ExpenseValidationError),
    Db(DbError),
    Repo(RepoError),
    Summary(SummaryError),
    Export(ExportError),
    UnknownTool(String),
    InvalidArguments {
        tool: String,
        source: serde_json::Error,
    },
    InvalidRequest(serde_json::Error),
    Encode(serde_json::Error),
}

impl Display for ToolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Summary(err) => write!(f, "{err}"),
            Self::Export(err) => write!(f, "{err}"),
            Self::UnknownTool(name) => write!(f, "unknown tool `{name}`"),
            Self::InvalidArguments { tool, source } => {
                write!(f, "invalid arguments for `{tool}`: {source}")
            }
            Self::InvalidRequest(err) => write!(f, "invalid tool request: {err}"),
            Self::Encode(err) => write!(f, "failed to encode tool response: {err}"),
        }
    }
}

impl Error for ToolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Summary(err) => Some(err),
            Self::Export(err) => Some(err),
            Self::UnknownTool(_) => None,
            Self::InvalidArguments { source, .. } => Some(source),
            Self::InvalidRequest(err) | Self::Encode(err) => Some(err),
        }
    }
}

impl From<ExpenseValidationError> for ToolError {
    fn from(value: ExpenseValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for ToolError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for ToolError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<SummaryError> for ToolError {
    fn from(value: SummaryError) -> Self {
        Self::Summary(value)
    }
}

impl From<ExportError> for ToolError {
    fn from(value: ExportError) -> Self {
        Self::Export(value)
    }
}
