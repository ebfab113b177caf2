//! Runtime configuration for the expense store.
//!
//! # Responsibility
//! - Carry the store location and summarization policy explicitly to the
//!   initializer and every handler.
//! - Resolve defaults from the environment without hidden globals.
//!
//! # Invariants
//! - `db_path` is never empty.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

/// File name used when no explicit store path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "expenses.db";
/// Environment override for the store path.
pub const DB_PATH_ENV: &str = "SPENDLOG_DB_PATH";
/// Environment override for the summarization policy.
pub const SUMMARIZE_MODE_ENV: &str = "SPENDLOG_SUMMARIZE_MODE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyDbPath,
    InvalidSummarizeMode(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDbPath => write!(f, "database path cannot be empty"),
            Self::InvalidSummarizeMode(value) => write!(
                f,
                "unsupported summarize mode `{value}`; expected read_only|trusted"
            ),
        }
    }
}

impl Error for ConfigError {}

/// Execution policy for caller-authored summarization queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SummarizeMode {
    /// Only single read-only statements, executed on a read-only connection.
    #[default]
    ReadOnly,
    /// Statement text is executed verbatim on a read-write connection.
    /// Only for deployments where every caller is trusted.
    Trusted,
}

impl SummarizeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::Trusted => "trusted",
        }
    }
}

impl FromStr for SummarizeMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "read_only" | "readonly" | "read-only" => Ok(Self::ReadOnly),
            "trusted" => Ok(Self::Trusted),
            other => Err(ConfigError::InvalidSummarizeMode(other.to_string())),
        }
    }
}

impl Display for SummarizeMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration shared by the store initializer and all handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseConfig {
    /// Location of the SQLite store file.
    pub db_path: PathBuf,
    /// Policy applied by `summarize_expenses`.
    pub summarize_mode: SummarizeMode,
}

impl Default for ExpenseConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            summarize_mode: SummarizeMode::default(),
        }
    }
}

impl ExpenseConfig {
    /// Creates a config for an explicit store path with default policy.
    pub fn new(db_path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let db_path = db_path.into();
        if db_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDbPath);
        }
        Ok(Self {
            db_path,
            summarize_mode: SummarizeMode::default(),
        })
    }

    /// Builds a config from `SPENDLOG_DB_PATH` / `SPENDLOG_SUMMARIZE_MODE`.
    ///
    /// Unset or blank variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DB_PATH_ENV) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                config.db_path = PathBuf::from(trimmed);
            }
        }

        if let Some(raw) = lookup(SUMMARIZE_MODE_ENV) {
            if !raw.trim().is_empty() {
                config.summarize_mode = raw.parse()?;
            }
        }

        Ok(config)
    }

    pub fn with_summarize_mode(mut self, mode: SummarizeMode) -> Self {
        self.summarize_mode = mode;
        self
    }
}
