//! `spendlog` command-line entry point.
//!
//! # Responsibility
//! - Resolve configuration, start logging and initialize the store.
//! - Expose each tool as a subcommand plus a JSON-lines `serve` loop.
//!
//! # Invariants
//! - The store initializer runs before any tool is invoked.
//! - stdout carries only JSON responses; logs go to stderr or files.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use serde_json::Value;
use spendlog_core::{
    core_version, default_log_level, init_db, init_logging, ExpenseConfig, NewExpense,
    SummarizeMode,
};
use spendlog_tools::{dispatch, dispatch_line, error_envelope, ToolRequest};
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "spendlog", version, about = "Personal expense store with tool-style operations")]
struct Cli {
    /// Store file; defaults to $SPENDLOG_DB_PATH or <tmp>/expenses.db.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// `read_only` or `trusted`; defaults to $SPENDLOG_SUMMARIZE_MODE or read_only.
    #[arg(long, global = true)]
    summarize_mode: Option<SummarizeMode>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when omitted.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the store and table if missing.
    Init,
    /// Add one expense.
    Add {
        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
        #[arg(long)]
        category: String,
        #[arg(long)]
        subcategory: Option<String>,
        #[arg(long)]
        note: Option<String>,
    },
    /// List every expense by ascending id.
    List,
    /// Delete an expense by id.
    Delete { expense_id: i64 },
    /// Run a SELECT statement against the expenses table.
    Summarize { summarize_sql: String },
    /// Export the store file as base64.
    Export {
        /// Write the decoded store bytes here instead of printing JSON.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Invoke a tool by name with JSON arguments.
    Call {
        tool: String,
        #[arg(long)]
        args: Option<String>,
    },
    /// Answer one JSON tool request per stdin line.
    Serve,
    /// Print the core version.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    init_logging(&level, cli.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let config = resolve_config(&cli)?;
    if !matches!(cli.command, Command::Version) {
        init_db(&config.db_path).with_context(|| {
            format!("failed to initialize store at {}", config.db_path.display())
        })?;
        info!(
            "event=cli_start module=cli status=ok summarize_mode={}",
            config.summarize_mode
        );
    }

    run(cli.command, &config)
}

fn resolve_config(cli: &Cli) -> Result<ExpenseConfig> {
    let mut config = ExpenseConfig::from_env()?;
    if let Some(path) = &cli.db_path {
        config = ExpenseConfig::new(path.clone())?.with_summarize_mode(config.summarize_mode);
    }
    if let Some(mode) = cli.summarize_mode {
        config.summarize_mode = mode;
    }
    Ok(config)
}

fn run(command: Command, config: &ExpenseConfig) -> Result<()> {
    let response = match command {
        Command::Init => {
            println!("{}", config.db_path.display());
            return Ok(());
        }
        Command::Add {
            date,
            amount,
            category,
            subcategory,
            note,
        } => {
            let expense = NewExpense {
                date,
                amount,
                category,
                subcategory,
                note,
            };
            tool_json(spendlog_tools::add_expense(config, &expense))
        }
        Command::List => tool_json(spendlog_tools::list_expenses(config)),
        Command::Delete { expense_id } => {
            tool_json(spendlog_tools::delete_expense(config, expense_id))
        }
        Command::Summarize { summarize_sql } => {
            tool_json(spendlog_tools::summarize_expenses(config, &summarize_sql))
        }
        Command::Export { out: Some(out) } => {
            let export = spendlog_tools::export_database(config)?;
            let bytes = export.decode()?;
            std::fs::write(&out, &bytes)
                .with_context(|| format!("failed to write export to {}", out.display()))?;
            println!("{}", out.display());
            return Ok(());
        }
        Command::Export { out: None } => tool_json(spendlog_tools::export_database(config)),
        Command::Call { tool, args } => {
            let arguments = match args {
                Some(raw) => serde_json::from_str(&raw).context("--args must be JSON")?,
                None => Value::Null,
            };
            dispatch(config, &ToolRequest::new(tool, arguments))
        }
        Command::Serve => return serve(config),
        Command::Version => {
            println!("spendlog_core version={}", core_version());
            return Ok(());
        }
    };

    print_json(&response)?;
    if response["status"] == spendlog_tools::STATUS_ERROR {
        bail!("{}", response["message"].as_str().unwrap_or("tool call failed"));
    }
    Ok(())
}

fn serve(config: &ExpenseConfig) -> Result<()> {
    info!("event=serve_start module=cli status=ok transport=stdio");
    let served = serve_lines(config, std::io::stdin().lock(), std::io::stdout().lock())?;
    info!("event=serve_stop module=cli status=ok requests={served}");
    Ok(())
}

/// Answers each non-blank request line with one JSON line; returns the count.
fn serve_lines(
    config: &ExpenseConfig,
    reader: impl BufRead,
    mut writer: impl Write,
) -> Result<usize> {
    let mut served = 0;
    for line in reader.lines() {
        let line = line.context("failed to read request line")?;
        if line.trim().is_empty() {
            continue;
        }
        let response = dispatch_line(config, &line);
        serde_json::to_writer(&mut writer, &response)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        served += 1;
    }
    Ok(served)
}

fn tool_json<T: serde::Serialize>(result: spendlog_tools::ToolResult<T>) -> Value {
    match result.map(serde_json::to_value) {
        Ok(Ok(value)) => value,
        Ok(Err(err)) => error_envelope(&spendlog_tools::ToolError::Encode(err)),
        Err(err) => error_envelope(&err),
    }
}

fn print_json(value: &Value) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
