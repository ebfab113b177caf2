use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rusqlite::Connection;
use serde_json::{json, Value};
use spendlog_core::{init_db, ExpenseConfig, SummarizeMode};
use spendlog_tools::{dispatch, dispatch_line, ToolRequest};

fn store(dir: &tempfile::TempDir) -> ExpenseConfig {
    let config = ExpenseConfig::new(dir.path().join("expenses.db")).unwrap();
    init_db(&config.db_path).unwrap();
    config
}

fn call(config: &ExpenseConfig, tool: &str, arguments: Value) -> Value {
    dispatch(config, &ToolRequest::new(tool, arguments))
}

fn listed_ids(config: &ExpenseConfig) -> Vec<i64> {
    call(config, "list_expenses", Value::Null)
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["id"].as_i64().unwrap())
        .collect()
}

#[test]
fn add_list_delete_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let config = store(&dir);

    let first = call(
        &config,
        "add_expense",
        json!({"date": "2024-01-05", "amount": 12.50, "category": "food"}),
    );
    assert_eq!(
        first,
        json!({"status": "success", "message": "Expense added with ID 1", "id": 1})
    );

    let second = call(
        &config,
        "add_expense",
        json!({"date": "2024-01-06", "amount": 3, "category": "transport"}),
    );
    assert_eq!(second["id"], 2);

    let listed = call(&config, "list_expenses", Value::Null);
    assert_eq!(
        listed,
        json!([
            {"id": 1, "date": "2024-01-05", "amount": 12.5, "category": "food", "subcategory": "", "note": ""},
            {"id": 2, "date": "2024-01-06", "amount": 3.0, "category": "transport", "subcategory": "", "note": ""}
        ])
    );

    let deleted = call(&config, "delete_expense", json!({"expense_id": 1}));
    assert_eq!(
        deleted,
        json!({"status": "success", "message": "Expense with ID 1 deleted", "deleted": true})
    );
    assert_eq!(listed_ids(&config), vec![2]);
}

#[test]
fn invalid_date_is_an_error_envelope_and_stores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = store(&dir);

    let response = call(
        &config,
        "add_expense",
        json!({"date": "2024-13-40", "amount": 1.0, "category": "food"}),
    );
    assert_eq!(response["status"], "error");
    assert!(response["message"].as_str().unwrap().contains("2024-13-40"));
    assert!(listed_ids(&config).is_empty());
}

#[test]
fn deleting_absent_id_reports_success_and_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = store(&dir);
    call(
        &config,
        "add_expense",
        json!({"date": "2024-01-05", "amount": 1.0, "category": "food"}),
    );

    let response = call(&config, "delete_expense", json!({"expense_id": 404}));
    assert_eq!(response["status"], "success");
    assert_eq!(response["deleted"], false);
    assert_eq!(listed_ids(&config), vec![1]);
}

#[test]
fn summarize_returns_rows_and_rejects_writes_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let config = store(&dir);
    for (date, amount, category) in [
        ("2024-01-05", 10.0, "food"),
        ("2024-01-06", 5.0, "food"),
        ("2024-01-07", 2.5, "transport"),
    ] {
        call(
            &config,
            "add_expense",
            json!({"date": date, "amount": amount, "category": category}),
        );
    }

    let rows = call(
        &config,
        "summarize_expenses",
        json!({"summarize_sql": "SELECT category, SUM(amount) AS total FROM expenses GROUP BY category ORDER BY total DESC"}),
    );
    assert_eq!(
        rows,
        json!([
            {"category": "food", "total": 15.0},
            {"category": "transport", "total": 2.5}
        ])
    );

    let rejected = call(
        &config,
        "summarize_expenses",
        json!({"summarize_sql": "DELETE FROM expenses"}),
    );
    assert_eq!(rejected["status"], "error");
    assert_eq!(listed_ids(&config).len(), 3);

    let broken = call(
        &config,
        "summarize_expenses",
        json!({"summarize_sql": "SELEC category FROM expenses"}),
    );
    assert_eq!(broken["status"], "error");
    assert!(broken["message"].as_str().unwrap().contains("syntax error"));
}

#[test]
fn trusted_mode_executes_statement_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let config = store(&dir).with_summarize_mode(SummarizeMode::Trusted);
    call(
        &config,
        "add_expense",
        json!({"date": "2024-01-05", "amount": 1.0, "category": "food"}),
    );

    let response = call(
        &config,
        "summarize_expenses",
        json!({"summarize_sql": "DELETE FROM expenses"}),
    );
    assert_eq!(response, json!([]));
    assert!(listed_ids(&config).is_empty());
}

#[test]
fn trusted_mode_still_rejects_chained_statements() {
    let dir = tempfile::tempdir().unwrap();
    let config = store(&dir).with_summarize_mode(SummarizeMode::Trusted);
    call(
        &config,
        "add_expense",
        json!({"date": "2024-01-05", "amount": 1.0, "category": "food"}),
    );

    let response = call(
        &config,
        "summarize_expenses",
        json!({"summarize_sql": "SELECT * FROM expenses; DROP TABLE expenses"}),
    );
    assert_eq!(response["status"], "error");
    assert!(response["message"]
        .as_str()
        .unwrap()
        .contains("exactly one statement"));
    assert_eq!(listed_ids(&config), vec![1]);
}

#[test]
fn export_decodes_to_store_with_same_records() {
    let dir = tempfile::tempdir().unwrap();
    let config = store(&dir);
    call(
        &config,
        "add_expense",
        json!({"date": "2024-01-05", "amount": 12.5, "category": "food", "subcategory": "lunch", "note": "team"}),
    );
    call(
        &config,
        "add_expense",
        json!({"date": "2024-01-06", "amount": 3.0, "category": "transport"}),
    );
    let listed = call(&config, "list_expenses", Value::Null);

    let export = dispatch_line(&config, r#"{"tool": "export_database"}"#);
    assert_eq!(export["filename"], "expense.db");
    let bytes = STANDARD
        .decode(export["base64"].as_str().unwrap())
        .unwrap();

    let restored_dir = tempfile::tempdir().unwrap();
    let restored_config = ExpenseConfig::new(restored_dir.path().join("restored.db")).unwrap();
    std::fs::write(&restored_config.db_path, &bytes).unwrap();
    let restored = call(&restored_config, "list_expenses", Value::Null);

    assert_eq!(restored, listed);

    let conn = Connection::open(&restored_config.db_path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn export_without_store_is_an_error_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExpenseConfig::new(dir.path().join("absent.db")).unwrap();

    let response = call(&config, "export_database", Value::Null);
    assert_eq!(response["status"], "error");
}
