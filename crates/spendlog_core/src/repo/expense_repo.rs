//! Expense repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide add/list/delete over the `expenses` table.
//! - Map rows to `Expense` values.
//!
//! # Invariants
//! - `create_expense` validates before SQL runs.
//! - `list_expenses` orders by ascending `id`.
//! - Each method runs exactly one statement.

use crate::db::DbError;
use crate::model::expense::{Expense, ExpenseId, ExpenseValidationError, NewExpense};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EXPENSE_SELECT_SQL: &str = "SELECT
    id,
    date,
    amount,
    category,
    subcategory,
    note
FROM expenses";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for expense persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(ExpenseValidationError),
    Db(DbError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<ExpenseValidationError> for RepoError {
    fn from(value: ExpenseValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for expense records.
pub trait ExpenseRepository {
    fn create_expense(&self, expense: &NewExpense) -> RepoResult<ExpenseId>;
    fn list_expenses(&self) -> RepoResult<Vec<Expense>>;
    /// Returns whether a row was removed. Absent ids are not an error.
    fn delete_expense(&self, id: ExpenseId) -> RepoResult<bool>;
}

/// SQLite-backed expense repository borrowing a caller-owned connection.
pub struct SqliteExpenseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteExpenseRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ExpenseRepository for SqliteExpenseRepository<'_> {
    fn create_expense(&self, expense: &NewExpense) -> RepoResult<ExpenseId> {
        expense.validate()?;

        self.conn.execute(
            "INSERT INTO expenses (
                date,
                amount,
                category,
                subcategory,
                note
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                expense.date.as_str(),
                expense.amount,
                expense.category.as_str(),
                expense.subcategory_or_default(),
                expense.note_or_default(),
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn list_expenses(&self) -> RepoResult<Vec<Expense>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EXPENSE_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut expenses = Vec::new();

        while let Some(row) = rows.next()? {
            expenses.push(parse_expense_row(row)?);
        }

        Ok(expenses)
    }

    fn delete_expense(&self, id: ExpenseId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1;", [id])?;
        Ok(changed > 0)
    }
}

fn parse_expense_row(row: &Row<'_>) -> RepoResult<Expense> {
    // Older writers stored NULL for absent optional text.
    Ok(Expense {
        id: row.get("id")?,
        date: row.get("date")?,
        amount: row.get("amount")?,
        category: row.get("category")?,
        subcategory: row
            .get::<_, Option<String>>("subcategory")?
            .unwrap_or_default(),
        note: row.get::<_, Option<String>>("note")?.unwrap_or_default(),
    })
}
