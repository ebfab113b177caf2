//! Expense domain model.
//!
//! # Responsibility
//! - Define the stored expense record and the add-expense input shape.
//! - Validate input before any store access.
//!
//! # Invariants
//! - `date` always parses as a real calendar date in `YYYY-MM-DD` form.
//! - `id` is assigned by the store and never changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type ExpenseId = i64;

/// Accepted calendar date layout for `date` fields.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A persisted expense row, as returned by `list_expenses`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub date: String,
    pub amount: f64,
    pub category: String,
    pub subcategory: String,
    pub note: String,
}

/// Candidate record accepted by `add_expense`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    /// Calendar date in `YYYY-MM-DD` form.
    pub date: String,
    /// No sign or range constraint.
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewExpense {
    pub fn new(date: impl Into<String>, amount: f64, category: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            amount,
            category: category.into(),
            subcategory: None,
            note: None,
        }
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Checks input invariants.
    ///
    /// Only `date` is constrained; amount and free-text fields pass as-is.
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        parse_expense_date(&self.date).map(|_| ())
    }

    /// Subcategory as stored: absent maps to the empty string.
    pub fn subcategory_or_default(&self) -> &str {
        self.subcategory.as_deref().unwrap_or_default()
    }

    /// Note as stored: absent maps to the empty string.
    pub fn note_or_default(&self) -> &str {
        self.note.as_deref().unwrap_or_default()
    }
}

/// Parses a `YYYY-MM-DD` date, rejecting impossible calendar dates.
///
/// chrono's `%Y` accepts signs and padding, so the shape is checked first:
/// four ASCII digits, then one or two digits for month and day.
pub fn parse_expense_date(value: &str) -> Result<NaiveDate, ExpenseValidationError> {
    let invalid = || ExpenseValidationError::InvalidDate {
        value: value.to_string(),
    };
    if !has_date_shape(value) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

fn has_date_shape(value: &str) -> bool {
    let digits = |part: &str, min: usize, max: usize| {
        (min..=max).contains(&part.len()) && part.bytes().all(|byte| byte.is_ascii_digit())
    };
    let mut parts = value.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(month), Some(day), None) => {
            digits(year, 4, 4) && digits(month, 1, 2) && digits(day, 1, 2)
        }
        _ => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    InvalidDate { value: String },
}

impl Display for ExpenseValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate { value } => {
                write!(f, "date must be in YYYY-MM-DD format, got `{value}`")
            }
        }
    }
}

impl Error for ExpenseValidationError {}
