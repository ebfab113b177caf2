//! Domain model for expense records.
//!
//! # Invariants
//! - Every stored record is identified by a store-assigned `ExpenseId`.
//! - Records are never updated in place; deletion is a hard delete.

pub mod expense;
