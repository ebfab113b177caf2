//! Repository layer for expense persistence.
//!
//! # Responsibility
//! - Define the data access contract used by services.
//! - Keep SQL for the `expenses` table inside core.
//!
//! # Invariants
//! - Writes enforce `NewExpense::validate()` before touching the store.

pub mod expense_repo;
