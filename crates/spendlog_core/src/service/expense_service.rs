//! Expense use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Service layer remains storage-agnostic.

use crate::model::expense::{Expense, ExpenseId, NewExpense};
use crate::repo::expense_repo::{ExpenseRepository, RepoResult};

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// The id the caller asked to delete.
    pub id: ExpenseId,
    /// `false` when no row carried that id.
    pub deleted: bool,
}

/// Use-case service wrapper for expense operations.
pub struct ExpenseService<R: ExpenseRepository> {
    repo: R,
}

impl<R: ExpenseRepository> ExpenseService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores one expense, returning the store-assigned id.
    pub fn add_expense(&self, expense: &NewExpense) -> RepoResult<ExpenseId> {
        self.repo.create_expense(expense)
    }

    /// Returns every stored expense in ascending id order.
    pub fn list_expenses(&self) -> RepoResult<Vec<Expense>> {
        self.repo.list_expenses()
    }

    /// Deletes by id. Deleting an absent id succeeds with `deleted = false`.
    pub fn delete_expense(&self, id: ExpenseId) -> RepoResult<DeleteOutcome> {
        let deleted = self.repo.delete_expense(id)?;
        Ok(DeleteOutcome { id, deleted })
    }
}
