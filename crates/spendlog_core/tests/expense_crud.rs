use spendlog_core::db::open_db_in_memory;
use spendlog_core::{
    DeleteOutcome, ExpenseRepository, ExpenseService, NewExpense, RepoError,
    SqliteExpenseRepository,
};
use std::collections::HashSet;

#[test]
fn add_then_list_contains_one_more_matching_record() {
    let conn = open_db_in_memory().unwrap();
    let service = ExpenseService::new(SqliteExpenseRepository::new(&conn));

    service
        .add_expense(&NewExpense::new("2024-01-01", 1.0, "seed"))
        .unwrap();
    let before = service.list_expenses().unwrap();

    let input = NewExpense::new("2024-03-15", -42.75, "refund")
        .with_subcategory("electronics")
        .with_note("returned cable");
    let id = service.add_expense(&input).unwrap();

    let after = service.list_expenses().unwrap();
    assert_eq!(after.len(), before.len() + 1);
    assert!(before.iter().all(|expense| expense.id != id));

    let stored = after.iter().find(|expense| expense.id == id).unwrap();
    assert_eq!(stored.date, "2024-03-15");
    assert_eq!(stored.amount, -42.75);
    assert_eq!(stored.category, "refund");
    assert_eq!(stored.subcategory, "electronics");
    assert_eq!(stored.note, "returned cable");
}

#[test]
fn add_rejects_invalid_calendar_date() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExpenseRepository::new(&conn);

    let err = repo
        .create_expense(&NewExpense::new("2024-13-40", 5.0, "food"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(err.to_string().contains("YYYY-MM-DD"));
    assert!(repo.list_expenses().unwrap().is_empty());
}

#[test]
fn add_rejects_padded_or_signed_dates() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExpenseRepository::new(&conn);

    for date in [" 2024-03-15", "2024- 3-15", "+2024-03-15", "-2024-03-15"] {
        let err = repo
            .create_expense(&NewExpense::new(date, 5.0, "food"))
            .unwrap_err();
        assert!(matches!(err, RepoError::Validation(_)), "`{date}`: {err}");
    }
    assert!(repo.list_expenses().unwrap().is_empty());
}

#[test]
fn ids_are_unique_and_list_is_ordered() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteExpenseRepository::new(&conn);

    for day in 1..=5 {
        repo.create_expense(&NewExpense::new(format!("2024-02-0{day}"), 2.0, "coffee"))
            .unwrap();
    }
    repo.delete_expense(3).unwrap();
    repo.create_expense(&NewExpense::new("2024-02-06", 2.0, "coffee"))
        .unwrap();

    let listed = repo.list_expenses().unwrap();
    let ids: Vec<_> = listed.iter().map(|expense| expense.id).collect();
    assert!(ids.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(ids.iter().collect::<HashSet<_>>().len(), ids.len());
    assert!(!ids.contains(&3), "AUTOINCREMENT must not reuse deleted ids");
}

#[test]
fn delete_existing_removes_only_that_record() {
    let conn = open_db_in_memory().unwrap();
    let service = ExpenseService::new(SqliteExpenseRepository::new(&conn));

    let first = service
        .add_expense(&NewExpense::new("2024-01-05", 12.5, "food"))
        .unwrap();
    let second = service
        .add_expense(&NewExpense::new("2024-01-06", 3.0, "transport"))
        .unwrap();
    let third = service
        .add_expense(&NewExpense::new("2024-01-07", 8.0, "books"))
        .unwrap();

    let outcome = service.delete_expense(second).unwrap();
    assert_eq!(
        outcome,
        DeleteOutcome {
            id: second,
            deleted: true
        }
    );

    let ids: Vec<_> = service
        .list_expenses()
        .unwrap()
        .into_iter()
        .map(|expense| expense.id)
        .collect();
    assert_eq!(ids, vec![first, third]);
}

#[test]
fn delete_absent_id_is_a_successful_no_op() {
    let conn = open_db_in_memory().unwrap();
    let service = ExpenseService::new(SqliteExpenseRepository::new(&conn));
    service
        .add_expense(&NewExpense::new("2024-01-05", 12.5, "food"))
        .unwrap();
    let before = service.list_expenses().unwrap();

    let outcome = service.delete_expense(9_999).unwrap();
    assert!(!outcome.deleted);
    assert_eq!(outcome.id, 9_999);
    assert_eq!(service.list_expenses().unwrap(), before);
}

#[test]
fn food_and_transport_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = ExpenseService::new(SqliteExpenseRepository::new(&conn));

    let food = service
        .add_expense(&NewExpense::new("2024-01-05", 12.50, "food"))
        .unwrap();
    let transport = service
        .add_expense(&NewExpense::new("2024-01-06", 3.00, "transport"))
        .unwrap();
    assert_eq!((food, transport), (1, 2));

    let ids: Vec<_> = service
        .list_expenses()
        .unwrap()
        .iter()
        .map(|expense| expense.id)
        .collect();
    assert_eq!(ids, vec![1, 2]);

    service.delete_expense(1).unwrap();
    let remaining = service.list_expenses().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, 2);
    assert_eq!(remaining[0].category, "transport");
}
