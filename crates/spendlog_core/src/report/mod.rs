//! Ad-hoc reporting over the expense store.

pub mod summarize;
