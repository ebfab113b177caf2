//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep tool/CLI layers decoupled from storage details.

pub mod expense_service;
