//! # Storage Traits
//!
//! Interfaces the domain layer uses to reach expense data, so services can be
//! tested against any backend.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::expense::{DashboardValues, DomainExpense};

/// Interface for expense storage operations
#[async_trait]
pub trait ExpenseStorage: Send + Sync {
    /// Reserve the next expense id (ids start at 1 and never repeat)
    async fn next_expense_id(&self) -> Result<u64>;

    /// Append a new expense
    async fn store_expense(&self, expense: &DomainExpense) -> Result<()>;

    /// All expenses in insertion order (oldest first)
    async fn list_expenses(&self) -> Result<Vec<DomainExpense>>;

    /// Delete an expense; returns false when it did not exist
    async fn delete_expense(&self, expense_id: u64) -> Result<bool>;
}

/// Interface for the editable dashboard values
#[async_trait]
pub trait DashboardStorage: Send + Sync {
    async fn get_dashboard_values(&self) -> Result<DashboardValues>;

    async fn store_dashboard_values(&self, values: &DashboardValues) -> Result<()>;
}
