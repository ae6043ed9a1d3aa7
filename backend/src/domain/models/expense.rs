use shared::ExpenseCategory;
use thiserror::Error;

/// Expense as held by the storage layer
#[derive(Debug, Clone, PartialEq)]
pub struct DomainExpense {
    pub id: u64,
    pub description: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    /// RFC 3339 creation time
    pub created_at: String,
}

/// User-editable dashboard numbers, independent of the chat state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardValues {
    pub cash_on_hand: f64,
    pub debt_owed: f64,
}

pub const MAX_DESCRIPTION_LENGTH: usize = 256;

#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Description must be between 1 and {} characters", MAX_DESCRIPTION_LENGTH)]
    InvalidDescription,
    #[error("Amount must be a positive number")]
    AmountNotPositive,
    #[error("Value must be a finite number")]
    NonFiniteValue,
    #[error("Expense {0} not found")]
    NotFound(u64),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ExpenseError {
    /// True for errors caused by bad input rather than the server
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ExpenseError::InvalidDescription | ExpenseError::AmountNotPositive | ExpenseError::NonFiniteValue
        )
    }
}
