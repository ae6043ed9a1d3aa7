//! Expense tracking for the dashboard view.
//!
//! Expenses are entered through the form, listed newest first and summed per
//! category for the chart. The two editable dashboard values (cash on hand and
//! debt owed) live alongside them and are independent of the chat state.

use std::sync::Arc;

use shared::{
    CategoryBreakdownResponse, CategoryTotal, CreateExpenseRequest, DashboardStats, DeleteExpenseResponse,
    Expense, ExpenseListResponse,
};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

use crate::domain::models::expense::{DashboardValues, DomainExpense, ExpenseError, MAX_DESCRIPTION_LENGTH};
use crate::io::rest::mappers::ExpenseMapper;
use crate::storage::{DashboardStorage, ExpenseStorage, InMemoryExpenseRepository};

/// Storage the expense service needs
pub trait ExpenseRepository: ExpenseStorage + DashboardStorage {}

impl<T: ExpenseStorage + DashboardStorage> ExpenseRepository for T {}

#[derive(Clone)]
pub struct ExpenseService {
    repository: Arc<dyn ExpenseRepository>,
}

impl ExpenseService {
    pub fn new(repository: Arc<dyn ExpenseRepository>) -> Self {
        Self { repository }
    }

    /// Service backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryExpenseRepository::new()))
    }

    pub async fn create_expense(&self, request: CreateExpenseRequest) -> Result<Expense, ExpenseError> {
        let description = request.description.trim();
        let length = description.chars().count();
        if length == 0 || length > MAX_DESCRIPTION_LENGTH {
            return Err(ExpenseError::InvalidDescription);
        }
        if !request.amount.is_finite() {
            return Err(ExpenseError::NonFiniteValue);
        }
        if request.amount <= 0.0 {
            return Err(ExpenseError::AmountNotPositive);
        }

        let created_at = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .map_err(|e| ExpenseError::Storage(e.into()))?;

        let expense = DomainExpense {
            id: self.repository.next_expense_id().await?,
            description: description.to_string(),
            amount: request.amount,
            category: request.category,
            created_at,
        };
        self.repository.store_expense(&expense).await?;

        info!(
            "Created expense {} ({} {:.2})",
            expense.id,
            expense.category.key(),
            expense.amount
        );
        Ok(ExpenseMapper::to_dto(expense))
    }

    pub async fn list_expenses(&self) -> Result<ExpenseListResponse, ExpenseError> {
        let mut expenses = self.repository.list_expenses().await?;
        expenses.reverse();
        let stats = self.stats_for(&expenses).await?;

        Ok(ExpenseListResponse {
            expenses: expenses.into_iter().map(ExpenseMapper::to_dto).collect(),
            stats,
        })
    }

    pub async fn delete_expense(&self, expense_id: u64) -> Result<DeleteExpenseResponse, ExpenseError> {
        if !self.repository.delete_expense(expense_id).await? {
            return Err(ExpenseError::NotFound(expense_id));
        }

        info!("Deleted expense {}", expense_id);
        Ok(DeleteExpenseResponse {
            deleted_id: expense_id,
            success_message: format!("Expense {} deleted", expense_id),
        })
    }

    /// Totals per category, in order of each category's first appearance
    pub async fn category_breakdown(&self) -> Result<CategoryBreakdownResponse, ExpenseError> {
        let expenses = self.repository.list_expenses().await?;

        let mut categories: Vec<CategoryTotal> = Vec::new();
        for expense in expenses {
            match categories.iter_mut().find(|entry| entry.category == expense.category) {
                Some(entry) => entry.total += expense.amount,
                None => categories.push(CategoryTotal {
                    category: expense.category,
                    total: expense.amount,
                }),
            }
        }

        Ok(CategoryBreakdownResponse { categories })
    }

    pub async fn set_cash_on_hand(&self, value: f64) -> Result<DashboardStats, ExpenseError> {
        self.update_dashboard(value, |values| values.cash_on_hand = value).await
    }

    pub async fn set_debt_owed(&self, value: f64) -> Result<DashboardStats, ExpenseError> {
        self.update_dashboard(value, |values| values.debt_owed = value).await
    }

    async fn update_dashboard(
        &self,
        value: f64,
        apply: impl FnOnce(&mut DashboardValues),
    ) -> Result<DashboardStats, ExpenseError> {
        if !value.is_finite() {
            return Err(ExpenseError::NonFiniteValue);
        }

        let mut values = self.repository.get_dashboard_values().await?;
        apply(&mut values);
        self.repository.store_dashboard_values(&values).await?;

        let expenses = self.repository.list_expenses().await?;
        self.stats_for(&expenses).await
    }

    async fn stats_for(&self, expenses: &[DomainExpense]) -> Result<DashboardStats, ExpenseError> {
        let values = self.repository.get_dashboard_values().await?;
        Ok(DashboardStats {
            total_expenses: expenses.iter().map(|expense| expense.amount).sum(),
            transaction_count: expenses.len(),
            cash_on_hand: values.cash_on_hand,
            debt_owed: values.debt_owed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ExpenseCategory;

    fn request(description: &str, amount: f64, category: ExpenseCategory) -> CreateExpenseRequest {
        CreateExpenseRequest {
            description: description.to_string(),
            amount,
            category,
        }
    }

    #[tokio::test]
    async fn test_create_expense_basic() {
        let service = ExpenseService::in_memory();

        let expense = service
            .create_expense(request("  קניות בסופר ", 120.5, ExpenseCategory::Groceries))
            .await
            .unwrap();

        assert_eq!(expense.id, 1);
        assert_eq!(expense.description, "קניות בסופר");
        assert_eq!(expense.amount, 120.5);
        assert_eq!(expense.category, ExpenseCategory::Groceries);
        assert!(OffsetDateTime::parse(&expense.date, &Rfc3339).is_ok());
    }

    #[tokio::test]
    async fn test_create_expense_validation() {
        let service = ExpenseService::in_memory();

        let empty = service.create_expense(request("   ", 10.0, ExpenseCategory::Other)).await;
        assert!(matches!(empty, Err(ExpenseError::InvalidDescription)));

        let too_long = "א".repeat(MAX_DESCRIPTION_LENGTH + 1);
        let long = service.create_expense(request(&too_long, 10.0, ExpenseCategory::Other)).await;
        assert!(matches!(long, Err(ExpenseError::InvalidDescription)));

        let longest = "א".repeat(MAX_DESCRIPTION_LENGTH);
        assert!(service.create_expense(request(&longest, 10.0, ExpenseCategory::Other)).await.is_ok());

        let zero = service.create_expense(request("קפה", 0.0, ExpenseCategory::Other)).await;
        assert!(matches!(zero, Err(ExpenseError::AmountNotPositive)));

        let negative = service.create_expense(request("קפה", -3.0, ExpenseCategory::Other)).await;
        assert!(matches!(negative, Err(ExpenseError::AmountNotPositive)));

        let nan = service.create_expense(request("קפה", f64::NAN, ExpenseCategory::Other)).await;
        assert!(matches!(nan, Err(ExpenseError::NonFiniteValue)));
    }

    #[tokio::test]
    async fn test_list_expenses_newest_first_with_stats() {
        let service = ExpenseService::in_memory();
        service.create_expense(request("לחם", 12.0, ExpenseCategory::Groceries)).await.unwrap();
        service.create_expense(request("רב-קו", 30.0, ExpenseCategory::Transport)).await.unwrap();
        service.create_expense(request("סרט", 45.0, ExpenseCategory::Entertainment)).await.unwrap();

        let listing = service.list_expenses().await.unwrap();

        let ids: Vec<u64> = listing.expenses.iter().map(|expense| expense.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(listing.stats.transaction_count, 3);
        assert_eq!(listing.stats.total_expenses, 87.0);
        assert_eq!(listing.stats.cash_on_hand, 0.0);
    }

    #[tokio::test]
    async fn test_delete_expense() {
        let service = ExpenseService::in_memory();
        service.create_expense(request("לחם", 12.0, ExpenseCategory::Groceries)).await.unwrap();
        service.create_expense(request("חשמל", 300.0, ExpenseCategory::Utilities)).await.unwrap();

        let response = service.delete_expense(1).await.unwrap();
        assert_eq!(response.deleted_id, 1);

        let missing = service.delete_expense(1).await;
        assert!(matches!(missing, Err(ExpenseError::NotFound(1))));

        let listing = service.list_expenses().await.unwrap();
        assert_eq!(listing.expenses.len(), 1);
        assert_eq!(listing.stats.total_expenses, 300.0);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let service = ExpenseService::in_memory();
        service.create_expense(request("א", 1.0, ExpenseCategory::Other)).await.unwrap();
        service.delete_expense(1).await.unwrap();

        let next = service.create_expense(request("ב", 1.0, ExpenseCategory::Other)).await.unwrap();

        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_category_breakdown_in_order_of_first_appearance() {
        let service = ExpenseService::in_memory();
        service.create_expense(request("מונית", 50.0, ExpenseCategory::Transport)).await.unwrap();
        service.create_expense(request("ירקות", 20.0, ExpenseCategory::Groceries)).await.unwrap();
        service.create_expense(request("אוטובוס", 6.0, ExpenseCategory::Transport)).await.unwrap();

        let breakdown = service.category_breakdown().await.unwrap();

        assert_eq!(
            breakdown.categories,
            vec![
                CategoryTotal {
                    category: ExpenseCategory::Transport,
                    total: 56.0
                },
                CategoryTotal {
                    category: ExpenseCategory::Groceries,
                    total: 20.0
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_category_breakdown_empty() {
        let service = ExpenseService::in_memory();

        assert!(service.category_breakdown().await.unwrap().categories.is_empty());
    }

    #[tokio::test]
    async fn test_dashboard_values() {
        let service = ExpenseService::in_memory();
        service.create_expense(request("שכירות", 3500.0, ExpenseCategory::Rent)).await.unwrap();

        let stats = service.set_cash_on_hand(820.0).await.unwrap();
        assert_eq!(stats.cash_on_hand, 820.0);
        assert_eq!(stats.total_expenses, 3500.0);

        let stats = service.set_debt_owed(-15.0).await.unwrap();
        assert_eq!(stats.cash_on_hand, 820.0);
        assert_eq!(stats.debt_owed, -15.0);

        let rejected = service.set_cash_on_hand(f64::INFINITY).await;
        assert!(matches!(rejected, Err(ExpenseError::NonFiniteValue)));
        assert_eq!(service.list_expenses().await.unwrap().stats.cash_on_hand, 820.0);
    }
}
