use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::models::expense::{DashboardValues, DomainExpense};
use crate::storage::traits::{DashboardStorage, ExpenseStorage};

#[derive(Debug)]
struct Inner {
    expenses: Vec<DomainExpense>,
    next_id: u64,
    dashboard: DashboardValues,
}

/// Process-lifetime expense store
#[derive(Debug)]
pub struct InMemoryExpenseRepository {
    inner: RwLock<Inner>,
}

impl InMemoryExpenseRepository {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                expenses: Vec::new(),
                next_id: 1,
                dashboard: DashboardValues::default(),
            }),
        }
    }
}

impl Default for InMemoryExpenseRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpenseStorage for InMemoryExpenseRepository {
    async fn next_expense_id(&self) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        Ok(id)
    }

    async fn store_expense(&self, expense: &DomainExpense) -> Result<()> {
        debug!("Storing expense {}", expense.id);
        self.inner.write().await.expenses.push(expense.clone());
        Ok(())
    }

    async fn list_expenses(&self) -> Result<Vec<DomainExpense>> {
        Ok(self.inner.read().await.expenses.clone())
    }

    async fn delete_expense(&self, expense_id: u64) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.expenses.len();
        inner.expenses.retain(|expense| expense.id != expense_id);
        Ok(inner.expenses.len() < before)
    }
}

#[async_trait]
impl DashboardStorage for InMemoryExpenseRepository {
    async fn get_dashboard_values(&self) -> Result<DashboardValues> {
        Ok(self.inner.read().await.dashboard)
    }

    async fn store_dashboard_values(&self, values: &DashboardValues) -> Result<()> {
        self.inner.write().await.dashboard = *values;
        Ok(())
    }
}
