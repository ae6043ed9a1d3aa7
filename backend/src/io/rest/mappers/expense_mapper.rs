use crate::domain::models::expense::DomainExpense;
use shared::Expense as SharedExpense;

pub struct ExpenseMapper;

impl ExpenseMapper {
    pub fn to_dto(domain: DomainExpense) -> SharedExpense {
        SharedExpense {
            id: domain.id,
            description: domain.description,
            amount: domain.amount,
            category: domain.category,
            date: domain.created_at,
        }
    }
}
