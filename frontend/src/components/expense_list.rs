use chrono::DateTime;
use shared::{format_shekels, Expense};
use yew::prelude::*;

/// Day.month.year, the way dates are written in Israel
pub fn format_expense_date(rfc3339: &str) -> String {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|date| date.format("%-d.%-m.%Y").to_string())
        .unwrap_or_else(|_| rfc3339.to_string())
}

#[derive(Properties, PartialEq)]
pub struct ExpenseListProps {
    /// Newest first
    pub expenses: Vec<Expense>,
    pub on_delete: Callback<u64>,
}

#[function_component(ExpenseList)]
pub fn expense_list(props: &ExpenseListProps) -> Html {
    if props.expenses.is_empty() {
        return html! {
            <p class="empty-message">{"אין עדיין הוצאות. נסו להוסיף אחת!"}</p>
        };
    }

    html! {
        <div class="expense-list">
            {for props.expenses.iter().map(|expense| {
                let on_delete = {
                    let on_delete = props.on_delete.clone();
                    let expense_id = expense.id;
                    Callback::from(move |_: MouseEvent| on_delete.emit(expense_id))
                };

                html! {
                    <div class="expense-item" key={expense.id}>
                        <div>
                            <p class="expense-description">{&expense.description}</p>
                            <p class="expense-meta">
                                {format!("{} • {}", expense.category.label(), format_expense_date(&expense.date))}
                            </p>
                        </div>
                        <div class="expense-actions">
                            <p class="expense-amount">{format_shekels(expense.amount)}</p>
                            <button class="delete-button" title="מחק" onclick={on_delete}>{"🗑"}</button>
                        </div>
                    </div>
                }
            })}
        </div>
    }
}
