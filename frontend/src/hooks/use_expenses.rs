use shared::{CategoryTotal, CreateExpenseRequest, DashboardStats, Expense};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::{ApiClient, Logger};

#[derive(Clone, Default, PartialEq)]
pub struct ExpenseState {
    /// Newest first
    pub expenses: Vec<Expense>,
    pub stats: DashboardStats,
    pub categories: Vec<CategoryTotal>,
    pub loading: bool,
    pub error: Option<String>,
}

pub struct UseExpensesResult {
    pub state: ExpenseState,
    pub actions: UseExpensesActions,
}

#[derive(Clone, PartialEq)]
pub struct UseExpensesActions {
    pub add_expense: Callback<CreateExpenseRequest>,
    pub delete_expense: Callback<u64>,
    pub set_cash_on_hand: Callback<f64>,
    pub set_debt_owed: Callback<f64>,
}

#[hook]
pub fn use_expenses(api_client: &ApiClient) -> UseExpensesResult {
    let expenses = use_state(Vec::<Expense>::new);
    let stats = use_state(DashboardStats::default);
    let categories = use_state(Vec::<CategoryTotal>::new);
    let loading = use_state(|| true);
    let error = use_state(|| None::<String>);

    let refresh = {
        let api_client = api_client.clone();
        let expenses = expenses.clone();
        let stats = stats.clone();
        let categories = categories.clone();
        let loading = loading.clone();
        let error = error.clone();

        use_callback((), move |_, _| {
            let api_client = api_client.clone();
            let expenses = expenses.clone();
            let stats = stats.clone();
            let categories = categories.clone();
            let loading = loading.clone();
            let error = error.clone();

            spawn_local(async move {
                loading.set(true);

                match api_client.get_expenses().await {
                    Ok(listing) => {
                        expenses.set(listing.expenses);
                        stats.set(listing.stats);
                    }
                    Err(e) => {
                        Logger::error_with_component("use_expenses", &format!("Failed to fetch expenses: {}", e));
                        error.set(Some(e));
                    }
                }

                match api_client.get_category_breakdown().await {
                    Ok(breakdown) => categories.set(breakdown.categories),
                    Err(e) => {
                        Logger::error_with_component("use_expenses", &format!("Failed to fetch categories: {}", e));
                    }
                }

                loading.set(false);
            });
        })
    };

    {
        let refresh = refresh.clone();
        use_effect_with((), move |_| {
            refresh.emit(());
            || ()
        });
    }

    let add_expense = {
        let api_client = api_client.clone();
        let error = error.clone();
        let refresh = refresh.clone();

        use_callback((), move |request: CreateExpenseRequest, _| {
            let api_client = api_client.clone();
            let error = error.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                error.set(None);
                match api_client.create_expense(request).await {
                    Ok(expense) => {
                        Logger::info_with_component("use_expenses", &format!("Added expense {}", expense.id));
                        refresh.emit(());
                    }
                    Err(e) => error.set(Some(e)),
                }
            });
        })
    };

    let delete_expense = {
        let api_client = api_client.clone();
        let error = error.clone();
        let refresh = refresh.clone();

        use_callback((), move |expense_id: u64, _| {
            let api_client = api_client.clone();
            let error = error.clone();
            let refresh = refresh.clone();

            spawn_local(async move {
                match api_client.delete_expense(expense_id).await {
                    Ok(_) => refresh.emit(()),
                    Err(e) => {
                        Logger::warn_with_component("use_expenses", &format!("Delete failed: {}", e));
                        error.set(Some(e));
                    }
                }
            });
        })
    };

    let set_cash_on_hand = {
        let api_client = api_client.clone();
        let stats = stats.clone();
        let error = error.clone();

        use_callback((), move |value: f64, _| {
            let api_client = api_client.clone();
            let stats = stats.clone();
            let error = error.clone();

            spawn_local(async move {
                match api_client.set_cash_on_hand(value).await {
                    Ok(updated) => stats.set(updated),
                    Err(e) => error.set(Some(e)),
                }
            });
        })
    };

    let set_debt_owed = {
        let api_client = api_client.clone();
        let stats = stats.clone();
        let error = error.clone();

        use_callback((), move |value: f64, _| {
            let api_client = api_client.clone();
            let stats = stats.clone();
            let error = error.clone();

            spawn_local(async move {
                match api_client.set_debt_owed(value).await {
                    Ok(updated) => stats.set(updated),
                    Err(e) => error.set(Some(e)),
                }
            });
        })
    };

    UseExpensesResult {
        state: ExpenseState {
            expenses: (*expenses).clone(),
            stats: (*stats).clone(),
            categories: (*categories).clone(),
            loading: *loading,
            error: (*error).clone(),
        },
        actions: UseExpensesActions {
            add_expense,
            delete_expense,
            set_cash_on_hand,
            set_debt_owed,
        },
    }
}
