//! # REST API for Expenses
//!
//! Endpoints for listing, creating and deleting expenses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::CreateExpenseRequest;
use tracing::{error, info, warn};

use crate::domain::models::expense::ExpenseError;
use crate::AppState;

/// Translate an expense error into a response, logging it on the way
pub(crate) fn expense_error_response(context: &str, e: ExpenseError) -> axum::response::Response {
    match e {
        ExpenseError::NotFound(_) => {
            warn!("{}: {}", context, e);
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        e if e.is_validation() => {
            warn!("{}: {}", context, e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
        e => {
            error!("{}: {}", context, e);
            (StatusCode::INTERNAL_SERVER_ERROR, context.to_string()).into_response()
        }
    }
}

/// List all expenses, newest first, with dashboard stats
pub async fn list_expenses(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/expenses");

    match state.expense_service.list_expenses().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => expense_error_response("Failed to list expenses", e),
    }
}

/// Create a new expense
pub async fn create_expense(
    State(state): State<AppState>,
    Json(request): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    info!("POST /api/expenses - request: {:?}", request);

    match state.expense_service.create_expense(request).await {
        Ok(expense) => (StatusCode::CREATED, Json(expense)).into_response(),
        Err(e) => expense_error_response("Failed to create expense", e),
    }
}

/// Delete a single expense
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<u64>,
) -> impl IntoResponse {
    info!("DELETE /api/expenses/{}", expense_id);

    match state.expense_service.delete_expense(expense_id).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => expense_error_response("Failed to delete expense", e),
    }
}

/// Totals per category for the chart
pub async fn get_category_breakdown(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/expenses/categories");

    match state.expense_service.category_breakdown().await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => expense_error_response("Failed to compute category totals", e),
    }
}
