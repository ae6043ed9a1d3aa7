//! # REST API for the Dashboard
//!
//! Endpoints for the two user-editable dashboard values.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use shared::UpdateDashboardValueRequest;
use tracing::info;

use crate::io::rest::expense_apis::expense_error_response;
use crate::AppState;

pub async fn update_cash_on_hand(
    State(state): State<AppState>,
    Json(request): Json<UpdateDashboardValueRequest>,
) -> impl IntoResponse {
    info!("PUT /api/dashboard/cash-on-hand - request: {:?}", request);

    match state.expense_service.set_cash_on_hand(request.value).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => expense_error_response("Failed to update cash on hand", e),
    }
}

pub async fn update_debt_owed(
    State(state): State<AppState>,
    Json(request): Json<UpdateDashboardValueRequest>,
) -> impl IntoResponse {
    info!("PUT /api/dashboard/debt-owed - request: {:?}", request);

    match state.expense_service.set_debt_owed(request.value).await {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(e) => expense_error_response("Failed to update debt owed", e),
    }
}
