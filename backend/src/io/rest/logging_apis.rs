//! Forwarding of frontend log lines into the server log.

use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LogRequest {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub success: bool,
}

pub async fn log_message(
    State(_app_state): State<AppState>,
    Json(request): Json<LogRequest>,
) -> Result<Json<LogResponse>, StatusCode> {
    let component = request.component.as_deref().unwrap_or("frontend");

    match request.level.to_lowercase().as_str() {
        "debug" => debug!(target: "frontend", component = %component, "{}", request.message),
        "warn" => warn!(target: "frontend", component = %component, "{}", request.message),
        "error" => error!(target: "frontend", component = %component, "{}", request.message),
        // unknown levels are logged as info
        _ => info!(target: "frontend", component = %component, "{}", request.message),
    }

    Ok(Json(LogResponse { success: true }))
}
