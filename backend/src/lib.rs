//! # Savvy Backend
//!
//! HTTP server for the Savvy personal-finance assistant. It owns the Gemini
//! credential and the conversation, so the browser never talks to the model
//! directly.
//!
//! ## Architecture
//!
//! ```text
//! UI Layer (Yew frontend)
//!     ↓
//! IO Layer (REST API, handlers)
//!     ↓
//! Domain Layer (chat controller, expense service)
//!     ↓
//! Storage Layer (in-memory)        Gemini REST API
//! ```

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::info;

pub use config::AppConfig;
use domain::{ChatService, ChatTransport, ExpenseService, GeminiSession};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub chat_service: ChatService,
    pub expense_service: ExpenseService,
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &AppConfig) -> AppState {
    let session = if config.has_api_key() {
        info!("Setting up chat session with model {}", config.model);
        GeminiSession::start(config.api_key.clone(), &config.model, &config.gemini_base_url)
            .map(|session| Arc::new(session) as Arc<dyn ChatTransport>)
    } else {
        None
    };

    info!("Setting up domain model");
    AppState {
        chat_service: ChatService::new(session),
        expense_service: ExpenseService::in_memory(),
    }
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState, config: &AppConfig) -> Result<Router> {
    let origin = config
        .frontend_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("invalid frontend origin: {}", config.frontend_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/chat", get(io::get_chat_state))
        .route("/chat/messages", post(io::send_message))
        .route("/expenses", get(io::list_expenses).post(io::create_expense))
        .route("/expenses/categories", get(io::get_category_breakdown))
        .route("/expenses/:id", delete(io::delete_expense))
        .route("/dashboard/cash-on-hand", put(io::update_cash_on_hand))
        .route("/dashboard/debt-owed", put(io::update_debt_owed))
        .route("/logs", post(io::log_message));

    Ok(Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(cors)
        .with_state(app_state))
}
