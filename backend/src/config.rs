//! Command-line and environment configuration for the server.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::domain::conversation_session::{DEFAULT_GEMINI_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Clone, Parser)]
#[command(name = "savvy-backend")]
#[command(about = "Savvy personal-finance chat assistant")]
pub struct AppConfig {
    /// Gemini API key; chat is disabled when absent
    #[arg(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model name
    #[arg(long, env = "SAVVY_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the Gemini REST API
    #[arg(long, env = "SAVVY_GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    /// Address the HTTP server listens on
    #[arg(long, env = "SAVVY_BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind_addr: SocketAddr,

    /// Origin allowed to call the API from the browser
    #[arg(long, env = "SAVVY_FRONTEND_ORIGIN", default_value = "http://localhost:8080")]
    pub frontend_origin: String,

    /// Directory with the built frontend
    #[arg(long, env = "SAVVY_STATIC_DIR", default_value = "../frontend/dist")]
    pub static_dir: PathBuf,
}

impl AppConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}
