use gloo::net::http::Request;
use serde::Serialize;
use wasm_bindgen_futures::spawn_local;

use super::api::DEFAULT_BASE_URL;

#[derive(Debug, Serialize)]
struct LogRequest {
    level: String,
    message: String,
    component: Option<String>,
}

/// Forwards frontend log lines to the backend log
pub struct Logger;

impl Logger {
    pub fn info_with_component(component: &str, message: &str) {
        Self::log("info", message, Some(component.to_string()));
    }

    pub fn warn_with_component(component: &str, message: &str) {
        Self::log("warn", message, Some(component.to_string()));
    }

    pub fn error_with_component(component: &str, message: &str) {
        gloo::console::error!(format!("[{}] {}", component, message));
        Self::log("error", message, Some(component.to_string()));
    }

    fn log(level: &str, message: &str, component: Option<String>) {
        let request = LogRequest {
            level: level.to_string(),
            message: message.to_string(),
            component,
        };

        // fire and forget
        spawn_local(async move {
            let Ok(request) = Request::post(&format!("{}/api/logs", DEFAULT_BASE_URL)).json(&request) else {
                return;
            };
            let _ = request.send().await;
        });
    }
}
