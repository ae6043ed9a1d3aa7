//! # REST API Interface Layer
//!
//! HTTP endpoints for Savvy. Handlers are a pure translation layer: they log the
//! request, call one service method and map the outcome onto a status code.

pub mod chat_apis;
pub mod dashboard_apis;
pub mod expense_apis;
pub mod logging_apis;
pub mod mappers;

pub use chat_apis::*;
pub use dashboard_apis::*;
pub use expense_apis::*;
pub use logging_apis::*;
