//! # IO Module
//!
//! Adapter layer between the browser and the domain services: REST handlers,
//! DTO mapping and translation of domain errors into HTTP status codes.
//!
//! ## Supported Operations
//!
//! - **GET /api/chat**: Current transcript and financial state
//! - **POST /api/chat/messages**: Send a chat message
//! - **GET/POST /api/expenses**: List and create expenses
//! - **DELETE /api/expenses/:id**: Delete an expense
//! - **GET /api/expenses/categories**: Totals per category
//! - **PUT /api/dashboard/...**: Edit cash on hand and debt owed
//! - **POST /api/logs**: Frontend log forwarding

pub mod rest;

pub use rest::*;
