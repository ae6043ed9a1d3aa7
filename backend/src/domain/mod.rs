//! # Domain Module
//!
//! Business logic for Savvy, independent of HTTP and of the storage backend.
//!
//! ## Module Organization
//!
//! - **conversation_session**: Gemini session that remembers the conversation
//! - **state_extractor**: Splits a model reply into display text and a state patch
//! - **state_merger**: Folds patches into the tracked financial state
//! - **chat_service**: Transcript, financial state and the awaiting-reply flag
//! - **expense_service**: Expense entries, category totals and dashboard values
//!
//! ## Business Rules
//!
//! - Only one chat exchange may be in flight at a time
//! - A reset reply clears the financial state and restarts the transcript
//! - A failed exchange leaves a fallback apology in the transcript, nothing else changes
//! - Expense amounts are positive, descriptions are 1 to 256 characters

pub mod chat_service;
pub mod conversation_session;
pub mod expense_service;
pub mod models;
pub mod state_extractor;
pub mod state_merger;

pub use chat_service::{ChatService, ChatServiceError};
pub use conversation_session::{ChatTransport, ConversationError, GeminiSession, SessionConfig};
pub use expense_service::ExpenseService;
