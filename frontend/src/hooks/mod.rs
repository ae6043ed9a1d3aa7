pub mod use_chat;
pub mod use_expenses;
