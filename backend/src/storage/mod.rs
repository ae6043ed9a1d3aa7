//! # Storage Module
//!
//! Storage abstractions and the in-memory backend. Nothing is persisted beyond
//! the lifetime of the server process.

pub mod memory;
pub mod traits;

pub use memory::InMemoryExpenseRepository;
pub use traits::*;
