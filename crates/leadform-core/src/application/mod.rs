//! Application layer
//!
//! Orchestrates generation and the saved-form lifecycle.

pub mod commands;
pub mod dto;

pub use commands::FormService;
pub use dto::*;
