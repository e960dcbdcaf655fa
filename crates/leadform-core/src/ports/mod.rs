//! Ports module (Hexagonal Architecture)
//!
//! Interfaces to the row store, the side channels and the saved-form store.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
