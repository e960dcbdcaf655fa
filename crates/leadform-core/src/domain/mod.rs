//! Domain layer
//!
//! Form configuration model: fields, layout, consents, style and the
//! saved-configuration record.

pub mod aggregates;
pub mod value_objects;

pub use aggregates::*;
pub use value_objects::*;

/// Payload keys the runtime writes itself; fields may not use them
pub const RESERVED_KEYS: [&str; 5] = [
    "privacy_consent",
    "terms_consent",
    "ip_address",
    "user_agent",
    "submitted_at",
];
