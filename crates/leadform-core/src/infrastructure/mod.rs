//! Infrastructure layer
//!
//! Concrete implementations of the outbound ports.

pub mod http;
pub mod persistence;

pub use http::{http_pipeline, HttpIpLookup, HttpWebhookNotifier, RestLeadStore};
pub use persistence::{FileFormConfigRepository, InMemoryFormConfigRepository, InMemoryLeadStore};
