//! Aggregates module

pub mod form_config;
pub mod saved_form;
pub mod service;

pub use form_config::{ConfigError, FormConfig, IntegrationConfig};
pub use saved_form::SavedFormConfig;
pub use service::ServiceDefinition;
