//! LeadForm core
//!
//! Generates self-contained, embeddable lead forms: one HTML document with
//! a scoped stylesheet and an inline module script that validates the form
//! step by step and submits leads to a hosted row store.
//!
//! ## Architecture
//!
//! - **Domain Layer**: service fields, form configuration, saved forms
//! - **Generator**: layout engine, field renderer, consent block,
//!   markup/style assembler
//! - **Runtime**: the embedded browser script and a Rust model of its step
//!   machine
//! - **Submission**: lead persistence with best-effort IP lookup and webhook
//! - **Ports / Infrastructure**: repository and HTTP adapters
//! - **Application Layer**: saved-form use cases
//!
//! ## Example
//!
//! ```
//! use leadform_core::{ConnectionSettings, FieldDefinition, FieldType, FormConfig, FormGenerator, ServiceDefinition};
//!
//! let service = ServiceDefinition::new(
//!     "consulenza",
//!     vec![FieldDefinition::new("nome", "Nome", FieldType::Text).required()],
//! );
//! let connection = ConnectionSettings::new("https://db.example.com", "anon-key").unwrap();
//! let generator = FormGenerator::new(connection).unwrap();
//!
//! let doc = generator.generate(&service, &FormConfig::new("consulenza", "tenant-1")).unwrap();
//! assert_eq!(doc.total_steps, 1);
//! assert!(doc.html.starts_with("<!DOCTYPE html>"));
//! ```

pub mod application;
pub mod domain;
pub mod generator;
pub mod infrastructure;
pub mod ports;
pub mod runtime;
pub mod submission;

// Re-exports for convenience
pub use application::{FormService, SaveFormCommand, UpdateFormCommand};
pub use domain::aggregates::{ConfigError, FormConfig, IntegrationConfig, SavedFormConfig, ServiceDefinition};
pub use domain::value_objects::{
    Color, ConnectionSettings, ConsentConfig, ConsentKind, EntityId, FieldDefinition, FieldType,
    LayoutAssignment, StyleConfig, ValueError, WidthShare,
};
pub use generator::{FormGenerator, GeneratedDocument, GeneratorError, WrapperId};
pub use ports::inbound::{FormUseCases, UseCaseError};
pub use ports::outbound::{FormConfigRepository, IpLookup, LeadStore, RepositoryError, WebhookNotifier};
pub use runtime::{FormModel, FormSession};
pub use submission::{FormPayload, LeadContext, SubmissionOutcome, SubmissionPipeline};
