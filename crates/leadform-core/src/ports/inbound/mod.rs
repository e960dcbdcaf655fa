//! Inbound ports (Use case traits)

use async_trait::async_trait;

use crate::application::dto::{SaveFormCommand, UpdateFormCommand};
use crate::domain::aggregates::{FormConfig, SavedFormConfig, ServiceDefinition};
use crate::domain::value_objects::EntityId;
use crate::generator::GeneratedDocument;

/// Form generation and saved-form management
#[async_trait]
pub trait FormUseCases: Send + Sync {
    /// Render a document from an ad-hoc service and configuration
    async fn generate(
        &self,
        service: &ServiceDefinition,
        config: &FormConfig,
    ) -> Result<GeneratedDocument, UseCaseError>;

    async fn save_form(&self, command: SaveFormCommand) -> Result<SavedFormConfig, UseCaseError>;

    async fn update_form(&self, command: UpdateFormCommand) -> Result<SavedFormConfig, UseCaseError>;

    async fn get_form(&self, tenant_id: &str, id: &EntityId) -> Result<SavedFormConfig, UseCaseError>;

    async fn list_forms(&self, tenant_id: &str) -> Result<Vec<SavedFormConfig>, UseCaseError>;

    async fn delete_form(&self, tenant_id: &str, id: &EntityId) -> Result<(), UseCaseError>;

    /// Render a saved form from its stored service snapshot
    async fn render_form(&self, tenant_id: &str, id: &EntityId) -> Result<GeneratedDocument, UseCaseError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UseCaseError {
    NotFound(String),
    ValidationError(String),
    /// Generation requested but no storage connection is configured
    Unavailable(String),
    RepositoryError(String),
}

impl std::error::Error for UseCaseError {}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(e) => write!(f, "Not found: {}", e),
            Self::ValidationError(e) => write!(f, "Validation error: {}", e),
            Self::Unavailable(e) => write!(f, "Unavailable: {}", e),
            Self::RepositoryError(e) => write!(f, "Repository error: {}", e),
        }
    }
}
