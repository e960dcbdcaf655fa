//! Outbound ports
//!
//! Infrastructure implements these; the submission pipeline and the form
//! service only see the traits.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::aggregates::SavedFormConfig;
use crate::domain::value_objects::EntityId;
use crate::submission::{LeadRow, WebhookPayload};

/// Saved form configuration repository, partitioned by tenant
#[async_trait]
pub trait FormConfigRepository: Send + Sync {
    /// Find a saved form by tenant and id
    async fn find_by_id(
        &self,
        tenant_id: &str,
        id: &EntityId,
    ) -> Result<Option<SavedFormConfig>, RepositoryError>;

    /// All saved forms of a tenant, oldest first
    async fn list_by_tenant(&self, tenant_id: &str) -> Result<Vec<SavedFormConfig>, RepositoryError>;

    /// Insert or update
    async fn save(&self, form: &SavedFormConfig) -> Result<(), RepositoryError>;

    /// Delete; `NotFound` when absent
    async fn delete(&self, tenant_id: &str, id: &EntityId) -> Result<(), RepositoryError>;
}

/// Hosted row store receiving submitted leads
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn insert(&self, row: &LeadRow) -> Result<(), RepositoryError>;
}

/// Public IP lookup
#[async_trait]
pub trait IpLookup: Send + Sync {
    async fn lookup(&self) -> Result<String, SideChannelError>;
}

/// Outgoing webhook delivery
#[async_trait]
pub trait WebhookNotifier: Send + Sync {
    async fn notify(&self, url: &str, payload: &WebhookPayload) -> Result<(), SideChannelError>;
}

/// Repository error type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    NotFound,
    ConnectionError(String),
    QueryError(String),
    SerializationError(String),
}

impl std::error::Error for RepositoryError {}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Entity not found"),
            Self::ConnectionError(e) => write!(f, "Connection error: {}", e),
            Self::QueryError(e) => write!(f, "Query error: {}", e),
            Self::SerializationError(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

/// Failure of a best-effort side channel (IP lookup, webhook)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SideChannelError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Decode(String),
}
