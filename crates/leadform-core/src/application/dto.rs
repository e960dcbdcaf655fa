//! Data Transfer Objects (DTOs)

use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{FormConfig, ServiceDefinition};
use crate::domain::value_objects::EntityId;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SaveFormCommand {
    pub tenant_id: String,
    pub name: String,
    pub service: ServiceDefinition,
    pub config: FormConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateFormCommand {
    pub tenant_id: String,
    pub id: EntityId,
    /// Keeps the current name when absent
    pub name: Option<String>,
    pub service: ServiceDefinition,
    pub config: FormConfig,
}
