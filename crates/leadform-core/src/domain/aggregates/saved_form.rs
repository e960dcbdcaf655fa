//! Saved form configuration
//!
//! Persisted authoring state (not rendered HTML) so a form can be re-edited
//! and re-generated later.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::{FormConfig, ServiceDefinition};
use crate::domain::value_objects::EntityId;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedFormConfig {
    id: EntityId,
    tenant_id: String,
    name: String,
    service: ServiceDefinition,
    config: FormConfig,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SavedFormConfig {
    pub fn create(
        tenant_id: impl Into<String>,
        name: impl Into<String>,
        service: ServiceDefinition,
        config: FormConfig,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(),
            tenant_id: tenant_id.into(),
            name: name.into(),
            service,
            config,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &EntityId { &self.id }
    pub fn tenant_id(&self) -> &str { &self.tenant_id }
    pub fn name(&self) -> &str { &self.name }
    pub fn service(&self) -> &ServiceDefinition { &self.service }
    pub fn config(&self) -> &FormConfig { &self.config }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.touch();
    }

    pub fn replace(&mut self, service: ServiceDefinition, config: FormConfig) {
        self.service = service;
        self.config = config;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_bumps_updated_at() {
        let service = ServiceDefinition::new("svc", vec![]);
        let mut saved = SavedFormConfig::create(
            "tenant-1",
            "Landing",
            service.clone(),
            FormConfig::new("svc", "tenant-1"),
        );
        let created = saved.created_at();

        let mut config = FormConfig::new("svc", "tenant-1");
        config.multi_step = true;
        saved.replace(service, config);

        assert!(saved.config().multi_step);
        assert_eq!(saved.created_at(), created);
        assert!(saved.updated_at() >= created);
    }

    #[test]
    fn test_serde_round_trip_keeps_identity() {
        let saved = SavedFormConfig::create(
            "tenant-1",
            "Landing",
            ServiceDefinition::new("svc", vec![]),
            FormConfig::new("svc", "tenant-1"),
        );
        let json = serde_json::to_string(&saved).unwrap();
        let back: SavedFormConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id(), saved.id());
        assert_eq!(back.name(), "Landing");
    }
}
