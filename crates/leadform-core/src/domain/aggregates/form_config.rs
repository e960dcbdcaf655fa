//! Form configuration aggregate
//!
//! Everything the generator needs besides the service's fields and the
//! storage connection: layout, consents, style and integration targets.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use crate::domain::aggregates::ServiceDefinition;
use crate::domain::value_objects::{
    parse_http_url, ConsentConfig, LayoutAssignment, StyleConfig, ValueError,
};
use crate::domain::RESERVED_KEYS;

/// Where submitted leads go besides the row store
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    pub tenant_id: String,
    pub thank_you_url: Option<String>,
    pub webhook_url: Option<String>,
}

impl IntegrationConfig {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            ..Default::default()
        }
    }

    pub fn thank_you_url(&self) -> Option<&str> {
        self.thank_you_url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

/// Authoring configuration of one generated form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Name of the service whose fields are rendered
    pub service: String,
    #[serde(default)]
    pub multi_step: bool,
    /// Field name -> layout; entries for unknown fields are ignored
    #[serde(default)]
    pub layout: BTreeMap<String, LayoutAssignment>,
    #[serde(default)]
    pub consent: ConsentConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub integration: IntegrationConfig,
}

impl FormConfig {
    pub fn new(service: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            multi_step: false,
            layout: BTreeMap::new(),
            consent: ConsentConfig::default(),
            style: StyleConfig::default(),
            integration: IntegrationConfig::new(tenant_id),
        }
    }

    pub fn assign(&mut self, field: impl Into<String>, assignment: LayoutAssignment) {
        self.layout.insert(field.into(), assignment);
    }

    /// Layout of a field, falling back to step 1 / full width
    pub fn assignment(&self, field: &str) -> LayoutAssignment {
        self.layout.get(field).copied().unwrap_or_default()
    }

    /// Check the configuration against the service it renders
    pub fn validate(&self, service: &ServiceDefinition) -> Result<(), ConfigError> {
        if service.name != self.service {
            return Err(ConfigError::ServiceMismatch {
                expected: self.service.clone(),
                found: service.name.clone(),
            });
        }

        if self.integration.tenant_id.trim().is_empty() {
            return Err(ConfigError::MissingTenant);
        }

        let mut seen = HashSet::new();
        for field in &service.fields {
            if field.name.trim().is_empty() {
                return Err(ConfigError::EmptyFieldName(field.label.clone()));
            }
            if RESERVED_KEYS.contains(&field.name.as_str()) {
                return Err(ConfigError::ReservedFieldName(field.name.clone()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateFieldName(field.name.clone()));
            }
            if field.field_type.uses_options() && field.rendered_options().all(str::is_empty) {
                return Err(ConfigError::MissingOptions(field.name.clone()));
            }
        }

        if let Some(url) = self.integration.thank_you_url() {
            parse_http_url("thank-you url", url)?;
        }
        if let Some(url) = self.integration.webhook_url() {
            parse_http_url("webhook url", url)?;
        }
        for url in self.consent.urls() {
            parse_http_url("consent url", url)?;
        }

        Ok(())
    }
}

/// Configuration problems detected before generation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("form is configured for service `{expected}` but was given `{found}`")]
    ServiceMismatch { expected: String, found: String },

    #[error("tenant id is required")]
    MissingTenant,

    #[error("field `{0}` has an empty name")]
    EmptyFieldName(String),

    #[error("field name `{0}` is reserved for submission metadata")]
    ReservedFieldName(String),

    #[error("field name `{0}` is used more than once")]
    DuplicateFieldName(String),

    #[error("choice field `{0}` has no options")]
    MissingOptions(String),

    #[error(transparent)]
    Value(#[from] ValueError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{FieldDefinition, FieldType};

    fn service() -> ServiceDefinition {
        ServiceDefinition::new(
            "consulenza",
            vec![
                FieldDefinition::new("nome", "Nome", FieldType::Text).required(),
                FieldDefinition::new("email", "Email", FieldType::Email),
            ],
        )
    }

    #[test]
    fn test_valid_config() {
        let config = FormConfig::new("consulenza", "tenant-1");
        assert!(config.validate(&service()).is_ok());
    }

    #[test]
    fn test_missing_assignment_defaults() {
        let config = FormConfig::new("consulenza", "tenant-1");
        assert_eq!(config.assignment("nome"), LayoutAssignment::default());
    }

    #[test]
    fn test_service_mismatch() {
        let config = FormConfig::new("other", "tenant-1");
        assert!(matches!(
            config.validate(&service()),
            Err(ConfigError::ServiceMismatch { .. })
        ));
    }

    #[test]
    fn test_reserved_and_duplicate_names() {
        let config = FormConfig::new("consulenza", "tenant-1");

        let mut svc = service();
        svc.fields.push(FieldDefinition::new("privacy_consent", "Privacy", FieldType::Checkbox));
        assert_eq!(
            config.validate(&svc),
            Err(ConfigError::ReservedFieldName("privacy_consent".into()))
        );

        let mut svc = service();
        svc.fields.push(FieldDefinition::new("email", "Email 2", FieldType::Email));
        assert_eq!(
            config.validate(&svc),
            Err(ConfigError::DuplicateFieldName("email".into()))
        );
    }

    #[test]
    fn test_choice_fields_need_options() {
        let config = FormConfig::new("consulenza", "tenant-1");

        for field in [
            FieldDefinition::new("scelta", "Scelta", FieldType::Radio).required(),
            FieldDefinition::new("scelta", "Scelta", FieldType::Select).with_options(["  ", ""]),
        ] {
            let mut svc = service();
            svc.fields.push(field);
            assert_eq!(
                config.validate(&svc),
                Err(ConfigError::MissingOptions("scelta".into()))
            );
        }

        let mut svc = service();
        svc.fields.push(
            FieldDefinition::new("scelta", "Scelta", FieldType::Radio).with_options([" ", "Sì"]),
        );
        assert!(config.validate(&svc).is_ok());
    }

    #[test]
    fn test_missing_tenant() {
        let config = FormConfig::new("consulenza", "  ");
        assert_eq!(config.validate(&service()), Err(ConfigError::MissingTenant));
    }

    #[test]
    fn test_bad_webhook_url() {
        let mut config = FormConfig::new("consulenza", "tenant-1");
        config.integration.webhook_url = Some("javascript:alert(1)".into());
        assert!(matches!(config.validate(&service()), Err(ConfigError::Value(_))));
    }

    #[test]
    fn test_blank_optional_urls_are_ignored() {
        let mut config = FormConfig::new("consulenza", "tenant-1");
        config.integration.thank_you_url = Some("".into());
        assert!(config.validate(&service()).is_ok());
        assert_eq!(config.integration.thank_you_url(), None);
    }
}
