//! Form generator
//!
//! Layout Engine -> Field Renderer -> Consent Block Builder ->
//! Markup/Style Assembler. Synchronous and stateless; each call draws a
//! fresh wrapper id so several forms can live on one host page.

pub mod assembler;
pub mod consent;
pub mod fields;
pub mod layout;
pub mod markup;
pub mod style;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::value_objects::{ConnectionSettings, ValueError};
use crate::domain::{ConfigError, FormConfig, ServiceDefinition};
use crate::generator::assembler::Assembly;
use crate::generator::layout::FormLayout;
use crate::runtime::{module_source, RuntimeConstants};

/// Prefix of every wrapper id
pub const WRAPPER_PREFIX: &str = "leadform-";

/// Id of the element every generated rule and script is scoped to
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct WrapperId(String);

impl WrapperId {
    pub fn generate() -> Self {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{WRAPPER_PREFIX}{}", &simple[..12]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WrapperId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One self-contained HTML document
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GeneratedDocument {
    pub wrapper_id: WrapperId,
    pub total_steps: u32,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("invalid form configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid connection settings: {0}")]
    Connection(ValueError),

    #[error("failed to serialize runtime constants: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct FormGenerator {
    connection: ConnectionSettings,
}

impl FormGenerator {
    pub fn new(connection: ConnectionSettings) -> Result<Self, GeneratorError> {
        connection.validate().map_err(GeneratorError::Connection)?;
        Ok(Self { connection })
    }

    pub fn connection(&self) -> &ConnectionSettings {
        &self.connection
    }

    pub fn generate(
        &self,
        service: &ServiceDefinition,
        config: &FormConfig,
    ) -> Result<GeneratedDocument, GeneratorError> {
        self.generate_with_id(WrapperId::generate(), service, config)
    }

    /// Same as [`generate`](Self::generate) with a caller-chosen wrapper id
    pub fn generate_with_id(
        &self,
        wrapper_id: WrapperId,
        service: &ServiceDefinition,
        config: &FormConfig,
    ) -> Result<GeneratedDocument, GeneratorError> {
        config.validate(service)?;

        let layout = FormLayout::plan(&service.fields, &config.layout, config.multi_step);
        let constants = RuntimeConstants::new(wrapper_id.as_str(), config, &self.connection);

        let html = Assembly {
            wrapper_id: wrapper_id.as_str(),
            layout: &layout,
            config,
            module_source: module_source(&constants)?,
        }
        .document()
        .render();

        debug!(
            wrapper_id = %wrapper_id,
            service = %service.name,
            total_steps = layout.total_steps(),
            bytes = html.len(),
            "generated form document"
        );

        Ok(GeneratedDocument {
            wrapper_id,
            total_steps: layout.total_steps(),
            html,
        })
    }
}
