//! Form application service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::application::dto::{SaveFormCommand, UpdateFormCommand};
use crate::domain::aggregates::{FormConfig, SavedFormConfig, ServiceDefinition};
use crate::domain::value_objects::EntityId;
use crate::generator::{FormGenerator, GeneratedDocument, GeneratorError};
use crate::ports::inbound::{FormUseCases, UseCaseError};
use crate::ports::outbound::{FormConfigRepository, RepositoryError};

pub struct FormService {
    repo: Arc<dyn FormConfigRepository>,
    generator: Option<FormGenerator>,
}

impl FormService {
    /// Without a generator, saved forms can be managed but not rendered
    pub fn new(repo: Arc<dyn FormConfigRepository>, generator: Option<FormGenerator>) -> Self {
        Self { repo, generator }
    }

    fn generator(&self) -> Result<&FormGenerator, UseCaseError> {
        self.generator
            .as_ref()
            .ok_or_else(|| UseCaseError::Unavailable("storage connection is not configured".into()))
    }

    /// The path tenant owns the form: an empty config tenant is filled in,
    /// a different one is rejected
    fn prepare(
        tenant_id: &str,
        service: &ServiceDefinition,
        mut config: FormConfig,
    ) -> Result<FormConfig, UseCaseError> {
        let configured = config.integration.tenant_id.trim();
        if configured.is_empty() {
            config.integration.tenant_id = tenant_id.to_string();
        } else if configured != tenant_id {
            return Err(UseCaseError::ValidationError(format!(
                "configuration belongs to tenant {}, not {}",
                configured, tenant_id
            )));
        }
        config
            .validate(service)
            .map_err(|e| UseCaseError::ValidationError(e.to_string()))?;
        Ok(config)
    }
}

fn repository(e: RepositoryError) -> UseCaseError {
    match e {
        RepositoryError::NotFound => UseCaseError::NotFound("Form not found".into()),
        other => UseCaseError::RepositoryError(other.to_string()),
    }
}

fn generation(e: GeneratorError) -> UseCaseError {
    match e {
        GeneratorError::Connection(_) => UseCaseError::Unavailable(e.to_string()),
        _ => UseCaseError::ValidationError(e.to_string()),
    }
}

#[async_trait]
impl FormUseCases for FormService {
    async fn generate(
        &self,
        service: &ServiceDefinition,
        config: &FormConfig,
    ) -> Result<GeneratedDocument, UseCaseError> {
        self.generator()?.generate(service, config).map_err(generation)
    }

    async fn save_form(&self, command: SaveFormCommand) -> Result<SavedFormConfig, UseCaseError> {
        let config = Self::prepare(&command.tenant_id, &command.service, command.config)?;
        let form = SavedFormConfig::create(command.tenant_id, command.name, command.service, config);

        self.repo.save(&form).await.map_err(repository)?;
        info!(tenant_id = %form.tenant_id(), form_id = %form.id(), "form configuration saved");
        Ok(form)
    }

    async fn update_form(&self, command: UpdateFormCommand) -> Result<SavedFormConfig, UseCaseError> {
        let mut form = self.get_form(&command.tenant_id, &command.id).await?;
        let config = Self::prepare(&command.tenant_id, &command.service, command.config)?;

        if let Some(name) = command.name {
            form.rename(name);
        }
        form.replace(command.service, config);

        self.repo.save(&form).await.map_err(repository)?;
        info!(tenant_id = %form.tenant_id(), form_id = %form.id(), "form configuration updated");
        Ok(form)
    }

    async fn get_form(&self, tenant_id: &str, id: &EntityId) -> Result<SavedFormConfig, UseCaseError> {
        self.repo
            .find_by_id(tenant_id, id)
            .await
            .map_err(repository)?
            .ok_or_else(|| UseCaseError::NotFound("Form not found".into()))
    }

    async fn list_forms(&self, tenant_id: &str) -> Result<Vec<SavedFormConfig>, UseCaseError> {
        self.repo.list_by_tenant(tenant_id).await.map_err(repository)
    }

    async fn delete_form(&self, tenant_id: &str, id: &EntityId) -> Result<(), UseCaseError> {
        self.repo.delete(tenant_id, id).await.map_err(repository)?;
        info!(tenant_id = %tenant_id, form_id = %id, "form configuration deleted");
        Ok(())
    }

    async fn render_form(&self, tenant_id: &str, id: &EntityId) -> Result<GeneratedDocument, UseCaseError> {
        let generator = self.generator()?;
        let form = self.get_form(tenant_id, id).await?;
        generator
            .generate(form.service(), form.config())
            .map_err(generation)
    }
}
