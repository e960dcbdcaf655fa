//! LeadForm HTTP API
//!
//! Generates embeddable lead-form documents and stores form configurations
//! per tenant so they can be re-edited and re-generated later.
//!
//! # Routes
//!
//! ```text
//! GET    /health
//! POST   /api/v1/forms/generate                    -> { wrapper_id, total_steps, html }
//! POST   /api/v1/forms/preview                     -> text/html
//! GET    /api/v1/tenants/:tenant_id/forms
//! POST   /api/v1/tenants/:tenant_id/forms
//! GET    /api/v1/tenants/:tenant_id/forms/:id
//! PUT    /api/v1/tenants/:tenant_id/forms/:id
//! DELETE /api/v1/tenants/:tenant_id/forms/:id
//! GET    /api/v1/tenants/:tenant_id/forms/:id/document -> text/html
//! GET    /api-docs/openapi.json
//! ```

pub mod config;
pub mod models;
pub mod routes;

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use leadform_core::infrastructure::{FileFormConfigRepository, InMemoryFormConfigRepository};
use leadform_core::{FormConfigRepository, FormGenerator, FormService, FormUseCases, GeneratorError};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

pub use config::ApiConfig;
pub use models::*;

/// API state
#[derive(Clone)]
pub struct ApiState {
    pub forms: Arc<dyn FormUseCases>,
    pub generation_enabled: bool,
}

impl ApiState {
    pub fn new(forms: Arc<dyn FormUseCases>, generation_enabled: bool) -> Self {
        Self { forms, generation_enabled }
    }

    /// Wires the repository and generator described by `config`
    pub fn from_config(config: &ApiConfig) -> Result<Self, GeneratorError> {
        let repo: Arc<dyn FormConfigRepository> = match &config.forms_dir {
            Some(dir) => Arc::new(FileFormConfigRepository::new(dir)),
            None => Arc::new(InMemoryFormConfigRepository::new()),
        };
        let generator = config.connection.clone().map(FormGenerator::new).transpose()?;
        let generation_enabled = generator.is_some();

        Ok(Self::new(Arc::new(FormService::new(repo, generator)), generation_enabled))
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LeadForm API",
        version = "0.1.0",
        description = "Embeddable lead-form generator",
        license(name = "Apache-2.0")
    ),
    paths(
        routes::health::health_check,
        routes::forms::generate_form,
        routes::forms::preview_form,
        routes::forms::list_forms,
        routes::forms::create_form,
        routes::forms::get_form,
        routes::forms::update_form,
        routes::forms::delete_form,
        routes::forms::form_document,
    ),
    components(
        schemas(
            ErrorResponse,
            routes::health::HealthResponse,
            GenerateRequest, GeneratedForm,
            SavedForm, SavedFormCreate, SavedFormUpdate
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "forms", description = "Form generation and saved configurations")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the API router
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1", api_routes())
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

fn api_routes() -> Router<Arc<ApiState>> {
    Router::new()
        .nest("/forms", routes::forms::router())
        .nest("/tenants/:tenant_id/forms", routes::forms::tenant_router())
}
