//! API Models

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use leadform_core::{FormConfig, GeneratedDocument, SavedFormConfig, ServiceDefinition, UseCaseError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard API response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn error(code: &str, message: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorResponse {
                code: code.to_string(),
                message: message.to_string(),
            }),
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

/// Error returned by handlers, rendered as an `ApiResponse` envelope
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        let (status, code) = match &e {
            UseCaseError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            UseCaseError::ValidationError(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            UseCaseError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "unavailable"),
            UseCaseError::RepositoryError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "repository_error"),
        };
        if status.is_server_error() {
            tracing::error!(error = %e, "request failed");
        }
        Self { status, code, message: e.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::error(self.code, &self.message);
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============ Forms ============

/// Ad-hoc generation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Service name and ordered field definitions
    #[schema(value_type = Object)]
    pub service: ServiceDefinition,
    /// Layout, consent, style and integration settings
    #[schema(value_type = Object)]
    pub config: FormConfig,
}

/// Generated document
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeneratedForm {
    pub wrapper_id: String,
    pub total_steps: u32,
    pub html: String,
}

impl From<GeneratedDocument> for GeneratedForm {
    fn from(doc: GeneratedDocument) -> Self {
        Self {
            wrapper_id: doc.wrapper_id.to_string(),
            total_steps: doc.total_steps,
            html: doc.html,
        }
    }
}

/// Saved form creation request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedFormCreate {
    pub name: String,
    #[schema(value_type = Object)]
    pub service: ServiceDefinition,
    #[schema(value_type = Object)]
    pub config: FormConfig,
}

/// Saved form replacement request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedFormUpdate {
    pub name: Option<String>,
    #[schema(value_type = Object)]
    pub service: ServiceDefinition,
    #[schema(value_type = Object)]
    pub config: FormConfig,
}

/// Saved form configuration
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SavedForm {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    #[schema(value_type = Object)]
    pub service: ServiceDefinition,
    #[schema(value_type = Object)]
    pub config: FormConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SavedFormConfig> for SavedForm {
    fn from(form: SavedFormConfig) -> Self {
        Self {
            id: form.id().to_string(),
            tenant_id: form.tenant_id().to_string(),
            name: form.name().to_string(),
            service: form.service().clone(),
            config: form.config().clone(),
            created_at: form.created_at(),
            updated_at: form.updated_at(),
        }
    }
}
