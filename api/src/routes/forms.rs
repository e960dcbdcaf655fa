//! Form generation and saved-form endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use leadform_core::{EntityId, SaveFormCommand, UpdateFormCommand};

use crate::models::*;
use crate::ApiState;

/// Stateless generation, mounted at `/api/v1/forms`
pub fn router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/generate", post(generate_form))
        .route("/preview", post(preview_form))
}

/// Saved forms, mounted at `/api/v1/tenants/:tenant_id/forms`
pub fn tenant_router() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/", get(list_forms).post(create_form))
        .route("/:id", get(get_form).put(update_form).delete(delete_form))
        .route("/:id/document", get(form_document))
}

/// Generate a form document
#[utoipa::path(
    post,
    path = "/api/v1/forms/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated document", body = GeneratedForm),
        (status = 422, description = "Invalid configuration", body = ErrorResponse),
        (status = 503, description = "No storage connection configured", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn generate_form(
    State(state): State<Arc<ApiState>>,
    Json(input): Json<GenerateRequest>,
) -> ApiResult<GeneratedForm> {
    let doc = state.forms.generate(&input.service, &input.config).await?;
    Ok(Json(ApiResponse::success(doc.into())))
}

/// Generate a form document and return it as HTML
#[utoipa::path(
    post,
    path = "/api/v1/forms/preview",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated document", content_type = "text/html", body = String),
        (status = 422, description = "Invalid configuration", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn preview_form(
    State(state): State<Arc<ApiState>>,
    Json(input): Json<GenerateRequest>,
) -> Result<Html<String>, ApiError> {
    let doc = state.forms.generate(&input.service, &input.config).await?;
    Ok(Html(doc.html))
}

/// List saved forms of a tenant
#[utoipa::path(
    get,
    path = "/api/v1/tenants/{tenant_id}/forms",
    params(("tenant_id" = String, Path,)),
    responses((status = 200, description = "Saved forms", body = [SavedForm])),
    tag = "forms"
)]
pub async fn list_forms(
    State(state): State<Arc<ApiState>>,
    Path(tenant_id): Path<String>,
) -> ApiResult<Vec<SavedForm>> {
    let forms = state.forms.list_forms(&tenant_id).await?;
    Ok(Json(ApiResponse::success(forms.into_iter().map(Into::into).collect())))
}

/// Save a form configuration
#[utoipa::path(
    post,
    path = "/api/v1/tenants/{tenant_id}/forms",
    params(("tenant_id" = String, Path,)),
    request_body = SavedFormCreate,
    responses(
        (status = 201, description = "Saved", body = SavedForm),
        (status = 422, description = "Invalid configuration", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn create_form(
    State(state): State<Arc<ApiState>>,
    Path(tenant_id): Path<String>,
    Json(input): Json<SavedFormCreate>,
) -> Result<(StatusCode, Json<ApiResponse<SavedForm>>), ApiError> {
    let form = state
        .forms
        .save_form(SaveFormCommand {
            tenant_id,
            name: input.name,
            service: input.service,
            config: input.config,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(form.into()))))
}

/// Get a saved form
#[utoipa::path(
    get,
    path = "/api/v1/tenants/{tenant_id}/forms/{id}",
    params(("tenant_id" = String, Path,), ("id" = String, Path,)),
    responses(
        (status = 200, description = "Saved form", body = SavedForm),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn get_form(
    State(state): State<Arc<ApiState>>,
    Path((tenant_id, id)): Path<(String, String)>,
) -> ApiResult<SavedForm> {
    let form = state.forms.get_form(&tenant_id, &EntityId::from_string(id)).await?;
    Ok(Json(ApiResponse::success(form.into())))
}

/// Replace a saved form's service snapshot and configuration
#[utoipa::path(
    put,
    path = "/api/v1/tenants/{tenant_id}/forms/{id}",
    params(("tenant_id" = String, Path,), ("id" = String, Path,)),
    request_body = SavedFormUpdate,
    responses(
        (status = 200, description = "Updated", body = SavedForm),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 422, description = "Invalid configuration", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn update_form(
    State(state): State<Arc<ApiState>>,
    Path((tenant_id, id)): Path<(String, String)>,
    Json(input): Json<SavedFormUpdate>,
) -> ApiResult<SavedForm> {
    let form = state
        .forms
        .update_form(UpdateFormCommand {
            tenant_id,
            id: EntityId::from_string(id),
            name: input.name,
            service: input.service,
            config: input.config,
        })
        .await?;
    Ok(Json(ApiResponse::success(form.into())))
}

/// Delete a saved form
#[utoipa::path(
    delete,
    path = "/api/v1/tenants/{tenant_id}/forms/{id}",
    params(("tenant_id" = String, Path,), ("id" = String, Path,)),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn delete_form(
    State(state): State<Arc<ApiState>>,
    Path((tenant_id, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state.forms.delete_form(&tenant_id, &EntityId::from_string(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Render a saved form from its stored service snapshot
#[utoipa::path(
    get,
    path = "/api/v1/tenants/{tenant_id}/forms/{id}/document",
    params(("tenant_id" = String, Path,), ("id" = String, Path,)),
    responses(
        (status = 200, description = "Generated document", content_type = "text/html", body = String),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 503, description = "No storage connection configured", body = ErrorResponse)
    ),
    tag = "forms"
)]
pub async fn form_document(
    State(state): State<Arc<ApiState>>,
    Path((tenant_id, id)): Path<(String, String)>,
) -> Result<Html<String>, ApiError> {
    let doc = state.forms.render_form(&tenant_id, &EntityId::from_string(id)).await?;
    Ok(Html(doc.html))
}
