//! Template library endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::Result;
use crate::metrics::{RenderMetrics, RenderSource};
use crate::server::AppState;
use crate::template::variables::deserialize_variables;
use crate::template::{
    CreateTemplateRequest, LibraryTemplate, RenderedTemplate, TemplateListResponse,
    UpdateTemplateRequest, Variables,
};

/// Body of a library render call; both fields may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct RenderTemplateRequest {
    /// Layered over the template's default variables
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: Variables,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// POST /api/v1/templates - Create a new template
#[tracing::instrument(
    name = "http.create_template",
    skip(state, request),
    fields(template_id = %request.id)
)]
pub async fn create_template(
    State(state): State<AppState>,
    Json(request): Json<CreateTemplateRequest>,
) -> Result<(StatusCode, Json<LibraryTemplate>)> {
    let created = state.template_store.create(request.into())?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/templates - List all templates
#[tracing::instrument(name = "http.list_templates", skip(state))]
pub async fn list_templates(State(state): State<AppState>) -> Json<TemplateListResponse> {
    let templates = state.template_store.list();
    let total = templates.len();

    Json(TemplateListResponse { templates, total })
}

/// GET /api/v1/templates/{id}
#[tracing::instrument(name = "http.get_template", skip(state))]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LibraryTemplate>> {
    Ok(Json(state.template_store.get(&id)?))
}

/// PUT /api/v1/templates/{id}
#[tracing::instrument(name = "http.update_template", skip(state, request))]
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTemplateRequest>,
) -> Result<Json<LibraryTemplate>> {
    Ok(Json(state.template_store.update(&id, request)?))
}

/// DELETE /api/v1/templates/{id}
#[tracing::instrument(name = "http.delete_template", skip(state))]
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.template_store.delete(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/templates/{id}/render
#[tracing::instrument(
    name = "http.render_template",
    skip(state, request),
    fields(tags = request.tags.len())
)]
pub async fn render_library_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RenderTemplateRequest>,
) -> Result<Json<RenderedTemplate>> {
    let rendered = RenderMetrics::observe(RenderSource::Library, || {
        state
            .template_store
            .render(&id, &request.variables, &request.tags)
    })?;

    Ok(Json(rendered))
}
