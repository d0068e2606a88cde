//! Ad-hoc template rendering endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::metrics::{RenderMetrics, RenderSource};
use crate::template::variables::deserialize_variables;
use crate::template::{render_template, Variables, MAX_TEMPLATE_BYTES};

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// HTML with `{{variable}}`, `{{#if tag_X}}` and `K_fit` markup
    pub template: String,
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: Variables,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    pub html: String,
}

/// POST /api/v1/render - Render a template supplied in the request
#[tracing::instrument(
    name = "http.render_adhoc",
    skip(request),
    fields(template_bytes = request.template.len(), tags = request.tags.len())
)]
pub async fn render_adhoc(
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>> {
    if request.template.len() > MAX_TEMPLATE_BYTES {
        return Err(AppError::Validation(format!(
            "Template must be at most {} bytes",
            MAX_TEMPLATE_BYTES
        )));
    }

    let html = RenderMetrics::observe(RenderSource::Adhoc, || {
        render_template(&request.template, &request.variables, &request.tags)
    });

    Ok(Json(RenderResponse { html }))
}
