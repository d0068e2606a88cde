//! Newsletter preview: render a library template or a post as a given
//! subscriber would receive it.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blog::post_variables;
use crate::error::{AppError, Result};
use crate::metrics::{RenderMetrics, RenderSource};
use crate::server::AppState;
use crate::subscriber::normalize_tags;
use crate::template::variables::deserialize_variables;
use crate::template::{merge_variables, render_template, Variables};

#[derive(Debug, Deserialize)]
pub struct NewsletterPreviewRequest {
    /// Library template to render; exclusive with `post_id`
    pub template_id: Option<String>,
    pub post_id: Option<Uuid>,

    /// Overrides the template defaults or the post's own variables
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub variables: Variables,

    /// Render for this subscriber's tags; exclusive with `tags`
    pub subscriber_email: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct NewsletterPreviewResponse {
    pub html: String,
    /// Tags the preview was rendered with
    pub tags: Vec<String>,
}

/// POST /api/v1/newsletters/preview
#[tracing::instrument(
    name = "http.preview_newsletter",
    skip(state, request),
    fields(template_id = ?request.template_id, post_id = ?request.post_id)
)]
pub async fn preview_newsletter(
    State(state): State<AppState>,
    Json(request): Json<NewsletterPreviewRequest>,
) -> Result<Json<NewsletterPreviewResponse>> {
    let tags = match (&request.subscriber_email, &request.tags) {
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "Provide either subscriber_email or tags, not both".to_string(),
            ))
        }
        (Some(email), None) => state.subscribers.get(email).await?.tags,
        (None, Some(tags)) => normalize_tags(tags).map_err(AppError::Validation)?,
        (None, None) => Vec::new(),
    };

    let (source, variables) = match (&request.template_id, request.post_id) {
        (Some(template_id), None) => {
            let template = state.template_store.get(template_id)?;
            let variables = merge_variables(&template.default_variables, &request.variables);
            (template.html, variables)
        }
        (None, Some(post_id)) => {
            let post = state.posts.get(post_id).await?;
            let variables = merge_variables(&post_variables(&post), &request.variables);
            (post.content, variables)
        }
        _ => {
            return Err(AppError::Validation(
                "Exactly one of template_id or post_id is required".to_string(),
            ))
        }
    };

    let html = RenderMetrics::observe(RenderSource::Newsletter, || {
        render_template(&source, &variables, &tags)
    });

    Ok(Json(NewsletterPreviewResponse { html, tags }))
}
