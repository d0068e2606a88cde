//! Public blog pages (HTML).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::blog::{index_page, not_found_page, parse_tags, post_page};
use crate::error::AppError;
use crate::post::PostError;
use crate::server::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BlogQuery {
    /// Comma-separated reader tags for `{{#if tag_X}}` blocks
    pub tags: Option<String>,
}

/// GET /blog
#[tracing::instrument(name = "http.blog_index", skip(state))]
pub async fn blog_index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let posts = state.posts.list_published().await?;
    Ok(Html(index_page(&state.settings.blog.title, &posts)))
}

/// GET /blog/{slug}
#[tracing::instrument(name = "http.blog_post", skip(state, query))]
pub async fn blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<BlogQuery>,
) -> Response {
    let blog_title = &state.settings.blog.title;

    match state.posts.get_published_by_slug(&slug).await {
        Ok(post) => {
            let tags = parse_tags(query.tags.as_deref());
            Html(post_page(blog_title, &post, &tags)).into_response()
        }
        Err(PostError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, Html(not_found_page(blog_title))).into_response()
        }
        Err(e) => AppError::from(e).into_response(),
    }
}
