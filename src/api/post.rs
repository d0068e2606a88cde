//! Post authoring, history and publishing endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::blog::post_variables;
use crate::error::{AppError, Result};
use crate::metrics::{RenderMetrics, RenderSource};
use crate::post::{
    CreatePostRequest, Post, PostListResponse, PostStatus, PostVersion, PostVersionListResponse,
    UpdatePostRequest,
};
use crate::server::AppState;
use crate::template::{merge_variables, render_template};

use super::render::RenderResponse;
use super::template::RenderTemplateRequest;

#[derive(Debug, Default, Deserialize)]
pub struct PostListQuery {
    /// `draft` or `published`
    pub status: Option<String>,
}

/// POST /api/v1/posts
#[tracing::instrument(name = "http.create_post", skip(state, request), fields(title = %request.title))]
pub async fn create_post(
    State(state): State<AppState>,
    Json(request): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>)> {
    let post = state.posts.create(request).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/v1/posts?status=
#[tracing::instrument(name = "http.list_posts", skip(state))]
pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> Result<Json<PostListResponse>> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<PostStatus>)
        .transpose()
        .map_err(AppError::Validation)?;

    let posts = state.posts.list(status).await?;
    let total = posts.len();
    Ok(Json(PostListResponse { posts, total }))
}

/// GET /api/v1/posts/{id}
#[tracing::instrument(name = "http.get_post", skip(state))]
pub async fn get_post(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Post>> {
    Ok(Json(state.posts.get(id).await?))
}

/// PUT /api/v1/posts/{id} - content changes create a new version
#[tracing::instrument(name = "http.update_post", skip(state, request))]
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePostRequest>,
) -> Result<Json<Post>> {
    Ok(Json(state.posts.update(id, request).await?))
}

/// DELETE /api/v1/posts/{id}
#[tracing::instrument(name = "http.delete_post", skip(state))]
pub async fn delete_post(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode> {
    state.posts.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/posts/{id}/publish
#[tracing::instrument(name = "http.publish_post", skip(state))]
pub async fn publish_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>> {
    Ok(Json(state.posts.publish(id).await?))
}

/// POST /api/v1/posts/{id}/unpublish
#[tracing::instrument(name = "http.unpublish_post", skip(state))]
pub async fn unpublish_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Post>> {
    Ok(Json(state.posts.unpublish(id).await?))
}

/// POST /api/v1/posts/{id}/preview - render the current content, drafts included
#[tracing::instrument(name = "http.preview_post", skip(state, request))]
pub async fn preview_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<RenderTemplateRequest>,
) -> Result<Json<RenderResponse>> {
    let post = state.posts.get(id).await?;
    let variables = merge_variables(&post_variables(&post), &request.variables);

    let html = RenderMetrics::observe(RenderSource::Post, || {
        render_template(&post.content, &variables, &request.tags)
    });

    Ok(Json(RenderResponse { html }))
}

/// GET /api/v1/posts/{id}/versions
#[tracing::instrument(name = "http.list_post_versions", skip(state))]
pub async fn list_post_versions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PostVersionListResponse>> {
    let versions = state.posts.versions(id).await?;
    let total = versions.len();
    Ok(Json(PostVersionListResponse {
        post_id: id,
        versions,
        total,
    }))
}

/// GET /api/v1/posts/{id}/versions/{version}
#[tracing::instrument(name = "http.get_post_version", skip(state))]
pub async fn get_post_version(
    State(state): State<AppState>,
    Path((id, version)): Path<(Uuid, i32)>,
) -> Result<Json<PostVersion>> {
    Ok(Json(state.posts.version(id, version).await?))
}

/// POST /api/v1/posts/{id}/versions/{version}/restore
#[tracing::instrument(name = "http.restore_post_version", skip(state))]
pub async fn restore_post_version(
    State(state): State<AppState>,
    Path((id, version)): Path<(Uuid, i32)>,
) -> Result<Json<Post>> {
    Ok(Json(state.posts.restore(id, version).await?))
}
