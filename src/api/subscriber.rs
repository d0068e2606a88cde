//! Newsletter subscriber endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::error::Result;
use crate::server::AppState;
use crate::subscriber::{
    SetTagsRequest, SubscribeRequest, SubscribeResponse, Subscriber, SubscriberListResponse,
};

#[derive(Debug, Default, Deserialize)]
pub struct SubscriberListQuery {
    pub tag: Option<String>,
}

/// POST /api/v1/subscribe - public sign-up; 201 when new, 200 when already subscribed
#[tracing::instrument(name = "http.subscribe", skip(state, request))]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(request): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscribeResponse>)> {
    let outcome = state
        .subscribers
        .subscribe(&request.email, &request.tags)
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(SubscribeResponse {
            subscriber: outcome.subscriber,
            created: outcome.created,
        }),
    ))
}

/// GET /api/v1/subscribers?tag=
#[tracing::instrument(name = "http.list_subscribers", skip(state))]
pub async fn list_subscribers(
    State(state): State<AppState>,
    Query(query): Query<SubscriberListQuery>,
) -> Result<Json<SubscriberListResponse>> {
    let subscribers = state.subscribers.list(query.tag.as_deref()).await?;
    let total = subscribers.len();
    Ok(Json(SubscriberListResponse { subscribers, total }))
}

/// GET /api/v1/subscribers/{email}
#[tracing::instrument(name = "http.get_subscriber", skip(state))]
pub async fn get_subscriber(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<Subscriber>> {
    Ok(Json(state.subscribers.get(&email).await?))
}

/// PUT /api/v1/subscribers/{email}/tags
#[tracing::instrument(name = "http.set_subscriber_tags", skip(state, request))]
pub async fn set_subscriber_tags(
    State(state): State<AppState>,
    Path(email): Path<String>,
    Json(request): Json<SetTagsRequest>,
) -> Result<Json<Subscriber>> {
    Ok(Json(state.subscribers.set_tags(&email, &request.tags).await?))
}

/// DELETE /api/v1/subscribers/{email}
#[tracing::instrument(name = "http.delete_subscriber", skip(state))]
pub async fn delete_subscriber(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<StatusCode> {
    state.subscribers.unsubscribe(&email).await?;
    Ok(StatusCode::NO_CONTENT)
}
