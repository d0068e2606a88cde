//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub storage: StorageHealthResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postgres: Option<PostgresHealthResponse>,
    pub content: ContentHealthResponse,
}

#[derive(Debug, Serialize)]
pub struct StorageHealthResponse {
    pub posts_backend: String,
    pub subscribers_backend: String,
}

#[derive(Debug, Serialize)]
pub struct PostgresHealthResponse {
    pub connected: bool,
    pub pool_size: u32,
    pub idle_connections: u32,
}

#[derive(Debug, Serialize)]
pub struct ContentHealthResponse {
    pub templates: usize,
    /// None when the backend could not be queried
    pub posts: Option<usize>,
    pub subscribers: Option<usize>,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let postgres = match state.postgres_pool {
        Some(ref pool) => {
            let inner_pool = pool.pool();
            Some(PostgresHealthResponse {
                connected: pool.ping().await,
                pool_size: inner_pool.size(),
                idle_connections: inner_pool.num_idle() as u32,
            })
        }
        None => None,
    };

    let posts = state.posts.count().await.ok();
    let subscribers = state.subscribers.count().await.ok();

    let postgres_down = postgres.as_ref().is_some_and(|pg| !pg.connected);
    let status = if postgres_down || posts.is_none() || subscribers.is_none() {
        "degraded"
    } else {
        "healthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        storage: StorageHealthResponse {
            posts_backend: state.posts.backend_type().to_string(),
            subscribers_backend: state.subscribers.backend_type().to_string(),
        },
        postgres,
        content: ContentHealthResponse {
            templates: state.template_store.count(),
            posts,
            subscribers,
        },
    })
}
