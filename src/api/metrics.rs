//! Prometheus metrics endpoint.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::metrics::{self, PostMetrics, SubscriberMetrics};
use crate::server::AppState;

/// GET /metrics - Prometheus metrics endpoint
pub async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    update_metrics_from_state(&state).await;

    match metrics::encode_metrics() {
        Ok(output) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode Prometheus metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

/// Refresh the gauges that mirror stored content
async fn update_metrics_from_state(state: &AppState) {
    match state.posts.count().await {
        Ok(count) => PostMetrics::set_total(count),
        Err(e) => tracing::warn!(error = %e, "Failed to count posts for metrics"),
    }

    match state.subscribers.count().await {
        Ok(count) => SubscriberMetrics::set_total(count),
        Err(e) => tracing::warn!(error = %e, "Failed to count subscribers for metrics"),
    }
}
