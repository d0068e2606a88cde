use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::api::{admin_routes, public_routes};
use crate::config::ServerConfig;

use super::middleware::api_key_auth;
use super::AppState;

/// Configured origins, or any origin when none are listed.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.server);
    let body_limit = state.settings.server.max_body_bytes;

    // Admin API, guarded by X-API-Key
    let admin = admin_routes().route_layer(middleware::from_fn_with_state(
        state.clone(),
        api_key_auth,
    ));

    Router::new()
        .merge(public_routes())
        .nest("/api/v1", admin)
        // Add middleware
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}
