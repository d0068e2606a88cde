use axum::{
    routing::{get, post, put},
    Router,
};

use crate::server::AppState;

use super::blog::{blog_index, blog_post};
use super::health::health;
use super::metrics::prometheus_metrics;
use super::newsletter::preview_newsletter;
use super::post::{
    create_post, delete_post, get_post, get_post_version, list_post_versions, list_posts,
    preview_post, publish_post, restore_post_version, unpublish_post, update_post,
};
use super::render::render_adhoc;
use super::subscriber::{
    delete_subscriber, get_subscriber, list_subscribers, set_subscriber_tags, subscribe,
};
use super::template::{
    create_template, delete_template, get_template, list_templates, render_library_template,
    update_template,
};

/// Routes reachable without an API key.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // Health & Metrics
        .route("/health", get(health))
        .route("/metrics", get(prometheus_metrics))
        // Public blog
        .route("/blog", get(blog_index))
        .route("/blog/{slug}", get(blog_post))
        // Newsletter sign-up
        .route("/api/v1/subscribe", post(subscribe))
}

/// Admin API, mounted under `/api/v1` behind the API key check.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // Ad-hoc rendering
        .route("/render", post(render_adhoc))
        // Template library
        .route("/templates", get(list_templates).post(create_template))
        .route(
            "/templates/{id}",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/templates/{id}/render", post(render_library_template))
        // Posts
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/posts/{id}/publish", post(publish_post))
        .route("/posts/{id}/unpublish", post(unpublish_post))
        .route("/posts/{id}/preview", post(preview_post))
        .route("/posts/{id}/versions", get(list_post_versions))
        .route("/posts/{id}/versions/{version}", get(get_post_version))
        .route(
            "/posts/{id}/versions/{version}/restore",
            post(restore_post_version),
        )
        // Subscribers
        .route("/subscribers", get(list_subscribers))
        .route(
            "/subscribers/{email}",
            get(get_subscriber).delete(delete_subscriber),
        )
        .route("/subscribers/{email}/tags", put(set_subscriber_tags))
        // Newsletters
        .route("/newsletters/preview", post(preview_newsletter))
}
