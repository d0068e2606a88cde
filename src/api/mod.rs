//! API layer - HTTP endpoint handlers organized by domain.

mod blog;
mod health;
mod metrics;
mod newsletter;
mod post;
mod render;
mod routes;
mod subscriber;
mod template;

// Re-export all handlers for use in server/app.rs
pub use blog::{blog_index, blog_post, BlogQuery};
pub use health::{health, HealthResponse};
pub use metrics::prometheus_metrics;
pub use newsletter::{preview_newsletter, NewsletterPreviewRequest, NewsletterPreviewResponse};
pub use post::{
    create_post, delete_post, get_post, get_post_version, list_post_versions, list_posts,
    preview_post, publish_post, restore_post_version, unpublish_post, update_post,
};
pub use render::{render_adhoc, RenderRequest, RenderResponse};
pub use routes::{admin_routes, public_routes};
pub use subscriber::{delete_subscriber, get_subscriber, list_subscribers, set_subscriber_tags, subscribe};
pub use template::{
    create_template, delete_template, get_template, list_templates, render_library_template,
    update_template, RenderTemplateRequest,
};
