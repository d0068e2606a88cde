use std::sync::Arc;
use std::time::Instant;

use crate::config::Settings;
use crate::post::{create_post_backend, PostService};
use crate::postgres::PostgresPool;
use crate::subscriber::{create_subscriber_backend, SubscriberService};
use crate::template::{create_template_store, TemplateStore};

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub template_store: Arc<TemplateStore>,
    pub posts: PostService,
    pub subscribers: SubscriberService,
    /// Present when `storage.backend = "postgres"` and the database was reachable
    pub postgres_pool: Option<Arc<PostgresPool>>,
    pub start_time: Instant,
}

impl AppState {
    /// Build the state; without a pool every backend is in-memory.
    pub fn new(settings: Settings, postgres_pool: Option<Arc<PostgresPool>>) -> Self {
        let post_backend = create_post_backend(&settings.storage, postgres_pool.clone());
        let subscriber_backend =
            create_subscriber_backend(&settings.storage, postgres_pool.clone());

        Self {
            settings: Arc::new(settings),
            template_store: create_template_store(),
            posts: PostService::new(post_backend),
            subscribers: SubscriberService::new(subscriber_backend),
            postgres_pool,
            start_time: Instant::now(),
        }
    }
}
