//! Subscriber backend factory

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::postgres::PostgresPool;

use super::backend::SubscriberBackend;
use super::memory_backend::MemorySubscriberBackend;
use super::postgres_backend::PostgresSubscriberBackend;

/// Create a subscriber backend based on configuration, falling back to
/// memory when PostgreSQL is requested without a pool.
pub fn create_subscriber_backend(
    settings: &StorageConfig,
    postgres_pool: Option<Arc<PostgresPool>>,
) -> Arc<dyn SubscriberBackend> {
    match (settings.backend.as_str(), postgres_pool) {
        ("postgres", Some(pool)) => {
            tracing::info!(backend = "postgres", "Creating PostgreSQL subscriber backend");
            Arc::new(PostgresSubscriberBackend::new(pool.pool().clone()))
        }
        ("postgres", None) => {
            tracing::warn!(
                "PostgreSQL backend requested but no pool provided, falling back to memory"
            );
            Arc::new(MemorySubscriberBackend::new())
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory subscriber backend");
            Arc::new(MemorySubscriberBackend::new())
        }
    }
}
