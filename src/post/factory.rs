//! Post backend factory

use std::sync::Arc;

use crate::config::StorageConfig;
use crate::postgres::PostgresPool;

use super::backend::PostBackend;
use super::memory_backend::MemoryPostBackend;
use super::postgres_backend::PostgresPostBackend;

/// Create a post backend based on configuration.
///
/// Returns the appropriate backend implementation based on the `backend` setting:
/// - `"postgres"`: Returns a `PostgresPostBackend` if a PostgreSQL pool is provided
/// - `"memory"` (default): Returns a `MemoryPostBackend`
pub fn create_post_backend(
    settings: &StorageConfig,
    postgres_pool: Option<Arc<PostgresPool>>,
) -> Arc<dyn PostBackend> {
    match settings.backend.as_str() {
        "postgres" => {
            if let Some(pool) = postgres_pool {
                tracing::info!(backend = "postgres", "Creating PostgreSQL post backend");
                Arc::new(PostgresPostBackend::new(pool.pool().clone()))
            } else {
                tracing::warn!(
                    "PostgreSQL backend requested but no pool provided, falling back to memory"
                );
                Arc::new(MemoryPostBackend::new())
            }
        }
        _ => {
            tracing::info!(backend = "memory", "Creating memory post backend");
            Arc::new(MemoryPostBackend::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_without_pool_falls_back() {
        let settings = StorageConfig {
            backend: "postgres".to_string(),
        };
        assert_eq!(create_post_backend(&settings, None).backend_type(), "memory");
    }

    #[test]
    fn test_default_is_memory() {
        let settings = StorageConfig::default();
        assert_eq!(create_post_backend(&settings, None).backend_type(), "memory");
    }
}
