//! Backend trait for subscriber storage.

use async_trait::async_trait;
use thiserror::Error;

use super::types::Subscriber;

/// Errors that can occur during subscriber operations.
#[derive(Debug, Error)]
pub enum SubscriberError {
    #[error("Subscriber not found: {0}")]
    NotFound(String),

    #[error("Invalid subscriber: {0}")]
    Validation(String),

    /// PostgreSQL operation failed
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),
}

/// Result type for subscriber operations
pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// Storage for newsletter subscribers, keyed by normalized email.
#[async_trait]
pub trait SubscriberBackend: Send + Sync {
    fn backend_type(&self) -> &'static str;

    async fn get(&self, email: &str) -> SubscriberResult<Option<Subscriber>>;

    /// Insert or replace a subscriber.
    async fn save(&self, subscriber: &Subscriber) -> SubscriberResult<()>;

    /// Returns false when the subscriber did not exist.
    async fn delete(&self, email: &str) -> SubscriberResult<bool>;

    /// All subscribers ordered by email.
    async fn list(&self) -> SubscriberResult<Vec<Subscriber>>;

    async fn count(&self) -> SubscriberResult<usize>;
}
