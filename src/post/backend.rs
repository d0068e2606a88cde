//! Backend trait for post storage.
//!
//! Backends only persist rows; versioning and publishing rules live in
//! [`PostService`](super::PostService) so every backend behaves the same.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::types::{Post, PostStatus, PostVersion};

/// Errors that can occur during post operations.
#[derive(Debug, Error)]
pub enum PostError {
    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Version {version} not found for post {post_id}")]
    VersionNotFound { post_id: Uuid, version: i32 },

    #[error("Slug already in use: {0}")]
    SlugTaken(String),

    #[error("Invalid post: {0}")]
    Validation(String),

    /// PostgreSQL operation failed
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for post operations
pub type PostResult<T> = Result<T, PostError>;

/// Storage for posts and their version history.
#[async_trait]
pub trait PostBackend: Send + Sync {
    /// Backend identifier for health output ("memory", "postgres").
    fn backend_type(&self) -> &'static str;

    /// Insert a new post with its first history entry.
    ///
    /// Fails with `SlugTaken` when another post already owns the slug.
    async fn insert(&self, post: &Post, initial: &PostVersion) -> PostResult<()>;

    /// Overwrite an existing post, appending `version` to its history if given.
    ///
    /// Fails with `NotFound` for unknown posts and `SlugTaken` when the new
    /// slug belongs to another post.
    async fn save(&self, post: &Post, version: Option<&PostVersion>) -> PostResult<()>;

    async fn get(&self, id: Uuid) -> PostResult<Option<Post>>;

    async fn get_by_slug(&self, slug: &str) -> PostResult<Option<Post>>;

    /// Posts ordered by most recently updated first.
    async fn list(&self, status: Option<PostStatus>) -> PostResult<Vec<Post>>;

    /// Remove a post and its history. Returns false when it did not exist.
    async fn delete(&self, id: Uuid) -> PostResult<bool>;

    /// History ordered by ascending version.
    async fn versions(&self, id: Uuid) -> PostResult<Vec<PostVersion>>;

    async fn version(&self, id: Uuid, version: i32) -> PostResult<Option<PostVersion>>;

    async fn count(&self) -> PostResult<usize>;
}
