//! Blog posts: authoring, version history and publishing.
//!
//! Every content change is kept as an immutable [`PostVersion`]; restoring
//! an old version appends a new one instead of rewriting history. Storage is
//! pluggable through [`PostBackend`] (memory or PostgreSQL).

mod backend;
mod factory;
mod memory_backend;
mod postgres_backend;
mod service;
pub mod slug;
mod types;

pub use backend::{PostBackend, PostError, PostResult};
pub use factory::create_post_backend;
pub use memory_backend::MemoryPostBackend;
pub use postgres_backend::PostgresPostBackend;
pub use service::{PostService, MAX_TITLE_LEN};
pub use types::{
    CreatePostRequest, Post, PostListResponse, PostStatus, PostVersion, PostVersionListResponse,
    UpdatePostRequest,
};
