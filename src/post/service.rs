//! Post authoring workflow: versioning, publishing and restore.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::metrics::PostMetrics;

use super::backend::{PostBackend, PostError, PostResult};
use super::slug::{slugify, validate_slug};
use super::types::{CreatePostRequest, Post, PostStatus, PostVersion, UpdatePostRequest};

/// Longest accepted post title.
pub const MAX_TITLE_LEN: usize = 256;

fn validate_title(title: &str) -> PostResult<()> {
    if title.is_empty() || title.chars().count() > MAX_TITLE_LEN {
        return Err(PostError::Validation(format!(
            "Title must be 1-{} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

/// Applies post rules on top of a storage backend.
#[derive(Clone)]
pub struct PostService {
    backend: Arc<dyn PostBackend>,
}

impl PostService {
    pub fn new(backend: Arc<dyn PostBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_type(&self) -> &'static str {
        self.backend.backend_type()
    }

    /// Create a draft post and record version 1.
    #[tracing::instrument(name = "post.create", skip(self, request), fields(title = %request.title))]
    pub async fn create(&self, request: CreatePostRequest) -> PostResult<Post> {
        let title = request.title.trim().to_string();
        validate_title(&title)?;

        let slug = match request.slug {
            Some(slug) => slug.trim().to_string(),
            None => slugify(&title),
        };
        validate_slug(&slug).map_err(PostError::Validation)?;

        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            slug,
            title,
            excerpt: request.excerpt,
            content: request.content,
            variables: request.variables,
            status: PostStatus::Draft,
            version: 1,
            created_at: now,
            updated_at: now,
            published_at: None,
        };

        self.backend
            .insert(&post, &post.snapshot(request.note))
            .await?;
        PostMetrics::record_version_created();

        tracing::info!(post_id = %post.id, slug = %post.slug, "Post created");
        Ok(post)
    }

    pub async fn get(&self, id: Uuid) -> PostResult<Post> {
        self.backend
            .get(id)
            .await?
            .ok_or_else(|| PostError::NotFound(id.to_string()))
    }

    /// Look up a post for public display; drafts are reported as missing.
    pub async fn get_published_by_slug(&self, slug: &str) -> PostResult<Post> {
        match self.backend.get_by_slug(slug).await? {
            Some(post) if post.is_published() => Ok(post),
            _ => Err(PostError::NotFound(slug.to_string())),
        }
    }

    /// Posts, most recently updated first.
    pub async fn list(&self, status: Option<PostStatus>) -> PostResult<Vec<Post>> {
        self.backend.list(status).await
    }

    /// Published posts, most recently published first.
    pub async fn list_published(&self) -> PostResult<Vec<Post>> {
        let mut posts = self.backend.list(Some(PostStatus::Published)).await?;
        posts.sort_by(|a, b| b.published_at.cmp(&a.published_at));
        Ok(posts)
    }

    /// Apply a partial update.
    ///
    /// Changes to title, excerpt, content or variables bump the version and
    /// record a snapshot; a slug-only change does not.
    #[tracing::instrument(name = "post.update", skip(self, request))]
    pub async fn update(&self, id: Uuid, request: UpdatePostRequest) -> PostResult<Post> {
        let mut post = self.get(id).await?;
        let mut content_changed = false;

        if let Some(title) = request.title {
            let title = title.trim().to_string();
            validate_title(&title)?;
            if title != post.title {
                post.title = title;
                content_changed = true;
            }
        }

        if let Some(slug) = request.slug {
            let slug = slug.trim().to_string();
            validate_slug(&slug).map_err(PostError::Validation)?;
            post.slug = slug;
        }

        if let Some(excerpt) = request.excerpt {
            if excerpt != post.excerpt {
                post.excerpt = excerpt;
                content_changed = true;
            }
        }

        if let Some(content) = request.content {
            if content != post.content {
                post.content = content;
                content_changed = true;
            }
        }

        if let Some(variables) = request.variables {
            if variables != post.variables {
                post.variables = variables;
                content_changed = true;
            }
        }

        post.updated_at = Utc::now();

        let snapshot = if content_changed {
            post.version += 1;
            Some(post.snapshot(request.note))
        } else {
            None
        };

        self.backend.save(&post, snapshot.as_ref()).await?;

        if snapshot.is_some() {
            PostMetrics::record_version_created();
        }

        tracing::info!(
            post_id = %post.id,
            version = post.version,
            new_version = content_changed,
            "Post updated"
        );
        Ok(post)
    }

    /// Make a post publicly visible. Re-publishing keeps the first
    /// `published_at`.
    #[tracing::instrument(name = "post.publish", skip(self))]
    pub async fn publish(&self, id: Uuid) -> PostResult<Post> {
        let mut post = self.get(id).await?;
        if post.is_published() {
            return Ok(post);
        }

        let now = Utc::now();
        post.status = PostStatus::Published;
        post.published_at.get_or_insert(now);
        post.updated_at = now;

        self.backend.save(&post, None).await?;
        PostMetrics::record_published();

        tracing::info!(post_id = %post.id, slug = %post.slug, "Post published");
        Ok(post)
    }

    /// Return a post to draft. `published_at` is retained.
    #[tracing::instrument(name = "post.unpublish", skip(self))]
    pub async fn unpublish(&self, id: Uuid) -> PostResult<Post> {
        let mut post = self.get(id).await?;
        if !post.is_published() {
            return Ok(post);
        }

        post.status = PostStatus::Draft;
        post.updated_at = Utc::now();

        self.backend.save(&post, None).await?;
        PostMetrics::record_unpublished();

        tracing::info!(post_id = %post.id, slug = %post.slug, "Post unpublished");
        Ok(post)
    }

    pub async fn delete(&self, id: Uuid) -> PostResult<()> {
        if !self.backend.delete(id).await? {
            return Err(PostError::NotFound(id.to_string()));
        }

        tracing::info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// Full history, oldest first.
    pub async fn versions(&self, id: Uuid) -> PostResult<Vec<PostVersion>> {
        self.get(id).await?;
        self.backend.versions(id).await
    }

    pub async fn version(&self, id: Uuid, version: i32) -> PostResult<PostVersion> {
        self.get(id).await?;
        self.backend
            .version(id, version)
            .await?
            .ok_or(PostError::VersionNotFound {
                post_id: id,
                version,
            })
    }

    /// Copy an old version forward as a new version; history is never
    /// rewritten.
    #[tracing::instrument(name = "post.restore", skip(self))]
    pub async fn restore(&self, id: Uuid, version: i32) -> PostResult<Post> {
        let mut post = self.get(id).await?;
        let source = self.version(id, version).await?;

        post.title = source.title;
        post.excerpt = source.excerpt;
        post.content = source.content;
        post.variables = source.variables;
        post.version += 1;
        post.updated_at = Utc::now();

        let snapshot = post.snapshot(Some(format!("restored from version {}", version)));
        self.backend.save(&post, Some(&snapshot)).await?;
        PostMetrics::record_version_created();

        tracing::info!(
            post_id = %post.id,
            restored_from = version,
            version = post.version,
            "Post version restored"
        );
        Ok(post)
    }

    pub async fn count(&self) -> PostResult<usize> {
        self.backend.count().await
    }
}
