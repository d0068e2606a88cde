//! In-memory post backend using DashMap.
//!
//! Posts are lost on service restart.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use super::backend::{PostBackend, PostError, PostResult};
use super::types::{Post, PostStatus, PostVersion};

/// In-memory post backend.
///
/// A slug index keeps slug ownership atomic per slug.
#[derive(Default)]
pub struct MemoryPostBackend {
    posts: DashMap<Uuid, Post>,
    versions: DashMap<Uuid, Vec<PostVersion>>,
    slugs: DashMap<String, Uuid>,
}

impl MemoryPostBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_slug(&self, slug: &str, id: Uuid) -> PostResult<()> {
        match self.slugs.entry(slug.to_string()) {
            Entry::Occupied(owner) if *owner.get() != id => {
                Err(PostError::SlugTaken(slug.to_string()))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl PostBackend for MemoryPostBackend {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, post: &Post, initial: &PostVersion) -> PostResult<()> {
        self.claim_slug(&post.slug, post.id)?;
        self.posts.insert(post.id, post.clone());
        self.versions.insert(post.id, vec![initial.clone()]);
        Ok(())
    }

    async fn save(&self, post: &Post, version: Option<&PostVersion>) -> PostResult<()> {
        let previous_slug = match self.posts.get(&post.id) {
            Some(existing) => existing.slug.clone(),
            None => return Err(PostError::NotFound(post.id.to_string())),
        };

        if previous_slug != post.slug {
            self.claim_slug(&post.slug, post.id)?;
            self.slugs.remove(&previous_slug);
        }

        self.posts.insert(post.id, post.clone());
        if let Some(version) = version {
            self.versions
                .entry(post.id)
                .or_default()
                .push(version.clone());
        }

        Ok(())
    }

    async fn get(&self, id: Uuid) -> PostResult<Option<Post>> {
        Ok(self.posts.get(&id).map(|p| p.clone()))
    }

    async fn get_by_slug(&self, slug: &str) -> PostResult<Option<Post>> {
        let Some(id) = self.slugs.get(slug).map(|id| *id) else {
            return Ok(None);
        };
        self.get(id).await
    }

    async fn list(&self, status: Option<PostStatus>) -> PostResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| status.map_or(true, |s| entry.status == s))
            .map(|entry| entry.value().clone())
            .collect();
        posts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(posts)
    }

    async fn delete(&self, id: Uuid) -> PostResult<bool> {
        let Some((_, post)) = self.posts.remove(&id) else {
            return Ok(false);
        };
        self.slugs.remove(&post.slug);
        self.versions.remove(&id);
        Ok(true)
    }

    async fn versions(&self, id: Uuid) -> PostResult<Vec<PostVersion>> {
        let mut versions = self
            .versions
            .get(&id)
            .map(|v| v.clone())
            .unwrap_or_default();
        versions.sort_by_key(|v| v.version);
        Ok(versions)
    }

    async fn version(&self, id: Uuid, version: i32) -> PostResult<Option<PostVersion>> {
        Ok(self
            .versions
            .get(&id)
            .and_then(|v| v.iter().find(|entry| entry.version == version).cloned()))
    }

    async fn count(&self) -> PostResult<usize> {
        Ok(self.posts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::template::Variables;

    fn post(slug: &str) -> Post {
        let now = Utc::now();
        Post {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            title: slug.to_string(),
            excerpt: None,
            content: "<p>body</p>".to_string(),
            variables: Variables::new(),
            status: PostStatus::Draft,
            version: 1,
            created_at: now,
            updated_at: now,
            published_at: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let backend = MemoryPostBackend::new();
        let p = post("first");

        backend.insert(&p, &p.snapshot(None)).await.unwrap();

        assert_eq!(backend.get(p.id).await.unwrap(), Some(p.clone()));
        assert_eq!(backend.get_by_slug("first").await.unwrap().unwrap().id, p.id);
        assert_eq!(backend.versions(p.id).await.unwrap().len(), 1);
        assert_eq!(backend.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_duplicate_slug() {
        let backend = MemoryPostBackend::new();
        let a = post("same");
        let b = post("same");

        backend.insert(&a, &a.snapshot(None)).await.unwrap();
        let result = backend.insert(&b, &b.snapshot(None)).await;
        assert!(matches!(result, Err(PostError::SlugTaken(_))));
    }

    #[tokio::test]
    async fn test_save_moves_slug() {
        let backend = MemoryPostBackend::new();
        let mut p = post("old-slug");
        backend.insert(&p, &p.snapshot(None)).await.unwrap();

        p.slug = "new-slug".to_string();
        backend.save(&p, None).await.unwrap();

        assert!(backend.get_by_slug("old-slug").await.unwrap().is_none());
        assert!(backend.get_by_slug("new-slug").await.unwrap().is_some());

        // The old slug is free again.
        let other = post("old-slug");
        backend.insert(&other, &other.snapshot(None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_save_unknown_post() {
        let backend = MemoryPostBackend::new();
        let p = post("ghost");
        assert!(matches!(backend.save(&p, None).await, Err(PostError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_save_appends_version() {
        let backend = MemoryPostBackend::new();
        let mut p = post("versioned");
        backend.insert(&p, &p.snapshot(None)).await.unwrap();

        p.version = 2;
        p.title = "Second".to_string();
        backend.save(&p, Some(&p.snapshot(Some("edit".into())))).await.unwrap();

        let versions = backend.versions(p.id).await.unwrap();
        assert_eq!(versions.iter().map(|v| v.version).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(
            backend.version(p.id, 2).await.unwrap().unwrap().note.as_deref(),
            Some("edit")
        );
        assert!(backend.version(p.id, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_filters_and_orders() {
        let backend = MemoryPostBackend::new();
        let mut older = post("older");
        older.updated_at = Utc::now() - Duration::hours(1);
        let mut newer = post("newer");
        newer.status = PostStatus::Published;

        backend.insert(&older, &older.snapshot(None)).await.unwrap();
        backend.insert(&newer, &newer.snapshot(None)).await.unwrap();

        let all = backend.list(None).await.unwrap();
        assert_eq!(all[0].slug, "newer");
        assert_eq!(all[1].slug, "older");

        let drafts = backend.list(Some(PostStatus::Draft)).await.unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].slug, "older");
    }

    #[tokio::test]
    async fn test_delete_removes_history_and_slug() {
        let backend = MemoryPostBackend::new();
        let p = post("gone");
        backend.insert(&p, &p.snapshot(None)).await.unwrap();

        assert!(backend.delete(p.id).await.unwrap());
        assert!(!backend.delete(p.id).await.unwrap());
        assert!(backend.versions(p.id).await.unwrap().is_empty());
        assert!(backend.get_by_slug("gone").await.unwrap().is_none());
    }
}
