//! Newsletter subscription rules on top of a subscriber backend.

use std::sync::Arc;

use chrono::Utc;

use crate::metrics::SubscriberMetrics;

use super::backend::{SubscriberBackend, SubscriberError, SubscriberResult};
use super::types::{normalize_email, normalize_tags, Subscriber};

/// Outcome of [`SubscriberService::subscribe`].
#[derive(Debug, Clone)]
pub struct SubscribeOutcome {
    pub subscriber: Subscriber,
    pub created: bool,
}

#[derive(Clone)]
pub struct SubscriberService {
    backend: Arc<dyn SubscriberBackend>,
}

impl SubscriberService {
    pub fn new(backend: Arc<dyn SubscriberBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_type(&self) -> &'static str {
        self.backend.backend_type()
    }

    /// Subscribe an address. Subscribing again merges the new tags into the
    /// existing ones instead of failing.
    #[tracing::instrument(name = "subscriber.subscribe", skip(self, tags))]
    pub async fn subscribe(&self, email: &str, tags: &[String]) -> SubscriberResult<SubscribeOutcome> {
        let email = normalize_email(email).map_err(SubscriberError::Validation)?;
        let tags = normalize_tags(tags).map_err(SubscriberError::Validation)?;
        let now = Utc::now();

        let (subscriber, created) = match self.backend.get(&email).await? {
            Some(mut existing) => {
                let merged = existing.tags.iter().chain(tags.iter());
                existing.tags = normalize_tags(merged).map_err(SubscriberError::Validation)?;
                existing.updated_at = now;
                (existing, false)
            }
            None => (
                Subscriber {
                    email,
                    tags,
                    subscribed_at: now,
                    updated_at: now,
                },
                true,
            ),
        };

        self.backend.save(&subscriber).await?;

        if created {
            SubscriberMetrics::record_subscribed();
            tracing::info!(email = %subscriber.email, "Subscriber added");
        } else {
            tracing::debug!(email = %subscriber.email, "Existing subscriber re-subscribed");
        }

        Ok(SubscribeOutcome {
            subscriber,
            created,
        })
    }

    pub async fn get(&self, email: &str) -> SubscriberResult<Subscriber> {
        let email = normalize_email(email).map_err(SubscriberError::Validation)?;
        self.backend
            .get(&email)
            .await?
            .ok_or(SubscriberError::NotFound(email))
    }

    /// Subscribers ordered by email, optionally only those carrying `tag`
    /// (case-insensitive).
    pub async fn list(&self, tag: Option<&str>) -> SubscriberResult<Vec<Subscriber>> {
        let subscribers = self.backend.list().await?;

        let Some(tag) = tag.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(subscribers);
        };

        let tag = tag.to_lowercase();
        Ok(subscribers
            .into_iter()
            .filter(|s| s.tags.iter().any(|t| t.to_lowercase() == tag))
            .collect())
    }

    /// Replace a subscriber's tags.
    pub async fn set_tags(&self, email: &str, tags: &[String]) -> SubscriberResult<Subscriber> {
        let mut subscriber = self.get(email).await?;
        subscriber.tags = normalize_tags(tags).map_err(SubscriberError::Validation)?;
        subscriber.updated_at = Utc::now();

        self.backend.save(&subscriber).await?;
        tracing::info!(email = %subscriber.email, tags = ?subscriber.tags, "Subscriber tags replaced");
        Ok(subscriber)
    }

    pub async fn unsubscribe(&self, email: &str) -> SubscriberResult<()> {
        let email = normalize_email(email).map_err(SubscriberError::Validation)?;
        if !self.backend.delete(&email).await? {
            return Err(SubscriberError::NotFound(email));
        }

        SubscriberMetrics::record_unsubscribed();
        tracing::info!(email = %email, "Subscriber removed");
        Ok(())
    }

    pub async fn count(&self) -> SubscriberResult<usize> {
        self.backend.count().await
    }
}
