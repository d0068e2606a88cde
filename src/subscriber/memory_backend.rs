//! In-memory subscriber backend using DashMap.

use async_trait::async_trait;
use dashmap::DashMap;

use super::backend::{SubscriberBackend, SubscriberResult};
use super::types::Subscriber;

/// In-memory subscriber backend. Subscribers are lost on restart.
#[derive(Default)]
pub struct MemorySubscriberBackend {
    subscribers: DashMap<String, Subscriber>,
}

impl MemorySubscriberBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriberBackend for MemorySubscriberBackend {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, email: &str) -> SubscriberResult<Option<Subscriber>> {
        Ok(self.subscribers.get(email).map(|s| s.clone()))
    }

    async fn save(&self, subscriber: &Subscriber) -> SubscriberResult<()> {
        self.subscribers
            .insert(subscriber.email.clone(), subscriber.clone());
        Ok(())
    }

    async fn delete(&self, email: &str) -> SubscriberResult<bool> {
        Ok(self.subscribers.remove(email).is_some())
    }

    async fn list(&self) -> SubscriberResult<Vec<Subscriber>> {
        let mut subscribers: Vec<Subscriber> = self
            .subscribers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        subscribers.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(subscribers)
    }

    async fn count(&self) -> SubscriberResult<usize> {
        Ok(self.subscribers.len())
    }
}
