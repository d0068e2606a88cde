//! Newsletter subscribers and their audience tags.
//!
//! Tags feed the `{{#if tag_X}}` blocks of the template renderer when a
//! newsletter is previewed for a subscriber.

mod backend;
mod factory;
mod memory_backend;
mod postgres_backend;
mod service;
mod types;

pub use backend::{SubscriberBackend, SubscriberError, SubscriberResult};
pub use factory::create_subscriber_backend;
pub use memory_backend::MemorySubscriberBackend;
pub use postgres_backend::PostgresSubscriberBackend;
pub use service::{SubscribeOutcome, SubscriberService};
pub use types::{
    normalize_email, normalize_tags, SetTagsRequest, SubscribeRequest, SubscribeResponse,
    Subscriber, SubscriberListResponse, MAX_EMAIL_LEN, MAX_TAG_LEN,
};
