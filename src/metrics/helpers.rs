//! Metrics helper structs for convenient metric recording

use std::time::Instant;

use prometheus::{Encoder, TextEncoder};

use super::{
    POSTS_PUBLISHED_TOTAL, POSTS_TOTAL, POSTS_UNPUBLISHED_TOTAL, POST_VERSIONS_CREATED_TOTAL,
    RENDERS_TOTAL, RENDER_DURATION, SUBSCRIBERS_SUBSCRIBED_TOTAL, SUBSCRIBERS_TOTAL,
    SUBSCRIBERS_UNSUBSCRIBED_TOTAL,
};

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}

/// Where a rendered template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSource {
    /// Template supplied inline with the request
    Adhoc,
    /// Stored library template
    Library,
    /// Post content rendered through the admin API
    Post,
    Newsletter,
    /// Public blog page
    Blog,
}

impl RenderSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderSource::Adhoc => "adhoc",
            RenderSource::Library => "library",
            RenderSource::Post => "post",
            RenderSource::Newsletter => "newsletter",
            RenderSource::Blog => "blog",
        }
    }
}

/// Helper struct for recording render metrics
pub struct RenderMetrics;

impl RenderMetrics {
    /// Run a render, counting it and timing it under `source`.
    pub fn observe<T>(source: RenderSource, render: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let output = render();

        let label = source.as_str();
        RENDER_DURATION
            .with_label_values(&[label])
            .observe(start.elapsed().as_secs_f64());
        RENDERS_TOTAL.with_label_values(&[label]).inc();
        output
    }
}

/// Helper struct for recording post metrics
pub struct PostMetrics;

impl PostMetrics {
    pub fn record_version_created() {
        POST_VERSIONS_CREATED_TOTAL.inc();
    }

    pub fn record_published() {
        POSTS_PUBLISHED_TOTAL.inc();
    }

    pub fn record_unpublished() {
        POSTS_UNPUBLISHED_TOTAL.inc();
    }

    /// Update the stored post gauge (call on scrape)
    pub fn set_total(count: usize) {
        POSTS_TOTAL.set(count as i64);
    }
}

/// Helper struct for recording subscriber metrics
pub struct SubscriberMetrics;

impl SubscriberMetrics {
    pub fn record_subscribed() {
        SUBSCRIBERS_SUBSCRIBED_TOTAL.inc();
    }

    pub fn record_unsubscribed() {
        SUBSCRIBERS_UNSUBSCRIBED_TOTAL.inc();
    }

    /// Update the subscriber gauge (call on scrape)
    pub fn set_total(count: usize) {
        SUBSCRIBERS_TOTAL.set(count as i64);
    }
}
