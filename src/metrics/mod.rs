//! Prometheus metrics for the blog CMS.
//!
//! - Render metrics (renders by source, render duration)
//! - Post metrics (publishing, versions, totals)
//! - Subscriber metrics (subscribe/unsubscribe, totals)

mod helpers;

pub use helpers::{encode_metrics, PostMetrics, RenderMetrics, RenderSource, SubscriberMetrics};

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    HistogramVec, IntCounter, IntCounterVec, IntGauge,
};

/// Prefix for all metrics
const METRIC_PREFIX: &str = "blog_cms";

lazy_static! {
    // ============================================================================
    // Render Metrics
    // ============================================================================

    /// Templates rendered, by where the template came from
    pub static ref RENDERS_TOTAL: IntCounterVec = register_int_counter_vec!(
        format!("{}_renders_total", METRIC_PREFIX),
        "Total templates rendered",
        &["source"]
    ).unwrap();

    /// Time spent in the render pipeline
    pub static ref RENDER_DURATION: HistogramVec = register_histogram_vec!(
        format!("{}_render_duration_seconds", METRIC_PREFIX),
        "Template render duration in seconds",
        &["source"],
        vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1]
    ).unwrap();

    // ============================================================================
    // Post Metrics
    // ============================================================================

    /// Posts moved to published
    pub static ref POSTS_PUBLISHED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_posts_published_total", METRIC_PREFIX),
        "Total post publish transitions"
    ).unwrap();

    /// Posts moved back to draft
    pub static ref POSTS_UNPUBLISHED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_posts_unpublished_total", METRIC_PREFIX),
        "Total post unpublish transitions"
    ).unwrap();

    /// Post versions written (creates, content edits, restores)
    pub static ref POST_VERSIONS_CREATED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_post_versions_created_total", METRIC_PREFIX),
        "Total post versions created"
    ).unwrap();

    /// Stored posts, refreshed on scrape
    pub static ref POSTS_TOTAL: IntGauge = register_int_gauge!(
        format!("{}_posts_total", METRIC_PREFIX),
        "Number of stored posts"
    ).unwrap();

    // ============================================================================
    // Subscriber Metrics
    // ============================================================================

    pub static ref SUBSCRIBERS_SUBSCRIBED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_subscribers_subscribed_total", METRIC_PREFIX),
        "Total new newsletter subscriptions"
    ).unwrap();

    pub static ref SUBSCRIBERS_UNSUBSCRIBED_TOTAL: IntCounter = register_int_counter!(
        format!("{}_subscribers_unsubscribed_total", METRIC_PREFIX),
        "Total newsletter unsubscriptions"
    ).unwrap();

    /// Stored subscribers, refreshed on scrape
    pub static ref SUBSCRIBERS_TOTAL: IntGauge = register_int_gauge!(
        format!("{}_subscribers_total", METRIC_PREFIX),
        "Number of newsletter subscribers"
    ).unwrap();
}
