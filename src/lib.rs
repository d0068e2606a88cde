// Shared infrastructure
pub mod config;
pub mod error;
pub mod metrics;
pub mod postgres;
pub mod telemetry;

// Domain
pub mod blog;
pub mod post;
pub mod subscriber;
pub mod template;

// Application layer
pub mod api;
pub mod server;
