//! HTML template system.
//!
//! This module provides:
//! - The rendering pipeline for `{{variable}}`, `{{#if tag_X}}` and
//!   `K_fit` image markup ([`render_template`])
//! - A library of named, reusable templates with default variables
//! - Helpers turning JSON variable maps into renderer input
//!
//! # Example
//!
//! ```ignore
//! let store = TemplateStore::new();
//! store.create(LibraryTemplate {
//!     id: "weekly".to_string(),
//!     name: "Weekly digest".to_string(),
//!     html: "<h1>{{headline}}</h1>{{#if tag_vip}}<p>Early access</p>{{endif}}".to_string(),
//!     ..
//! })?;
//!
//! let rendered = store.render("weekly", &variables, &subscriber.tags)?;
//! ```

pub mod render;
mod store;
mod types;
pub mod variables;

pub use render::{render_template, Variables};
pub use store::{create_template_store, TemplateStore};
pub use types::{
    CreateTemplateRequest, LibraryTemplate, RenderedTemplate, TemplateError,
    TemplateListResponse, TemplateResult, UpdateTemplateRequest, MAX_TEMPLATE_BYTES,
};
pub use variables::{merge_variables, variables_from_json};
