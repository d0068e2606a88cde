//! Library template types and error definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::render::Variables;
use super::variables::{deserialize_optional_variables, deserialize_variables, double_option};

/// Largest accepted template body, in bytes.
pub const MAX_TEMPLATE_BYTES: usize = 1024 * 1024;

/// Template-specific error type
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Template already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid template ID: {0}")]
    InvalidId(String),

    #[error("Invalid template: {0}")]
    InvalidTemplate(String),
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// A reusable HTML template, e.g. a newsletter layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryTemplate {
    /// Unique template identifier (alphanumeric, dash, underscore)
    pub id: String,

    /// Human-readable template name
    pub name: String,

    /// HTML body with {{variable}} and {{#if tag_X}} markup
    pub html: String,

    /// Values used for placeholders the caller does not supply
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub default_variables: Variables,

    /// Template description (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl LibraryTemplate {
    /// Validate the template
    pub fn validate(&self) -> TemplateResult<()> {
        if self.id.is_empty() || self.id.len() > 64 {
            return Err(TemplateError::InvalidId(
                "ID must be 1-64 characters".to_string(),
            ));
        }

        if !self
            .id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(TemplateError::InvalidId(
                "ID must contain only alphanumeric, dash, or underscore".to_string(),
            ));
        }

        if self.name.is_empty() || self.name.len() > 256 {
            return Err(TemplateError::InvalidTemplate(
                "Name must be 1-256 characters".to_string(),
            ));
        }

        if self.html.trim().is_empty() {
            return Err(TemplateError::InvalidTemplate(
                "HTML body must not be empty".to_string(),
            ));
        }

        if self.html.len() > MAX_TEMPLATE_BYTES {
            return Err(TemplateError::InvalidTemplate(format!(
                "HTML body must be at most {} bytes",
                MAX_TEMPLATE_BYTES
            )));
        }

        Ok(())
    }
}

/// Request to create a new template
#[derive(Debug, Deserialize)]
pub struct CreateTemplateRequest {
    pub id: String,
    pub name: String,
    pub html: String,
    #[serde(default, deserialize_with = "deserialize_variables")]
    pub default_variables: Variables,
    pub description: Option<String>,
}

impl From<CreateTemplateRequest> for LibraryTemplate {
    fn from(req: CreateTemplateRequest) -> Self {
        let now = Utc::now();
        LibraryTemplate {
            id: req.id,
            name: req.name,
            html: req.html,
            default_variables: req.default_variables,
            description: req.description,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Request to update an existing template
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,

    pub html: Option<String>,

    /// Replaces the whole default set when present
    #[serde(default, deserialize_with = "deserialize_optional_variables")]
    pub default_variables: Option<Variables>,

    /// Template description (optional, use null to clear)
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
}

/// Response for listing templates
#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub templates: Vec<LibraryTemplate>,
    pub total: usize,
}

/// Output of rendering a library template
#[derive(Debug, Clone, Serialize)]
pub struct RenderedTemplate {
    pub template_id: String,
    pub html: String,
}
