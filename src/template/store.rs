//! Template storage with CRUD operations

use std::sync::Arc;

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::render::{render_template, Variables};
use super::types::{
    LibraryTemplate, RenderedTemplate, TemplateError, TemplateResult, UpdateTemplateRequest,
};
use super::variables::merge_variables;

/// In-memory template storage
pub struct TemplateStore {
    templates: DashMap<String, LibraryTemplate>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    /// Create a new template store
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    /// Create a new template
    pub fn create(&self, template: LibraryTemplate) -> TemplateResult<LibraryTemplate> {
        template.validate()?;

        match self.templates.entry(template.id.clone()) {
            Entry::Occupied(_) => Err(TemplateError::AlreadyExists(template.id)),
            Entry::Vacant(slot) => {
                slot.insert(template.clone());
                tracing::info!(template_id = %template.id, "Template created");
                Ok(template)
            }
        }
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<LibraryTemplate> {
        self.templates
            .get(id)
            .map(|t| t.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// List all templates, ordered by ID
    pub fn list(&self) -> Vec<LibraryTemplate> {
        let mut templates: Vec<_> = self
            .templates
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        templates.sort_by(|a, b| a.id.cmp(&b.id));
        templates
    }

    /// Update an existing template
    pub fn update(
        &self,
        id: &str,
        updates: UpdateTemplateRequest,
    ) -> TemplateResult<LibraryTemplate> {
        let mut template = self.get(id)?;

        if let Some(name) = updates.name {
            template.name = name;
        }

        if let Some(html) = updates.html {
            template.html = html;
        }

        if let Some(defaults) = updates.default_variables {
            template.default_variables = defaults;
        }

        if let Some(description) = updates.description {
            template.description = description;
        }

        template.updated_at = Utc::now();
        template.validate()?;

        self.templates.insert(id.to_string(), template.clone());
        tracing::info!(template_id = %id, "Template updated");

        Ok(template)
    }

    /// Delete a template by ID
    pub fn delete(&self, id: &str) -> TemplateResult<()> {
        self.templates
            .remove(id)
            .map(|_| tracing::info!(template_id = %id, "Template deleted"))
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Check if a template exists
    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }

    /// Render a template, layering `variables` over its defaults
    pub fn render(
        &self,
        id: &str,
        variables: &Variables,
        tags: &[String],
    ) -> TemplateResult<RenderedTemplate> {
        let template = self.get(id)?;
        let merged = merge_variables(&template.default_variables, variables);

        Ok(RenderedTemplate {
            html: render_template(&template.html, &merged, tags),
            template_id: template.id,
        })
    }
}

/// Create an Arc-wrapped template store
pub fn create_template_store() -> Arc<TemplateStore> {
    Arc::new(TemplateStore::new())
}
