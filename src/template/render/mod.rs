//! HTML template rendering pipeline.
//!
//! Rendering runs three pure string passes in a fixed order:
//!
//! 1. [`resolve_tag_blocks`]: `{{#if tag_X}}...{{endif}}` blocks are kept or
//!    dropped according to the subscriber's tags.
//! 2. [`inject_image_fit`]: `<img src="{{K}}">` tags pick up an inline
//!    `object-fit` style when a `K_fit` variable is set.
//! 3. [`substitute_placeholders`]: `{{K}}` tokens are replaced by values.
//!
//! Conditional content may contain placeholders because substitution runs
//! last. None of the stages fail: anything they do not recognise is left in
//! place.

mod conditional;
mod image_fit;
mod placeholder;

use std::collections::BTreeMap;

pub use conditional::resolve_tag_blocks;
pub use image_fit::{inject_image_fit, FIT_SUFFIX};
pub use placeholder::substitute_placeholders;

/// Template variables, keyed by placeholder name.
pub type Variables = BTreeMap<String, String>;

/// Render an HTML template for an audience carrying `tags`.
pub fn render_template(template: &str, variables: &Variables, tags: &[String]) -> String {
    let resolved = resolve_tag_blocks(template, tags);
    let fitted = inject_image_fit(&resolved, variables);
    substitute_placeholders(&fitted, variables)
}
