//! Stage 1: audience-tag conditional blocks.
//!
//! `{{#if tag_VIP}}...{{endif}}` (or `{{/endif}}`) keeps its trimmed content
//! when the subscriber carries the tag, and collapses to nothing otherwise.
//! Blocks do not nest: the first closing tag ends the block.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static TAG_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\{\{#if tag_([A-Za-z0-9_]+)\}\}(.*?)\{\{/?endif\}\}")
        .expect("Invalid tag block regex")
});

/// Resolve every conditional tag block against the subscriber's tags.
pub fn resolve_tag_blocks(template: &str, tags: &[String]) -> String {
    TAG_BLOCK
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            if has_tag(tags, name) {
                caps[2].trim().to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

fn has_tag(tags: &[String], name: &str) -> bool {
    let name = name.to_lowercase();
    tags.iter().any(|tag| tag.to_lowercase() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_block_kept_when_tag_present() {
        let out = resolve_tag_blocks("{{#if tag_VIP}}Welcome{{endif}}", &tags(&["VIP"]));
        assert_eq!(out, "Welcome");
    }

    #[test]
    fn test_block_removed_when_tag_absent() {
        let out = resolve_tag_blocks("{{#if tag_VIP}}Welcome{{endif}}", &tags(&["Other"]));
        assert_eq!(out, "");
    }

    #[test]
    fn test_tag_match_is_case_insensitive() {
        let out = resolve_tag_blocks("{{#if tag_vip}}Hi{{endif}}", &tags(&["VIP"]));
        assert_eq!(out, "Hi");
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let out = resolve_tag_blocks("{{#IF tag_beta}}On{{ENDIF}}", &tags(&["beta"]));
        assert_eq!(out, "On");
    }

    #[test]
    fn test_slash_endif_closes_block() {
        let out = resolve_tag_blocks("a{{#if tag_x}} b {{/endif}}c", &tags(&["x"]));
        assert_eq!(out, "abc");
    }

    #[test]
    fn test_slash_if_is_not_a_closing_tag() {
        let template = "{{#if tag_x}}body{{/if}}";
        assert_eq!(resolve_tag_blocks(template, &tags(&["x"])), template);
    }

    #[test]
    fn test_content_spans_lines_and_is_trimmed() {
        let template = "<div>{{#if tag_news}}\n  <p>{{name}}</p>\n{{endif}}</div>";
        let out = resolve_tag_blocks(template, &tags(&["news"]));
        assert_eq!(out, "<div><p>{{name}}</p></div>");
    }

    #[test]
    fn test_multiple_blocks_resolved_independently() {
        let template = "{{#if tag_a}}A{{endif}}-{{#if tag_b}}B{{endif}}";
        assert_eq!(resolve_tag_blocks(template, &tags(&["b"])), "-B");
    }

    #[test]
    fn test_unclosed_block_left_unchanged() {
        let template = "{{#if tag_a}}never closed";
        assert_eq!(resolve_tag_blocks(template, &tags(&["a"])), template);
    }

    #[test]
    fn test_non_ascii_tag_name_left_verbatim() {
        let template = "{{#if tag_café}}x{{endif}}";
        assert_eq!(resolve_tag_blocks(template, &tags(&["café"])), template);
    }

    #[test]
    fn test_nested_block_closes_at_first_endif() {
        let template = "{{#if tag_a}}x{{#if tag_b}}y{{endif}}z{{endif}}";
        // Outer block ends at the inner endif; the trailing text survives.
        assert_eq!(resolve_tag_blocks(template, &tags(&["a"])), "x{{#if tag_b}}yz{{endif}}");
    }
}
