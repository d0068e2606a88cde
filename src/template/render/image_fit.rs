//! Stage 2: `object-fit` injection for image placeholders.
//!
//! A `hero_fit` variable styles every `<img>` whose `src` is the raw
//! `{{hero}}` token, so this stage must run before placeholders are
//! substituted. Tags are matched textually; a `>` inside an attribute value
//! ends the tag early.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::Variables;

/// Suffix that marks a variable as the fit modifier of its sibling.
pub const FIT_SUFFIX: &str = "_fit";

static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").expect("Invalid img tag regex"));

static STYLE_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(\s)style\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid style regex")
});

static OBJECT_FIT_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(^|;)(\s*)object-fit\s*:\s*[^;]*").expect("Invalid object-fit regex")
});

static MAX_WIDTH_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|;)\s*max-width\s*:").expect("Invalid max-width regex")
});

static HEIGHT_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|;)\s*height\s*:").expect("Invalid height regex"));

/// Inject `object-fit` styling into image tags bound to fit-modified variables.
pub fn inject_image_fit(template: &str, variables: &Variables) -> String {
    let mut result = template.to_string();

    for (key, fit) in fit_targets(variables) {
        let Some(src) = src_pattern(key) else {
            continue;
        };

        result = IMG_TAG
            .replace_all(&result, |caps: &Captures| {
                let tag = &caps[0];
                if src.is_match(tag) {
                    apply_fit(tag, fit)
                } else {
                    tag.to_string()
                }
            })
            .into_owned();
    }

    result
}

/// Pairs of `(key, fit)` for every key whose `key_fit` sibling is non-empty.
fn fit_targets(variables: &Variables) -> impl Iterator<Item = (&str, &str)> {
    variables.keys().filter_map(move |key| {
        variables
            .get(&format!("{key}{FIT_SUFFIX}"))
            .filter(|fit| !fit.is_empty())
            .map(|fit| (key.as_str(), fit.as_str()))
    })
}

fn src_pattern(key: &str) -> Option<Regex> {
    let pattern = format!(
        r#"(?i)\ssrc\s*=\s*["']\{{\{{{}\}}\}}["']"#,
        regex::escape(key)
    );
    Regex::new(&pattern).ok()
}

fn apply_fit(tag: &str, fit: &str) -> String {
    let Some(caps) = STYLE_ATTR.captures(tag) else {
        return insert_style(tag, fit);
    };

    let (style, quote) = match (caps.get(2), caps.get(3)) {
        (Some(m), _) => (m.as_str(), '"'),
        (None, Some(m)) => (m.as_str(), '\''),
        (None, None) => return tag.to_string(),
    };

    let whole = match caps.get(0) {
        Some(m) => m,
        None => return tag.to_string(),
    };

    format!(
        "{}{}style={quote}{}{quote}{}",
        &tag[..whole.start()],
        &caps[1],
        rewrite_style(style, fit),
        &tag[whole.end()..]
    )
}

fn rewrite_style(style: &str, fit: &str) -> String {
    let declaration = format!("object-fit: {fit}");

    let mut style = if OBJECT_FIT_DECL.is_match(style) {
        OBJECT_FIT_DECL
            .replace_all(style, |caps: &Captures| {
                format!("{}{}{declaration}", &caps[1], &caps[2])
            })
            .into_owned()
    } else {
        append_declaration(style, &declaration)
    };

    // Email clients strip stylesheets, so the inline style must stand alone.
    if !MAX_WIDTH_DECL.is_match(&style) {
        style = append_declaration(&style, "max-width: 100%");
    }
    if !HEIGHT_DECL.is_match(&style) {
        style = append_declaration(&style, "height: auto");
    }

    style
}

fn append_declaration(style: &str, declaration: &str) -> String {
    let trimmed = style.trim_end();
    if trimmed.is_empty() {
        return format!("{declaration};");
    }

    let separator = if trimmed.ends_with(';') { " " } else { "; " };
    format!("{trimmed}{separator}{declaration};")
}

fn insert_style(tag: &str, fit: &str) -> String {
    let body = tag.strip_suffix('>').unwrap_or(tag);
    let (body, closing) = match body.strip_suffix('/') {
        Some(body) => (body, " />"),
        None => (body, ">"),
    };

    format!(
        "{} style=\"object-fit: {fit}; max-width: 100%; height: auto;\"{closing}",
        body.trim_end()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Variables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_inserts_style_when_missing() {
        let out = inject_image_fit(
            r#"<img src="{{hero}}">"#,
            &vars(&[("hero", "x.png"), ("hero_fit", "cover")]),
        );
        assert_eq!(
            out,
            r#"<img src="{{hero}}" style="object-fit: cover; max-width: 100%; height: auto;">"#
        );
    }

    #[test]
    fn test_inserts_style_before_self_closing() {
        let out = inject_image_fit(
            r#"<img alt="x" src='{{hero}}' />"#,
            &vars(&[("hero", "x.png"), ("hero_fit", "contain")]),
        );
        assert_eq!(
            out,
            r#"<img alt="x" src='{{hero}}' style="object-fit: contain; max-width: 100%; height: auto;" />"#
        );
    }

    #[test]
    fn test_rewrites_existing_object_fit() {
        let out = inject_image_fit(
            r#"<img src="{{hero}}" style="object-fit: contain; color: red;">"#,
            &vars(&[("hero", "x.png"), ("hero_fit", "cover")]),
        );
        assert_eq!(
            out,
            r#"<img src="{{hero}}" style="object-fit: cover; color: red; max-width: 100%; height: auto;">"#
        );
    }

    #[test]
    fn test_appends_object_fit_and_keeps_existing_sizing() {
        let out = inject_image_fit(
            r#"<img src="{{hero}}" style="max-width: 50%; height: 200px">"#,
            &vars(&[("hero", "x.png"), ("hero_fit", "fill")]),
        );
        assert_eq!(
            out,
            r#"<img src="{{hero}}" style="max-width: 50%; height: 200px; object-fit: fill;">"#
        );
    }

    #[test]
    fn test_single_quoted_style_keeps_quote() {
        let out = inject_image_fit(
            r#"<img src="{{hero}}" style='border: 0'>"#,
            &vars(&[("hero", "x.png"), ("hero_fit", "cover")]),
        );
        assert_eq!(
            out,
            r#"<img src="{{hero}}" style='border: 0; object-fit: cover; max-width: 100%; height: auto;'>"#
        );
    }

    #[test]
    fn test_line_height_is_not_a_height_declaration() {
        let out = inject_image_fit(
            r#"<img src="{{hero}}" style="line-height: 1">"#,
            &vars(&[("hero", "x.png"), ("hero_fit", "cover")]),
        );
        assert!(out.contains("height: auto;"));
    }

    #[test]
    fn test_vendor_prefixed_object_fit_is_kept() {
        let out = inject_image_fit(
            r#"<img src="{{hero}}" style="-o-object-fit: fill">"#,
            &vars(&[("hero", "x.png"), ("hero_fit", "cover")]),
        );
        assert_eq!(
            out,
            r#"<img src="{{hero}}" style="-o-object-fit: fill; object-fit: cover; max-width: 100%; height: auto;">"#
        );
    }

    #[test]
    fn test_only_matching_src_is_touched() {
        let template = r#"<img src="{{logo}}"><img src="{{hero}}">"#;
        let out = inject_image_fit(template, &vars(&[("hero", "x"), ("hero_fit", "cover")]));
        assert!(out.starts_with(r#"<img src="{{logo}}">"#));
        assert!(out.ends_with(r#"<img src="{{hero}}" style="object-fit: cover; max-width: 100%; height: auto;">"#));
    }

    #[test]
    fn test_data_src_does_not_match() {
        let template = r#"<img data-src="{{hero}}">"#;
        let out = inject_image_fit(template, &vars(&[("hero", "x"), ("hero_fit", "cover")]));
        assert_eq!(out, template);
    }

    #[test]
    fn test_empty_fit_is_ignored() {
        let template = r#"<img src="{{hero}}">"#;
        let out = inject_image_fit(template, &vars(&[("hero", "x"), ("hero_fit", "")]));
        assert_eq!(out, template);
    }

    #[test]
    fn test_fit_without_base_key_is_ignored() {
        let template = r#"<img src="{{hero}}">"#;
        let out = inject_image_fit(template, &vars(&[("hero_fit", "cover")]));
        assert_eq!(out, template);
    }

    #[test]
    fn test_key_with_regex_metacharacters_is_escaped() {
        let template = r#"<img src="{{a.b}}"><img src="{{axb}}">"#;
        let out = inject_image_fit(template, &vars(&[("a.b", "x"), ("a.b_fit", "cover")]));
        assert!(out.contains(r#"<img src="{{axb}}">"#));
        assert!(out.contains("object-fit: cover"));
    }
}
