//! Server-side rendered public blog pages.
//!
//! Post bodies go through the template renderer; everything else that ends
//! up in the page (titles, excerpts, the blog name) is escaped here.

use chrono::{DateTime, Utc};

use crate::metrics::{RenderMetrics, RenderSource};
use crate::post::Post;
use crate::template::{render_template, Variables};

/// Escape text for use in HTML content and double-quoted attributes.
pub fn html_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Split a `?tags=a,b` query value into tags, dropping blanks.
pub fn parse_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn format_date(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Wrap a page body in the site shell. `body` is inserted as-is.
pub fn page_shell(blog_title: &str, page_title: Option<&str>, body: &str) -> String {
    let blog_title = html_escape(blog_title);
    let head_title = match page_title {
        Some(title) => format!("{} | {}", html_escape(title), blog_title),
        None => blog_title.clone(),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{head_title}</title>\n</head>\n<body>\n\
         <header><a href=\"/blog\">{blog_title}</a></header>\n\
         <main>\n{body}\n</main>\n</body>\n</html>\n"
    )
}

/// Index of published posts, in the order given.
pub fn index_page(blog_title: &str, posts: &[Post]) -> String {
    let mut body = String::from("<h1>Posts</h1>\n");

    if posts.is_empty() {
        body.push_str("<p>No posts yet.</p>");
        return page_shell(blog_title, None, &body);
    }

    body.push_str("<ul class=\"posts\">\n");
    for post in posts {
        body.push_str(&format!(
            "<li><a href=\"/blog/{}\">{}</a>",
            html_escape(&post.slug),
            html_escape(&post.title)
        ));
        if let Some(published_at) = post.published_at {
            body.push_str(&format!(
                " <time datetime=\"{}\">{}</time>",
                published_at.to_rfc3339(),
                format_date(published_at)
            ));
        }
        if let Some(excerpt) = post.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
            body.push_str(&format!("<p>{}</p>", html_escape(excerpt)));
        }
        body.push_str("</li>\n");
    }
    body.push_str("</ul>");

    page_shell(blog_title, None, &body)
}

/// The post's own variables plus `title`, `slug` and `published_at`
/// where the post does not define them.
pub fn post_variables(post: &Post) -> Variables {
    let mut variables = post.variables.clone();
    variables
        .entry("title".to_string())
        .or_insert_with(|| post.title.clone());
    variables
        .entry("slug".to_string())
        .or_insert_with(|| post.slug.clone());
    if let Some(published_at) = post.published_at {
        variables
            .entry("published_at".to_string())
            .or_insert_with(|| format_date(published_at));
    }
    variables
}

/// Full page for a published post, rendered for a reader with `tags`.
pub fn post_page(blog_title: &str, post: &Post, tags: &[String]) -> String {
    let variables = post_variables(post);
    let content = RenderMetrics::observe(RenderSource::Blog, || {
        render_template(&post.content, &variables, tags)
    });

    let body = format!(
        "<article>\n<h1>{}</h1>\n{}\n</article>",
        html_escape(&post.title),
        content
    );
    page_shell(blog_title, Some(&post.title), &body)
}

pub fn not_found_page(blog_title: &str) -> String {
    page_shell(
        blog_title,
        Some("Not found"),
        "<h1>Not found</h1>\n<p>This post does not exist. <a href=\"/blog\">Back to all posts</a></p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostStatus;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn post(slug: &str, title: &str, content: &str) -> Post {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        Post {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            title: title.to_string(),
            excerpt: None,
            content: content.to_string(),
            variables: Variables::new(),
            status: PostStatus::Published,
            version: 1,
            created_at: at,
            updated_at: at,
            published_at: Some(at),
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(Some("vip, beta,,")), vec!["vip", "beta"]);
        assert!(parse_tags(Some(" ")).is_empty());
        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn test_index_escapes_and_links() {
        let mut p = post("first", "Fish & Chips", "");
        p.excerpt = Some("<b>tasty</b>".to_string());

        let html = index_page("My <Blog>", &[p]);
        assert!(html.contains("<title>My &lt;Blog&gt;</title>"));
        assert!(html.contains("<a href=\"/blog/first\">Fish &amp; Chips</a>"));
        assert!(html.contains("<p>&lt;b&gt;tasty&lt;/b&gt;</p>"));
        assert!(html.contains("2024-03-09"));
    }

    #[test]
    fn test_index_empty() {
        let html = index_page("Blog", &[]);
        assert!(html.contains("No posts yet."));
    }

    #[test]
    fn test_post_variables_do_not_override() {
        let mut p = post("hello", "Hello", "");
        p.variables.insert("title".to_string(), "Custom".to_string());

        let variables = post_variables(&p);
        assert_eq!(variables["title"], "Custom");
        assert_eq!(variables["slug"], "hello");
        assert_eq!(variables["published_at"], "2024-03-09");
    }

    #[test]
    fn test_post_page_renders_content() {
        let mut p = post(
            "hello",
            "Hello",
            "<p>{{title}} by {{author}}</p>{{#if tag_vip}}<p>VIP</p>{{endif}}",
        );
        p.variables.insert("author".to_string(), "Ada".to_string());

        let html = post_page("Blog", &p, &[]);
        assert!(html.contains("<p>Hello by Ada</p>"));
        assert!(!html.contains("VIP"));
        assert!(html.contains("<title>Hello | Blog</title>"));

        let html = post_page("Blog", &p, &["VIP".to_string()]);
        assert!(html.contains("<p>VIP</p>"));
    }

    #[test]
    fn test_not_found_page() {
        let html = not_found_page("Blog");
        assert!(html.contains("<h1>Not found</h1>"));
    }
}
