//! Cross-component rendering tests
//!
//! Exercise the template library, post service and subscriber service
//! together through the renderer, using memory backends.

use std::sync::Arc;

use tokio_test::{assert_err, assert_ok};

use blog_cms::blog::post_page;
use blog_cms::post::{CreatePostRequest, MemoryPostBackend, PostService, UpdatePostRequest};
use blog_cms::subscriber::{MemorySubscriberBackend, SubscriberService};
use blog_cms::template::{
    render_template, LibraryTemplate, TemplateStore, UpdateTemplateRequest, Variables,
};

fn vars(pairs: &[(&str, &str)]) -> Variables {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn newsletter_template() -> LibraryTemplate {
    let now = chrono::Utc::now();
    LibraryTemplate {
        id: "monthly".to_string(),
        name: "Monthly newsletter".to_string(),
        html: concat!(
            "<h1>{{headline}}</h1>",
            "<img src=\"{{banner}}\" alt=\"banner\" />",
            "{{#if tag_vip}}<p>Thanks for being a member, {{name}}</p>{{endif}}",
            "{{#if tag_trial}}<p>Your trial ends soon</p>{{/endif}}",
            "<footer>{{footer}}</footer>"
        )
        .to_string(),
        default_variables: vars(&[
            ("headline", "This month"),
            ("footer", "Unsubscribe anytime"),
            ("banner_fit", "contain"),
        ]),
        description: None,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_library_template_per_subscriber() {
    let store = TemplateStore::new();
    assert_ok!(store.create(newsletter_template()));

    let subscribers = SubscriberService::new(Arc::new(MemorySubscriberBackend::new()));
    let vip = assert_ok!(
        subscribers
            .subscribe("vip@example.com", &["VIP".to_string()])
            .await
    );
    let trial = assert_ok!(
        subscribers
            .subscribe("trial@example.com", &["Trial".to_string()])
            .await
    );

    let overrides = vars(&[("banner", "/img/may.png"), ("name", "Ada")]);

    let html = assert_ok!(store.render("monthly", &overrides, &vip.subscriber.tags)).html;
    assert_eq!(
        html,
        concat!(
            "<h1>This month</h1>",
            "<img src=\"/img/may.png\" alt=\"banner\" style=\"object-fit: contain; max-width: 100%; height: auto;\" />",
            "<p>Thanks for being a member, Ada</p>",
            "<footer>Unsubscribe anytime</footer>"
        )
    );

    let html = assert_ok!(store.render("monthly", &overrides, &trial.subscriber.tags)).html;
    assert!(html.contains("<p>Your trial ends soon</p>"));
    assert!(!html.contains("member"));
}

#[tokio::test]
async fn test_template_update_changes_rendering() {
    let store = TemplateStore::new();
    assert_ok!(store.create(newsletter_template()));

    let update = UpdateTemplateRequest {
        default_variables: Some(vars(&[("headline", "New headline")])),
        ..Default::default()
    };
    assert_ok!(store.update("monthly", update));

    let html = assert_ok!(store.render("monthly", &Variables::new(), &[])).html;
    assert!(html.starts_with("<h1>New headline</h1>"));
    // The replaced defaults no longer supply the footer
    assert!(html.contains("<footer>{{footer}}</footer>"));

    assert_err!(store.render("missing", &Variables::new(), &[]));
}

#[tokio::test]
async fn test_post_history_feeds_public_page() {
    let posts = PostService::new(Arc::new(MemoryPostBackend::new()));

    let post = assert_ok!(
        posts
            .create(CreatePostRequest {
                title: "Release notes".to_string(),
                slug: None,
                excerpt: None,
                content: "<p>{{summary}}</p>".to_string(),
                variables: vars(&[("summary", "First cut")]),
                note: None,
            })
            .await
    );

    let update = UpdatePostRequest {
        variables: Some(vars(&[("summary", "Second cut")])),
        ..Default::default()
    };
    let post = assert_ok!(posts.update(post.id, update).await);
    assert_eq!(post.version, 2);

    assert_err!(posts.get_published_by_slug("release-notes").await);
    assert_ok!(posts.publish(post.id).await);

    let live = assert_ok!(posts.get_published_by_slug("release-notes").await);
    let html = post_page("Blog", &live, &[]);
    assert!(html.contains("<p>Second cut</p>"));

    let restored = assert_ok!(posts.restore(post.id, 1).await);
    let html = post_page("Blog", &restored, &[]);
    assert!(html.contains("<p>First cut</p>"));
}

#[test]
fn test_substituted_values_are_not_rescanned() {
    let variables = vars(&[("a", "{{b}}"), ("b", "B"), ("c", "{{#if tag_x}}x{{endif}}")]);

    let html = render_template("{{a}} {{b}} {{c}}", &variables, &["x".to_string()]);
    assert_eq!(html, "{{b}} B {{#if tag_x}}x{{endif}}");
}
