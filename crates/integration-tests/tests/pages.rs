use axum::http::{Method, StatusCode};
use integration_tests::{request, spawn_app};

#[tokio::test]
async fn test_home_lists_posts_and_tools() {
    let app = spawn_app().unwrap();
    let (status, html) = app.send(request(Method::GET, "/", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Beta thoughts"));
    assert!(html.contains("Alpha release notes"));
    assert!(html.contains("Color Palette Generator"));
    assert!(!html.contains("Unfinished"));
}

#[tokio::test]
async fn test_blog_index_filters_by_tag_and_search() {
    let app = spawn_app().unwrap();

    let (status, html) = app
        .send(request(Method::GET, "/blog?tag=Release", None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"href="/blog/alpha""#));
    assert!(!html.contains(r#"href="/blog/beta""#));

    let (_, html) = app
        .send(request(Method::GET, "/blog?q=beta", None, None))
        .await;
    assert!(html.contains(r#"href="/blog/beta""#));
    assert!(!html.contains(r#"href="/blog/alpha""#));
}

#[tokio::test]
async fn test_blog_index_accepts_loose_date_params() {
    let app = spawn_app().unwrap();

    let (status, html) = app
        .send(request(Method::GET, "/blog?year=&month=", None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"href="/blog/alpha""#));
    assert!(html.contains(r#"href="/blog/beta""#));

    let (status, html) = app
        .send(request(Method::GET, "/blog?year=abc", None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("No posts match."));

    let (_, html) = app
        .send(request(Method::GET, "/blog?year=2024&month=04", None, None))
        .await;
    assert!(html.contains(r#"href="/blog/beta""#));
    assert!(!html.contains(r#"href="/blog/alpha""#));
}

#[tokio::test]
async fn test_post_page_renders_markdown() {
    let app = spawn_app().unwrap();
    let (status, html) = app
        .send(request(Method::GET, "/blog/alpha", None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<strong>bold</strong>"));
    assert!(html.contains(r#"data-slug="alpha""#));
}

#[tokio::test]
async fn test_missing_pages_are_404() {
    let app = spawn_app().unwrap();
    for uri in ["/blog/draft", "/blog/nope", "/tools/nope", "/no/such/page"] {
        let (status, html) = app.send(request(Method::GET, uri, None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert!(html.contains("Not found"), "{uri}");
    }
}

#[tokio::test]
async fn test_tools_pages() {
    let app = spawn_app().unwrap();
    let (status, html) = app
        .send(request(Method::GET, "/tools?tag=Utility", None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("JSON Formatter"));
    assert!(!html.contains(r#"href="/tools/color-palette""#));

    let (status, html) = app
        .send(request(Method::GET, "/tools/color-palette", None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("coming soon"));
}

#[tokio::test]
async fn test_admin_page_renders() {
    let app = spawn_app().unwrap();
    let (status, html) = app.send(request(Method::GET, "/admin", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Storage: memory"));
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let app = spawn_app().unwrap();
    let response = tower::ServiceExt::oneshot(
        app.router.clone(),
        request(Method::GET, "/api/test", None, None),
    )
    .await
    .unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
