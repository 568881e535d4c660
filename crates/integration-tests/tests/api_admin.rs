use axum::http::{Method, StatusCode};
use integration_tests::{request, spawn_app, TestApp};
use serde_json::{json, Value};

async fn comment(app: &TestApp, slug: &str, addr: &str, text: &str) -> String {
    let (_, body) = app
        .send_json(request(
            Method::POST,
            &format!("/api/comments/{slug}"),
            Some(addr),
            Some(json!({ "author": "Ada", "content": text })),
        ))
        .await;
    body["comment"]["id"].as_str().unwrap().to_string()
}

async fn summary(app: &TestApp) -> Value {
    let (status, body) = app
        .send_json(request(Method::GET, "/api/admin", None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    body["data"].clone()
}

#[tokio::test]
async fn test_summary_of_empty_store() {
    let app = spawn_app().unwrap();
    let data = summary(&app).await;
    assert_eq!(data["comments"], json!({}));
    assert_eq!(data["likes"], json!({}));
    assert_eq!(
        data["summary"],
        json!({ "totalComments": 0, "totalLikes": 0, "activeBlogCount": 0 })
    );
}

#[tokio::test]
async fn test_summary_masks_addresses() {
    let app = spawn_app().unwrap();
    comment(&app, "alpha", "203.0.113.77", "one").await;
    comment(&app, "alpha", "203.0.113.78", "two").await;
    app.send_json(request(Method::POST, "/api/likes/beta", Some("198.51.100.200"), None))
        .await;
    // Not a known slug, so never reported.
    comment(&app, "unlisted", "192.0.2.1", "hidden").await;

    let data = summary(&app).await;
    assert_eq!(data["summary"]["totalComments"], 2);
    assert_eq!(data["summary"]["totalLikes"], 1);
    assert_eq!(data["summary"]["activeBlogCount"], 2);

    assert_eq!(data["comments"]["alpha"]["count"], 2);
    assert_eq!(data["comments"]["alpha"]["comments"][0]["userIP"], "203.0.113....");
    assert_eq!(data["likes"]["beta"]["userCount"], 1);
    assert_eq!(data["likes"]["beta"]["userIPs"][0], "198.51.100...");
    assert!(data["comments"].get("unlisted").is_none());
    assert!(data["comments"].get("beta").is_none());
}

#[tokio::test]
async fn test_admin_deletions() {
    let app = spawn_app().unwrap();
    let keep = comment(&app, "alpha", "10.0.0.1", "keep").await;
    let drop = comment(&app, "alpha", "10.0.0.2", "drop").await;
    comment(&app, "beta", "10.0.0.1", "bulk").await;
    app.send_json(request(Method::POST, "/api/likes/beta", Some("10.0.0.1"), None))
        .await;

    let (status, _) = app
        .send_json(request(
            Method::DELETE,
            "/api/admin",
            None,
            Some(json!({ "type": "comment", "slug": "alpha", "id": drop })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    // Unknown id is not an error.
    let (status, _) = app
        .send_json(request(
            Method::DELETE,
            "/api/admin",
            None,
            Some(json!({ "type": "comment", "slug": "alpha", "id": "0-missing" })),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    for kind in ["comments", "likes"] {
        let (status, body) = app
            .send_json(request(
                Method::DELETE,
                "/api/admin",
                None,
                Some(json!({ "type": kind, "slug": "beta" })),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    let data = summary(&app).await;
    assert_eq!(data["summary"]["totalComments"], 1);
    assert_eq!(data["summary"]["totalLikes"], 0);
    assert_eq!(data["summary"]["activeBlogCount"], 1);
    assert_eq!(data["comments"]["alpha"]["comments"][0]["id"], keep);
}

#[tokio::test]
async fn test_admin_delete_requires_parameters() {
    let app = spawn_app().unwrap();
    let cases = [
        json!({}),
        json!({ "type": "likes" }),
        json!({ "slug": "alpha" }),
        json!({ "type": "comment", "slug": "alpha" }),
        json!({ "type": "everything", "slug": "alpha" }),
    ];
    for payload in cases {
        let (status, body) = app
            .send_json(request(Method::DELETE, "/api/admin", None, Some(payload)))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}

#[tokio::test]
async fn test_status_endpoint_reports_mode() {
    let app = spawn_app().unwrap();
    let (status, body) = app
        .send_json(request(Method::GET, "/api/test", None, None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
    assert_eq!(body["remoteStore"], false);
}
