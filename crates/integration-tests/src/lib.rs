//! Shared fixtures for the end-to-end tests: a router backed by the
//! in-memory store and a throwaway content directory.

use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use ds_api::{create_router, AppState};
use ds_content_fs::FsContent;
use ds_kv_memory::MemoryKv;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const KNOWN_SLUGS: [&str; 3] = ["alpha", "beta", "gamma"];

const ALPHA: &str = r#"---
title: "Alpha release notes"
excerpt: "What shipped in alpha"
date: "2024-03-01"
tags: ["Rust", "Release"]
author: "Sam"
---
# Alpha

Some **bold** words.
"#;

const BETA: &str = r#"---
title: "Beta thoughts"
excerpt: "Notes on the beta"
date: "2024-04-15"
tags: ["Rust"]
---
Beta body.
"#;

const DRAFT: &str = r#"---
title: "Unfinished"
date: "2024-05-01"
published: false
---
Not ready.
"#;

const TOOLS: &str = r#"
[[tools]]
slug = "color-palette"
title = "Color Palette Generator"
description = "Build palettes from a base color"
tags = ["Design", "Frontend"]
icon = "Palette"

[[tools]]
slug = "json-formatter"
title = "JSON Formatter"
description = "Pretty-print and validate JSON"
tags = ["Utility"]
icon = "Braces"
"#;

/// A running application plus the handles tests poke at directly.
pub struct TestApp {
    pub router: Router,
    pub kv: Arc<MemoryKv>,
    _content: TempDir,
}

fn write_post(root: &Path, slug: &str, body: &str) -> std::io::Result<()> {
    let dir = root.join("blog").join(slug);
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join("index.md"), body)
}

pub fn spawn_app() -> std::io::Result<TestApp> {
    let content = tempfile::tempdir()?;
    write_post(content.path(), "alpha", ALPHA)?;
    write_post(content.path(), "beta", BETA)?;
    write_post(content.path(), "draft", DRAFT)?;
    std::fs::write(content.path().join("tools.toml"), TOOLS)?;

    let kv = Arc::new(MemoryKv::new());
    let state = AppState::new(
        kv.clone(),
        Arc::new(FsContent::new(content.path())),
        KNOWN_SLUGS.iter().map(|s| s.to_string()).collect(),
    );

    Ok(TestApp {
        router: create_router(state),
        kv,
        _content: content,
    })
}

/// Builds a request, optionally claiming a client address and carrying a
/// JSON body.
pub fn request(method: Method, uri: &str, client: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(addr) = client {
        builder = builder.header("x-forwarded-for", addr);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("test request should be valid")
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, String) {
        let response = match self.router.clone().oneshot(req).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body should be readable");
        (status, String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn send_json(&self, req: Request<Body>) -> (StatusCode, Value) {
        let (status, text) = self.send(req).await;
        let json = serde_json::from_str(&text).unwrap_or(Value::Null);
        (status, json)
    }
}
