//! # ds-api
//!
//! The web routing and orchestration layer for devsite.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pages;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use ds_core::{ContentSource, KvStore};
use ds_services::{
    AdminService, BlogService, CommentService, KeyedLocks, LikeService, ToolService,
};

/// State shared by every handler. Cloning is cheap: all services hold `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub comments: CommentService,
    pub likes: LikeService,
    pub admin: AdminService,
    pub blog: BlogService,
    pub tools: ToolService,
    /// Storage backend label reported as `mode`
    pub mode: &'static str,
}

impl AppState {
    pub fn new(
        kv: Arc<dyn KvStore>,
        content: Arc<dyn ContentSource>,
        known_slugs: Vec<String>,
    ) -> Self {
        let locks = KeyedLocks::new();
        let comments = CommentService::new(kv.clone(), locks.clone());
        let likes = LikeService::new(kv.clone(), locks);
        Self {
            admin: AdminService::new(comments.clone(), likes.clone(), known_slugs),
            comments,
            likes,
            blog: BlogService::new(content.clone()),
            tools: ToolService::new(content),
            mode: kv.backend(),
        }
    }
}

/// Builds the full application: JSON API, HTML pages and the standard
/// middleware stack.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// peer address is available as a last-resort client identity.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/comments/{slug}",
            get(handlers::list_comments)
                .post(handlers::add_comment)
                .delete(handlers::delete_comment),
        )
        .route(
            "/api/likes/{slug}",
            get(handlers::like_count)
                .post(handlers::toggle_like)
                .put(handlers::like_status),
        )
        .route(
            "/api/admin",
            get(handlers::admin_summary).delete(handlers::admin_delete),
        )
        .route("/api/test", get(handlers::api_status));

    let pages = Router::new()
        .route("/", get(pages::home))
        .route("/blog", get(pages::blog_index))
        .route("/blog/{slug}", get(pages::blog_post))
        .route("/tools", get(pages::tools_index))
        .route("/tools/{slug}", get(pages::tool_page))
        .route("/admin", get(pages::admin_page));

    let app = api
        .merge(pages)
        .fallback(pages::not_found)
        .with_state(state);

    middleware::apply_standard_layers(app)
}
