//! Server-rendered pages.

use askama::Template;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;
use ds_services::blog::{date_categories, related_posts, render_markdown, tag_counts};
use ds_services::tools::{categories, tools_by_tag};
use ds_services::BlogQuery;
use ds_ui::{
    AdminTemplate, BlogIndexTemplate, BlogPostTemplate, HomeTemplate, NotFoundTemplate, PostCard,
    ToolTemplate, ToolsTemplate,
};
use serde::Deserialize;

use crate::AppState;

const HOME_LATEST_POSTS: usize = 3;
const RELATED_POSTS: usize = 3;

fn render<T: Template>(status: StatusCode, page: T) -> Response {
    match page.render() {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "template render failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn missing(message: &str) -> Response {
    render(
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            message: message.to_string(),
        },
    )
}

pub async fn home(State(state): State<AppState>) -> Response {
    let now = Utc::now();
    let posts = state.blog.posts().await;
    let latest = posts.iter().take(HOME_LATEST_POSTS).cloned().collect::<Vec<_>>();
    render(
        StatusCode::OK,
        HomeTemplate {
            latest: PostCard::many(&latest, now),
            tools: state.tools.tools().await,
        },
    )
}

pub async fn blog_index(
    State(state): State<AppState>,
    Query(query): Query<BlogQuery>,
) -> Response {
    let posts = state.blog.posts().await;
    let shown = query.apply(&posts);
    render(
        StatusCode::OK,
        BlogIndexTemplate {
            posts: PostCard::many(&shown, Utc::now()),
            total: posts.len(),
            tags: tag_counts(&posts),
            dates: date_categories(&posts),
            query: query.q.clone().unwrap_or_default(),
            selected_tag: query.tag.clone().unwrap_or_default(),
        },
    )
}

pub async fn blog_post(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    let Some(post) = state.blog.post(&slug).await else {
        return missing("That post does not exist or is not published.");
    };
    let now = Utc::now();
    let all = state.blog.posts().await;
    let related = related_posts(&post, &all, RELATED_POSTS);

    render(
        StatusCode::OK,
        BlogPostTemplate {
            post: PostCard::new(&post, now),
            author: post.author.clone(),
            cover_image: post.cover_image.clone(),
            body_html: render_markdown(&post.content),
            related: PostCard::many(&related, now),
        },
    )
}

#[derive(Debug, Default, Deserialize)]
pub struct ToolsQuery {
    pub tag: Option<String>,
}

pub async fn tools_index(
    State(state): State<AppState>,
    Query(query): Query<ToolsQuery>,
) -> Response {
    let all = state.tools.tools().await;
    let selected = query.tag.as_deref().filter(|t| !t.is_empty());
    let tools = match selected {
        Some(tag) => tools_by_tag(&all, tag),
        None => all.clone(),
    };
    render(
        StatusCode::OK,
        ToolsTemplate {
            categories: categories(&all, selected),
            tools,
        },
    )
}

pub async fn tool_page(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match state.tools.tool(&slug).await {
        Some(tool) => render(StatusCode::OK, ToolTemplate { tool }),
        None => missing("That tool does not exist."),
    }
}

pub async fn admin_page(State(state): State<AppState>) -> Response {
    render(
        StatusCode::OK,
        AdminTemplate {
            mode: state.mode.to_string(),
            data: state.admin.summary().await,
        },
    )
}

pub async fn not_found() -> Response {
    missing("The page you are looking for does not exist.")
}
