//! # ds-ui
//!
//! Askama page templates and the small view models they render.

use askama::Template;
use chrono::{DateTime, Utc};
use ds_core::models::{BlogPost, Tool};
use ds_services::admin::AdminSummary;
use ds_services::blog::{display_date, DateCategory, TagCount};
use ds_services::tools::ToolCategory;

/// The bits of a post shown in lists and headers.
#[derive(Debug, Clone)]
pub struct PostCard {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub date_display: String,
    pub read_time: u32,
    pub tags: Vec<String>,
}

impl PostCard {
    pub fn new(post: &BlogPost, now: DateTime<Utc>) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            date_display: display_date(post.date, now),
            read_time: post.read_time,
            tags: post.tags.clone(),
        }
    }

    pub fn many(posts: &[BlogPost], now: DateTime<Utc>) -> Vec<Self> {
        posts.iter().map(|p| Self::new(p, now)).collect()
    }
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub latest: Vec<PostCard>,
    pub tools: Vec<Tool>,
}

#[derive(Template)]
#[template(path = "blog_index.html")]
pub struct BlogIndexTemplate {
    pub posts: Vec<PostCard>,
    /// Published posts before filtering
    pub total: usize,
    pub tags: Vec<TagCount>,
    pub dates: Vec<DateCategory>,
    pub query: String,
    pub selected_tag: String,
}

#[derive(Template)]
#[template(path = "blog_post.html")]
pub struct BlogPostTemplate {
    pub post: PostCard,
    pub author: Option<String>,
    pub cover_image: Option<String>,
    /// Rendered markdown, trusted content from the repository
    pub body_html: String,
    pub related: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "tools.html")]
pub struct ToolsTemplate {
    pub tools: Vec<Tool>,
    pub categories: Vec<ToolCategory>,
}

#[derive(Template)]
#[template(path = "tool.html")]
pub struct ToolTemplate {
    pub tool: Tool,
}

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub mode: String,
    pub data: AdminSummary,
}

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post() -> BlogPost {
        BlogPost {
            slug: "hello".into(),
            title: "Hello <World>".into(),
            excerpt: "first".into(),
            content: "# Hi".into(),
            date: "2024-01-01T00:00:00Z".parse().unwrap(),
            tags: vec!["Rust".into()],
            author: Some("Kim".into()),
            cover_image: None,
            published: true,
            read_time: 3,
        }
    }

    #[test]
    fn test_post_page_escapes_title_but_not_body() {
        let now = "2024-06-01T00:00:00Z".parse().unwrap();
        let page = BlogPostTemplate {
            post: PostCard::new(&post(), now),
            author: Some("Kim".into()),
            cover_image: None,
            body_html: "<h1>Hi</h1>".into(),
            related: vec![],
        };
        let html = page.render().unwrap();
        assert!(html.contains("Hello &#60;World&#62;") || html.contains("Hello &lt;World&gt;"));
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains(r#"data-slug="hello""#));
        assert!(html.contains("January 1, 2024"));
        assert!(!html.contains("Related posts"));
    }

    #[test]
    fn test_blog_index_lists_cards() {
        let now = "2024-01-03T00:00:00Z".parse().unwrap();
        let page = BlogIndexTemplate {
            posts: PostCard::many(&[post()], now),
            total: 1,
            tags: vec![TagCount { name: "Rust".into(), count: 1 }],
            dates: vec![DateCategory { year: 2024, month: 1, count: 1 }],
            query: String::new(),
            selected_tag: "Rust".into(),
        };
        let html = page.render().unwrap();
        assert!(html.contains(r#"href="/blog/hello""#));
        assert!(html.contains("2024-01"));
        assert!(html.contains("2 days ago"));
    }

    #[test]
    fn test_admin_page_renders_empty_summary() {
        let page = AdminTemplate {
            mode: "memory".into(),
            data: AdminSummary::default(),
        };
        let html = page.render().unwrap();
        assert!(html.contains("Storage: memory"));
        assert!(html.contains("No comments yet."));
    }
}
