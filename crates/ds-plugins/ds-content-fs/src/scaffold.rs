//! Writing new content: a post skeleton under `blog/<slug>/` and tool
//! declarations appended to `tools.toml`.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::NaiveDate;
use ds_core::models::Tool;
use ds_core::traits::ContentSource;
use serde_json::Value;
use tokio::fs;

use crate::{is_safe_slug, FsContent, ToolsFile};

/// Icon names the tool cards know how to draw.
pub const TOOL_ICONS: [&str; 10] = [
    "Code2",
    "Palette",
    "Database",
    "Zap",
    "Terminal",
    "FileText",
    "Image",
    "Calculator",
    "Hash",
    "Link",
];

#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub author: Option<String>,
    /// Derived from the title when absent
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewTool {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub icon: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPost {
    pub slug: String,
    /// The new `index.md`
    pub path: PathBuf,
}

/// Lowercases `title`, drops everything but ASCII letters, digits, `_` and
/// `-`, and joins words with single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() || ch == '_' {
            slug.push(ch);
        } else if (ch.is_whitespace() || ch == '-') && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

fn resolve_slug(explicit: Option<&str>, title: &str) -> anyhow::Result<String> {
    let slug = match explicit.map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => slug.to_string(),
        None => slugify(title),
    };
    if slug.is_empty() {
        bail!("cannot derive a slug from {title:?}, pass one explicitly");
    }
    if !is_safe_slug(&slug) {
        bail!("invalid slug {slug:?}");
    }
    Ok(slug)
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// A double-quoted YAML scalar. JSON string syntax is valid YAML.
fn quoted(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn post_markdown(post: &NewPost, tags: Vec<String>, date: NaiveDate) -> String {
    let mut out = String::from("---\n");
    out.push_str(&format!("title: {}\n", quoted(post.title.trim())));
    out.push_str(&format!("excerpt: {}\n", quoted(post.excerpt.trim())));
    out.push_str(&format!("date: \"{}\"\n", date.format("%Y-%m-%d")));
    out.push_str(&format!("tags: {}\n", Value::from(tags)));
    if let Some(author) = post.author.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        out.push_str(&format!("author: {}\n", quoted(author)));
    }
    out.push_str("published: true\n---\n\n");
    out.push_str(&format!("# {}\n\n", post.title.trim()));
    if !post.excerpt.trim().is_empty() {
        out.push_str(&format!("{}\n\n", post.excerpt.trim()));
    }
    out.push_str("## Overview\n\nWrite the post here.\n\n## Conclusion\n\nWrap up here.\n");
    out
}

impl FsContent {
    /// Creates `blog/<slug>/index.md` dated `today`. An existing post with
    /// the same slug is never overwritten.
    pub async fn create_post(&self, post: &NewPost, today: NaiveDate) -> anyhow::Result<CreatedPost> {
        if post.title.trim().is_empty() {
            bail!("a post needs a title");
        }
        let slug = resolve_slug(post.slug.as_deref(), &post.title)?;

        let blog = self.blog_dir();
        fs::create_dir_all(&blog)
            .await
            .with_context(|| format!("failed to create {}", blog.display()))?;

        let dir = blog.join(&slug);
        match fs::create_dir(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                bail!("a post with slug {slug:?} already exists")
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to create {}", dir.display()));
            }
        }

        let path = dir.join("index.md");
        fs::write(&path, post_markdown(post, clean_tags(&post.tags), today))
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::info!(slug = %slug, path = %path.display(), "post created");
        Ok(CreatedPost { slug, path })
    }

    /// Appends a `[[tools]]` entry to `tools.toml`, keeping what is already
    /// there. Fails if the slug is taken or the icon is unknown.
    pub async fn add_tool(&self, tool: &NewTool) -> anyhow::Result<Tool> {
        if tool.title.trim().is_empty() {
            bail!("a tool needs a title");
        }
        if !TOOL_ICONS.contains(&tool.icon.as_str()) {
            bail!("unknown icon {:?}, expected one of {}", tool.icon, TOOL_ICONS.join(", "));
        }
        let slug = resolve_slug(tool.slug.as_deref(), &tool.title)?;

        let existing = self.load_tools().await?;
        if existing.iter().any(|t| t.slug == slug) {
            bail!("a tool with slug {slug:?} already exists");
        }

        let created = Tool {
            slug,
            title: tool.title.trim().to_string(),
            description: tool.description.trim().to_string(),
            tags: clean_tags(&tool.tags),
            icon: tool.icon.clone(),
        };
        let entry = toml::to_string(&ToolsFile {
            tools: vec![created.clone()],
        })
        .context("failed to encode tool declaration")?;

        let path = self.tools_file();
        let mut raw = if fs::try_exists(&path).await? {
            fs::read_to_string(&path).await?
        } else {
            String::new()
        };
        if !raw.is_empty() {
            if !raw.ends_with('\n') {
                raw.push('\n');
            }
            raw.push('\n');
        }
        raw.push_str(&entry);
        fs::write(&path, raw)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;

        tracing::info!(slug = %created.slug, "tool declared");
        Ok(created)
    }
}
