//! # ds-content-fs
//!
//! Filesystem implementation of `ContentSource`.
//!
//! ```text
//! content/
//! ├── blog/
//! │   └── <slug>/index.md   # YAML front matter + markdown body
//! └── tools.toml            # [[tools]] declarations
//! ```
//!
//! Besides reading, [`FsContent::create_post`] and [`FsContent::add_tool`]
//! scaffold new entries in the same layout.

mod scaffold;

pub use scaffold::{slugify, CreatedPost, NewPost, NewTool, TOOL_ICONS};

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use ds_core::models::{read_time, BlogPost, Tool};
use ds_core::traits::ContentSource;
use gray_matter::engine::YAML;
use gray_matter::Matter;
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrontMatter {
    title: String,
    #[serde(default)]
    excerpt: String,
    date: String,
    #[serde(default)]
    tags: Vec<String>,
    author: Option<String>,
    cover_image: Option<String>,
    published: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ToolsFile {
    #[serde(default)]
    tools: Vec<Tool>,
}

pub struct FsContent {
    root: PathBuf,
}

impl FsContent {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn blog_dir(&self) -> PathBuf {
        self.root.join("blog")
    }

    fn tools_file(&self) -> PathBuf {
        self.root.join("tools.toml")
    }

    async fn read_post(&self, slug: &str) -> anyhow::Result<Option<BlogPost>> {
        let path = self.blog_dir().join(slug).join("index.md");
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        parse_post(slug, &raw)
            .with_context(|| format!("failed to parse {}", path.display()))
            .map(Some)
    }
}

#[async_trait]
impl ContentSource for FsContent {
    async fn load_posts(&self) -> anyhow::Result<Vec<BlogPost>> {
        let dir = self.blog_dir();
        if !fs::try_exists(&dir).await? {
            tracing::warn!(dir = %dir.display(), "blog directory missing");
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let Some(slug) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            match self.read_post(&slug).await {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => {}
                Err(e) => tracing::warn!(slug = %slug, error = %format!("{e:#}"), "skipping post"),
            }
        }
        Ok(posts)
    }

    async fn load_post(&self, slug: &str) -> anyhow::Result<Option<BlogPost>> {
        if !is_safe_slug(slug) {
            return Ok(None);
        }
        self.read_post(slug).await
    }

    async fn load_tools(&self) -> anyhow::Result<Vec<Tool>> {
        let path = self.tools_file();
        if !fs::try_exists(&path).await? {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path).await?;
        let file: ToolsFile = toml::from_str(&raw)
            .with_context(|| format!("invalid tool declarations in {}", path.display()))?;
        Ok(file.tools)
    }
}

/// A slug must name a single directory below `blog/`.
fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && Path::new(slug).components().count() == 1
        && !slug.contains(['/', '\\'])
}

fn parse_post(slug: &str, raw: &str) -> anyhow::Result<BlogPost> {
    let parsed = Matter::<YAML>::new().parse(raw);
    let fm: FrontMatter = parsed
        .data
        .ok_or_else(|| anyhow::anyhow!("no front matter found"))?
        .deserialize()
        .context("failed to deserialize front matter")?;

    Ok(BlogPost {
        slug: slug.to_string(),
        title: fm.title,
        excerpt: fm.excerpt,
        date: parse_date(&fm.date)?,
        tags: fm.tags,
        author: fm.author,
        cover_image: fm.cover_image,
        published: fm.published.unwrap_or(true),
        read_time: read_time(&parsed.content),
        content: parsed.content,
    })
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
fn parse_date(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("unrecognised date {raw:?}"))?;
    Ok(day.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}
