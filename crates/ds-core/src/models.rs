//! # Domain Models
//!
//! These structs represent the core entities of devsite.
//! Persisted records keep the camelCase field names already in the store
//! (`userIP`, `userLikes`) so existing key-value data stays readable.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum author name length, in characters, after trimming.
pub const MAX_AUTHOR_CHARS: usize = 50;
/// Maximum comment body length, in characters, after trimming.
pub const MAX_CONTENT_CHARS: usize = 1000;

/// A single reader comment on a blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// `<unix-millis>-<random suffix>`, unique within a post
    pub id: String,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Address of the submitter. Only used for delete authorization and the
    /// masked admin view; never sent to readers.
    #[serde(rename = "userIP")]
    pub user_ip: String,
}

impl Comment {
    /// Builds a comment stamped with the current time and a fresh id.
    /// Callers are expected to have validated and trimmed the inputs.
    pub fn new(author: String, content: String, user_ip: String) -> Self {
        let timestamp = Utc::now().trunc_subsecs(3);
        let suffix = Uuid::new_v4().simple().to_string();
        Self {
            id: format!("{}-{}", timestamp.timestamp_millis(), &suffix[..9]),
            author,
            content,
            timestamp,
            user_ip,
        }
    }

    /// The reader-facing projection of this comment.
    pub fn to_public(&self) -> PublicComment {
        PublicComment {
            id: self.id.clone(),
            author: self.author.clone(),
            content: self.content.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// A comment with the submitter address stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicComment {
    pub id: String,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// All comments of one post, stored under `comments:<slug>`.
///
/// `count` always equals `comments.len()` once any method here has run;
/// a stale count in stored data is corrected on the next mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentCollection {
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub count: usize,
}

impl CommentCollection {
    pub fn key(slug: &str) -> String {
        format!("comments:{slug}")
    }

    pub fn push(&mut self, comment: Comment) {
        self.comments.push(comment);
        self.count = self.comments.len();
    }

    pub fn find(&self, id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == id)
    }

    /// Removes the comment with `id`, returning it if it existed.
    pub fn remove(&mut self, id: &str) -> Option<Comment> {
        let idx = self.comments.iter().position(|c| c.id == id)?;
        let removed = self.comments.remove(idx);
        self.count = self.comments.len();
        Some(removed)
    }

    /// Comments ordered newest first.
    pub fn newest_first(&self) -> Vec<Comment> {
        let mut sorted = self.comments.clone();
        sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sorted
    }

    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

/// Like state of one post, stored under `likes:<slug>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LikeRecord {
    #[serde(default)]
    pub count: u64,
    /// Voter addresses, each present at most once.
    #[serde(rename = "userLikes", default)]
    pub voters: Vec<String>,
}

impl LikeRecord {
    pub fn key(slug: &str) -> String {
        format!("likes:{slug}")
    }

    pub fn has_voted(&self, voter: &str) -> bool {
        self.voters.iter().any(|v| v == voter)
    }

    /// Adds `voter` if absent, removes it otherwise. Returns whether the
    /// voter likes the post afterwards.
    pub fn toggle(&mut self, voter: &str) -> bool {
        let liked = if self.has_voted(voter) {
            self.voters.retain(|v| v != voter);
            false
        } else {
            self.voters.push(voter.to_string());
            true
        };
        self.count = self.voters.len() as u64;
        liked
    }
}

/// Reading speed used for `BlogPost::read_time`.
const WORDS_PER_MINUTE: usize = 250;

/// Minutes needed to read `content`, at least one.
pub fn read_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// A markdown blog post loaded from the content directory.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Raw markdown body, front matter excluded
    pub content: String,
    pub date: DateTime<Utc>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub cover_image: Option<String>,
    pub published: bool,
    /// Estimated minutes to read
    pub read_time: u32,
}

/// A developer tool declared in `tools.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    pub slug: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Icon name, e.g. "Palette"
    #[serde(default)]
    pub icon: String,
}

impl Tool {
    pub fn href(&self) -> String {
        format!("/tools/{}", self.slug)
    }
}
