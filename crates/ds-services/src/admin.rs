//! Administrator view across every known post, plus bulk deletions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ds_core::{AppError, Result};
use serde::Serialize;

use crate::comments::CommentService;
use crate::likes::LikeService;

/// Characters of an address kept visible in the admin view.
const MASK_KEEP: usize = 10;

/// Keeps the first ten characters of an address and appends `...`.
pub fn mask_address(addr: &str) -> String {
    let mut masked: String = addr.chars().take(MASK_KEEP).collect();
    masked.push_str("...");
    masked
}

#[derive(Debug, Clone, Serialize)]
pub struct MaskedComment {
    pub id: String,
    pub author: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "userIP")]
    pub user_ip: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostComments {
    pub count: usize,
    pub comments: Vec<MaskedComment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostLikes {
    pub count: u64,
    pub user_count: usize,
    #[serde(rename = "userIPs")]
    pub user_ips: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total_comments: usize,
    pub total_likes: u64,
    pub active_blog_count: usize,
}

/// Activity of every known post. Posts without comments or likes are left
/// out of the per-post maps.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminSummary {
    pub comments: BTreeMap<String, PostComments>,
    pub likes: BTreeMap<String, PostLikes>,
    pub summary: Totals,
}

/// A validated admin delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminDeletion {
    Comment { slug: String, id: String },
    Comments { slug: String },
    Likes { slug: String },
}

impl AdminDeletion {
    /// Builds a deletion from the loose `{type, slug, id}` request shape.
    pub fn parse(kind: Option<&str>, slug: Option<&str>, id: Option<&str>) -> Result<Self> {
        fn non_empty(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|s| !s.is_empty())
        }

        let (Some(kind), Some(slug)) = (non_empty(kind), non_empty(slug)) else {
            return Err(AppError::ValidationError("type and slug are required".into()));
        };
        let slug = slug.to_string();
        match kind {
            "comment" => match non_empty(id) {
                Some(id) => Ok(Self::Comment { slug, id: id.to_string() }),
                None => Err(AppError::ValidationError(
                    "id is required to delete a single comment".into(),
                )),
            },
            "comments" => Ok(Self::Comments { slug }),
            "likes" => Ok(Self::Likes { slug }),
            other => Err(AppError::ValidationError(format!(
                "unknown deletion type: {other}"
            ))),
        }
    }
}

#[derive(Clone)]
pub struct AdminService {
    comments: CommentService,
    likes: LikeService,
    known_slugs: Vec<String>,
}

impl AdminService {
    pub fn new(comments: CommentService, likes: LikeService, known_slugs: Vec<String>) -> Self {
        Self {
            comments,
            likes,
            known_slugs,
        }
    }

    pub fn known_slugs(&self) -> &[String] {
        &self.known_slugs
    }

    /// Collects comment and like data for every known post. A post whose
    /// data cannot be read is logged and skipped.
    pub async fn summary(&self) -> AdminSummary {
        let mut out = AdminSummary::default();

        for slug in &self.known_slugs {
            let (comments, likes) = match tokio::try_join!(
                self.comments.collection(slug),
                self.likes.record(slug)
            ) {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::error!(slug = %slug, error = %e, "failed to load admin data");
                    continue;
                }
            };

            let has_comments = !comments.is_empty();
            let has_likes = likes.count > 0;

            if has_comments {
                out.summary.total_comments += comments.comments.len();
                out.comments.insert(
                    slug.clone(),
                    PostComments {
                        count: comments.comments.len(),
                        comments: comments
                            .comments
                            .iter()
                            .map(|c| MaskedComment {
                                id: c.id.clone(),
                                author: c.author.clone(),
                                content: c.content.clone(),
                                timestamp: c.timestamp,
                                user_ip: mask_address(&c.user_ip),
                            })
                            .collect(),
                    },
                );
            }

            if has_likes {
                out.summary.total_likes += likes.count;
                out.likes.insert(
                    slug.clone(),
                    PostLikes {
                        count: likes.count,
                        user_count: likes.voters.len(),
                        user_ips: likes.voters.iter().map(|v| mask_address(v)).collect(),
                    },
                );
            }

            if has_comments || has_likes {
                out.summary.active_blog_count += 1;
            }
        }

        out
    }

    pub async fn delete(&self, deletion: &AdminDeletion) -> Result<()> {
        match deletion {
            AdminDeletion::Comment { slug, id } => {
                let removed = self.comments.remove_any(slug, id).await?;
                tracing::info!(slug = %slug, comment_id = %id, removed, "admin removed comment");
            }
            AdminDeletion::Comments { slug } => {
                self.comments.clear(slug).await?;
                tracing::info!(slug = %slug, "admin cleared comments");
            }
            AdminDeletion::Likes { slug } => {
                self.likes.reset(slug).await?;
                tracing::info!(slug = %slug, "admin reset likes");
            }
        }
        Ok(())
    }
}
