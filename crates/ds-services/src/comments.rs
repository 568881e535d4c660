//! Comment threads stored as one `CommentCollection` per post.

use std::sync::Arc;

use ds_core::{
    AppError, Comment, CommentCollection, KvStore, PublicComment, Result, MAX_AUTHOR_CHARS,
    MAX_CONTENT_CHARS,
};

use crate::locks::KeyedLocks;
use crate::store;

#[derive(Clone)]
pub struct CommentService {
    kv: Arc<dyn KvStore>,
    locks: KeyedLocks,
}

impl CommentService {
    pub fn new(kv: Arc<dyn KvStore>, locks: KeyedLocks) -> Self {
        Self { kv, locks }
    }

    /// The stored collection, or an empty one when the post has none.
    pub async fn collection(&self, slug: &str) -> Result<CommentCollection> {
        let key = CommentCollection::key(slug);
        Ok(store::load(self.kv.as_ref(), &key).await?.unwrap_or_default())
    }

    /// Comments of a post, newest first.
    pub async fn list(&self, slug: &str) -> Result<Vec<PublicComment>> {
        let coll = self.collection(slug).await?;
        Ok(coll.newest_first().iter().map(Comment::to_public).collect())
    }

    pub async fn add(
        &self,
        slug: &str,
        author: &str,
        content: &str,
        user_ip: &str,
    ) -> Result<PublicComment> {
        let (author, content) = validate(author, content)?;
        let key = CommentCollection::key(slug);

        let _guard = self.locks.lock(&key).await;
        let mut coll: CommentCollection = store::load(self.kv.as_ref(), &key)
            .await?
            .unwrap_or_default();
        let comment = Comment::new(author, content, user_ip.to_string());
        let public = comment.to_public();
        coll.push(comment);
        store::save(self.kv.as_ref(), &key, &coll).await?;

        tracing::info!(slug, comment_id = %public.id, total = coll.count, "comment added");
        Ok(public)
    }

    /// Deletes a comment on behalf of its author. The requester address must
    /// equal the address stored with the comment.
    pub async fn delete(&self, slug: &str, comment_id: &str, requester: &str) -> Result<()> {
        let key = CommentCollection::key(slug);

        let _guard = self.locks.lock(&key).await;
        let mut coll: CommentCollection = store::load(self.kv.as_ref(), &key)
            .await?
            .unwrap_or_default();
        let Some(existing) = coll.find(comment_id) else {
            return Err(AppError::NotFound("Comment".into(), comment_id.into()));
        };
        if existing.user_ip != requester {
            return Err(AppError::Forbidden(
                "you can only delete your own comments".into(),
            ));
        }
        coll.remove(comment_id);
        store::save(self.kv.as_ref(), &key, &coll).await?;

        tracing::info!(slug, comment_id, "comment deleted by author");
        Ok(())
    }

    /// Administrator removal, no address check. Returns whether a comment
    /// was actually removed.
    pub async fn remove_any(&self, slug: &str, comment_id: &str) -> Result<bool> {
        let key = CommentCollection::key(slug);

        let _guard = self.locks.lock(&key).await;
        let mut coll: CommentCollection = store::load(self.kv.as_ref(), &key)
            .await?
            .unwrap_or_default();
        let removed = coll.remove(comment_id).is_some();
        if removed {
            store::save(self.kv.as_ref(), &key, &coll).await?;
        }
        Ok(removed)
    }

    /// Drops every comment of a post.
    pub async fn clear(&self, slug: &str) -> Result<()> {
        let key = CommentCollection::key(slug);
        let _guard = self.locks.lock(&key).await;
        store::save(self.kv.as_ref(), &key, &CommentCollection::default()).await
    }
}

/// Trims and checks author/content, returning the trimmed pair.
pub fn validate(author: &str, content: &str) -> Result<(String, String)> {
    let author = author.trim();
    let content = content.trim();

    if author.is_empty() || content.is_empty() {
        return Err(AppError::ValidationError(
            "author name and comment content are both required".into(),
        ));
    }
    if author.chars().count() > MAX_AUTHOR_CHARS {
        return Err(AppError::ValidationError(format!(
            "author name cannot exceed {MAX_AUTHOR_CHARS} characters"
        )));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(AppError::ValidationError(format!(
            "comment cannot exceed {MAX_CONTENT_CHARS} characters"
        )));
    }
    Ok((author.to_string(), content.to_string()))
}
