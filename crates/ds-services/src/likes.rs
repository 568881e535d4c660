//! Per-post like counters with one vote per voter address.

use std::sync::Arc;

use ds_core::{KvStore, LikeRecord, Result};
use serde::Serialize;

use crate::locks::KeyedLocks;
use crate::store;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LikeStatus {
    pub count: u64,
    pub liked: bool,
}

#[derive(Clone)]
pub struct LikeService {
    kv: Arc<dyn KvStore>,
    locks: KeyedLocks,
}

impl LikeService {
    pub fn new(kv: Arc<dyn KvStore>, locks: KeyedLocks) -> Self {
        Self { kv, locks }
    }

    /// The stored record, or `{count: 0, userLikes: []}`.
    pub async fn record(&self, slug: &str) -> Result<LikeRecord> {
        let key = LikeRecord::key(slug);
        Ok(store::load(self.kv.as_ref(), &key).await?.unwrap_or_default())
    }

    pub async fn count(&self, slug: &str) -> Result<u64> {
        Ok(self.record(slug).await?.count)
    }

    /// Read-only count plus whether `voter` currently likes the post.
    pub async fn status(&self, slug: &str, voter: &str) -> Result<LikeStatus> {
        let rec = self.record(slug).await?;
        Ok(LikeStatus {
            count: rec.count,
            liked: rec.has_voted(voter),
        })
    }

    /// Likes the post for `voter`, or takes the like back if already given.
    pub async fn toggle(&self, slug: &str, voter: &str) -> Result<LikeStatus> {
        let key = LikeRecord::key(slug);

        let _guard = self.locks.lock(&key).await;
        let mut rec: LikeRecord = store::load(self.kv.as_ref(), &key)
            .await?
            .unwrap_or_default();
        let liked = rec.toggle(voter);
        store::save(self.kv.as_ref(), &key, &rec).await?;

        tracing::debug!(slug, liked, count = rec.count, "like toggled");
        Ok(LikeStatus {
            count: rec.count,
            liked,
        })
    }

    pub async fn reset(&self, slug: &str) -> Result<()> {
        let key = LikeRecord::key(slug);
        let _guard = self.locks.lock(&key).await;
        store::save(self.kv.as_ref(), &key, &LikeRecord::default()).await
    }
}
