//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use serde_json::Value;

use crate::models::{BlogPost, Tool};

/// Key-value persistence contract for comments and likes.
///
/// A missing key is `Ok(None)`, never an error.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()>;

    /// Short label reported to clients as `mode` (e.g. "memory").
    fn backend(&self) -> &'static str;
}

/// Read-only access to the site's markdown posts and tool declarations.
#[cfg_attr(feature = "testing", mockall::automock)]
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Every post that parsed, drafts included, in no particular order.
    async fn load_posts(&self) -> anyhow::Result<Vec<BlogPost>>;

    async fn load_post(&self, slug: &str) -> anyhow::Result<Option<BlogPost>>;

    /// Tools in declaration order.
    async fn load_tools(&self) -> anyhow::Result<Vec<Tool>>;
}
