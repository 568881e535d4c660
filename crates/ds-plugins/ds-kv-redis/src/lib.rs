//! # ds-kv-redis
//!
//! `KvStore` backed by a Redis server through a `deadpool-redis` pool.
//! Records are stored as JSON strings under their plain keys.

use anyhow::Context;
use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::{Config, Pool, Runtime};
use ds_core::traits::KvStore;
use serde_json::Value;

pub struct RedisKv {
    pool: Pool,
}

impl RedisKv {
    /// Builds the pool. No connection is made until the first command.
    pub fn connect(url: &str) -> anyhow::Result<Self> {
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .context("invalid redis configuration")?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl KvStore for RedisKv {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        let mut conn = self.pool.get().await.context("redis pool exhausted")?;
        let raw: Option<String> = conn.get(key).await.context("redis GET failed")?;
        raw.map(|s| serde_json::from_str(&s).with_context(|| format!("non-JSON value at {key}")))
            .transpose()
    }

    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        let mut conn = self.pool.get().await.context("redis pool exhausted")?;
        let encoded = serde_json::to_string(&value)?;
        let _: () = conn.set(key, encoded).await.context("redis SET failed")?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
