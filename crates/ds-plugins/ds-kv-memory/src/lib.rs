//! # ds-kv-memory
//!
//! Process-local implementation of `KvStore`, selected when no remote store
//! is configured. Contents live as long as the handle and are lost on restart.

use async_trait::async_trait;
use dashmap::DashMap;
use ds_core::traits::KvStore;
use serde_json::Value;

#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: DashMap<String, Value>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
