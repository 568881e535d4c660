//! # ds-kv-rest
//!
//! `KvStore` over the Redis-over-HTTP protocol spoken by Upstash and Vercel KV
//! (`KV_REST_API_URL` / `KV_REST_API_TOKEN`).
//!
//! Each command is a `POST` of a JSON array such as `["GET", "likes:post"]`
//! answered with `{"result": ...}` or `{"error": "..."}`. Values are stored
//! as JSON text, matching what the JavaScript client writes.

use std::time::Duration;

use anyhow::{bail, Context};
use async_trait::async_trait;
use ds_core::traits::KvStore;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::Value;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct RestKv {
    client: reqwest::Client,
    url: String,
    token: SecretString,
}

#[derive(Debug, Deserialize)]
struct Reply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

impl RestKv {
    pub fn new(url: impl Into<String>, token: SecretString) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build kv http client")?;
        Ok(Self {
            client,
            url: url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn command(&self, args: &[&str]) -> anyhow::Result<Value> {
        let resp = self
            .client
            .post(&self.url)
            .bearer_auth(self.token.expose_secret())
            .json(args)
            .send()
            .await
            .with_context(|| format!("kv {} request failed", args[0]))?;

        let status = resp.status();
        let reply: Reply = resp
            .json()
            .await
            .with_context(|| format!("kv answered {status} with an unreadable body"))?;

        if let Some(err) = reply.error {
            bail!("kv {} failed ({status}): {err}", args[0]);
        }
        if !status.is_success() {
            bail!("kv {} failed with status {status}", args[0]);
        }
        Ok(reply.result.unwrap_or(Value::Null))
    }
}

#[async_trait]
impl KvStore for RestKv {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        match self.command(&["GET", key]).await? {
            Value::Null => Ok(None),
            // plain strings written by other clients are returned as-is
            Value::String(raw) => Ok(Some(serde_json::from_str(&raw).unwrap_or(Value::String(raw)))),
            other => Ok(Some(other)),
        }
    }

    async fn set(&self, key: &str, value: Value) -> anyhow::Result<()> {
        let encoded = serde_json::to_string(&value)?;
        self.command(&["SET", key, &encoded]).await?;
        tracing::trace!(key, bytes = encoded.len(), "kv set");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "vercel-kv"
    }
}
