//! # configs
//!
//! Layered settings for the devsite binary:
//! built-in defaults, then an optional `devsite.toml` (or the file named by
//! `DEVSITE_CONFIG`), then `DEVSITE__SECTION__KEY` environment variables.
//! The legacy `KV_REST_API_URL`, `KV_REST_API_TOKEN` and `REDIS_URL`
//! variables are honoured last so existing deployments keep working.

use std::path::PathBuf;

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Posts the admin dashboard reports on when none are configured.
pub const DEFAULT_KNOWN_SLUGS: [&str; 6] = [
    "developer-tools-guide",
    "nextjs-blog-optimization",
    "css-grid-vs-flexbox",
    "typescript-best-practices",
    "react-hooks-guide",
    "test-relative-time",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContentConfig {
    /// Directory holding `blog/` and `tools.toml`
    pub dir: PathBuf,
}

/// Remote store credentials. All optional: with none set, the in-memory
/// store is used.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KvConfig {
    pub rest_url: Option<String>,
    pub rest_token: Option<SecretString>,
    pub redis_url: Option<SecretString>,
}

impl KvConfig {
    /// URL and token, only when both are present and non-empty.
    pub fn rest_credentials(&self) -> Option<(&str, &SecretString)> {
        use secrecy::ExposeSecret;
        let url = self.rest_url.as_deref().filter(|u| !u.trim().is_empty())?;
        let token = self
            .rest_token
            .as_ref()
            .filter(|t| !t.expose_secret().trim().is_empty())?;
        Some((url, token))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub known_slugs: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub content: ContentConfig,
    #[serde(default)]
    pub kv: KvConfig,
    pub admin: AdminConfig,
    pub log: LogConfig,
    /// `.env` file that was applied, if any. Reported by the binary once
    /// logging is up.
    #[serde(skip)]
    pub env_file: Option<PathBuf>,
}

impl AppConfig {
    /// Loads `.env`, then every configuration layer.
    pub fn load() -> Result<Self, ConfigError> {
        let env_file = dotenvy::dotenv().ok();
        let file = std::env::var("DEVSITE_CONFIG").unwrap_or_else(|_| "devsite".to_string());
        let mut cfg = Self::from_sources(&file, |name| std::env::var(name).ok())?;
        cfg.env_file = env_file;
        Ok(cfg)
    }

    /// `file` is a path without extension requirement; `legacy_env` looks up
    /// the pre-`DEVSITE__` variable names.
    pub fn from_sources(
        file: &str,
        legacy_env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let known: Vec<String> = DEFAULT_KNOWN_SLUGS.iter().map(|s| s.to_string()).collect();

        let cfg = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("content.dir", "content")?
            .set_default("admin.known_slugs", known)?
            .set_default("log.filter", "info,tower_http=info")?
            .set_default("log.json", false)?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("DEVSITE")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("admin.known_slugs")
                    .try_parsing(true),
            )
            .set_override_option("kv.rest_url", legacy_env("KV_REST_API_URL"))?
            .set_override_option("kv.rest_token", legacy_env("KV_REST_API_TOKEN"))?
            .set_override_option("kv.redis_url", legacy_env("REDIS_URL"))?
            .build()?;

        Ok(cfg.try_deserialize()?)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
