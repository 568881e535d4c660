//! # devsite
//!
//! Loads configuration, then either serves the site or scaffolds content.

mod cli;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use cli::{Cli, Command};
use configs::{AppConfig, KvConfig};
use ds_api::{create_router, AppState};
use ds_content_fs::{FsContent, NewPost, NewTool};
use ds_core::KvStore;
use ds_kv_memory::MemoryKv;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load()?;
    init_tracing(&cfg);
    if let Some(path) = &cfg.env_file {
        tracing::debug!(path = %path.display(), "loaded .env");
    }

    let content = FsContent::new(cfg.content.dir.clone());
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(cfg, content).await,
        Command::NewPost {
            title,
            excerpt,
            tags,
            author,
            slug,
        } => {
            let post = NewPost {
                title,
                excerpt,
                tags,
                author,
                slug,
            };
            let created = content.create_post(&post, Utc::now().date_naive()).await?;
            println!("created {}", created.path.display());
            println!("url: /blog/{}", created.slug);
            Ok(())
        }
        Command::NewTool {
            title,
            description,
            tags,
            icon,
            slug,
        } => {
            let tool = NewTool {
                title,
                description,
                tags,
                icon,
                slug,
            };
            let created = content.add_tool(&tool).await?;
            println!("declared {} in {}", created.slug, cfg.content.dir.join("tools.toml").display());
            println!("url: {}", created.href());
            Ok(())
        }
    }
}

async fn serve(cfg: AppConfig, content: FsContent) -> anyhow::Result<()> {
    let kv = select_store(&cfg.kv)?;
    tracing::info!(backend = kv.backend(), "key-value store ready");

    let state = AppState::new(kv, Arc::new(content), cfg.admin.known_slugs.clone());
    let app = create_router(state);

    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, content = %cfg.content.dir.display(), "devsite listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("shut down cleanly");
    Ok(())
}

fn init_tracing(cfg: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cfg.log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// REST credentials first, then a Redis URL, then the in-memory map.
fn select_store(kv: &KvConfig) -> anyhow::Result<Arc<dyn KvStore>> {
    #[cfg(feature = "kv-rest")]
    if let Some((url, token)) = kv.rest_credentials() {
        let store = ds_kv_rest::RestKv::new(url, token.clone())?;
        return Ok(Arc::new(store));
    }

    #[cfg(feature = "kv-redis")]
    if let Some(url) = &kv.redis_url {
        use secrecy::ExposeSecret;
        let store = ds_kv_redis::RedisKv::connect(url.expose_secret())?;
        return Ok(Arc::new(store));
    }

    if kv.rest_url.is_some() || kv.rest_token.is_some() || kv.redis_url.is_some() {
        tracing::warn!("remote store settings incomplete or not compiled in; using in-memory storage");
    } else {
        tracing::warn!("no remote store configured; data lives in memory and is lost on restart");
    }
    Ok(Arc::new(MemoryKv::new()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
