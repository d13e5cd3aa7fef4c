mod cache;
mod config;
mod embedding_client;
mod errors;
mod matching;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::{CacheStore, MatchCache, MemoryCacheStore, RedisCacheStore};
use crate::config::{CacheBackend, Config};
use crate::embedding_client::EmbeddingClient;
use crate::matching::Matcher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting matcher v{}", env!("CARGO_PKG_VERSION"));

    // Initialize embedding client
    let embedder = EmbeddingClient::new(
        &config.embedding_api_url,
        &config.hf_model,
        config.hf_api_key.clone(),
        Duration::from_secs(config.embedding_timeout_secs),
    )
    .context("Failed to build embedding HTTP client")?;
    info!(
        "Embedding client initialized (endpoint: {}, timeout: {}s)",
        embedder.endpoint(),
        config.embedding_timeout_secs
    );

    // Initialize result cache
    let store = build_cache_store(&config)?;

    let matcher = Matcher::new(Arc::new(embedder), MatchCache::new(store));

    let state = AppState {
        matcher,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the board's browser client calls this directly

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Redis for durable slots, or a process-local map when running without Redis.
fn build_cache_store(config: &Config) -> Result<Arc<dyn CacheStore>> {
    match config.cache_backend {
        CacheBackend::Redis => {
            let url = config
                .redis_url
                .clone()
                .context("REDIS_URL is required when CACHE_BACKEND=redis")?;
            let client = redis::Client::open(url)?;
            info!(
                "Redis cache initialized (key prefix: {}, timeout: {}ms)",
                config.cache_key_prefix, config.cache_timeout_ms
            );
            Ok(Arc::new(RedisCacheStore::new(
                client,
                config.cache_key_prefix.clone(),
                Duration::from_millis(config.cache_timeout_ms),
            )))
        }
        CacheBackend::Memory => {
            info!("In-memory cache initialized; results will not survive a restart");
            Ok(Arc::new(MemoryCacheStore::default()))
        }
    }
}
