use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

use crate::embedding_client::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Where match results are persisted between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(anyhow!(
                "CACHE_BACKEND must be 'redis' or 'memory', got '{other}'"
            )),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub hf_api_key: String,
    pub hf_model: String,
    pub embedding_api_url: String,
    /// Upper bound on a single embedding request, including model warm-up.
    pub embedding_timeout_secs: u64,
    pub cache_backend: CacheBackend,
    pub redis_url: Option<String>,
    pub cache_key_prefix: String,
    /// Upper bound on one cache read or write, connect included.
    pub cache_timeout_ms: u64,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let cache_backend = optional_env("CACHE_BACKEND")
            .map(|v| v.parse::<CacheBackend>())
            .transpose()?
            .unwrap_or(CacheBackend::Redis);

        let redis_url = match cache_backend {
            CacheBackend::Redis => Some(require_env("REDIS_URL")?),
            CacheBackend::Memory => optional_env("REDIS_URL"),
        };

        Ok(Config {
            hf_api_key: require_env("HF_API_KEY")?,
            hf_model: optional_env("HF_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            embedding_api_url: optional_env("EMBEDDING_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            embedding_timeout_secs: optional_env("EMBEDDING_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse::<u64>()
                .context("EMBEDDING_TIMEOUT_SECS must be a whole number of seconds")?,
            cache_backend,
            redis_url,
            cache_key_prefix: optional_env("CACHE_KEY_PREFIX")
                .unwrap_or_else(|| "matcher:".to_string()),
            cache_timeout_ms: optional_env("CACHE_TIMEOUT_MS")
                .unwrap_or_else(|| "500".to_string())
                .parse::<u64>()
                .context("CACHE_TIMEOUT_MS must be a whole number of milliseconds")?,
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
