use crate::config::Config;
use crate::matching::Matcher;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub config: Config,
}

#[cfg(test)]
pub(crate) fn test_state(embedder: std::sync::Arc<dyn crate::embedding_client::Embedder>) -> AppState {
    use std::sync::Arc;

    use crate::cache::{MatchCache, MemoryCacheStore};
    use crate::config::CacheBackend;

    AppState {
        matcher: Matcher::new(embedder, MatchCache::new(Arc::new(MemoryCacheStore::default()))),
        config: Config {
            hf_api_key: "test-key".to_string(),
            hf_model: "test-model".to_string(),
            embedding_api_url: "http://127.0.0.1:9".to_string(),
            embedding_timeout_secs: 1,
            cache_backend: CacheBackend::Memory,
            redis_url: None,
            cache_key_prefix: "test:".to_string(),
            cache_timeout_ms: 200,
            port: 0,
            rust_log: "debug".to_string(),
        },
    }
}
