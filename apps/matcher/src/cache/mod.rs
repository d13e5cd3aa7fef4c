//! Cache Layer: one durable slot per matching direction.
//!
//! A slot holds the last successful result set together with the content hash
//! of the inputs that produced it. A lookup hits only when the hash matches
//! exactly. There is no TTL; a slot is replaced by the next successful run or
//! removed by an explicit invalidate.
//!
//! Reads never fail the caller (unreadable data is a miss) and writes never
//! fail the caller (errors are logged and dropped).

pub mod content_hash;

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{OnceCell, RwLock};
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),
}

/// The independent cache slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheDirection {
    SeekerRecommendations,
    ApplicantScores,
    TalentPool,
}

impl CacheDirection {
    pub fn key(self) -> &'static str {
        match self {
            CacheDirection::SeekerRecommendations => "ai_job_recommendations_cache",
            CacheDirection::ApplicantScores => "ai_applicant_scores_cache",
            CacheDirection::TalentPool => "ai_talent_pool_cache",
        }
    }
}

/// Stored form of a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub content_hash: String,
    pub payload: T,
    /// Epoch milliseconds at write time. Informational only.
    pub timestamp: i64,
}

// ────────────────────────────────────────────────────────────────────────────
// Storage backends
// ────────────────────────────────────────────────────────────────────────────

/// Raw key-value storage under the cache.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;
    async fn remove(&self, key: &str) -> Result<(), CacheError>;
}

/// Durable store backed by Redis. Keys carry a configurable prefix.
///
/// One multiplexed connection is shared by every call and opened on first
/// use; a failed connect is retried by the next call. Each operation,
/// connect included, is bounded by `op_timeout` so an unresponsive server
/// reads as a miss instead of stalling the matcher.
pub struct RedisCacheStore {
    client: redis::Client,
    prefix: String,
    op_timeout: Duration,
    conn: OnceCell<MultiplexedConnection>,
}

impl RedisCacheStore {
    pub fn new(client: redis::Client, prefix: impl Into<String>, op_timeout: Duration) -> Self {
        Self {
            client,
            prefix: prefix.into(),
            op_timeout,
            conn: OnceCell::new(),
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        let conn = self
            .conn
            .get_or_try_init(|| {
                self.client
                    .get_multiplexed_async_connection_with_timeouts(self.op_timeout, self.op_timeout)
            })
            .await?;
        Ok(conn.clone())
    }

    async fn bounded<T>(
        &self,
        op: impl Future<Output = Result<T, CacheError>>,
    ) -> Result<T, CacheError> {
        match timeout(self.op_timeout, op).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(self.op_timeout)),
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            let value: Option<String> = conn.get(self.full_key(key)).await?;
            Ok(value)
        })
        .await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            conn.set::<_, _, ()>(self.full_key(key), value).await?;
            Ok(())
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.bounded(async {
            let mut conn = self.connection().await?;
            conn.del::<_, ()>(self.full_key(key)).await?;
            Ok(())
        })
        .await
    }
}

/// Process-local store. Used in tests and when running without Redis.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, String>>,
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Typed single-slot cache
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MatchCache {
    store: Arc<dyn CacheStore>,
}

impl MatchCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Returns the stored payload only when it was produced from inputs with
    /// exactly this `content_hash`.
    pub async fn lookup<T: DeserializeOwned>(
        &self,
        direction: CacheDirection,
        content_hash: &str,
    ) -> Option<T> {
        let raw = match self.store.get(direction.key()).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache miss for {}: slot empty", direction.key());
                return None;
            }
            Err(e) => {
                warn!("Cache read failed for {}: {e}", direction.key());
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Discarding unreadable cache entry for {}: {e}", direction.key());
                return None;
            }
        };

        if entry.content_hash != content_hash {
            debug!(
                "Cache miss for {}: stored hash {} != {}",
                direction.key(),
                entry.content_hash,
                content_hash
            );
            return None;
        }

        info!("Cache hit for {} (hash {content_hash})", direction.key());
        Some(entry.payload)
    }

    /// Overwrites the slot. Failures are logged, never returned.
    pub async fn store<T: Serialize>(&self, direction: CacheDirection, content_hash: &str, payload: &T) {
        let entry = CacheEntry {
            content_hash: content_hash.to_string(),
            payload,
            timestamp: Utc::now().timestamp_millis(),
        };

        let result = match serde_json::to_string(&entry) {
            Ok(raw) => self.store.set(direction.key(), raw).await,
            Err(e) => Err(CacheError::Serialize(e)),
        };

        match result {
            Ok(()) => debug!("Cached results for {} (hash {content_hash})", direction.key()),
            Err(e) => warn!("Failed to cache results for {}: {e}", direction.key()),
        }
    }

    pub async fn invalidate(&self, direction: CacheDirection) {
        match self.store.remove(direction.key()).await {
            Ok(()) => info!("Cleared cache slot {}", direction.key()),
            Err(e) => warn!("Failed to clear cache slot {}: {e}", direction.key()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A store whose every operation fails, for exercising the swallow paths.
    pub(crate) struct BrokenStore;

    #[async_trait]
    impl CacheStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Serialize(serde_json::from_str::<()>("!").unwrap_err()))
        }

        async fn set(&self, _key: &str, _value: String) -> Result<(), CacheError> {
            Err(CacheError::Serialize(serde_json::from_str::<()>("!").unwrap_err()))
        }

        async fn remove(&self, _key: &str) -> Result<(), CacheError> {
            Err(CacheError::Serialize(serde_json::from_str::<()>("!").unwrap_err()))
        }
    }

    fn memory_cache() -> (MatchCache, Arc<MemoryCacheStore>) {
        let store = Arc::new(MemoryCacheStore::default());
        (MatchCache::new(store.clone()), store)
    }

    /// Accepts connections and holds them open without ever replying.
    async fn silent_redis() -> redis::Client {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        redis::Client::open(format!("redis://{addr}")).unwrap()
    }

    #[tokio::test]
    async fn test_unresponsive_redis_times_out() {
        let store = RedisCacheStore::new(silent_redis().await, "test:", Duration::from_millis(200));

        let err = store.get("slot").await.unwrap_err();
        assert!(matches!(err, CacheError::Timeout(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unresponsive_redis_is_a_bounded_miss() {
        let store = RedisCacheStore::new(silent_redis().await, "test:", Duration::from_millis(200));
        let cache = MatchCache::new(Arc::new(store));

        let lookup = timeout(
            Duration::from_secs(5),
            cache.lookup::<Vec<u32>>(CacheDirection::SeekerRecommendations, "h"),
        )
        .await;
        assert_eq!(lookup.expect("lookup should finish"), None);

        let stored = timeout(
            Duration::from_secs(5),
            cache.store(CacheDirection::SeekerRecommendations, "h", &vec![1_u32]),
        )
        .await;
        assert!(stored.is_ok());

        let cleared = timeout(
            Duration::from_secs(5),
            cache.invalidate(CacheDirection::SeekerRecommendations),
        )
        .await;
        assert!(cleared.is_ok());
    }

    #[tokio::test]
    async fn test_round_trip_same_hash_hits() {
        let (cache, _) = memory_cache();
        let payload = vec![1_u32, 2, 3];
        cache.store(CacheDirection::SeekerRecommendations, "h1", &payload).await;

        let hit: Option<Vec<u32>> = cache.lookup(CacheDirection::SeekerRecommendations, "h1").await;
        assert_eq!(hit, Some(payload));
    }

    #[tokio::test]
    async fn test_different_hash_misses() {
        let (cache, _) = memory_cache();
        cache.store(CacheDirection::SeekerRecommendations, "h1", &vec![1_u32]).await;

        let miss: Option<Vec<u32>> = cache.lookup(CacheDirection::SeekerRecommendations, "h2").await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_empty_slot_misses() {
        let (cache, _) = memory_cache();
        let miss: Option<Vec<u32>> = cache.lookup(CacheDirection::ApplicantScores, "h1").await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_new_store_overwrites_slot() {
        let (cache, _) = memory_cache();
        cache.store(CacheDirection::ApplicantScores, "old", &"first").await;
        cache.store(CacheDirection::ApplicantScores, "new", &"second").await;

        let old: Option<String> = cache.lookup(CacheDirection::ApplicantScores, "old").await;
        let new: Option<String> = cache.lookup(CacheDirection::ApplicantScores, "new").await;
        assert!(old.is_none());
        assert_eq!(new.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_directions_are_independent() {
        let (cache, _) = memory_cache();
        cache.store(CacheDirection::SeekerRecommendations, "h", &1_u8).await;
        cache.store(CacheDirection::ApplicantScores, "h", &2_u8).await;

        cache.invalidate(CacheDirection::SeekerRecommendations).await;

        let seeker: Option<u8> = cache.lookup(CacheDirection::SeekerRecommendations, "h").await;
        let employer: Option<u8> = cache.lookup(CacheDirection::ApplicantScores, "h").await;
        assert!(seeker.is_none());
        assert_eq!(employer, Some(2));
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss() {
        let (cache, store) = memory_cache();
        store
            .set(CacheDirection::TalentPool.key(), "{not json".to_string())
            .await
            .unwrap();

        let miss: Option<Vec<u32>> = cache.lookup(CacheDirection::TalentPool, "h").await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_payload_of_wrong_shape_is_a_miss() {
        let (cache, _) = memory_cache();
        cache.store(CacheDirection::TalentPool, "h", &"a string").await;

        let miss: Option<Vec<u32>> = cache.lookup(CacheDirection::TalentPool, "h").await;
        assert!(miss.is_none());
    }

    #[tokio::test]
    async fn test_stored_entry_shape() {
        let (cache, store) = memory_cache();
        cache.store(CacheDirection::SeekerRecommendations, "abc", &vec!["x"]).await;

        let raw = store
            .get(CacheDirection::SeekerRecommendations.key())
            .await
            .unwrap()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["contentHash"], "abc");
        assert_eq!(value["payload"], serde_json::json!(["x"]));
        assert!(value["timestamp"].as_i64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_broken_backend_is_swallowed() {
        let cache = MatchCache::new(Arc::new(BrokenStore));
        cache.store(CacheDirection::ApplicantScores, "h", &1_u8).await;
        cache.invalidate(CacheDirection::ApplicantScores).await;
        let miss: Option<u8> = cache.lookup(CacheDirection::ApplicantScores, "h").await;
        assert!(miss.is_none());
    }

    #[test]
    fn test_redis_keys_are_prefixed() {
        let client = redis::Client::open("redis://127.0.0.1/").unwrap();
        let store = RedisCacheStore::new(client, "matcher:", Duration::from_secs(1));
        assert_eq!(
            store.full_key(CacheDirection::ApplicantScores.key()),
            "matcher:ai_applicant_scores_cache"
        );
    }
}
