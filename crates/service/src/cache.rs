//! Read-through cache in front of the list/detail reads.
//!
//! Values are the serialized JSON bodies. Every backend fault is logged and
//! swallowed: reads fall back to the producer, invalidations are skipped.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::errors::ServiceError;

/// All providers.
pub const PROVIDERS_LIST: &str = "providers_list";
/// All services.
pub const SERVICES_LIST: &str = "services_list";

/// Detail entry for a single service.
pub fn service_key(id: i32) -> String {
    format!("service_{}", id)
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
}

/// Key-value backend with a fixed TTL chosen at construction.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn put(&self, key: &str, value: String) -> Result<(), CacheError>;
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
    async fn clear(&self) -> Result<(), CacheError>;
}

/// In-process backend on `moka`.
pub struct MokaCacheStore {
    cache: Cache<String, String>,
    ttl: Duration,
}

impl MokaCacheStore {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache, ttl }
    }

    pub fn from_config(cfg: &configs::CacheConfig) -> Self {
        Self::new(Duration::from_secs(cfg.ttl_secs), cfg.max_capacity)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[async_trait]
impl CacheStore for MokaCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.cache.get(key).await)
    }

    async fn put(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.cache.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.cache.invalidate(key).await;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }
}

/// Fail-open read-through wrapper shared by the resource services.
#[derive(Clone)]
pub struct ReadThroughCache {
    store: Arc<dyn CacheStore>,
}

impl ReadThroughCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Return the cached value for `key`, or run `producer` and cache its output.
    /// A producer error is returned as-is and nothing is stored.
    pub async fn get<F, Fut>(&self, key: &str, producer: F) -> Result<String, ServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<String, ServiceError>>,
    {
        match self.store.get(key).await {
            Ok(Some(hit)) => {
                debug!(key, "cache hit");
                return Ok(hit);
            }
            Ok(None) => debug!(key, "cache miss"),
            Err(e) => warn!(key, error = %e, "cache read failed, reading from store"),
        }

        let value = producer().await?;
        if let Err(e) = self.store.put(key, value.clone()).await {
            warn!(key, error = %e, "cache write failed");
        }
        Ok(value)
    }

    /// Drop one entry so the next `get` recomputes it.
    pub async fn delete(&self, key: &str) {
        match self.store.delete(key).await {
            Ok(()) => debug!(key, "cache entry invalidated"),
            Err(e) => warn!(key, error = %e, "cache invalidation failed"),
        }
    }

    /// Drop every entry. Unlike the request path this reports failure.
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.store.clear().await?;
        info!("cache cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::test_support::FailingCacheStore;

    fn moka(ttl: Duration) -> ReadThroughCache {
        ReadThroughCache::new(Arc::new(MokaCacheStore::new(ttl, 100)))
    }

    #[tokio::test]
    async fn second_get_is_served_from_cache() {
        let cache = moka(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let v = cache
                .get("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("v".to_string())
                })
                .await
                .unwrap();
            assert_eq!(v, "v");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn delete_forces_recompute() {
        let cache = moka(Duration::from_secs(3600));
        cache.get("k", || async { Ok("old".to_string()) }).await.unwrap();
        cache.delete("k").await;
        let v = cache.get("k", || async { Ok("new".to_string()) }).await.unwrap();
        assert_eq!(v, "new");
    }

    #[tokio::test]
    async fn producer_error_is_not_cached() {
        let cache = moka(Duration::from_secs(3600));
        let err = cache
            .get("service_9", || async { Err(ServiceError::not_found("Service")) })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let v = cache.get("service_9", || async { Ok("found".to_string()) }).await.unwrap();
        assert_eq!(v, "found");
    }

    #[tokio::test]
    async fn clear_drops_every_key() {
        let cache = moka(Duration::from_secs(3600));
        cache.get(PROVIDERS_LIST, || async { Ok("a".to_string()) }).await.unwrap();
        cache.get(SERVICES_LIST, || async { Ok("b".to_string()) }).await.unwrap();
        cache.clear().await.unwrap();
        let a = cache.get(PROVIDERS_LIST, || async { Ok("a2".to_string()) }).await.unwrap();
        let b = cache.get(SERVICES_LIST, || async { Ok("b2".to_string()) }).await.unwrap();
        assert_eq!((a.as_str(), b.as_str()), ("a2", "b2"));
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = moka(Duration::from_millis(200));
        cache.get("k", || async { Ok("old".to_string()) }).await.unwrap();
        tokio::time::sleep(Duration::from_millis(400)).await;
        let v = cache.get("k", || async { Ok("new".to_string()) }).await.unwrap();
        assert_eq!(v, "new");
    }

    #[tokio::test]
    async fn backend_failure_falls_back_to_producer() {
        let cache = ReadThroughCache::new(Arc::new(FailingCacheStore));
        let calls = AtomicUsize::new(0);
        for _ in 0..2 {
            let v = cache
                .get("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("fresh".to_string())
                })
                .await
                .unwrap();
            assert_eq!(v, "fresh");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        cache.delete("k").await;
        assert!(cache.clear().await.is_err());
    }

    #[test]
    fn key_format() {
        assert_eq!(service_key(42), "service_42");
    }
}
