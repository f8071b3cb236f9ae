use std::future::Future;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::application::CacheStore;
use crate::domain::DomainError;

/// Expiry used by every task that caches remote results.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Returns the cached value for `key`, or runs `compute`, stores its result
/// and returns it.
///
/// The cache only saves cost: a failing backend is logged and treated as a
/// miss on read, and ignored on write. Errors from `compute` propagate and
/// nothing is stored.
pub async fn read_through<F, Fut>(
    cache: &dyn CacheStore,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<String, DomainError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String, DomainError>>,
{
    match cache.get(key).await {
        Ok(Some(value)) => {
            info!("Cache hit for '{}'", key);
            return Ok(value);
        }
        Ok(None) => info!("Cache miss for '{}'", key),
        Err(e) => warn!(
            "Cache read for '{}' failed on {}: {}. Computing instead.",
            key,
            cache.backend_name(),
            e
        ),
    }

    let value = compute().await?;

    if let Err(e) = cache.set(key, &value, ttl).await {
        warn!(
            "Cache write for '{}' failed on {}: {}",
            key,
            cache.backend_name(),
            e
        );
    }

    Ok(value)
}

/// [`read_through`] for any serde type, stored as JSON text. A cached value
/// that no longer decodes is recomputed.
pub async fn read_through_json<T, F, Fut>(
    cache: &dyn CacheStore,
    key: &str,
    ttl: Duration,
    compute: F,
) -> Result<T, DomainError>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => {
                info!("Cache hit for '{}'", key);
                return Ok(value);
            }
            Err(e) => warn!("Cached value for '{}' is not valid JSON: {}", key, e),
        },
        Ok(None) => info!("Cache miss for '{}'", key),
        Err(e) => warn!(
            "Cache read for '{}' failed on {}: {}. Computing instead.",
            key,
            cache.backend_name(),
            e
        ),
    }

    let value = compute().await?;

    let raw = serde_json::to_string(&value)
        .map_err(|e| DomainError::serialization(format!("cache value for '{key}': {e}")))?;
    if let Err(e) = cache.set(key, &raw, ttl).await {
        warn!(
            "Cache write for '{}' failed on {}: {}",
            key,
            cache.backend_name(),
            e
        );
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::connector::InMemoryCache;

    struct BrokenCache;

    #[async_trait]
    impl CacheStore for BrokenCache {
        async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
            Err(DomainError::cache("connection refused"))
        }

        async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), DomainError> {
            Err(DomainError::cache("connection refused"))
        }

        fn backend_name(&self) -> &str {
            "broken"
        }
    }

    #[tokio::test]
    async fn miss_computes_then_hit_reuses() {
        let cache = InMemoryCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let value = read_through(&cache, "transcript", DEFAULT_CACHE_TTL, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("hello".to_string())
            })
            .await
            .unwrap();
            assert_eq!(value, "hello");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn compute_error_is_not_cached() {
        let cache = InMemoryCache::new();

        let err = read_through(&cache, "k", DEFAULT_CACHE_TTL, || async {
            Err(DomainError::transport("timeout"))
        })
        .await
        .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(cache.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn broken_backend_degrades_to_compute() {
        let value = read_through(&BrokenCache, "k", DEFAULT_CACHE_TTL, || async {
            Ok("fresh".to_string())
        })
        .await
        .unwrap();
        assert_eq!(value, "fresh");
    }

    #[tokio::test]
    async fn json_values_round_trip_through_cache() {
        let cache = InMemoryCache::new();
        let notes = vec!["a".to_string(), "b".to_string()];

        let stored: Vec<String> =
            read_through_json(&cache, "notes", DEFAULT_CACHE_TTL, || async { Ok(notes.clone()) })
                .await
                .unwrap();
        let cached: Vec<String> = read_through_json(&cache, "notes", DEFAULT_CACHE_TTL, || async {
            Err(DomainError::transport("should not be called"))
        })
        .await
        .unwrap();

        assert_eq!(stored, cached);
    }

    #[tokio::test]
    async fn undecodable_cached_json_is_recomputed() {
        let cache = InMemoryCache::new();
        cache.set("notes", "not json", DEFAULT_CACHE_TTL).await.unwrap();

        let value: Vec<u32> =
            read_through_json(&cache, "notes", DEFAULT_CACHE_TTL, || async { Ok(vec![1, 2]) })
                .await
                .unwrap();

        assert_eq!(value, vec![1, 2]);
        assert_eq!(cache.get("notes").await.unwrap().as_deref(), Some("[1,2]"));
    }
}
