use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::application::CacheStore;
use crate::domain::DomainError;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |at| now < at)
    }
}

/// Process-local [`CacheStore`]. Expired entries are dropped lazily on read.
#[derive(Default)]
pub struct InMemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.is_live(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let expires_at = (!ttl.is_zero()).then(|| Instant::now() + ttl);
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_hits() {
        let cache = InMemoryCache::new();
        cache
            .set("interrogations", "transcripts", Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(
            cache.get("interrogations").await.unwrap().as_deref(),
            Some("transcripts")
        );
    }

    #[tokio::test]
    async fn unknown_key_misses() {
        let cache = InMemoryCache::new();
        assert_eq!(cache.get("never-set").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_ttl() {
        let cache = InMemoryCache::new();
        cache.set("k", "v", Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_ttl_never_expires() {
        let cache = InMemoryCache::new();
        cache.set("k", "v", Duration::ZERO).await.unwrap();

        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn set_overwrites() {
        let cache = InMemoryCache::new();
        cache.set("k", "old", Duration::ZERO).await.unwrap();
        cache.set("k", "new", Duration::ZERO).await.unwrap();
        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("new"));
        assert_eq!(cache.len().await, 1);
    }
}
