use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// String key/value storage with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// `Ok(None)` is a miss, including for expired entries.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// A zero `ttl` stores the value without expiry.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    fn backend_name(&self) -> &str;
}
