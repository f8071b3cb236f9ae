use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::application::CacheStore;
use crate::domain::DomainError;

/// [`CacheStore`] backed by a Redis server (`SET EX` / `GET`).
///
/// One [`ConnectionManager`] is opened on first use and shared by every
/// call; it reconnects on its own after a dropped connection. A failed first
/// connect is not remembered, so the next call tries again.
pub struct RedisCache {
    client: Client,
    manager: OnceCell<ConnectionManager>,
}

impl RedisCache {
    /// `host` is `host:port` or a full `redis://` URL.
    pub fn new(host: &str, password: Option<&str>) -> Result<Self, DomainError> {
        let url = Self::connection_url(host, password);
        let client = Client::open(url.as_str())
            .map_err(|e| DomainError::configuration(format!("invalid redis url '{host}': {e}")))?;
        debug!("Redis cache configured for {}", host);
        Ok(Self {
            client,
            manager: OnceCell::new(),
        })
    }

    fn connection_url(host: &str, password: Option<&str>) -> String {
        if host.starts_with("redis://") || host.starts_with("rediss://") {
            return host.to_string();
        }
        match password.filter(|p| !p.is_empty()) {
            Some(password) => format!("redis://:{password}@{host}"),
            None => format!("redis://{host}"),
        }
    }

    async fn connection(&self) -> Result<ConnectionManager, DomainError> {
        let manager = self
            .manager
            .get_or_try_init(|| async {
                debug!("Opening redis connection manager");
                self.client
                    .get_connection_manager()
                    .await
                    .map_err(|e| DomainError::cache(format!("failed to connect to redis: {e}")))
            })
            .await?;
        Ok(manager.clone())
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.connection().await?;
        conn.get::<_, Option<String>>(key).await.map_err(|e| {
            warn!("Redis GET failed for {}: {}", key, e);
            DomainError::cache(format!("redis get failed: {e}"))
        })
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;
        let written = if ttl.is_zero() {
            conn.set::<_, _, ()>(key, value).await
        } else {
            conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await
        };

        written.map_err(|e| {
            warn!("Redis SET failed for {}: {}", key, e);
            DomainError::cache(format!("redis set failed: {e}"))
        })
    }

    fn backend_name(&self) -> &str {
        "redis"
    }
}
