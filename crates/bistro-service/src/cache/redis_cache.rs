//! Redis-based cache store.

use super::CacheStore;
use async_trait::async_trait;
use bistro_core::{BistroError, BistroResult};
use deadpool_redis::{
    redis::{AsyncCommands, RedisResult},
    Pool,
};
use shaku::Component;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Default deadline for a single Redis command (2 seconds).
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(2);

/// Redis-based cache store.
///
/// Every call, including checking a connection out of the pool, is bounded by
/// `command_timeout`. An elapsed deadline is reported like any other
/// transport failure.
#[derive(Component)]
#[shaku(interface = CacheStore)]
pub struct RedisCacheStore {
    /// Redis connection pool.
    pool: Option<Arc<Pool>>,
    /// Deadline applied to each command.
    #[shaku(default = DEFAULT_COMMAND_TIMEOUT)]
    command_timeout: Duration,
}

impl RedisCacheStore {
    /// Create a new Redis cache store.
    #[must_use]
    pub fn new(pool: Arc<Pool>) -> Self {
        Self {
            pool: Some(pool),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Create a store with a custom per-command deadline.
    #[must_use]
    pub fn with_timeout(pool: Arc<Pool>, command_timeout: Duration) -> Self {
        Self {
            pool: Some(pool),
            command_timeout,
        }
    }

    /// Returns the per-command deadline.
    #[must_use]
    pub const fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> BistroResult<deadpool_redis::Connection> {
        let Some(pool) = &self.pool else {
            return Err(BistroError::cache("Redis pool is not configured"));
        };

        match tokio::time::timeout(self.command_timeout, pool.get()).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(BistroError::cache(format!(
                "Failed to get Redis connection: {}",
                e
            ))),
            Err(_) => {
                warn!("Timed out waiting for a Redis connection");
                Err(BistroError::cache(format!(
                    "Timed out after {}ms waiting for a Redis connection",
                    self.command_timeout.as_millis()
                )))
            }
        }
    }

    /// Runs one command under the deadline.
    async fn bounded<T, F>(&self, op: &str, key: &str, command: F) -> BistroResult<T>
    where
        F: Future<Output = RedisResult<T>>,
    {
        match tokio::time::timeout(self.command_timeout, command).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(BistroError::cache(format!(
                "Failed to {} '{}': {}",
                op, key, e
            ))),
            Err(_) => {
                warn!("Redis {} on '{}' timed out", op, key);
                Err(BistroError::cache(format!(
                    "Timed out after {}ms on {} '{}'",
                    self.command_timeout.as_millis(),
                    op,
                    key
                )))
            }
        }
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    async fn get(&self, key: &str) -> BistroResult<Option<String>> {
        let mut conn = self.get_conn().await?;
        let value: Option<String> = self.bounded("get", key, conn.get(key)).await?;

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> BistroResult<()> {
        let mut conn = self.get_conn().await?;
        self.bounded("set", key, conn.set::<_, _, ()>(key, value))
            .await?;

        debug!("Cached key '{}'", key);
        Ok(())
    }

    async fn delete(&self, key: &str) -> BistroResult<bool> {
        let mut conn = self.get_conn().await?;
        let deleted: i64 = self.bounded("delete", key, conn.del(key)).await?;

        debug!("Deleted key '{}': {}", key, deleted > 0);
        Ok(deleted > 0)
    }

    async fn set_add(&self, collection: &str, member: &str) -> BistroResult<bool> {
        let mut conn = self.get_conn().await?;
        let added: i64 = self
            .bounded("add to", collection, conn.sadd(collection, member))
            .await?;

        debug!("Added member to '{}': {}", collection, added > 0);
        Ok(added > 0)
    }

    async fn set_remove(&self, collection: &str, member: &str) -> BistroResult<bool> {
        let mut conn = self.get_conn().await?;
        let removed: i64 = self
            .bounded("remove from", collection, conn.srem(collection, member))
            .await?;

        debug!("Removed member from '{}': {}", collection, removed > 0);
        Ok(removed > 0)
    }

    async fn set_members(&self, collection: &str) -> BistroResult<Vec<String>> {
        let mut conn = self.get_conn().await?;
        self.bounded("list", collection, conn.smembers(collection))
            .await
    }

    async fn ping(&self) -> BistroResult<()> {
        let mut conn = self.get_conn().await?;
        let ping = deadpool_redis::redis::cmd("PING");
        let _: String = self
            .bounded("ping", "server", ping.query_async(&mut conn))
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheStore")
            .field("configured", &self.pool.is_some())
            .field("command_timeout", &self.command_timeout)
            .finish()
    }
}
