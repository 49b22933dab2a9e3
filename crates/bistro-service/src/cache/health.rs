//! Cache store readiness probe.

use super::CacheStore;
use async_trait::async_trait;
use bistro_core::{HealthCheck, HealthStatus};
use std::sync::Arc;

/// Reports whether the cache store answers a ping.
pub struct CacheHealthCheck {
    cache: Arc<dyn CacheStore>,
}

impl CacheHealthCheck {
    /// Creates a probe over the given store.
    #[must_use]
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HealthCheck for CacheHealthCheck {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        match self.cache.ping().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCacheStore;

    #[tokio::test]
    async fn test_in_memory_store_is_healthy() {
        let check = CacheHealthCheck::new(Arc::new(InMemoryCacheStore::new()));
        assert_eq!(check.name(), "cache");
        assert!(check.check().await.is_healthy());
    }
}
