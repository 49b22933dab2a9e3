//! Dependency injection module using Shaku.
//!
//! `MonolithicModule` wires the MySQL pool, the meal repository, the cache
//! store and the meal service into one container. When Redis is disabled the
//! cache store is overridden with the process-local store.

use bistro_config::{CacheConfig, RedisConfig};
use bistro_core::{module, BistroError, BistroResult, HasComponent};
use bistro_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MealRepository,
    MySqlMealRepository,
};
use bistro_service::{
    CacheStore, InMemoryCacheStore, MealService, MealServiceComponent,
    MealServiceComponentParameters, PromotionPolicy, RedisCacheStore, RedisCacheStoreParameters,
};
use deadpool_redis::{Pool, PoolConfig, Runtime};
use std::sync::Arc;
use tracing::info;

// Single-process deployment: database, repository, cache store, service.
module! {
    pub MonolithicModule {
        components = [
            DatabasePool,
            MySqlMealRepository,
            RedisCacheStore,
            MealServiceComponent,
        ],
        providers = [],
    }
}

/// Creates the Redis connection pool, or `None` when Redis is disabled.
///
/// Pool creation does not connect; the first command does.
pub fn create_redis_pool(config: &RedisConfig) -> BistroResult<Option<Arc<Pool>>> {
    if !config.enabled {
        info!("Redis disabled, using the in-process cache store");
        return Ok(None);
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(PoolConfig::new(config.pool_size));
    let pool = redis_cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| BistroError::cache(format!("Failed to create Redis pool: {}", e)))?;

    info!("Redis pool created (max size {})", config.pool_size);
    Ok(Some(Arc::new(pool)))
}

/// Builds the monolithic module.
///
/// With `redis_pool` set, the cache store talks to Redis with the configured
/// command deadline. Without it, [`InMemoryCacheStore`] is used instead.
pub fn build_monolithic_module(
    db_pool: &DatabasePool,
    redis_pool: Option<Arc<Pool>>,
    cache_config: &CacheConfig,
) -> Arc<MonolithicModule> {
    let use_memory_store = redis_pool.is_none();

    let mut builder = MonolithicModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<RedisCacheStore>(RedisCacheStoreParameters {
            pool: redis_pool,
            command_timeout: cache_config.command_timeout(),
        })
        .with_component_parameters::<MealServiceComponent>(MealServiceComponentParameters {
            policy: PromotionPolicy::from(cache_config),
        });

    if use_memory_store {
        builder =
            builder.with_component_override::<dyn CacheStore>(Box::new(InMemoryCacheStore::new()));
    }

    Arc::new(builder.build())
}

/// Trait for resolving the meal service from a module.
pub trait ServiceResolver {
    /// Resolves the meal service.
    fn meal_service(&self) -> Arc<dyn MealService>;
}

impl ServiceResolver for MonolithicModule {
    fn meal_service(&self) -> Arc<dyn MealService> {
        self.resolve()
    }
}

/// Trait for resolving the database pool.
pub trait DatabaseResolver {
    /// Resolves the database pool.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl DatabaseResolver for MonolithicModule {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}

/// Trait for resolving the meal repository.
pub trait RepositoryResolver {
    /// Resolves the meal repository.
    fn meal_repository(&self) -> Arc<dyn MealRepository>;
}

impl RepositoryResolver for MonolithicModule {
    fn meal_repository(&self) -> Arc<dyn MealRepository> {
        self.resolve()
    }
}

/// Trait for resolving the cache store.
pub trait CacheResolver {
    /// Resolves the cache store.
    fn cache_store(&self) -> Arc<dyn CacheStore>;
}

impl CacheResolver for MonolithicModule {
    fn cache_store(&self) -> Arc<dyn CacheStore> {
        self.resolve()
    }
}
