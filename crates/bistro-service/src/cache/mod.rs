//! Caching infrastructure for the service layer.
//!
//! A key/value store with set-valued collections, backed by Redis in
//! deployment and by a process-local map when Redis is disabled.

mod cache_store;
pub mod cache_keys;
mod entry;
mod health;
mod memory_cache;
mod redis_cache;

pub use cache_store::CacheStore;
pub use entry::CachedEntry;
pub use health::CacheHealthCheck;
pub use memory_cache::InMemoryCacheStore;
pub use redis_cache::{RedisCacheStore, RedisCacheStoreParameters, DEFAULT_COMMAND_TIMEOUT};
