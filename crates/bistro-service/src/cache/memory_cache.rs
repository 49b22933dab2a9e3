//! Process-local cache store.

use super::CacheStore;
use async_trait::async_trait;
use bistro_core::BistroResult;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Cache store held in process memory.
///
/// Behaves like the Redis store for a single process. State is not shared
/// between instances, so this is only suitable for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    values: RwLock<HashMap<String, String>>,
    sets: RwLock<HashMap<String, BTreeSet<String>>>,
}

impl InMemoryCacheStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of plain keys currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Returns true if no plain keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

#[async_trait]
impl CacheStore for InMemoryCacheStore {
    async fn get(&self, key: &str) -> BistroResult<Option<String>> {
        let value = self.values.read().get(key).cloned();
        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> BistroResult<()> {
        self.values
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> BistroResult<bool> {
        Ok(self.values.write().remove(key).is_some())
    }

    async fn set_add(&self, collection: &str, member: &str) -> BistroResult<bool> {
        Ok(self
            .sets
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(member.to_string()))
    }

    async fn set_remove(&self, collection: &str, member: &str) -> BistroResult<bool> {
        let mut sets = self.sets.write();
        let Some(set) = sets.get_mut(collection) else {
            return Ok(false);
        };
        let removed = set.remove(member);
        if set.is_empty() {
            sets.remove(collection);
        }
        Ok(removed)
    }

    async fn set_members(&self, collection: &str) -> BistroResult<Vec<String>> {
        Ok(self
            .sets
            .read()
            .get(collection)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn ping(&self) -> BistroResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_key_value_operations() {
        let store = InMemoryCacheStore::new();
        assert_eq!(store.get("item:1").await.unwrap(), None);

        store.set("item:1", "a").await.unwrap();
        store.set("item:1", "b").await.unwrap();
        assert_eq!(store.get("item:1").await.unwrap().as_deref(), Some("b"));
        assert_eq!(store.len(), 1);

        assert!(store.delete("item:1").await.unwrap());
        assert!(!store.delete("item:1").await.unwrap());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_set_operations() {
        let store = InMemoryCacheStore::new();

        assert!(store.set_add("popular", "x").await.unwrap());
        assert!(!store.set_add("popular", "x").await.unwrap());
        assert!(store.set_add("popular", "y").await.unwrap());
        assert_eq!(store.set_members("popular").await.unwrap(), vec!["x", "y"]);

        assert!(store.set_remove("popular", "x").await.unwrap());
        assert!(!store.set_remove("popular", "x").await.unwrap());
        assert!(!store.set_remove("missing", "x").await.unwrap());
        assert_eq!(store.set_members("popular").await.unwrap(), vec!["y"]);
    }

    #[tokio::test]
    async fn test_sets_and_keys_are_separate() {
        let store = InMemoryCacheStore::new();
        store.set_add("popular", "x").await.unwrap();

        assert_eq!(store.get("popular").await.unwrap(), None);
        assert!(store.set_members("other").await.unwrap().is_empty());
    }
}
