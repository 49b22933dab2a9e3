//! Read-through meal cache with popularity promotion.
//!
//! Each meal read goes through the cache first. On a miss the record is
//! loaded from the repository and seeded with an access count of zero. Every
//! later hit bumps the count until it passes the popularity threshold, after
//! which the entry is frozen and its snapshot is added to the popular set on
//! each read.
//!
//! ```text
//! fetch_item(id)
//!   get item:{id}
//!   ├─ miss ─ find_by_id ─┬─ none ─> NotFound
//!   │                     └─ some ─> set(count = 0)          Seeded
//!   └─ hit ── count > threshold ─┬─ yes ─> set_add(raw)      Promoted
//!                                └─ no ──> set(count + 1)    Counted
//! ```
//!
//! The cache is not a fallback path: if any cache call fails the request
//! fails, and the repository is not consulted in its place.

use crate::cache::{cache_keys, CacheStore, CachedEntry};
use bistro_config::{CacheConfig, UpdatePromotion};
use bistro_core::{BistroError, BistroResult, Meal, MealId};
use bistro_repository::MealRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// When reads and updates add a meal to the popular set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionPolicy {
    /// A hit whose stored count exceeds this value promotes the entry.
    pub threshold: u32,
    /// Whether an update always inserts its new snapshot.
    pub on_update: UpdatePromotion,
}

impl Default for PromotionPolicy {
    fn default() -> Self {
        Self::from(&CacheConfig::default())
    }
}

impl From<&CacheConfig> for PromotionPolicy {
    fn from(config: &CacheConfig) -> Self {
        Self {
            threshold: config.popularity_threshold,
            on_update: config.update_promotion,
        }
    }
}

/// Which branch a read took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Cache miss; the entry was loaded and written with a zero count.
    Seeded,
    /// Cache hit below the threshold; the count was incremented and stored.
    Counted,
    /// Cache hit past the threshold; the stored snapshot joined the popular
    /// set and was returned unchanged.
    Promoted,
}

/// Result of a cached meal read.
#[derive(Debug, Clone, PartialEq)]
pub struct MealLookup {
    pub entry: CachedEntry,
    pub outcome: FetchOutcome,
}

/// Keeps the per-meal cache entries and the popular set in step with the
/// repository.
pub struct MealCacheService {
    repository: Arc<dyn MealRepository>,
    cache: Arc<dyn CacheStore>,
    policy: PromotionPolicy,
}

impl MealCacheService {
    /// Creates a cache service over the given repository and store.
    pub fn new(
        repository: Arc<dyn MealRepository>,
        cache: Arc<dyn CacheStore>,
        policy: PromotionPolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            policy,
        }
    }

    /// Returns the active promotion policy.
    #[must_use]
    pub const fn policy(&self) -> PromotionPolicy {
        self.policy
    }

    /// Reads a meal through the cache.
    pub async fn fetch_item(&self, id: MealId) -> BistroResult<MealLookup> {
        let key = cache_keys::meal_key(id);

        let Some(raw) = self.cache.get(&key).await? else {
            return self.seed(id, &key).await;
        };

        let entry = CachedEntry::decode(&raw)?;

        if entry.access_count > self.policy.threshold {
            // The stored count stays frozen from here on; the exact stored
            // text is what joins the set, so repeat reads add nothing new.
            let added = self
                .cache
                .set_add(cache_keys::POPULAR_MEALS_KEY, &raw)
                .await?;
            debug!(
                "Meal {} is popular (count {}), newly promoted: {}",
                id, entry.access_count, added
            );
            return Ok(MealLookup {
                entry,
                outcome: FetchOutcome::Promoted,
            });
        }

        let entry = entry.touched();
        self.cache.set(&key, &entry.encode()?).await?;
        debug!("Meal {} read from cache, count now {}", id, entry.access_count);

        Ok(MealLookup {
            entry,
            outcome: FetchOutcome::Counted,
        })
    }

    async fn seed(&self, id: MealId, key: &str) -> BistroResult<MealLookup> {
        let meal = self
            .repository
            .find_by_id(id, true)
            .await?
            .ok_or_else(|| BistroError::not_found("Meal", id))?;

        let entry = CachedEntry::seed(meal);
        self.cache.set(key, &entry.encode()?).await?;
        debug!("Meal {} seeded into cache", id);

        Ok(MealLookup {
            entry,
            outcome: FetchOutcome::Seeded,
        })
    }

    /// Lists the snapshots in the popular set, as stored.
    pub async fn list_popular(&self) -> BistroResult<Vec<String>> {
        self.cache.set_members(cache_keys::POPULAR_MEALS_KEY).await
    }

    /// Returns the text currently cached for a meal, if any.
    pub async fn current_snapshot(&self, id: MealId) -> BistroResult<Option<String>> {
        self.cache.get(&cache_keys::meal_key(id)).await
    }

    /// Returns the snapshot to hand to the mutation hooks for `meal`.
    ///
    /// This is the cached text when the meal is cached, otherwise the
    /// encoding a fresh seed of `meal` would produce.
    pub async fn snapshot_for(&self, meal: &Meal) -> BistroResult<String> {
        match self.current_snapshot(meal.id).await? {
            Some(raw) => Ok(raw),
            None => CachedEntry::seed(meal.clone()).encode(),
        }
    }

    /// Brings the cache in line with a committed update.
    ///
    /// `pre_snapshot` is the member the meal may hold in the popular set;
    /// `post` is the record as committed. The new entry keeps the access
    /// count recorded in `pre_snapshot`.
    pub async fn on_item_updated(
        &self,
        id: MealId,
        pre_snapshot: &str,
        post: Meal,
    ) -> BistroResult<CachedEntry> {
        let access_count = CachedEntry::decode(pre_snapshot)
            .map(|entry| entry.access_count)
            .unwrap_or(0);
        let entry = CachedEntry::with_count(post, access_count);
        let encoded = entry.encode()?;

        let was_popular = self
            .cache
            .set_remove(cache_keys::POPULAR_MEALS_KEY, pre_snapshot)
            .await?;

        let promote = match self.policy.on_update {
            UpdatePromotion::Always => true,
            UpdatePromotion::IfPopular => was_popular,
        };
        if promote {
            self.cache
                .set_add(cache_keys::POPULAR_MEALS_KEY, &encoded)
                .await?;
        }

        self.cache.set(&cache_keys::meal_key(id), &encoded).await?;

        info!(
            "Cache refreshed for updated meal {} (was popular: {}, promoted: {})",
            id, was_popular, promote
        );
        Ok(entry)
    }

    /// Removes every trace of a deleted meal from the cache.
    pub async fn on_item_deleted(&self, id: MealId, pre_snapshot: &str) -> BistroResult<()> {
        let was_popular = self
            .cache
            .set_remove(cache_keys::POPULAR_MEALS_KEY, pre_snapshot)
            .await?;
        let was_cached = self.cache.delete(&cache_keys::meal_key(id)).await?;

        info!(
            "Cache cleared for deleted meal {} (was cached: {}, was popular: {})",
            id, was_cached, was_popular
        );
        Ok(())
    }
}

impl std::fmt::Debug for MealCacheService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MealCacheService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}
