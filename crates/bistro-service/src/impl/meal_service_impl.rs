//! Meal service implementation.

use crate::cache::CacheStore;
use crate::dto::{CreateMealRequest, MealResponse, UpdateMealRequest};
use crate::meal_cache::{MealCacheService, PromotionPolicy};
use crate::meal_service::MealService;
use async_trait::async_trait;
use bistro_core::{BistroError, BistroResult, MealChanges, MealId, NewMeal, ValidateExt};
use bistro_repository::MealRepository;
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Meal service component for Shaku DI.
///
/// Pass-through operations go straight to the repository. Reads by ID and
/// mutations go through [`MealCacheService`].
#[derive(Component)]
#[shaku(interface = MealService)]
pub struct MealServiceComponent {
    #[shaku(inject)]
    repository: Arc<dyn MealRepository>,
    #[shaku(inject)]
    cache: Arc<dyn CacheStore>,
    policy: PromotionPolicy,
}

impl MealServiceComponent {
    /// Creates the service without a DI container.
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

    fn meal_cache(&self) -> MealCacheService {
        MealCacheService::new(
            Arc::clone(&self.repository),
            Arc::clone(&self.cache),
            self.policy,
        )
    }
}

#[async_trait]
impl MealService for MealServiceComponent {
    async fn create_meal(&self, request: CreateMealRequest) -> BistroResult<MealResponse> {
        debug!("Creating meal: {}", request.title);

        request.validate_request()?;

        let meal = self.repository.save(&NewMeal::from(request)).await?;

        info!("Meal created: {}", meal.id);
        Ok(MealResponse::from(meal))
    }

    async fn list_meals(&self) -> BistroResult<Vec<MealResponse>> {
        debug!("Listing meals");

        let meals = self.repository.find_all_with_ratings().await?;
        Ok(meals.into_iter().map(MealResponse::from).collect())
    }

    async fn get_meal(&self, id: MealId) -> BistroResult<MealResponse> {
        debug!("Getting meal: {}", id);

        let lookup = self.meal_cache().fetch_item(id).await?;
        debug!("Meal {} served ({:?})", id, lookup.outcome);

        Ok(MealResponse::from(lookup.entry))
    }

    async fn popular_meals(&self) -> BistroResult<Vec<String>> {
        self.meal_cache().list_popular().await
    }

    async fn update_meal(&self, id: MealId, request: UpdateMealRequest) -> BistroResult<MealResponse> {
        debug!("Updating meal: {}", id);

        request.validate_request()?;

        let meal_cache = self.meal_cache();

        let current = self
            .repository
            .find_by_id(id, true)
            .await?
            .ok_or_else(|| BistroError::not_found("Meal", id))?;

        let pre_snapshot = meal_cache.snapshot_for(&current).await?;

        let changes = MealChanges::from(request);
        let updated = if changes.is_empty() {
            current
        } else {
            self.repository.update(id, &changes).await?
        };

        let entry = meal_cache
            .on_item_updated(id, &pre_snapshot, updated)
            .await
            .map_err(|e| {
                warn!("Meal {} updated but cache refresh failed: {}", id, e);
                e
            })?;

        info!("Meal updated: {}", id);
        Ok(MealResponse::from(entry))
    }

    async fn delete_meal(&self, id: MealId) -> BistroResult<()> {
        debug!("Deleting meal: {}", id);

        let meal_cache = self.meal_cache();

        let current = self
            .repository
            .find_by_id(id, true)
            .await?
            .ok_or_else(|| BistroError::not_found("Meal", id))?;

        let pre_snapshot = meal_cache.snapshot_for(&current).await?;

        if !self.repository.delete(id).await? {
            return Err(BistroError::not_found("Meal", id));
        }

        meal_cache
            .on_item_deleted(id, &pre_snapshot)
            .await
            .map_err(|e| {
                warn!("Meal {} deleted but cache cleanup failed: {}", id, e);
                e
            })?;

        info!("Meal deleted: {}", id);
        Ok(())
    }
}

impl std::fmt::Debug for MealServiceComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MealServiceComponent")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CachedEntry, InMemoryCacheStore};
    use bistro_config::UpdatePromotion;
    use bistro_core::Meal;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// Mock meal repository for testing.
    struct MockMealRepository {
        meals: Mutex<BTreeMap<MealId, Meal>>,
        next_id: Mutex<i64>,
    }

    impl MockMealRepository {
        fn new() -> Self {
            Self {
                meals: Mutex::new(BTreeMap::new()),
                next_id: Mutex::new(1),
            }
        }
    }

    #[async_trait]
    impl MealRepository for MockMealRepository {
        async fn find_by_id(&self, id: MealId, _with_associations: bool) -> BistroResult<Option<Meal>> {
            Ok(self.meals.lock().unwrap().get(&id).cloned())
        }

        async fn find_all_with_ratings(&self) -> BistroResult<Vec<Meal>> {
            Ok(self.meals.lock().unwrap().values().cloned().collect())
        }

        async fn save(&self, meal: &NewMeal) -> BistroResult<Meal> {
            let mut next_id = self.next_id.lock().unwrap();
            let now = Utc::now();
            let saved = Meal {
                id: MealId::new(*next_id),
                title: meal.title.clone(),
                price: meal.price,
                available_quantity: meal.available_quantity,
                image: meal.image.clone(),
                description: meal.description.clone(),
                ratings: vec![],
                comments: vec![],
                meal_order_details: vec![],
                created_at: now,
                updated_at: now,
            };
            *next_id += 1;
            self.meals.lock().unwrap().insert(saved.id, saved.clone());
            Ok(saved)
        }

        async fn update(&self, id: MealId, changes: &MealChanges) -> BistroResult<Meal> {
            let mut meals = self.meals.lock().unwrap();
            let meal = meals
                .get(&id)
                .ok_or_else(|| BistroError::not_found("Meal", id))?
                .merged_with(changes);
            meals.insert(id, meal.clone());
            Ok(meal)
        }

        async fn delete(&self, id: MealId) -> BistroResult<bool> {
            Ok(self.meals.lock().unwrap().remove(&id).is_some())
        }

        async fn count(&self) -> BistroResult<u64> {
            Ok(self.meals.lock().unwrap().len() as u64)
        }
    }

    fn create_request(title: &str, price: f64) -> CreateMealRequest {
        CreateMealRequest {
            title: title.to_string(),
            price,
            available_quantity: 10,
            image: None,
            description: None,
        }
    }

    fn create_service(policy: PromotionPolicy) -> (MealServiceComponent, Arc<InMemoryCacheStore>) {
        let store = Arc::new(InMemoryCacheStore::new());
        let service = MealServiceComponent::new(
            Arc::new(MockMealRepository::new()),
            store.clone(),
            policy,
        );
        (service, store)
    }

    #[tokio::test]
    async fn test_create_meal_does_not_touch_cache() {
        let (service, store) = create_service(PromotionPolicy::default());

        let meal = service.create_meal(create_request("Soup", 5.0)).await.unwrap();

        assert_eq!(meal.title, "Soup");
        assert_eq!(meal.access_count, None);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_meal_invalid() {
        let (service, _) = create_service(PromotionPolicy::default());

        let result = service.create_meal(create_request("", 5.0)).await;
        match result.unwrap_err() {
            BistroError::Validation(msg) => assert!(msg.contains("title")),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_meals() {
        let (service, _) = create_service(PromotionPolicy::default());
        service.create_meal(create_request("Soup", 5.0)).await.unwrap();
        service.create_meal(create_request("Salad", 4.0)).await.unwrap();

        let meals = service.list_meals().await.unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[1].title, "Salad");
    }

    #[tokio::test]
    async fn test_get_meal_counts_reads() {
        let (service, _) = create_service(PromotionPolicy::default());
        let id = service.create_meal(create_request("Soup", 5.0)).await.unwrap().id;

        let mut counts = Vec::new();
        for _ in 0..4 {
            counts.push(service.get_meal(id).await.unwrap().access_count);
        }

        assert_eq!(counts, vec![Some(0), Some(1), Some(2), Some(2)]);
        assert_eq!(service.popular_meals().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_meal_not_found() {
        let (service, store) = create_service(PromotionPolicy::default());

        let result = service.get_meal(MealId::new(999)).await;
        assert!(matches!(result, Err(BistroError::NotFound { .. })));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_update_meal_merges_and_refreshes_cache() {
        let (service, store) = create_service(PromotionPolicy::default());
        let id = service.create_meal(create_request("Soup", 5.0)).await.unwrap().id;
        service.get_meal(id).await.unwrap();
        service.get_meal(id).await.unwrap();

        let request = UpdateMealRequest {
            price: Some(6.0),
            ..UpdateMealRequest::default()
        };
        let updated = service.update_meal(id, request).await.unwrap();

        assert_eq!(updated.price, 6.0);
        assert_eq!(updated.title, "Soup");
        assert_eq!(updated.access_count, Some(1));

        let cached = store.get(&format!("item:{}", id)).await.unwrap().unwrap();
        assert_eq!(CachedEntry::decode(&cached).unwrap().meal.price, 6.0);

        let popular = service.popular_meals().await.unwrap();
        assert_eq!(popular, vec![cached]);
    }

    #[tokio::test]
    async fn test_update_uncached_meal_seeds_entry() {
        let (service, store) = create_service(PromotionPolicy {
            threshold: 1,
            on_update: UpdatePromotion::IfPopular,
        });
        let id = service.create_meal(create_request("Soup", 5.0)).await.unwrap().id;

        let request = UpdateMealRequest {
            title: Some("Hot Soup".to_string()),
            ..UpdateMealRequest::default()
        };
        let updated = service.update_meal(id, request).await.unwrap();

        assert_eq!(updated.title, "Hot Soup");
        assert_eq!(updated.access_count, Some(0));
        assert_eq!(store.len(), 1);
        assert!(service.popular_meals().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_meal_not_found() {
        let (service, store) = create_service(PromotionPolicy::default());

        let result = service
            .update_meal(MealId::new(42), UpdateMealRequest::default())
            .await;

        assert!(matches!(result, Err(BistroError::NotFound { .. })));
        assert!(service.popular_meals().await.unwrap().is_empty());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_update_meal_invalid() {
        let (service, _) = create_service(PromotionPolicy::default());
        let id = service.create_meal(create_request("Soup", 5.0)).await.unwrap().id;

        let request = UpdateMealRequest {
            available_quantity: Some(-3),
            ..UpdateMealRequest::default()
        };
        let result = service.update_meal(id, request).await;
        assert!(matches!(result, Err(BistroError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_meal_clears_cache() {
        let (service, store) = create_service(PromotionPolicy::default());
        let id = service.create_meal(create_request("Soup", 5.0)).await.unwrap().id;
        for _ in 0..4 {
            service.get_meal(id).await.unwrap();
        }
        assert_eq!(service.popular_meals().await.unwrap().len(), 1);

        service.delete_meal(id).await.unwrap();

        assert!(store.is_empty());
        assert!(service.popular_meals().await.unwrap().is_empty());
        assert!(matches!(
            service.get_meal(id).await,
            Err(BistroError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_meal_not_found() {
        let (service, _) = create_service(PromotionPolicy::default());

        let result = service.delete_meal(MealId::new(5)).await;
        assert!(matches!(result, Err(BistroError::NotFound { .. })));
    }
}
