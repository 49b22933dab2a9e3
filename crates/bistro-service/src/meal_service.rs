//! Meal service trait definition.

use crate::dto::{CreateMealRequest, MealResponse, UpdateMealRequest};
use bistro_core::{BistroResult, Interface, MealId};
use async_trait::async_trait;

/// Meal service trait.
#[async_trait]
pub trait MealService: Interface + Send + Sync {
    /// Creates a new meal.
    async fn create_meal(&self, request: CreateMealRequest) -> BistroResult<MealResponse>;

    /// Lists all meals with their ratings.
    async fn list_meals(&self) -> BistroResult<Vec<MealResponse>>;

    /// Gets a meal by ID through the cache.
    async fn get_meal(&self, id: MealId) -> BistroResult<MealResponse>;

    /// Lists the popular-meal snapshots as stored in the cache.
    async fn popular_meals(&self) -> BistroResult<Vec<String>>;

    /// Updates a meal and refreshes its cached state.
    async fn update_meal(&self, id: MealId, request: UpdateMealRequest) -> BistroResult<MealResponse>;

    /// Deletes a meal and drops its cached state.
    async fn delete_meal(&self, id: MealId) -> BistroResult<()>;
}
