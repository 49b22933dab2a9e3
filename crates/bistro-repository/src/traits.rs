//! Repository trait definitions.

use bistro_core::{BistroResult, Interface, Meal, MealChanges, MealId, NewMeal};
use async_trait::async_trait;

/// Meal repository trait.
///
/// This is the durable source of truth for meals. The cache layer only ever
/// holds derived copies of what these methods return.
#[async_trait]
pub trait MealRepository: Interface + Send + Sync {
    /// Finds a meal by ID, optionally loading ratings, comments and order lines.
    async fn find_by_id(&self, id: MealId, with_associations: bool) -> BistroResult<Option<Meal>>;

    /// Lists every meal with its ratings loaded.
    async fn find_all_with_ratings(&self) -> BistroResult<Vec<Meal>>;

    /// Saves a new meal and returns it with its assigned ID.
    async fn save(&self, meal: &NewMeal) -> BistroResult<Meal>;

    /// Applies a partial update and returns the committed meal with its
    /// associations.
    ///
    /// Returns `NotFound` if the meal does not exist.
    async fn update(&self, id: MealId, changes: &MealChanges) -> BistroResult<Meal>;

    /// Deletes a meal by ID.
    ///
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: MealId) -> BistroResult<bool>;

    /// Counts all meals.
    async fn count(&self) -> BistroResult<u64>;
}
