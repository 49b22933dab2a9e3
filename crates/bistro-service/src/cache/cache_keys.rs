//! Cache key generators for consistent key naming.

use bistro_core::MealId;

/// Prefix of per-meal cache entries.
const MEAL_PREFIX: &str = "item:";

/// Set holding snapshots of frequently requested meals.
pub const POPULAR_MEALS_KEY: &str = "mostPopularMeals";

/// Generate the cache key for a meal by ID.
#[must_use]
pub fn meal_key(id: MealId) -> String {
    format!("{}{}", MEAL_PREFIX, id)
}
