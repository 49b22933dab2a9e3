//! Meal record and its associated sub-records.

use crate::MealId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A meal as stored in the persistent store.
///
/// `ratings`, `comments` and `meal_order_details` are only populated when the
/// record was loaded with its associations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Meal {
    /// Unique identifier for the meal.
    pub id: MealId,

    /// Display title.
    pub title: String,

    /// Unit price.
    pub price: f64,

    /// Portions currently available for ordering.
    pub available_quantity: i32,

    /// Image reference (URL or storage key).
    pub image: Option<String>,

    /// Free-form description.
    pub description: Option<String>,

    /// Ratings left by customers.
    #[serde(default)]
    pub ratings: Vec<Rating>,

    /// Comments left by customers.
    #[serde(default)]
    pub comments: Vec<Comment>,

    /// Order lines referencing this meal.
    #[serde(default)]
    pub meal_order_details: Vec<MealOrderDetail>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Meal {
    /// Returns a copy of this meal with the given changes applied.
    ///
    /// Fields absent from `changes` keep their current value.
    #[must_use]
    pub fn merged_with(&self, changes: &MealChanges) -> Self {
        let mut meal = self.clone();
        if let Some(title) = &changes.title {
            meal.title.clone_from(title);
        }
        if let Some(price) = changes.price {
            meal.price = price;
        }
        if let Some(quantity) = changes.available_quantity {
            meal.available_quantity = quantity;
        }
        if changes.image.is_some() {
            meal.image.clone_from(&changes.image);
        }
        if changes.description.is_some() {
            meal.description.clone_from(&changes.description);
        }
        meal
    }

    /// Returns true if the meal can currently be ordered.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available_quantity > 0
    }

    /// Returns the mean rating, if any ratings were loaded.
    #[must_use]
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let total: i64 = self.ratings.iter().map(|r| i64::from(r.score)).sum();
        #[allow(clippy::cast_precision_loss)]
        Some(total as f64 / self.ratings.len() as f64)
    }
}

/// A customer rating attached to a meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Rating {
    pub id: i64,
    pub meal_id: MealId,
    pub user_id: i64,
    /// Score from 1 to 5.
    pub score: i32,
    pub created_at: DateTime<Utc>,
}

/// A customer comment attached to a meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Comment {
    pub id: i64,
    pub meal_id: MealId,
    pub user_id: i64,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// An order line that references a meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MealOrderDetail {
    pub id: i64,
    pub meal_id: MealId,
    pub order_id: i64,
    pub quantity: i32,
    /// Unit price captured when the order was placed.
    pub price: f64,
}

/// Fields required to create a meal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub title: String,
    pub price: f64,
    pub available_quantity: i32,
    pub image: Option<String>,
    pub description: Option<String>,
}

/// Partial update of a meal; `None` leaves the current value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MealChanges {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub available_quantity: Option<i32>,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl MealChanges {
    /// Returns true if no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.price.is_none()
            && self.available_quantity.is_none()
            && self.image.is_none()
            && self.description.is_none()
    }
}
