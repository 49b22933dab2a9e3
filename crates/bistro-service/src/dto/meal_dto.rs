//! Meal-related DTOs.

use crate::cache::CachedEntry;
use bistro_core::rules::{not_blank, valid_price};
use bistro_core::{Comment, Meal, MealChanges, MealId, MealOrderDetail, NewMeal, Rating};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new meal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMealRequest {
    #[validate(
        length(max = 255, message = "Title cannot exceed 255 characters"),
        custom(function = "not_blank", message = "Title cannot be blank")
    )]
    pub title: String,

    #[validate(custom(function = "valid_price", message = "Price must be a non-negative amount"))]
    pub price: f64,

    #[validate(range(min = 0, message = "Available quantity cannot be negative"))]
    #[serde(default)]
    pub available_quantity: i32,

    #[validate(length(max = 1024))]
    pub image: Option<String>,

    pub description: Option<String>,
}

impl From<CreateMealRequest> for NewMeal {
    fn from(request: CreateMealRequest) -> Self {
        Self {
            title: request.title,
            price: request.price,
            available_quantity: request.available_quantity,
            image: request.image,
            description: request.description,
        }
    }
}

/// Request to update a meal. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMealRequest {
    #[validate(
        length(max = 255, message = "Title cannot exceed 255 characters"),
        custom(function = "not_blank", message = "Title cannot be blank")
    )]
    pub title: Option<String>,

    #[validate(custom(function = "valid_price", message = "Price must be a non-negative amount"))]
    pub price: Option<f64>,

    #[validate(range(min = 0, message = "Available quantity cannot be negative"))]
    pub available_quantity: Option<i32>,

    #[validate(length(max = 1024))]
    pub image: Option<String>,

    pub description: Option<String>,
}

impl From<UpdateMealRequest> for MealChanges {
    fn from(request: UpdateMealRequest) -> Self {
        Self {
            title: request.title,
            price: request.price,
            available_quantity: request.available_quantity,
            image: request.image,
            description: request.description,
        }
    }
}

/// Meal response DTO.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MealResponse {
    pub id: MealId,
    pub title: String,
    pub price: f64,
    pub available_quantity: i32,
    pub image: Option<String>,
    pub description: Option<String>,
    pub ratings: Vec<Rating>,
    pub comments: Vec<Comment>,
    pub meal_order_details: Vec<MealOrderDetail>,
    /// Mean rating over the loaded ratings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    /// Cached read count; present only when the meal was served through the
    /// cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_count: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Meal> for MealResponse {
    fn from(meal: Meal) -> Self {
        Self {
            average_rating: meal.average_rating(),
            id: meal.id,
            title: meal.title,
            price: meal.price,
            available_quantity: meal.available_quantity,
            image: meal.image,
            description: meal.description,
            ratings: meal.ratings,
            comments: meal.comments,
            meal_order_details: meal.meal_order_details,
            access_count: None,
            created_at: meal.created_at,
            updated_at: meal.updated_at,
        }
    }
}

impl From<CachedEntry> for MealResponse {
    fn from(entry: CachedEntry) -> Self {
        Self {
            access_count: Some(entry.access_count),
            ..Self::from(entry.meal)
        }
    }
}

/// Plain message response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Creates a message response.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
