//! OpenAPI documentation configuration.

use crate::controllers::health_controller::{DependencyStatus, HealthResponse, ReadinessResponse};
use bistro_core::{Comment, ErrorResponse, FieldError, MealId, MealOrderDetail, Rating};
use bistro_service::{CreateMealRequest, MealResponse, MessageResponse, UpdateMealRequest};
use utoipa::OpenApi;

/// OpenAPI documentation for the Bistro API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bistro API",
        version = "1.0.0",
        description = "Meal catalogue with read-through caching and popular-meal tracking",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Meal endpoints
        crate::controllers::meal_controller::list_meals,
        crate::controllers::meal_controller::create_meal,
        crate::controllers::meal_controller::popular_meals,
        crate::controllers::meal_controller::get_meal,
        crate::controllers::meal_controller::update_meal,
        crate::controllers::meal_controller::delete_meal,
        // Health endpoints
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            // Core types
            MealId,
            Rating,
            Comment,
            MealOrderDetail,
            ErrorResponse,
            FieldError,
            // Meal DTOs
            CreateMealRequest,
            UpdateMealRequest,
            MealResponse,
            MessageResponse,
            // Health
            HealthResponse,
            ReadinessResponse,
            DependencyStatus,
        )
    ),
    tags(
        (name = "meals", description = "Meal endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_meal_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/meals/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/meals/popular"));
        assert!(paths.iter().any(|p| p.as_str() == "/ready"));
    }
}
