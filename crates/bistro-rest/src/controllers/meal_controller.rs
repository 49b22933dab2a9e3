//! Meal controller.

use crate::{
    extractors::ValidatedJson,
    responses::{meal_created, meal_deleted, ok, ApiResult, AppError},
    state::AppState,
};
use bistro_core::{BistroError, MealId};
use bistro_service::{CreateMealRequest, MealResponse, MessageResponse, UpdateMealRequest};
use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Router,
};
use tracing::debug;

/// Creates the meal router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_meals).post(create_meal))
        .route("/popular", get(popular_meals))
        .route("/:id", get(get_meal).put(update_meal).delete(delete_meal))
}

/// List all meals with their ratings.
#[utoipa::path(
    get,
    path = "/meals",
    tag = "meals",
    responses(
        (status = 200, description = "All meals", body = [MealResponse])
    )
)]
pub async fn list_meals(State(state): State<AppState>) -> ApiResult<Vec<MealResponse>> {
    debug!("List meals request");

    let meals = state.meal_service.list_meals().await?;
    ok(meals)
}

/// Create a new meal.
#[utoipa::path(
    post,
    path = "/meals",
    tag = "meals",
    request_body = CreateMealRequest,
    responses(
        (status = 201, description = "Meal created", body = MealResponse),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_meal(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateMealRequest>,
) -> Result<Response, AppError> {
    debug!("Create meal request: {}", request.title);

    let meal = state.meal_service.create_meal(request).await?;
    Ok(meal_created(meal))
}

/// List the popular-meal snapshots.
///
/// Each entry is a cached meal snapshot exactly as stored, and may be stale.
#[utoipa::path(
    get,
    path = "/meals/popular",
    tag = "meals",
    responses(
        (status = 200, description = "Serialized snapshots of popular meals", body = [String]),
        (status = 500, description = "Cache unavailable")
    )
)]
pub async fn popular_meals(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    debug!("Popular meals request");

    let snapshots = state.meal_service.popular_meals().await?;
    ok(snapshots)
}

/// Get a meal by ID through the cache.
#[utoipa::path(
    get,
    path = "/meals/{id}",
    tag = "meals",
    params(("id" = i64, Path, description = "Meal ID")),
    responses(
        (status = 200, description = "Meal found", body = MealResponse),
        (status = 400, description = "Invalid meal ID"),
        (status = 404, description = "Meal not found"),
        (status = 500, description = "Cache or database unavailable")
    )
)]
pub async fn get_meal(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<MealResponse> {
    debug!("Get meal request: {}", id);

    let meal_id = parse_meal_id(&id)?;
    let meal = state.meal_service.get_meal(meal_id).await?;
    ok(meal)
}

/// Update a meal.
#[utoipa::path(
    put,
    path = "/meals/{id}",
    tag = "meals",
    params(("id" = i64, Path, description = "Meal ID")),
    request_body = UpdateMealRequest,
    responses(
        (status = 200, description = "Meal updated", body = MealResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn update_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateMealRequest>,
) -> ApiResult<MealResponse> {
    debug!("Update meal request: {}", id);

    let meal_id = parse_meal_id(&id)?;
    let meal = state.meal_service.update_meal(meal_id, request).await?;
    ok(meal)
}

/// Delete a meal.
#[utoipa::path(
    delete,
    path = "/meals/{id}",
    tag = "meals",
    params(("id" = i64, Path, description = "Meal ID")),
    responses(
        (status = 200, description = "Meal deleted", body = MessageResponse),
        (status = 404, description = "Meal not found")
    )
)]
pub async fn delete_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    debug!("Delete meal request: {}", id);

    let meal_id = parse_meal_id(&id)?;
    state.meal_service.delete_meal(meal_id).await?;

    meal_deleted(meal_id)
}

fn parse_meal_id(id: &str) -> Result<MealId, AppError> {
    MealId::parse(id).map_err(|_| AppError(BistroError::Validation(format!("Invalid meal ID: {}", id))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_meal_id() {
        assert_eq!(parse_meal_id("7").unwrap(), MealId::new(7));
        assert_eq!(parse_meal_id(" 12 ").unwrap(), MealId::new(12));

        let err = parse_meal_id("soup").unwrap_err();
        assert_eq!(err.0.status_code(), 400);
    }
}
