//! Response envelope and error mapping for the meal API.

use bistro_core::{BistroError, ErrorResponse, MealId};
use bistro_service::{MealResponse, MessageResponse};
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Envelope around every JSON body: `data` on success, `error` otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorResponse>,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful payload.
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    /// Wraps an error body.
    pub fn failure(error: ErrorResponse) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Handler error; renders a [`BistroError`] into the envelope.
#[derive(Debug)]
pub struct AppError(pub BistroError);

impl From<BistroError> for AppError {
    fn from(err: BistroError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Cache failures are never masked by a database read, so they are
        // reported on their own.
        match &self.0 {
            BistroError::Cache(msg) => error!(dependency = "cache", "Cache store failure: {}", msg),
            BistroError::Database(msg) => {
                error!(dependency = "database", "Database failure: {}", msg);
            }
            err if status.is_server_error() => error!("Request failed: {}", err),
            err => debug!("Request rejected ({}): {}", status.as_u16(), err),
        }

        let body = Json(ApiResponse::failure(ErrorResponse::from_error(&self.0)));
        (status, body).into_response()
    }
}

/// Result type for Axum handlers.
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

/// 200 with the payload in the envelope.
pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}

/// 201 for a newly stored meal, with `Location` pointing at the meal.
pub fn meal_created(meal: MealResponse) -> Response {
    let location = meal_location(meal.id);
    let mut response = (StatusCode::CREATED, Json(ApiResponse::success(meal))).into_response();
    if let Ok(value) = HeaderValue::from_str(&location) {
        response.headers_mut().insert(header::LOCATION, value);
    }
    response
}

/// 200 acknowledging a deleted meal.
pub fn meal_deleted(id: MealId) -> ApiResult<MessageResponse> {
    ok(MessageResponse::new(format!("Meal {} deleted", id)))
}

/// Path of a single meal resource.
#[must_use]
pub fn meal_location(id: MealId) -> String {
    format!("/api/v1/meals/{}", id)
}
