//! Health check controller.

use crate::state::AppState;
use bistro_core::HealthStatus;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status.
    pub status: String,
    /// Application version.
    pub version: String,
}

/// Readiness response listing each probed dependency.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadinessResponse {
    /// `ready` when every dependency is healthy.
    pub status: String,
    pub checks: Vec<DependencyStatus>,
}

/// Status of one dependency.
#[derive(Debug, Serialize, ToSchema)]
pub struct DependencyStatus {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
}

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness check endpoint.
///
/// Probes the database and the cache store.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service is not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut ready = true;
    let mut checks = Vec::with_capacity(state.health_checks.len());

    for check in &state.health_checks {
        let (status, message) = match check.check().await {
            HealthStatus::Healthy => ("healthy", None),
            HealthStatus::Degraded(msg) => ("degraded", Some(msg)),
            HealthStatus::Unhealthy(msg) => {
                ready = false;
                ("unhealthy", Some(msg))
            }
        };
        checks.push(DependencyStatus {
            name: check.name().to_string(),
            status: status.to_string(),
            message,
        });
    }

    let code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    let body = ReadinessResponse {
        status: if ready { "ready" } else { "not_ready" }.to_string(),
        checks,
    };

    (code, Json(body))
}

/// Liveness check endpoint.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    StatusCode::OK
}
