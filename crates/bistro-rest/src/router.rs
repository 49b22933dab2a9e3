//! Main application router.

use crate::{
    controllers::{health_controller, meal_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    state::AppState,
};
use bistro_config::ServerConfig;
use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    let api_router = Router::new().nest("/meals", meal_controller::router());

    let router = Router::new()
        // Health endpoints
        .merge(health_controller::router())
        // API v1
        .nest("/api/v1", api_router)
        .with_state(state)
        // Swagger UI and OpenAPI spec
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Root endpoint
        .route("/", get(root))
        // Add middleware layers
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Bistro API v1"
}
