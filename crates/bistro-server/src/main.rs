//! # Bistro Server
//!
//! Main entry point: loads configuration, wires the meal service over MySQL
//! and the cache store, and serves the REST API until shutdown.

use bistro_config::{AppConfig, ConfigLoader};
use bistro_core::telemetry::{init_logging, LogFormat};
use bistro_core::{BistroError, BistroResult};
use bistro_repository::{create_pool, DatabaseHealthCheck, DatabasePoolInterface};
use bistro_rest::{create_router, AppState};
use bistro_server::di::{
    build_monolithic_module, create_redis_pool, CacheResolver, DatabaseResolver, ServiceResolver,
};
use bistro_server::startup::{print_banner, print_startup_info, shutdown_signal};
use bistro_service::CacheHealthCheck;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get(),
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logging(
        &config.observability.log_level,
        LogFormat::from_name(&config.observability.log_format),
    ) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    print_banner();
    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));
    info!("Environment: {}", config.app.environment);

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> BistroResult<()> {
    let db_pool = create_pool(&config.database).await?;
    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let redis_pool = create_redis_pool(&config.redis)?;
    let module = build_monolithic_module(&db_pool, redis_pool.clone(), &config.cache);

    let app_state = AppState::new(module.meal_service())
        .with_health_check(Arc::new(DatabaseHealthCheck::new(module.database_pool())))
        .with_health_check(Arc::new(CacheHealthCheck::new(module.cache_store())));

    let router = create_router(app_state, &config.server);

    let rest_addr = config.server.rest_addr();
    let listener = tokio::net::TcpListener::bind(&rest_addr)
        .await
        .map_err(|e| BistroError::Internal(format!("Failed to bind REST: {}", e)))?;

    print_startup_info(&config);
    info!("Starting REST server on http://{}", rest_addr);

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| BistroError::Internal(format!("REST server error: {}", e)));

    module.database_pool().close().await;
    if let Some(pool) = redis_pool {
        pool.close();
        info!("Redis pool closed");
    }

    served?;
    info!("Server shutdown complete");
    Ok(())
}
