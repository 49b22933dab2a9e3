//! Server startup utilities.

use bistro_config::AppConfig;
use tokio::signal;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
    ____  _      __
   / __ )(_)____/ /__________
  / __  / / ___/ __/ ___/ __ \
 / /_/ / (__  ) /_/ /  / /_/ /
/_____/_/____/\__/_/   \____/
    "#
    );
}

/// Prints where the server can be reached and how the cache is set up.
pub fn print_startup_info(config: &AppConfig) {
    let rest_port = config.server.rest_port;
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://0.0.0.0:{}/api/v1/meals", rest_port);
    info!("Health:    http://0.0.0.0:{}/health", rest_port);
    info!("API Docs:  http://0.0.0.0:{}/swagger-ui", rest_port);
    info!(
        "Cache:     {} (promote after {} hits, on update: {:?})",
        if config.redis.enabled { "redis" } else { "in-process" },
        config.cache.popularity_threshold,
        config.cache.update_promotion
    );
    info!("{}", separator);
}

/// Resolves once the process receives Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
