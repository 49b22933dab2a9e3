//! Logging bootstrap.
//!
//! Installs a `tracing` subscriber whose filter comes from `RUST_LOG` when
//! set, falling back to the configured level.

use crate::BistroResult;
#[cfg(feature = "telemetry")]
use crate::BistroError;
#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parses a format name, defaulting to [`LogFormat::Pretty`].
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Builds the default filter directive for a log level.
#[must_use]
pub fn default_directive(level: &str) -> String {
    format!("{level},bistro=debug,tower_http=debug")
}

/// Initializes the global subscriber.
#[cfg(feature = "telemetry")]
pub fn init_logging(level: &str, format: LogFormat) -> BistroResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let registry = tracing_subscriber::registry().with(filter);
    let result = match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .try_init(),
    };

    result.map_err(|e| BistroError::internal(format!("Failed to install log subscriber: {}", e)))
}

/// Placeholder for when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_logging(_level: &str, _format: LogFormat) -> BistroResult<()> {
    Ok(())
}
