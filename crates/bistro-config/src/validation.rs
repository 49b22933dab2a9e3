//! Configuration validation module.
//!
//! Collects every invalid value in one pass so startup fails with the full
//! list rather than the first problem found.

use crate::AppConfig;
use std::fmt;
use url::Url;

/// Configuration validation error variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// Port number is invalid (must be 1-65535).
    InvalidPort { name: String, value: u16 },
    /// Pool size configuration is invalid (min must be <= max).
    InvalidPoolSize { min: u32, max: u32 },
    /// Pool size exceeds maximum allowed.
    PoolSizeTooLarge { value: u64, maximum: u64 },
    /// URL format is invalid.
    InvalidUrl { url_type: String, message: String },
    /// Timeout value must be positive.
    NonPositiveTimeout { name: String, value: u64 },
    /// Log level is invalid.
    InvalidLogLevel { value: String },
    /// Log format is invalid.
    InvalidLogFormat { value: String },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPort { name, value } => {
                write!(f, "Invalid port for {}: {} (must be 1-65535)", name, value)
            }
            Self::InvalidPoolSize { min, max } => {
                write!(
                    f,
                    "Invalid pool size: min ({}) cannot be greater than max ({})",
                    min, max
                )
            }
            Self::PoolSizeTooLarge { value, maximum } => {
                write!(f, "Pool size {} exceeds maximum allowed ({})", value, maximum)
            }
            Self::InvalidUrl { url_type, message } => {
                write!(f, "Invalid {} URL: {}", url_type, message)
            }
            Self::NonPositiveTimeout { name, value } => {
                write!(f, "Timeout '{}' must be positive, got {}", name, value)
            }
            Self::InvalidLogLevel { value } => {
                write!(
                    f,
                    "Invalid log level: '{}' (valid: trace, debug, info, warn, error)",
                    value
                )
            }
            Self::InvalidLogFormat { value } => {
                write!(f, "Invalid log format: '{}' (valid: pretty, json)", value)
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Maximum connection pool size.
    const MAX_POOL_SIZE: u64 = 1000;
    /// Valid log levels.
    const VALID_LOG_LEVELS: &'static [&'static str] = &["trace", "debug", "info", "warn", "error"];
    /// Valid log formats.
    const VALID_LOG_FORMATS: &'static [&'static str] = &["pretty", "json"];

    /// Validates the entire application configuration.
    ///
    /// Returns Ok(()) if valid, or Err with all validation errors found.
    pub fn validate(config: &AppConfig) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(&config.server, &mut errors);
        Self::validate_database(&config.database, &mut errors);
        Self::validate_redis(&config.redis, &mut errors);
        Self::validate_cache(&config.cache, &mut errors);
        Self::validate_observability(&config.observability, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(config: &crate::ServerConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.rest_port == 0 {
            errors.push(ConfigValidationError::InvalidPort {
                name: "rest_port".to_string(),
                value: config.rest_port,
            });
        }

        if config.request_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "server.request_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_database(config: &crate::DatabaseConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.url.is_empty() {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        } else if !config.url.starts_with("mysql://") {
            errors.push(ConfigValidationError::InvalidUrl {
                url_type: "database".to_string(),
                message: "URL must start with mysql://".to_string(),
            });
        }

        if config.min_connections > config.max_connections {
            errors.push(ConfigValidationError::InvalidPoolSize {
                min: config.min_connections,
                max: config.max_connections,
            });
        }
        if u64::from(config.max_connections) > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: u64::from(config.max_connections),
                maximum: Self::MAX_POOL_SIZE,
            });
        }

        if config.connect_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.connect_timeout_secs".to_string(),
                value: 0,
            });
        }
        if config.idle_timeout_secs == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "database.idle_timeout_secs".to_string(),
                value: 0,
            });
        }
    }

    fn validate_redis(config: &crate::RedisConfig, errors: &mut Vec<ConfigValidationError>) {
        if !config.enabled {
            return;
        }

        match Url::parse(&config.url) {
            Ok(url) if url.scheme() == "redis" || url.scheme() == "rediss" => {}
            Ok(_) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: "URL must start with redis:// or rediss://".to_string(),
            }),
            Err(e) => errors.push(ConfigValidationError::InvalidUrl {
                url_type: "redis".to_string(),
                message: e.to_string(),
            }),
        }

        if config.pool_size as u64 > Self::MAX_POOL_SIZE {
            errors.push(ConfigValidationError::PoolSizeTooLarge {
                value: config.pool_size as u64,
                maximum: Self::MAX_POOL_SIZE,
            });
        }
    }

    fn validate_cache(config: &crate::CacheConfig, errors: &mut Vec<ConfigValidationError>) {
        if config.command_timeout_ms == 0 {
            errors.push(ConfigValidationError::NonPositiveTimeout {
                name: "cache.command_timeout_ms".to_string(),
                value: 0,
            });
        }
    }

    fn validate_observability(
        config: &crate::ObservabilityConfig,
        errors: &mut Vec<ConfigValidationError>,
    ) {
        let level = config.log_level.to_lowercase();
        if !Self::VALID_LOG_LEVELS.contains(&level.as_str()) {
            errors.push(ConfigValidationError::InvalidLogLevel {
                value: config.log_level.clone(),
            });
        }

        let format = config.log_format.to_lowercase();
        if !Self::VALID_LOG_FORMATS.contains(&format.as_str()) {
            errors.push(ConfigValidationError::InvalidLogFormat {
                value: config.log_format.clone(),
            });
        }
    }
}
