//! Configuration loader with layered sources.

use crate::{AppConfig, ConfigValidator};
use bistro_core::BistroError;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Layered configuration loader.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<AppConfig>,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides
    /// 4. Environment variables with `BISTRO__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, BistroError> {
        let config = Self::load_config(&config_dir.into())?;

        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, BistroError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    #[must_use]
    pub fn get(&self) -> AppConfig {
        AppConfig::clone(&self.config)
    }

    /// Loads configuration from the specified directory.
    fn load_config(config_dir: &str) -> Result<AppConfig, BistroError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment =
            std::env::var("BISTRO_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder();

        for name in ["default", environment.as_str(), "local"] {
            let path = format!("{}/{}.toml", config_dir, name);
            if Path::new(&path).exists() {
                debug!("Loading config from: {}", path);
                builder = builder.add_source(File::with_name(&path).required(false));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("BISTRO")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_bistro_error)?;

        let mut app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_bistro_error)?;
        app_config.app.environment = environment;

        ConfigValidator::validate(&app_config).map_err(|errors| {
            let message = errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            BistroError::Configuration(message)
        })?;

        Ok(app_config)
    }
}

fn config_error_to_bistro_error(err: ConfigError) -> BistroError {
    BistroError::Configuration(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UpdatePromotion;
    use std::fs;

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            r#"
[server]
rest_port = 3000

[cache]
popularity_threshold = 4
update_promotion = "if_popular"
"#,
        )
        .unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy().to_string()).unwrap();
        let config = loader.get();

        assert_eq!(config.server.rest_port, 3000);
        assert_eq!(config.cache.popularity_threshold, 4);
        assert_eq!(config.cache.update_promotion, UpdatePromotion::IfPopular);
        assert_eq!(config.redis.url, "redis://localhost:6379");
    }

    #[test]
    fn test_local_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("default.toml"), "[server]\nrest_port = 3000\n").unwrap();
        fs::write(dir.path().join("local.toml"), "[server]\nrest_port = 3001\n").unwrap();

        let loader = ConfigLoader::new(dir.path().to_string_lossy().to_string()).unwrap();
        assert_eq!(loader.get().server.rest_port, 3001);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("default.toml"),
            "[redis]\nurl = \"http://not-redis\"\n",
        )
        .unwrap();

        let result = ConfigLoader::new(dir.path().to_string_lossy().to_string());
        assert!(matches!(result, Err(BistroError::Configuration(_))));
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let loader = ConfigLoader::new(missing.to_string_lossy().to_string()).unwrap();
        let config = loader.get();
        assert_eq!(config.server.rest_port, 8080);
    }
}
