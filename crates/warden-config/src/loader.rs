//! Configuration loader with layered sources.

use crate::AppConfig;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use warden_core::WardenError;

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct SettingsLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl SettingsLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `{dir}/default.toml` - Default values
    /// 2. `{dir}/{environment}.toml` - Environment-specific overrides
    /// 3. `{dir}/local.toml` - Local overrides
    /// 4. Environment variables with `WARDEN__` prefix
    pub fn new(config_dir: impl Into<String>) -> Result<Self, WardenError> {
        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, WardenError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), WardenError> {
        let new_config = Self::load_config(&self.config_dir)?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }

    fn load_config(config_dir: &str) -> Result<AppConfig, WardenError> {
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let environment = std::env::var("WARDEN_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
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
            Environment::with_prefix("WARDEN")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().map_err(config_error_to_warden_error)?;

        let app_config: AppConfig = config
            .try_deserialize()
            .map_err(config_error_to_warden_error)?;

        Self::validate_config(&app_config)?;

        Ok(app_config)
    }

    /// Validates the configuration.
    pub fn validate_config(config: &AppConfig) -> Result<(), WardenError> {
        let client = &config.client;

        if client.domain.is_empty() {
            return Err(WardenError::Configuration("Client domain is required".to_string()));
        }

        if client.insecure && client.port.is_none() {
            return Err(WardenError::Configuration(
                "An explicit port is required for insecure connections".to_string(),
            ));
        }

        url::Url::parse(&client.origin()).map_err(|e| {
            WardenError::Configuration(format!("Invalid origin '{}': {}", client.origin(), e))
        })?;

        if client.insecure && client.personal_access_token.is_some() {
            warn!("A personal access token is configured for a plaintext connection; it will be sent unencrypted");
        }

        Ok(())
    }

    /// Gets a specific configuration value by key path, e.g. `client.domain`.
    pub async fn get_value<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let config = self.config.read().await;
        let json = serde_json::to_value(&*config).ok()?;

        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }

        serde_json::from_value(current.clone()).ok()
    }
}

fn config_error_to_warden_error(err: ConfigError) -> WardenError {
    WardenError::Configuration(err.to_string())
}
