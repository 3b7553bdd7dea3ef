//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigError, Environment, File};
use solscope_core::{SolscopeError, SolscopeResult};
use std::path::Path;
use tracing::{debug, info, warn};

/// Plain deployment variables recognised without the `SOLSCOPE__` prefix.
///
/// When set they override every file and `SOLSCOPE__` source.
#[derive(Debug, Clone, Default)]
pub struct LegacyEnv {
    /// `SOLANA_TRACKER_API_KEY`
    pub api_key: Option<String>,
    /// `CLIENT_URL`
    pub client_url: Option<String>,
    /// `PORT`
    pub port: Option<String>,
    /// `NODE_ENV`
    pub node_env: Option<String>,
}

impl LegacyEnv {
    /// Reads the legacy variables from the process environment.
    #[must_use]
    pub fn from_process() -> Self {
        Self {
            api_key: std::env::var("SOLANA_TRACKER_API_KEY").ok(),
            client_url: std::env::var("CLIENT_URL").ok(),
            port: std::env::var("PORT").ok(),
            node_env: std::env::var("NODE_ENV").ok(),
        }
    }
}

/// Configuration loader.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
    config_dir: String,
}

impl ConfigLoader {
    /// Loads and validates configuration.
    ///
    /// Sources, lowest priority first:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{environment}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Local overrides (not committed)
    /// 4. Environment variables with `SOLSCOPE__` prefix
    /// 5. Legacy variables (`SOLANA_TRACKER_API_KEY`, `CLIENT_URL`, `PORT`, `NODE_ENV`)
    pub fn new(config_dir: impl Into<String>) -> SolscopeResult<Self> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let config_dir = config_dir.into();
        let config = Self::load_config(&config_dir, &LegacyEnv::from_process())?;

        Ok(Self { config, config_dir })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> SolscopeResult<Self> {
        Self::new("./config")
    }

    /// Returns the loaded configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    #[must_use]
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Directory the configuration files were read from.
    #[must_use]
    pub fn config_dir(&self) -> &str {
        &self.config_dir
    }

    /// Loads configuration from the specified directory.
    pub fn load_config(config_dir: &str, legacy: &LegacyEnv) -> SolscopeResult<AppConfig> {
        let environment = std::env::var("SOLSCOPE_ENVIRONMENT")
            .ok()
            .or_else(|| legacy.node_env.clone())
            .unwrap_or_else(|| "development".to_string());

        info!("Loading configuration for environment: {}", environment);

        let mut builder = Config::builder()
            .set_default("app.environment", environment.clone())
            .map_err(config_error_to_solscope_error)?;

        // 1. Load default configuration
        let default_path = format!("{}/default.toml", config_dir);
        if Path::new(&default_path).exists() {
            debug!("Loading default config from: {}", default_path);
            builder = builder.add_source(File::with_name(&default_path).required(false));
        }

        // 2. Load environment-specific configuration
        let env_path = format!("{}/{}.toml", config_dir, environment);
        if Path::new(&env_path).exists() {
            debug!("Loading environment config from: {}", env_path);
            builder = builder.add_source(File::with_name(&env_path).required(false));
        }

        // 3. Load local overrides (not committed to version control)
        let local_path = format!("{}/local.toml", config_dir);
        if Path::new(&local_path).exists() {
            debug!("Loading local config from: {}", local_path);
            builder = builder.add_source(File::with_name(&local_path).required(false));
        }

        // 4. Override with environment variables (SOLSCOPE__ prefix)
        builder = builder.add_source(
            Environment::with_prefix("SOLSCOPE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        // 5. Legacy variables
        builder = Self::apply_legacy(builder, legacy)?;

        let app_config: AppConfig = builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error_to_solscope_error)?;

        ConfigValidator::validate(&app_config)
            .map_err(|errors| SolscopeError::Configuration(format_validation_errors(&errors)))?;

        Ok(app_config)
    }

    fn apply_legacy(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        legacy: &LegacyEnv,
    ) -> SolscopeResult<config::ConfigBuilder<config::builder::DefaultState>> {
        let port = legacy.port.as_deref().and_then(|raw| match raw.parse::<u16>() {
            Ok(port) => Some(i64::from(port)),
            Err(_) => {
                warn!("Ignoring PORT={:?}: not a valid port number", raw);
                None
            }
        });

        builder
            .set_override_option("upstream.api_key", legacy.api_key.clone())
            .and_then(|b| b.set_override_option("server.cors_origin", legacy.client_url.clone()))
            .and_then(|b| b.set_override_option("server.port", port))
            .and_then(|b| b.set_override_option("app.environment", legacy.node_env.clone()))
            .map_err(config_error_to_solscope_error)
    }
}

fn config_error_to_solscope_error(err: ConfigError) -> SolscopeError {
    SolscopeError::Configuration(err.to_string())
}
