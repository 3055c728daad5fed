//! Configuration loader with layered sources.

use crate::{format_validation_errors, AppConfig, ConfigValidator};
use config::{Config, ConfigBuilder, ConfigError, Environment, File, Map};
use config::builder::DefaultState;
use roster_core::RosterError;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Environment variable selecting the `config/{env}.toml` overlay.
pub const ENVIRONMENT_VAR: &str = "ROSTER_ENV";

/// Environment variables honored for deployments configured by plain names.
const DATABASE_URL_VAR: &str = "DATABASE_URL";
const REDIS_URL_VAR: &str = "REDIS_URL";
const CACHE_TTL_VAR: &str = "CACHE_EXPIRE_SECONDS";

/// Configuration loader with runtime refresh support.
#[derive(Clone)]
pub struct ConfigLoader {
    config: Arc<RwLock<AppConfig>>,
    config_dir: String,
}

impl ConfigLoader {
    /// Creates a new configuration loader.
    ///
    /// Configuration is loaded from multiple sources in order:
    /// 1. `config/default.toml` - Default values
    /// 2. `config/{ROSTER_ENV}.toml` - Environment-specific overrides
    /// 3. `config/local.toml` - Uncommitted local overrides
    /// 4. Environment variables with `ROSTER__` prefix
    ///
    /// `DATABASE_URL`, `REDIS_URL` and `CACHE_EXPIRE_SECONDS` override all of
    /// the above when set.
    pub fn new(config_dir: impl Into<String>) -> Result<Self, RosterError> {
        // Load .env file if present
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env file found or error loading it: {}", e);
        }

        let config_dir = config_dir.into();
        let config = load_config(&config_dir, &process_env())?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_dir,
        })
    }

    /// Loads configuration from the default location (`./config`).
    pub fn from_default_location() -> Result<Self, RosterError> {
        Self::new("./config")
    }

    /// Returns the current configuration.
    pub async fn get(&self) -> AppConfig {
        self.config.read().await.clone()
    }

    /// Reloads the configuration from disk.
    pub async fn reload(&self) -> Result<(), RosterError> {
        let new_config = load_config(&self.config_dir, &process_env())?;
        let mut config = self.config.write().await;
        *config = new_config;
        info!("Configuration reloaded successfully");
        Ok(())
    }
}

fn process_env() -> Map<String, String> {
    std::env::vars().collect()
}

/// Builds and validates an [`AppConfig`] from `config_dir` and the given
/// environment snapshot.
pub fn load_config(config_dir: &str, env: &Map<String, String>) -> Result<AppConfig, RosterError> {
    let environment = env
        .get(ENVIRONMENT_VAR)
        .cloned()
        .unwrap_or_else(|| "development".to_string());

    info!("Loading configuration for environment: {}", environment);

    let mut builder = Config::builder();

    for layer in ["default", environment.as_str(), "local"] {
        let path = format!("{config_dir}/{layer}.toml");
        if Path::new(&path).exists() {
            debug!("Loading config layer from: {}", path);
            builder = builder.add_source(File::with_name(&path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("ROSTER")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("server.cors_origins")
            .try_parsing(true)
            .source(Some(env.clone())),
    );

    builder = apply_plain_overrides(builder, env).map_err(config_error_to_roster_error)?;

    let mut app_config = builder
        .build()
        .and_then(Config::try_deserialize::<AppConfig>)
        .map_err(config_error_to_roster_error)?;
    app_config.app.environment = environment;

    ConfigValidator::validate(&app_config)
        .map_err(|errors| RosterError::Configuration(format_validation_errors(&errors)))?;

    Ok(app_config)
}

fn apply_plain_overrides(
    builder: ConfigBuilder<DefaultState>,
    env: &Map<String, String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let ttl = env.get(CACHE_TTL_VAR).and_then(|raw| match raw.trim().parse::<i64>() {
        Ok(secs) => Some(secs),
        Err(_) => {
            warn!("Ignoring {}={:?}: not an integer", CACHE_TTL_VAR, raw);
            None
        }
    });

    builder
        .set_override_option("database.url", env.get(DATABASE_URL_VAR).cloned())?
        .set_override_option("cache.url", env.get(REDIS_URL_VAR).cloned())?
        .set_override_option("cache.ttl_secs", ttl)
}

fn config_error_to_roster_error(err: ConfigError) -> RosterError {
    RosterError::Configuration(err.to_string())
}
