//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::AppConfig;

/// Config file consulted when `HEALTH_SWITCH_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "health-switch.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Load configuration: optional TOML file, then environment overrides.
///
/// A missing file falls back to defaults; `PORT` and `LOG_LEVEL` win over
/// the file.
pub fn load() -> Result<AppConfig, ConfigError> {
    let path =
        env::var("HEALTH_SWITCH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let mut config = if Path::new(&path).exists() {
        load_config(Path::new(&path))?
    } else {
        AppConfig::default()
    };

    apply_overrides(
        &mut config,
        env::var("PORT").ok().as_deref(),
        env::var("LOG_LEVEL").ok().as_deref(),
    )?;
    validate_config(&config)?;

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

fn apply_overrides(
    config: &mut AppConfig,
    port: Option<&str>,
    level: Option<&str>,
) -> Result<(), ConfigError> {
    if let Some(raw) = port {
        let parsed = raw.parse::<u16>().map_err(|_| {
            ConfigError::Validation(format!("PORT must be a number between 1 and 65535, got {raw:?}"))
        })?;
        config.listener.port = parsed;
    }

    if let Some(level) = level {
        config.logging.level = level.to_string();
    }

    Ok(())
}

fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.listener.port == 0 {
        return Err(ConfigError::Validation(
            "listener.port must be non-zero".to_string(),
        ));
    }

    if config.logging.level.is_empty() {
        return Err(ConfigError::Validation(
            "logging.level must not be empty".to_string(),
        ));
    }

    if config.static_assets.enabled && config.static_assets.dir.is_empty() {
        return Err(ConfigError::Validation(
            "static_assets.dir must not be empty when static assets are enabled".to_string(),
        ));
    }

    Ok(())
}
