//! Settings loader with layered sources
//!
//! Loads settings from multiple sources with the following precedence
//! (highest to lowest):
//! 1. Environment variables (ENVGUARD__*)
//! 2. Settings file (TOML)
//! 3. Default values

use crate::config::types::Settings;
use crate::env::check_public_prefix;
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use std::path::Path;

/// Default settings file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "envguard.toml",
    ".envguard.toml",
    "~/.config/envguard/config.toml",
];

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Load settings from a TOML string (useful for testing)
pub fn load_settings_from_str(toml_str: &str) -> Result<Settings, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let settings: Settings = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_settings(&settings)?;

    Ok(settings)
}

/// Load settings from files and environment
pub fn load_settings(config_path: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // First existing default path wins
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g., ENVGUARD__LOADER__EXIT_ON_ERROR=false
    // Double underscore (__) maps to nested keys (loader.exit_on_error)
    builder = builder.add_source(
        Environment::with_prefix("ENVGUARD")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let settings: Settings = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_settings(&settings)?;

    Ok(settings)
}

/// Validate settings values
fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
    check_public_prefix(&settings.loader.public_prefix).map_err(|e| ConfigError::Invalid {
        message: format!("loader.public_prefix: {}", e),
    })?;

    let level = settings.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        return Err(ConfigError::Invalid {
            message: format!(
                "logging.level must be one of {}, got: {}",
                LOG_LEVELS.join(", "),
                settings.logging.level
            ),
        });
    }

    Ok(())
}
