//! Settings types for the envguard command line
//!
//! This module defines the settings structure that can be loaded from
//! TOML files and/or environment variables.

use crate::env::DEFAULT_PUBLIC_PREFIX;
use crate::loader::{ExecutionContext, LoadOptions};
use crate::report::ColorMode;
use serde::Deserialize;

/// Root settings structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Loader behaviour
    pub loader: LoaderSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Settings {
    /// Loader options described by these settings
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            exit_on_error: self.loader.exit_on_error,
            context: self.loader.context,
            public_prefix: self.loader.public_prefix.clone(),
            color: self.loader.color,
        }
    }
}

/// Loader behaviour
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoaderSettings {
    /// Exit the process when validation fails
    pub exit_on_error: bool,

    /// Prefix of variables visible to client validation
    pub public_prefix: String,

    /// Execution context (server, client)
    pub context: ExecutionContext,

    /// Report styling (auto, always, never)
    pub color: ColorMode,
}

impl Default for LoaderSettings {
    fn default() -> Self {
        Self {
            exit_on_error: true,
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
            context: ExecutionContext::Server,
            color: ColorMode::Auto,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
