//! TOML Configuration File Support
//!
//! Centralized configuration loading for LexiGuard clients, backed by an
//! optional TOML file at `~/.config/lexiguard/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (applied by the surface)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//! request_timeout_secs = 30
//! registry_timeout_secs = 10
//!
//! [ui]
//! locale = "es"
//! show_intro = true
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base URL used when nothing else is configured
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// API section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiToml {
    /// Classification service base URL
    pub base_url: Option<String>,

    /// Prediction timeout in seconds (absent = wait indefinitely)
    pub request_timeout_secs: Option<u64>,

    /// Model registry fetch timeout in seconds
    pub registry_timeout_secs: Option<u64>,
}

/// UI section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiToml {
    /// Locale code ("en" or "es")
    pub locale: Option<String>,

    /// Whether to play the intro reveal
    pub show_intro: Option<bool>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientToml {
    /// API configuration section
    pub api: ApiToml,

    /// UI configuration section
    pub ui: UiToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved client configuration
///
/// Use [`load_config`] to load it with proper priority handling.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Classification service base URL (no trailing slash)
    pub base_url: String,

    /// Prediction timeout, `None` means no client-side timeout
    pub request_timeout: Option<Duration>,

    /// Model registry fetch timeout
    pub registry_timeout: Duration,

    /// Locale code for the surface
    pub locale: String,

    /// Whether the surface plays the intro reveal
    pub show_intro: bool,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            registry_timeout: Duration::from_secs(10),
            locale: "en".to_string(),
            show_intro: true,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Override the base URL (CLI)
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
        self.source = ConfigSource::Cli;
    }

    /// Check values and normalize the base URL
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for an empty or non-HTTP base URL.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        let trimmed = self.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::ValidationError(
                "base_url must not be empty".to_string(),
            ));
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(ConfigError::ValidationError(format!(
                "base_url must start with http:// or https://, got '{trimmed}'"
            )));
        }
        self.base_url = trimmed.to_string();

        if self.registry_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "registry_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/lexiguard/config.toml` or
/// `~/.config/lexiguard/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("lexiguard").join("config.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the resulting values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<ClientConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Arguments
///
/// * `path` - Optional path to the configuration file. If `None`, only defaults
///   and environment variables are used.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<ClientConfig, ConfigError> {
    let mut config = ClientConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: ClientToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, |key| std::env::var(key).ok());
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut ClientConfig, toml: &ClientToml) {
    if let Some(ref url) = toml.api.base_url {
        config.base_url.clone_from(url);
    }
    if let Some(secs) = toml.api.request_timeout_secs {
        config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    if let Some(secs) = toml.api.registry_timeout_secs {
        config.registry_timeout = Duration::from_secs(secs);
    }

    if let Some(ref locale) = toml.ui.locale {
        config.locale.clone_from(locale);
    }
    if let Some(show) = toml.ui.show_intro {
        config.show_intro = show;
    }
}

/// Apply environment variable overrides to the config
///
/// `lookup` is `std::env::var` in production; tests pass a map.
fn apply_env_config(config: &mut ClientConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("LEXIGUARD_API_URL") {
        config.base_url = url;
        config.source = ConfigSource::Env;
    }
    if let Some(timeout) = lookup("LEXIGUARD_REQUEST_TIMEOUT") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
            config.source = ConfigSource::Env;
        }
    }
    if let Some(timeout) = lookup("LEXIGUARD_REGISTRY_TIMEOUT") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.registry_timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        }
    }
    if let Some(locale) = lookup("LEXIGUARD_LOCALE") {
        config.locale = locale;
        config.source = ConfigSource::Env;
    }
    if let Some(show) = lookup("LEXIGUARD_SHOW_INTRO") {
        config.show_intro = show != "0" && show.to_lowercase() != "false";
        config.source = ConfigSource::Env;
    }
}
