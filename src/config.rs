//! Configuration management for the airport profile service
//!
//! Handles loading configuration from an optional TOML file, environment
//! variables and the provider-specific variables (`AVIATIONSTACK_API_KEY`,
//! `WEATHERSTACK_API_KEY`, `CACHE_EXPIRE`, `DEBUG`), and validates the result
//! once at startup.

use crate::AirportProfileError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "airport-profile.toml";
const ENV_PREFIX: &str = "AIRPORT_PROFILE";

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Upstream provider configuration
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Enable verbose diagnostics
    #[serde(default)]
    pub debug: bool,
}

/// Upstream API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// aviationstack access key (required)
    pub aviationstack_api_key: Option<String>,
    /// weatherstack access key (required)
    pub weatherstack_api_key: Option<String>,
    #[serde(default = "default_aviationstack_base_url")]
    pub aviationstack_base_url: String,
    #[serde(default = "default_weatherstack_base_url")]
    pub weatherstack_base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Cache configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory of the embedded cache store
    #[serde(default = "default_cache_location")]
    pub location: String,
    /// Time-to-live of every cached response, in seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// Default value functions
fn default_aviationstack_base_url() -> String {
    "https://api.aviationstack.com/v1".to_string()
}

fn default_weatherstack_base_url() -> String {
    "https://api.weatherstack.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_cache_location() -> String {
    ".cache/airport-profile".to_string()
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            aviationstack_api_key: None,
            weatherstack_api_key: None,
            aviationstack_base_url: default_aviationstack_base_url(),
            weatherstack_base_url: default_weatherstack_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            location: default_cache_location(),
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl ProvidersConfig {
    /// The validated aviationstack key.
    pub fn aviationstack_key(&self) -> crate::Result<&str> {
        required_key(&self.aviationstack_api_key, "AVIATIONSTACK_API_KEY")
    }

    /// The validated weatherstack key.
    pub fn weatherstack_key(&self) -> crate::Result<&str> {
        required_key(&self.weatherstack_api_key, "WEATHERSTACK_API_KEY")
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

fn required_key<'a>(key: &'a Option<String>, name: &str) -> crate::Result<&'a str> {
    match key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(AirportProfileError::config(format!(
            "{name} is not set in the environment variables"
        ))),
    }
}

impl AppConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut builder = Config::builder();
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Nested overrides, e.g. AIRPORT_PROFILE_CACHE__TTL_SECONDS=600
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Well-known provider variables take precedence
        builder = builder
            .set_override_option(
                "providers.aviationstack_api_key",
                std::env::var("AVIATIONSTACK_API_KEY").ok(),
            )?
            .set_override_option(
                "providers.weatherstack_api_key",
                std::env::var("WEATHERSTACK_API_KEY").ok(),
            )?
            .set_override_option("cache.ttl_seconds", std::env::var("CACHE_EXPIRE").ok())?
            .set_override_option("debug", std::env::var("DEBUG").ok())?;

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_debug();
        config.validate()?;

        Ok(config)
    }

    /// Debug mode forces verbose logging
    pub fn apply_debug(&mut self) {
        if self.debug {
            self.logging.level = "debug".to_string();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    pub fn validate_api_keys(&self) -> crate::Result<()> {
        self.providers.aviationstack_key()?;
        self.providers.weatherstack_key()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.providers.timeout_seconds == 0 || self.providers.timeout_seconds > 300 {
            return Err(AirportProfileError::config(
                "Provider timeout must be between 1 and 300 seconds",
            ));
        }

        if self.cache.ttl_seconds == 0 || self.cache.ttl_seconds > 7 * 24 * 3600 {
            return Err(AirportProfileError::config(
                "Cache TTL must be between 1 second and 1 week",
            ));
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AirportProfileError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        for (name, url) in [
            ("aviationstack", &self.providers.aviationstack_base_url),
            ("weatherstack", &self.providers.weatherstack_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(AirportProfileError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        if self.cache.location.trim().is_empty() {
            return Err(AirportProfileError::config("Cache location cannot be empty"));
        }

        Ok(())
    }
}
