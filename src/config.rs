//! Configuration management for the `UrbanRetail` application
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::UrbanRetailError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `UrbanRetail` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UrbanRetailConfig {
    /// Reasoning service configuration
    #[serde(default)]
    pub reasoning: ReasoningConfig,
    /// Spatial gravity model configuration
    #[serde(default)]
    pub geo: GeoConfig,
    /// Competitor selection settings
    #[serde(default)]
    pub selection: SelectionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
}

/// Chat-completion service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningConfig {
    /// Bearer token; without one every prediction uses the heuristic
    pub api_key: Option<String>,
    /// Base URL, `/chat/completions` is appended
    #[serde(default = "default_reasoning_base_url")]
    pub base_url: String,
    /// Model identifier sent with each request
    #[serde(default = "default_reasoning_model")]
    pub model: String,
    /// Request timeout in seconds
    #[serde(default = "default_reasoning_timeout")]
    pub timeout_seconds: u32,
}

/// Reference point of the spatial gravity model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoConfig {
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,
}

/// How a map click is resolved and which neighbours count as competitors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Clicks within this radius of a marker select the marker's site
    #[serde(default = "default_snap_radius")]
    pub snap_radius_m: f64,
    /// Sites closer than this are the target itself
    #[serde(default = "default_min_competitor_distance")]
    pub min_competitor_distance_m: f64,
    #[serde(default = "default_max_competitors")]
    pub max_competitors: usize,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions
fn default_reasoning_base_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_reasoning_model() -> String {
    "deepseek-chat".to_string()
}

fn default_reasoning_timeout() -> u32 {
    12
}

fn default_center_latitude() -> f64 {
    31.385
}

fn default_center_longitude() -> f64 {
    120.980
}

fn default_snap_radius() -> f64 {
    30.0
}

fn default_min_competitor_distance() -> f64 {
    5.0
}

fn default_max_competitors() -> usize {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_reasoning_base_url(),
            model: default_reasoning_model(),
            timeout_seconds: default_reasoning_timeout(),
        }
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            snap_radius_m: default_snap_radius(),
            min_competitor_distance_m: default_min_competitor_distance(),
            max_competitors: default_max_competitors(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

impl UrbanRetailConfig {
    /// Load configuration from the given TOML file, or the default location
    /// when `None`, then overlay `URBANRETAIL_*` environment variables
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // URBANRETAIL_REASONING__API_KEY and friends
        builder = builder.add_source(
            Environment::with_prefix("URBANRETAIL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: UrbanRetailConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("urbanretail").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.reasoning.base_url.is_empty() {
            self.reasoning.base_url = default_reasoning_base_url();
        }
        if self.reasoning.model.is_empty() {
            self.reasoning.model = default_reasoning_model();
        }
        if self.reasoning.timeout_seconds == 0 {
            self.reasoning.timeout_seconds = default_reasoning_timeout();
        }
        if self.reasoning.api_key.as_deref().is_some_and(str::is_empty) {
            self.reasoning.api_key = None;
        }
        if self.selection.max_competitors == 0 {
            self.selection.max_competitors = default_max_competitors();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_key()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate the reasoning service credential
    pub fn validate_api_key(&self) -> Result<()> {
        // A missing key is allowed: predictions then run on the heuristic
        if let Some(api_key) = &self.reasoning.api_key {
            if api_key.len() < 8 {
                return Err(UrbanRetailError::config(
                    "Reasoning API key appears to be invalid (too short). Please check your API key.",
                )
                .into());
            }

            if api_key.len() > 200 {
                return Err(UrbanRetailError::config(
                    "Reasoning API key appears to be invalid (too long). Please check your API key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.reasoning.timeout_seconds > 120 {
            return Err(
                UrbanRetailError::config("Reasoning timeout cannot exceed 120 seconds").into(),
            );
        }

        if !(-90.0..=90.0).contains(&self.geo.center_latitude) {
            return Err(UrbanRetailError::config(
                "Centre latitude must be between -90 and 90 degrees",
            )
            .into());
        }

        if !(-180.0..=180.0).contains(&self.geo.center_longitude) {
            return Err(UrbanRetailError::config(
                "Centre longitude must be between -180 and 180 degrees",
            )
            .into());
        }

        if self.selection.snap_radius_m < 0.0 || self.selection.min_competitor_distance_m < 0.0 {
            return Err(
                UrbanRetailError::config("Selection distances cannot be negative").into(),
            );
        }

        if self.selection.max_competitors > 50 {
            return Err(UrbanRetailError::config("Maximum competitors cannot exceed 50").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(UrbanRetailError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(UrbanRetailError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.reasoning.base_url.starts_with("http://")
            && !self.reasoning.base_url.starts_with("https://")
        {
            return Err(UrbanRetailError::config(
                "Reasoning API base URL must be a valid HTTP or HTTPS URL",
            )
            .into());
        }

        Ok(())
    }
}
