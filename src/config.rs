//! Configuration management for the `Airwise` service
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::AirwiseError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Airwise` service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AirwiseConfig {
    /// Air quality provider settings
    pub providers: ProvidersConfig,
    /// Outbound HTTP client settings
    pub http: HttpConfig,
    /// Spot finder grid sweep settings
    pub spots: SpotsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// HTTP server settings
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub waqi: ProviderConfig,
    pub iqair: ProviderConfig,
}

/// Settings for a single provider adapter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Secret API key. Without one the adapter never returns a reading.
    pub api_key: Option<String>,
    /// Base URL of the provider API
    pub base_url: String,
    /// Base weight in the composite AQI. Zero excludes the provider from weighting.
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotsConfig {
    /// Grid spacing in degrees (0.01 is roughly 1.1 km)
    pub grid_step_degrees: f64,
    /// Grid cells on each side of the center
    pub radius_steps: u32,
    /// Distance at which the distance score reaches zero
    pub radius_km: f64,
    /// Cells with a composite AQI above this are discarded
    pub max_aqi: u32,
    /// Maximum number of spots returned
    pub max_results: usize,
    /// Minimum interval between provider sweeps of consecutive cells
    pub request_interval_ms: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

// Default value functions
fn default_waqi_base_url() -> String {
    "https://api.waqi.info".to_string()
}

fn default_iqair_base_url() -> String {
    "https://api.airvisual.com".to_string()
}

fn default_waqi_weight() -> f64 {
    0.6
}

fn default_iqair_weight() -> f64 {
    0.4
}

fn default_http_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("Airwise/{}", crate::VERSION)
}

fn default_grid_step() -> f64 {
    0.01
}

fn default_radius_steps() -> u32 {
    5
}

fn default_radius_km() -> f64 {
    5.0
}

fn default_max_aqi() -> u32 {
    100
}

fn default_max_results() -> usize {
    5
}

fn default_request_interval_ms() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            waqi: ProviderConfig {
                api_key: None,
                base_url: default_waqi_base_url(),
                weight: Some(default_waqi_weight()),
            },
            iqair: ProviderConfig {
                api_key: None,
                base_url: default_iqair_base_url(),
                weight: Some(default_iqair_weight()),
            },
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SpotsConfig {
    fn default() -> Self {
        Self {
            grid_step_degrees: default_grid_step(),
            radius_steps: default_radius_steps(),
            radius_km: default_radius_km(),
            max_aqi: default_max_aqi(),
            max_results: default_max_results(),
            request_interval_ms: default_request_interval_ms(),
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

impl AirwiseConfig {
    /// Load configuration from the given file, or the default location when
    /// `None`, with environment overrides on top
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

        // Environment overrides, e.g. AIRWISE_PROVIDERS__WAQI__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("AIRWISE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AirwiseConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("airwise").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.providers.waqi.base_url.is_empty() {
            self.providers.waqi.base_url = default_waqi_base_url();
        }
        if self.providers.waqi.weight.is_none() {
            self.providers.waqi.weight = Some(default_waqi_weight());
        }
        if self.providers.iqair.base_url.is_empty() {
            self.providers.iqair.base_url = default_iqair_base_url();
        }
        if self.providers.iqair.weight.is_none() {
            self.providers.iqair.weight = Some(default_iqair_weight());
        }
        if self.http.timeout_seconds == 0 {
            self.http.timeout_seconds = default_http_timeout();
        }
        if self.http.user_agent.is_empty() {
            self.http.user_agent = default_user_agent();
        }
        if self.spots.max_results == 0 {
            self.spots.max_results = default_max_results();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
        if self.server.port == 0 {
            self.server.port = default_port();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_providers()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate provider keys, URLs and weights
    pub fn validate_providers(&self) -> Result<()> {
        for (name, provider) in [
            ("WAQI", &self.providers.waqi),
            ("IQAir", &self.providers.iqair),
        ] {
            if let Some(api_key) = &provider.api_key {
                if api_key.trim().is_empty() {
                    return Err(AirwiseError::config(format!(
                        "{name} API key cannot be empty if provided. Either remove it or provide a valid key."
                    ))
                    .into());
                }
            }

            if !provider.base_url.starts_with("http://")
                && !provider.base_url.starts_with("https://")
            {
                return Err(AirwiseError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }

            if let Some(weight) = provider.weight {
                if !weight.is_finite() || weight < 0.0 {
                    return Err(AirwiseError::config(format!(
                        "{name} weight must be a non-negative number, got {weight}"
                    ))
                    .into());
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.http.timeout_seconds > 300 {
            return Err(AirwiseError::config("HTTP timeout cannot exceed 300 seconds").into());
        }

        if !(self.spots.grid_step_degrees > 0.0 && self.spots.grid_step_degrees <= 1.0) {
            return Err(
                AirwiseError::config("Grid step must be greater than 0 and at most 1 degree")
                    .into(),
            );
        }

        if self.spots.radius_steps > 50 {
            return Err(AirwiseError::config("Grid radius cannot exceed 50 steps").into());
        }

        if !(self.spots.radius_km > 0.0) {
            return Err(AirwiseError::config("Spot search radius must be positive").into());
        }

        if self.spots.max_results > 100 {
            return Err(AirwiseError::config("Maximum spots cannot exceed 100").into());
        }

        if self.spots.request_interval_ms > 60_000 {
            return Err(
                AirwiseError::config("Request interval cannot exceed 60000 ms").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(AirwiseError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(AirwiseError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AirwiseConfig::default();
        assert_eq!(config.providers.waqi.base_url, "https://api.waqi.info");
        assert_eq!(config.providers.iqair.base_url, "https://api.airvisual.com");
        assert_eq!(config.providers.waqi.weight, Some(0.6));
        assert_eq!(config.providers.iqair.weight, Some(0.4));
        assert!(config.providers.waqi.api_key.is_none());
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.spots.radius_steps, 5);
        assert_eq!(config.spots.request_interval_ms, 1000);
        assert_eq!(config.spots.max_results, 5);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.server.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = AirwiseConfig::default();
        config.providers.iqair.api_key = Some("  ".to_string());
        let result = config.validate_providers();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("IQAir API key"));
    }

    #[test]
    fn test_config_validation_negative_weight() {
        let mut config = AirwiseConfig::default();
        config.providers.waqi.weight = Some(-0.1);
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("non-negative"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = AirwiseConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = AirwiseConfig::default();
        config.http.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));

        let mut config = AirwiseConfig::default();
        config.spots.grid_step_degrees = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_defaults_fills_missing_fields() {
        let mut config = AirwiseConfig::default();
        config.providers.waqi.base_url.clear();
        config.providers.iqair.weight = None;
        config.logging.format.clear();
        config.apply_defaults();
        assert_eq!(config.providers.waqi.base_url, "https://api.waqi.info");
        assert_eq!(config.providers.iqair.weight, Some(0.4));
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[providers.waqi]
api_key = "waqi-test-key"

[providers.iqair]
api_key = "iqair-test-key"
weight = 0.0

[spots]
request_interval_ms = 250
"#
        )
        .unwrap();

        let config = AirwiseConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(
            config.providers.waqi.api_key.as_deref(),
            Some("waqi-test-key")
        );
        assert_eq!(config.providers.waqi.base_url, "https://api.waqi.info");
        assert_eq!(config.providers.waqi.weight, Some(0.6));
        assert_eq!(config.providers.iqair.weight, Some(0.0));
        assert_eq!(config.spots.request_interval_ms, 250);
        assert_eq!(config.spots.radius_steps, 5);
    }

    #[test]
    fn test_config_path_generation() {
        let path = AirwiseConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("airwise"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
