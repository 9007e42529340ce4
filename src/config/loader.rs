//! Configuration Loader
//!
//! Loads and validates console configuration from TOML files.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Main configuration structure matching console.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub console: ConsoleSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            console: ConsoleSection::default(),
            storage: StorageSection::default(),
            logging: LoggingSection::default(),
        }
    }
}

/// Console behavior section
#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleSection {
    /// Delay between successive fan-out targets, in seconds
    #[serde(default = "default_fan_out_delay")]
    pub fan_out_delay_seconds: u64,
    /// Delay between successive license requests within one account, in seconds
    #[serde(default = "default_license_delay")]
    pub license_delay_seconds: u64,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            fan_out_delay_seconds: default_fan_out_delay(),
            license_delay_seconds: default_license_delay(),
        }
    }
}

impl ConsoleSection {
    pub fn fan_out_delay(&self) -> Duration {
        Duration::from_secs(self.fan_out_delay_seconds)
    }

    pub fn license_delay(&self) -> Duration {
        Duration::from_secs(self.license_delay_seconds)
    }
}

fn default_fan_out_delay() -> u64 {
    2
}

fn default_license_delay() -> u64 {
    1
}

/// Storage section
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSection {
    /// Directory holding per-account data files (supports ~ expansion)
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageSection {
    /// Data directory with `~` expanded.
    pub fn expanded_data_dir(&self) -> String {
        shellexpand::tilde(&self.data_dir).to_string()
    }
}

fn default_data_dir() -> String {
    "~/.hive-console/accounts".to_string()
}

/// Logging section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.console.fan_out_delay_seconds > 600 {
            return Err(ConfigError::ValidationError(format!(
                "fan_out_delay_seconds must be <= 600, got {}",
                self.console.fan_out_delay_seconds
            )));
        }

        if self.storage.data_dir.is_empty() {
            return Err(ConfigError::ValidationError(
                "data_dir must not be empty".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "invalid log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.console.fan_out_delay(), Duration::from_secs(2));
        assert_eq!(config.console.license_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [console]
            fan_out_delay_seconds = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.console.fan_out_delay_seconds, 5);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_rejects_huge_delay() {
        let mut config = Config::default();
        config.console.fan_out_delay_seconds = 1_000;
        assert!(config.validate().is_err());
    }
}
