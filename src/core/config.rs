// src/core/config.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub const CONFIG_FILE: &str = "openeo.toml";
pub const CONFIG_PATH_ENV: &str = "OPENEO_PROCESSES_CONFIG";
pub const LOG_LEVEL_ENV: &str = "OPENEO_LOG";

pub const DEFAULT_CONFIG: &str = r#"[output]
# display | json | toon
format = "display"
# precision = 4

[logging]
level = "warn"
"#;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Display,
    Json,
    Toon,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "display" => Ok(OutputFormat::Display),
            "json" => Ok(OutputFormat::Json),
            "toon" => Ok(OutputFormat::Toon),
            other => Err(ConfigError::Invalid(format!(
                "unknown output format '{}' (expected display, json or toon)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub precision: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Settings of the `openeo-proc` command line tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.log_level()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Reads `$OPENEO_PROCESSES_CONFIG`, then `./openeo.toml`, then falls back to
    /// defaults. `$OPENEO_LOG` overrides the logging level.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_path(path)?,
            Err(_) if Path::new(CONFIG_FILE).exists() => Self::from_path(CONFIG_FILE)?,
            Err(_) => Self::default(),
        };
        if let Ok(level) = std::env::var(LOG_LEVEL_ENV) {
            config.logging.level = level;
            config.log_level()?;
        }
        Ok(config)
    }

    pub fn log_level(&self) -> Result<tracing::Level, ConfigError> {
        self.logging
            .level
            .parse::<tracing::Level>()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level '{}'", self.logging.level)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_file_parses_to_defaults() {
        let config = Config::from_toml(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.output.format, OutputFormat::Display);
        assert_eq!(config.output.precision, None);
        assert_eq!(config.log_level().unwrap(), tracing::Level::WARN);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml("[output]\nformat = \"toon\"\nprecision = 2\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Toon);
        assert_eq!(config.output.precision, Some(2));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_bad_level_rejected() {
        let err = Config::from_toml("[logging]\nlevel = \"loud\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
