
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::generator::{WriteMode, validate_path_security};
use crate::logging::LogFormat;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub output_dir: String,
    pub write_mode: WriteMode,
    pub timeout_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            output_dir: "specs".to_string(),
            write_mode: WriteMode::Overwrite,
            timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found or could not be created")]
    DirectoryError,
    #[error("Invalid output directory: {0}")]
    InvalidOutputDir(String),
    #[error("Invalid timeout: {0}ms (must be between 1 and 60000)")]
    InvalidTimeout(u64),
    #[error("Invalid log level: {0} (must be one of trace, debug, info, warn, error)")]
    InvalidLogLevel(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            logging: LoggingConfig::default(),
            base_dir: Self::config_dir().unwrap_or_else(|_| PathBuf::from(".ctxfy")),
        }
    }
}

impl Config {
    /// `~/.ctxfy`, or the platform data directory when there is no home
    #[inline]
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(".ctxfy"))
            .or_else(|| dirs::data_dir().map(|data| data.join("ctxfy")))
            .ok_or(ConfigError::DirectoryError)
    }

    #[inline]
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join("config.toml");

        if !config_path.exists() {
            return Ok(Self {
                generator: GeneratorConfig::default(),
                logging: LoggingConfig::default(),
                base_dir: config_dir.as_ref().to_path_buf(),
            });
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;
        config.base_dir = config_dir.as_ref().to_path_buf();

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        Ok(config)
    }

    #[inline]
    pub fn save(&self) -> Result<()> {
        self.validate()
            .context("Configuration validation failed before saving")?;

        let config_dir = self.get_base_dir();

        fs::create_dir_all(config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                config_dir.display()
            )
        })?;

        let config_path = self.config_file_path();
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    #[inline]
    pub fn get_base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[inline]
    pub fn config_file_path(&self) -> PathBuf {
        self.get_base_dir().join("config.toml")
    }

    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generator.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

impl GeneratorConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let path_check = validate_path_security(&self.output_dir);
        if !path_check.is_valid() {
            return Err(ConfigError::InvalidOutputDir(path_check.error_summary()));
        }

        if !(1..=60_000).contains(&self.timeout_ms) {
            return Err(ConfigError::InvalidTimeout(self.timeout_ms));
        }

        Ok(())
    }

    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    #[inline]
    pub fn set_output_dir(&mut self, output_dir: String) -> Result<(), ConfigError> {
        let path_check = validate_path_security(&output_dir);
        if !path_check.is_valid() {
            return Err(ConfigError::InvalidOutputDir(path_check.error_summary()));
        }
        self.output_dir = output_dir;
        Ok(())
    }

    #[inline]
    pub fn set_write_mode(&mut self, write_mode: WriteMode) {
        self.write_mode = write_mode;
    }

    #[inline]
    pub fn set_timeout_ms(&mut self, timeout_ms: u64) -> Result<(), ConfigError> {
        if !(1..=60_000).contains(&timeout_ms) {
            return Err(ConfigError::InvalidTimeout(timeout_ms));
        }
        self.timeout_ms = timeout_ms;
        Ok(())
    }
}

impl LoggingConfig {
    #[inline]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(self.level.clone()));
        }
        Ok(())
    }

    #[inline]
    pub fn set_level(&mut self, level: String) -> Result<(), ConfigError> {
        let level = level.trim().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(level));
        }
        self.level = level;
        Ok(())
    }

    #[inline]
    pub fn set_format(&mut self, format: LogFormat) {
        self.format = format;
    }
}
