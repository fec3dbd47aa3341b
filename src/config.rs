//! Configuration using Figment
//!
//! Configuration is loaded from:
//! 1. a TOML file (base configuration)
//! 2. Environment variables (prefixed with `ELECTROMETER_`, `__` between levels)
//!
//! ```text
//! ELECTROMETER_APPLICATION__LOG_LEVEL=debug
//! ELECTROMETER_CONNECTION__PORT=/dev/ttyUSB1
//! ELECTROMETER_CONNECTION__TIMEOUT_MS=5000
//! ```
//!
//! # Example file
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [connection]
//! port = "/dev/ttyUSB0"
//! baud_rate = 9600
//! timeout_ms = 3000
//! terminator = "\n"
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file or an environment override could not be parsed.
    #[error("Configuration load error: {0}")]
    LoadError(#[from] figment::Error),
    /// A value parsed but is not usable.
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElectrometerConfig {
    /// Application settings
    #[serde(default)]
    pub application: ApplicationConfig,
    /// Link to the instrument
    #[serde(default)]
    pub connection: ConnectionConfig,
}

/// Application-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Logging level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Serial connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Serial port (e.g., "/dev/ttyUSB0", "COM3")
    #[serde(default = "default_port")]
    pub port: String,
    /// Baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Response timeout in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,
    /// String appended to every command
    #[serde(default = "default_terminator")]
    pub terminator: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            timeout_ms: default_timeout(),
            terminator: default_terminator(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_timeout() -> u64 {
    3000
}

fn default_terminator() -> String {
    "\n".to_string()
}

const VALID_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl ElectrometerConfig {
    /// Defaults overlaid with environment variables only.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::extract(Figment::from(Serialized::defaults(Self::default())))
    }

    /// Load configuration from a specific file path
    ///
    /// Precedence (highest first): environment variables, the file, built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns a ConfigError if the file does not exist, cannot be loaded or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        // figment treats a missing file as empty
        if !path.is_file() {
            return Err(ConfigError::LoadError(figment::Error::from(format!(
                "Configuration file '{}' not found",
                path.display()
            ))));
        }
        Self::extract(Figment::from(Serialized::defaults(Self::default())).merge(Toml::file(path)))
    }

    fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment
            .merge(Env::prefixed("ELECTROMETER_").split("__"))
            .extract()
            .map_err(ConfigError::LoadError)?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration after loading
    ///
    /// Checks:
    /// - Log level is valid (trace, debug, info, warn, error)
    /// - Port name is not empty
    /// - Baud rate and timeout are non-zero
    /// - Terminator is not empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LEVELS.contains(&self.application.log_level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.application.log_level,
                VALID_LEVELS.join(", ")
            )));
        }

        let connection = &self.connection;
        if connection.port.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "Serial port must not be empty".to_string(),
            ));
        }
        if connection.baud_rate == 0 {
            return Err(ConfigError::ValidationError(
                "Baud rate must be greater than zero".to_string(),
            ));
        }
        if connection.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        if connection.terminator.is_empty() {
            return Err(ConfigError::ValidationError(
                "Command terminator must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
