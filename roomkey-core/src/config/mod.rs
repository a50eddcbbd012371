//! Configuration management for RoomKey
//!
//! Defaults, overridable from `ROOMKEY_<SECTION>_<KEY>` environment
//! variables or a TOML file. The invitation code shape and the 7-day
//! expiry are policy constants and deliberately not configurable.

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

mod error;

pub use error::ConfigError;

const ENV_PREFIX: &str = "ROOMKEY";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Invitation code minting
    pub invitations: InvitationConfig,

    /// Invitation text messages
    pub dispatch: DispatchConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Invitation code minting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvitationConfig {
    /// Refuse to overwrite an existing invitation when a drawn code collides
    pub unique_codes: bool,

    /// Codes drawn before giving up on a collision streak
    pub max_code_attempts: u32,
}

/// Invitation text messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Product name shown in the message
    pub app_name: String,

    /// Static app-install link embedded in every invitation
    pub install_link: String,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Enable JSON formatting
    pub json_format: bool,

    /// Include target module
    pub with_target: bool,
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self { unique_codes: true, max_code_attempts: 5 }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            app_name: "TIPs App".to_string(),
            install_link: "https://testflight.apple.com/join/W93z4G4W".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json_format: false, with_target: true }
    }
}

fn env_key(section: &str, key: &str) -> String {
    format!("{}_{}_{}", ENV_PREFIX, section, key)
}

fn parse_env<T>(section: &str, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let name = env_key(section, key);
    match env::var(&name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue { key: name, reason: e.to_string() }),
        Err(_) => Ok(None),
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Example: `ROOMKEY_INVITATIONS_MAX_CODE_ATTEMPTS=10`
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        let mut config: Self = toml::from_str(&contents)?;

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(v) = parse_env("INVITATIONS", "UNIQUE_CODES")? {
            self.invitations.unique_codes = v;
        }
        if let Some(v) = parse_env("INVITATIONS", "MAX_CODE_ATTEMPTS")? {
            self.invitations.max_code_attempts = v;
        }

        if let Some(v) = parse_env("DISPATCH", "APP_NAME")? {
            self.dispatch.app_name = v;
        }
        if let Some(v) = parse_env("DISPATCH", "INSTALL_LINK")? {
            self.dispatch.install_link = v;
        }

        if let Some(v) = parse_env::<String>("LOGGING", "LEVEL")? {
            self.logging.level = v.to_lowercase();
        }
        if let Some(v) = parse_env("LOGGING", "JSON_FORMAT")? {
            self.logging.json_format = v;
        }
        if let Some(v) = parse_env("LOGGING", "WITH_TARGET")? {
            self.logging.with_target = v;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.invitations.max_code_attempts == 0 {
            return Err(ConfigError::Invalid("max_code_attempts must be greater than 0".to_string()));
        }

        if self.dispatch.install_link.trim().is_empty() {
            return Err(ConfigError::Invalid("install_link must not be empty".to_string()));
        }

        if let Err(e) = self.logging.level.parse::<LogLevel>() {
            return Err(ConfigError::Invalid(format!("logging.level: {}", e)));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
    }
}
