//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot encode config: {0}")]
    Encode(#[from] toml::ser::Error),

    /// An environment override that does not parse as its field's type
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("invalid config: {0}")]
    Invalid(String),
}
