//! Error types for the logging subsystem

use thiserror::Error;

/// Errors that can occur setting up logging
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoggingError {
    /// A global subscriber was already installed, or the layer stack failed
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// The configured level is not one we recognise
    #[error("Invalid logging configuration: {0}")]
    InvalidConfiguration(String),
}
