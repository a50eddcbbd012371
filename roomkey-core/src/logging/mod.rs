//! Logging subsystem for RoomKey
//!
//! Thin setup around `tracing-subscriber`. `RUST_LOG` takes precedence over
//! the configured level so a single run can be made verbose without
//! touching configuration.

use crate::config::LoggingConfig;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod level;

pub use error::LoggingError;
pub use level::LogLevel;

/// Install the global subscriber described by `config`
///
/// # Example
/// ```
/// use roomkey_core::config::LoggingConfig;
/// use roomkey_core::logging::init_logging;
///
/// init_logging(&LoggingConfig::default()).expect("Failed to initialize logging");
/// ```
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let level: LogLevel = config.level.parse()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let fmt_layer = fmt::layer().with_target(config.with_target);

    let result = if config.json_format {
        tracing_subscriber::registry().with(env_filter).with(fmt_layer.json()).try_init()
    } else {
        tracing_subscriber::registry().with(env_filter).with(fmt_layer).try_init()
    };

    result.map_err(|e| LoggingError::InitializationFailed(e.to_string()))
}
