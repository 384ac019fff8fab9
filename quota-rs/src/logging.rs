//! Tracing subscriber setup
//!
//! The engine itself only emits `tracing` events. Embedding applications
//! that do not install their own subscriber can call [`init`].

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::error::{QuotaError, Result};

/// Install a global `fmt` subscriber.
///
/// `RUST_LOG` overrides the configured level. Fails if a global subscriber
/// is already set.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| QuotaError::Config(format!("invalid log level '{}': {}", config.level, e)))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match config.format.as_str() {
        "json" => builder.json().try_init(),
        "compact" => builder.compact().try_init(),
        "pretty" => builder.pretty().try_init(),
        other => {
            return Err(QuotaError::Config(format!("unknown log format: {}", other)));
        }
    };

    result.map_err(|e| QuotaError::Config(format!("failed to set tracing subscriber: {}", e)))
}
