//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for embedders that want one
//! - Honour `RUST_LOG` first, the configured level second
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Installation is fallible instead of panicking when a subscriber exists

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::error::LoggingError;

/// Build the filter used by [`init_logging`].
pub fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => {
            let directive = format!("path_dispatcher={}", config.log_level.to_ascii_lowercase());
            Ok(EnvFilter::try_new(directive)?)
        }
    }
}

/// Install a global fmt subscriber.
pub fn init_logging(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    tracing_subscriber::registry()
        .with(env_filter(config)?)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!(level = %config.log_level, "Logging initialized");
    Ok(())
}
