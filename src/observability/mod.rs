//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatcher / EventBus / HistorySync produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters via the `metrics` facade)
//!
//! Consumers:
//!     → whatever subscriber / recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a global subscriber on its own
//! - Metrics are cheap no-ops until a recorder is installed

pub mod logging;
pub mod metrics;

use crate::config::ObservabilityConfig;
use crate::error::LoggingError;

/// Apply an [`ObservabilityConfig`]: set the metrics switch, then install logging.
///
/// The metrics switch is applied even when a global subscriber already exists.
pub fn init(config: &ObservabilityConfig) -> Result<(), LoggingError> {
    metrics::set_enabled(config.metrics_enabled);
    logging::init_logging(config)?;
    tracing::info!(metrics_enabled = config.metrics_enabled, "Observability initialized");
    Ok(())
}
