//! Metrics collection.
//!
//! # Metrics
//! - `dispatcher_navigations_total` (counter): dispatches by outcome
//! - `dispatcher_routes_declared_total` (counter): declare calls accepted
//! - `dispatcher_history_pushes_total` (counter): entries pushed to the host
//! - `dispatcher_subscriber_errors_total` (counter): subscribers that returned `Err`
//!
//! # Design Decisions
//! - Recording is a no-op until the application installs a recorder
//! - Labels are static strings only

use std::sync::atomic::{AtomicBool, Ordering};

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn recording on or off. Applied from `ObservabilityConfig::metrics_enabled`
/// by [`crate::observability::init`].
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Outcome label for `dispatcher_navigations_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Error,
    NotFound,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::Error => "error",
            Outcome::NotFound => "not_found",
        }
    }
}

pub fn record_navigation(outcome: Outcome) {
    if is_enabled() {
        metrics::counter!("dispatcher_navigations_total", "outcome" => outcome.as_str())
            .increment(1);
    }
}

pub fn record_route_declared() {
    if is_enabled() {
        metrics::counter!("dispatcher_routes_declared_total").increment(1);
    }
}

pub fn record_history_push() {
    if is_enabled() {
        metrics::counter!("dispatcher_history_pushes_total").increment(1);
    }
}

pub fn record_subscriber_error(topic: &str) {
    if is_enabled() {
        metrics::counter!("dispatcher_subscriber_errors_total", "topic" => topic.to_string())
            .increment(1);
    }
}
