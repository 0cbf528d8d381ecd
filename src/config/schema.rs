//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Unknown keys are rejected rather than silently absorbed.

use serde::{Deserialize, Serialize};

/// Root configuration document.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct RouterConfig {
    /// Dispatcher options.
    pub dispatcher: DispatcherConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// The options recognized by `Dispatcher::configure`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Prefix every route lives under (e.g., "/app/").
    pub root_path: String,

    /// Context used when a declaration or dispatch names none.
    pub default_context: String,

    /// Whether successful dispatches push history when nothing else decides.
    pub default_history: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            root_path: "/".to_string(),
            default_context: "get".to_string(),
            default_history: true,
        }
    }
}

impl DispatcherConfig {
    pub fn with_root_path(mut self, root_path: impl Into<String>) -> Self {
        self.root_path = root_path.into();
        self
    }

    pub fn with_default_context(mut self, context: impl Into<String>) -> Self {
        self.default_context = context.into();
        self
    }

    pub fn with_default_history(mut self, enabled: bool) -> Self {
        self.default_history = enabled;
        self
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Record dispatcher counters through the metrics facade.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}
