//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject root paths that could never prefix a navigable path
//! - Reject context names a declaration could not be addressed by
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::{DispatcherConfig, ObservabilityConfig, RouterConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("root_path `{0}` must not contain `?`, `#` or whitespace")]
    InvalidRootPath(String),

    #[error("default_context must not be empty")]
    EmptyDefaultContext,

    #[error("default_context `{0}` must not contain whitespace")]
    InvalidDefaultContext(String),

    #[error("log_level `{0}` is not one of trace, debug, info, warn, error")]
    UnknownLogLevel(String),
}

/// Validate a whole configuration document.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = dispatcher_errors(&config.dispatcher);
    errors.extend(observability_errors(&config.observability));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate the dispatcher section alone.
pub fn validate_dispatcher(config: &DispatcherConfig) -> Result<(), Vec<ValidationError>> {
    let errors = dispatcher_errors(config);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn dispatcher_errors(config: &DispatcherConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let root = &config.root_path;
    if root.contains(['?', '#']) || root.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidRootPath(root.clone()));
    }

    let context = &config.default_context;
    if context.is_empty() {
        errors.push(ValidationError::EmptyDefaultContext);
    } else if context.chars().any(char::is_whitespace) {
        errors.push(ValidationError::InvalidDefaultContext(context.clone()));
    }

    errors
}

fn observability_errors(config: &ObservabilityConfig) -> Vec<ValidationError> {
    let level = config.log_level.to_ascii_lowercase();
    if LOG_LEVELS.contains(&level.as_str()) {
        Vec::new()
    } else {
        vec![ValidationError::UnknownLogLevel(config.log_level.clone())]
    }
}
