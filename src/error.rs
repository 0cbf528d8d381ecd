//! Error types shared across subsystems.
//!
//! # Design Decisions
//! - One enum per concern, never a catch-all
//! - Pattern problems surface at declare time, not at dispatch time
//! - Nothing here is returned from `dispatch`/`init`; those report through events

use std::fmt;

use thiserror::Error;

use crate::config::validation::ValidationError;

/// A route pattern that cannot be compiled.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern `{pattern}` ends with a dangling escape")]
    DanglingEscape { pattern: String },

    #[error("pattern `{pattern}` has a `:` without a parameter name at byte {position}")]
    MissingParamName { pattern: String, position: usize },

    #[error("pattern `{pattern}` declares parameter `{name}` more than once")]
    DuplicateParam { pattern: String, name: String },

    #[error("pattern `{pattern}` uses reserved character `{ch}` at byte {position}; escape it with `\\`")]
    ReservedCharacter {
        pattern: String,
        ch: char,
        position: usize,
    },

    #[error("pattern `{pattern}` produced an invalid matcher: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Failure to register a handler chain.
#[derive(Debug, Error)]
pub enum DeclareError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error("context name `{0}` is empty or contains whitespace")]
    InvalidContext(String),
}

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error reported by a handler to abort its chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

/// Failure reported by the navigation host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("navigation state could not be serialized: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("host rejected navigation state: {0}")]
    Rejected(String),
}

/// Failure to install the global log subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("a global subscriber is already installed: {0}")]
    AlreadyInstalled(#[from] tracing_subscriber::util::TryInitError),
}

/// Boxed error a subscriber may return.
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;
