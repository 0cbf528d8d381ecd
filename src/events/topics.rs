//! Dispatcher lifecycle topics and their payload.

use serde::{Deserialize, Serialize};

use crate::dispatcher::{DispatchDescriptor, Navigation};
use crate::error::HandlerError;

pub const INIT_SUCCESS: &str = "dispatcher/init/success";
pub const INIT_ERROR: &str = "dispatcher/init/error";
pub const NAVIGATE_SUCCESS: &str = "dispatcher/navigate/success";
pub const NAVIGATE_ERROR: &str = "dispatcher/navigate/error";
pub const NAVIGATE_NOT_FOUND: &str = "dispatcher/navigate/notFound";

/// Why a dispatch found nothing to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// No pattern accepted the path.
    NoRoute,
    /// A pattern matched but has no chain for the requested context.
    MissingContext,
}

/// Payload published on the dispatcher topics.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchEvent {
    InitSuccess {
        path: String,
    },
    InitError {
        path: String,
        error: HandlerError,
    },
    NavigateSuccess {
        navigation: Navigation,
    },
    NavigateError {
        navigation: Navigation,
        error: HandlerError,
    },
    NotFound {
        descriptor: DispatchDescriptor,
        context: String,
        reason: NotFoundReason,
    },
}

impl DispatchEvent {
    /// Topic this event is published on.
    pub fn topic(&self) -> &'static str {
        match self {
            DispatchEvent::InitSuccess { .. } => INIT_SUCCESS,
            DispatchEvent::InitError { .. } => INIT_ERROR,
            DispatchEvent::NavigateSuccess { .. } => NAVIGATE_SUCCESS,
            DispatchEvent::NavigateError { .. } => NAVIGATE_ERROR,
            DispatchEvent::NotFound { .. } => NAVIGATE_NOT_FOUND,
        }
    }
}
