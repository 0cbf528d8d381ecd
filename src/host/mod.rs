//! Boundary with the hosting navigation environment.
//!
//! # Responsibilities
//! - Report the current location (path + query + fragment)
//! - Accept pushed history entries and state for the current entry
//!
//! Back/forward notifications flow the other way: the embedder forwards the
//! stored state to `HistorySync::on_pop_state`.

pub mod memory;

use serde_json::Value;

use crate::error::HostError;

pub use memory::{HistoryEntry, MemoryHost};

/// The host's location and history primitives.
pub trait NavigationHost: Send + Sync {
    /// Current navigable path, including query and fragment.
    fn current_location(&self) -> String;

    /// Push a new history entry carrying `state`.
    fn push_state(&self, state: Value, title: &str, url: &str) -> Result<(), HostError>;

    /// Replace the current entry's state and URL without adding an entry.
    fn replace_state(&self, state: Value, title: &str, url: &str) -> Result<(), HostError>;
}
