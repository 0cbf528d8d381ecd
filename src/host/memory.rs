//! In-memory navigation host.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::error::HostError;
use crate::host::NavigationHost;

/// One pushed history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub state: Value,
    pub title: String,
    pub url: String,
}

#[derive(Debug)]
struct Session {
    initial_location: String,
    initial_state: Value,
    entries: Vec<HistoryEntry>,
    // index into `entries`; None = the initial page
    position: Option<usize>,
}

impl Session {
    fn location(&self) -> &str {
        match self.position {
            Some(index) => &self.entries[index].url,
            None => &self.initial_location,
        }
    }

    fn state(&self) -> Value {
        match self.position {
            Some(index) => self.entries[index].state.clone(),
            None => self.initial_state.clone(),
        }
    }
}

/// A headless host keeping a browser-like entry stack.
#[derive(Debug)]
pub struct MemoryHost {
    session: Mutex<Session>,
}

impl MemoryHost {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            session: Mutex::new(Session {
                initial_location: location.into(),
                initial_state: Value::Null,
                entries: Vec::new(),
                position: None,
            }),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the initial page location and drop all pushed entries.
    pub fn reset(&self, location: impl Into<String>) {
        let mut session = self.session();
        session.initial_location = location.into();
        session.initial_state = Value::Null;
        session.entries.clear();
        session.position = None;
    }

    /// Step back; returns the state stored with the entry now current
    /// (`Value::Null` for an initial page never given a state), or `None`
    /// at the start.
    pub fn back(&self) -> Option<Value> {
        let mut session = self.session();
        session.position = match session.position? {
            0 => None,
            index => Some(index - 1),
        };
        Some(session.state())
    }

    /// Step forward; returns the state of the entry now current.
    pub fn forward(&self) -> Option<Value> {
        let mut session = self.session();
        let next = session.position.map_or(0, |index| index + 1);
        if next >= session.entries.len() {
            return None;
        }
        session.position = Some(next);
        Some(session.state())
    }

    pub fn location(&self) -> String {
        self.session().location().to_string()
    }

    /// All pushed entries, oldest first.
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.session().entries.clone()
    }
}

impl NavigationHost for MemoryHost {
    fn current_location(&self) -> String {
        self.location()
    }

    fn push_state(&self, state: Value, title: &str, url: &str) -> Result<(), HostError> {
        let mut session = self.session();
        let keep = session.position.map_or(0, |index| index + 1);
        session.entries.truncate(keep);
        session.entries.push(HistoryEntry {
            state,
            title: title.to_string(),
            url: url.to_string(),
        });
        session.position = Some(session.entries.len() - 1);
        Ok(())
    }

    fn replace_state(&self, state: Value, title: &str, url: &str) -> Result<(), HostError> {
        let mut session = self.session();
        match session.position {
            Some(index) => {
                session.entries[index] = HistoryEntry {
                    state,
                    title: title.to_string(),
                    url: url.to_string(),
                };
            }
            None => {
                session.initial_state = state;
                session.initial_location = url.to_string();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_push_and_navigate() {
        let host = MemoryHost::new("/");
        host.push_state(json!({"path": "/a"}), "/a", "/a").unwrap();
        host.push_state(json!({"path": "/b"}), "/b", "/b").unwrap();
        assert_eq!(host.current_location(), "/b");

        assert_eq!(host.back(), Some(json!({"path": "/a"})));
        assert_eq!(host.location(), "/a");
        assert_eq!(host.back(), Some(Value::Null));
        assert_eq!(host.location(), "/");
        assert_eq!(host.back(), None);

        assert_eq!(host.forward(), Some(json!({"path": "/a"})));
        assert_eq!(host.forward(), Some(json!({"path": "/b"})));
        assert_eq!(host.forward(), None);
    }

    #[test]
    fn test_push_discards_forward_entries() {
        let host = MemoryHost::new("/");
        host.push_state(json!(1), "/a", "/a").unwrap();
        host.push_state(json!(2), "/b", "/b").unwrap();
        host.back();
        host.push_state(json!(3), "/c", "/c").unwrap();

        let urls: Vec<_> = host.entries().into_iter().map(|e| e.url).collect();
        assert_eq!(urls, vec!["/a", "/c"]);
        assert_eq!(host.forward(), None);
    }

    #[test]
    fn test_replace_state() {
        let host = MemoryHost::new("/start");
        host.replace_state(json!("initial"), "/", "/").unwrap();
        host.push_state(json!("a"), "/a", "/a").unwrap();
        host.replace_state(json!("a2"), "/a2", "/a2").unwrap();

        assert_eq!(host.entries().len(), 1);
        assert_eq!(host.location(), "/a2");
        assert_eq!(host.back(), Some(json!("initial")));
        assert_eq!(host.location(), "/");
        assert_eq!(host.forward(), Some(json!("a2")));
    }

    #[test]
    fn test_reset() {
        let host = MemoryHost::new("/");
        host.push_state(json!(1), "/a", "/a").unwrap();
        host.reset("/app/home?x=1#top");
        assert!(host.entries().is_empty());
        assert_eq!(host.current_location(), "/app/home?x=1#top");
    }
}
