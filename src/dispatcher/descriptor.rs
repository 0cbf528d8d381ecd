//! Navigation descriptors.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub(crate) fn empty_data() -> Value {
    Value::Object(Map::new())
}

/// A navigation request as handed to `Dispatcher::dispatch`.
///
/// Wire shape: `{ path, context?, history?, data }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchDescriptor {
    pub path: String,

    /// Handler slot to run; the configured default when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Explicit history decision; overrides the route's flag when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history: Option<bool>,

    /// Opaque payload forwarded to handlers.
    #[serde(default = "empty_data")]
    pub data: Value,
}

impl DispatchDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context: None,
            history: None,
            data: empty_data(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_history(mut self, history: bool) -> Self {
        self.history = Some(history);
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

impl From<&str> for DispatchDescriptor {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for DispatchDescriptor {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<&String> for DispatchDescriptor {
    fn from(path: &String) -> Self {
        Self::new(path.as_str())
    }
}

/// A fully resolved navigation: what ran, and whether it belongs in history.
///
/// This is also the state stored with each pushed history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Navigation {
    pub path: String,
    pub context: String,
    pub history: bool,
    #[serde(default = "empty_data")]
    pub data: Value,
}

impl Navigation {
    /// Descriptor that re-runs this navigation without pushing a new entry.
    pub fn replay(&self) -> DispatchDescriptor {
        DispatchDescriptor {
            path: self.path.clone(),
            context: Some(self.context.clone()),
            history: Some(false),
            data: self.data.clone(),
        }
    }
}

/// A route declaration target: bare pattern or `{ path, context, history }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub path: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub history: Option<bool>,
}

impl RouteSpec {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context: None,
            history: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_history(mut self, history: bool) -> Self {
        self.history = Some(history);
        self
    }
}

impl From<&str> for RouteSpec {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for RouteSpec {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}
