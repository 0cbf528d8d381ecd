//! Match results handed to handlers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The result of a successful match: path parameters, query pairs and anchor.
///
/// Built fresh by every match and only ever lent out immutably.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    params: IndexMap<String, String>,
    query: IndexMap<String, Option<String>>,
    anchor: String,
}

impl Request {
    pub(crate) fn new(
        params: IndexMap<String, String>,
        query: IndexMap<String, Option<String>>,
        anchor: String,
    ) -> Self {
        Self {
            params,
            query,
            anchor,
        }
    }

    /// Build a parameterless request from a raw location (`/path?query#anchor`).
    pub fn from_location(location: &str) -> Self {
        let (rest, anchor) = match location.split_once('#') {
            Some((rest, anchor)) => (rest, anchor.to_string()),
            None => (location, String::new()),
        };
        let query = rest
            .split_once('?')
            .map(|(_, query)| parse_query(query))
            .unwrap_or_default();

        Self::new(IndexMap::new(), query, anchor)
    }

    /// Parameters present in the path, in declaration order.
    /// Optional parameters that were not supplied are absent.
    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn query(&self) -> &IndexMap<String, Option<String>> {
        &self.query
    }

    /// Value of a query key; `None` both when the key is missing and when it
    /// was given without `=value`. Use [`Request::has_query`] to tell them apart.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.get(key).and_then(|v| v.as_deref())
    }

    pub fn has_query(&self, key: &str) -> bool {
        self.query.contains_key(key)
    }

    /// Fragment text after `#`, empty when absent.
    pub fn anchor(&self) -> &str {
        &self.anchor
    }
}

/// Parse `k=v&k2&k3=` left to right. A repeated key keeps its last value.
pub fn parse_query(raw: &str) -> IndexMap<String, Option<String>> {
    let mut query = IndexMap::new();
    for pair in raw.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, Some(value.to_string())),
            None => (pair, None),
        };
        if key.is_empty() {
            continue;
        }
        query.insert(key.to_string(), value);
    }
    query
}
