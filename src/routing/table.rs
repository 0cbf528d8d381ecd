//! Route storage and lookup.
//!
//! # Responsibilities
//! - Store compiled routes keyed by normalized path
//! - Install or replace one context's handler chain without touching the others
//! - Look up the route matching a navigation path
//!
//! # Design Decisions
//! - Insertion-ordered map: O(1) exact-key hit, ordered fallback scan
//! - Exact hit is still validated by the matcher to recover query/anchor
//! - First match wins on fallback (declaration order)

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::DeclareError;
use crate::plan::HandlerChain;
use crate::routing::path::normalize;
use crate::routing::pattern::CompiledPattern;
use crate::routing::request::Request;

/// A handler chain installed under one context.
#[derive(Debug, Clone)]
pub struct ContextEntry {
    chain: HandlerChain,
    history: Option<bool>,
}

impl ContextEntry {
    pub fn new(chain: HandlerChain, history: Option<bool>) -> Self {
        Self { chain, history }
    }

    pub fn chain(&self) -> &HandlerChain {
        &self.chain
    }

    /// History flag given at declaration; `None` defers to the dispatcher default.
    pub fn history(&self) -> Option<bool> {
        self.history
    }
}

/// A compiled route and its per-context handler chains.
#[derive(Debug, Clone)]
pub struct Route {
    key: String,
    pattern: Arc<CompiledPattern>,
    contexts: IndexMap<String, ContextEntry>,
}

impl Route {
    fn new(key: String, pattern: CompiledPattern) -> Self {
        Self {
            key,
            pattern: Arc::new(pattern),
            contexts: IndexMap::new(),
        }
    }

    /// Normalized path this route is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn context(&self, name: &str) -> Option<&ContextEntry> {
        self.contexts.get(name)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }
}

/// Routes keyed by normalized path, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: IndexMap<String, Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `chain` under `context` for `path`, creating the route if needed.
    ///
    /// Returns the normalized path, which is the route's key. Other contexts
    /// already on the route are left untouched.
    pub fn declare(
        &mut self,
        path: &str,
        context: &str,
        history: Option<bool>,
        chain: HandlerChain,
    ) -> Result<String, DeclareError> {
        if context.is_empty() || context.chars().any(char::is_whitespace) {
            return Err(DeclareError::InvalidContext(context.to_string()));
        }

        let key = normalize(path);
        if !self.routes.contains_key(&key) {
            let pattern = CompiledPattern::compile(&key)?;
            self.routes
                .insert(key.clone(), Route::new(key.clone(), pattern));
        }
        if let Some(route) = self.routes.get_mut(&key) {
            route
                .contexts
                .insert(context.to_string(), ContextEntry::new(chain, history));
        }

        Ok(key)
    }

    /// Delete the route stored at `key`. Returns whether one was present.
    pub fn remove(&mut self, key: &str) -> bool {
        self.routes.shift_remove(&normalize(key)).is_some()
    }

    /// Find the route accepting `path` along with the match result.
    pub fn lookup(&self, path: &str) -> Option<(&Route, Request)> {
        if let Some(route) = self.routes.get(path) {
            if let Some(request) = route.pattern.matches(path) {
                return Some((route, request));
            }
        }

        self.routes
            .values()
            .find_map(|route| route.pattern.matches(path).map(|request| (route, request)))
    }

    pub fn get(&self, key: &str) -> Option<&Route> {
        self.routes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.routes.contains_key(key)
    }

    /// Route keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.routes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
