//! Handler kinds.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::HandlerError;
use crate::plan::execution::Next;
use crate::routing::Request;

/// Signature of a handler that ends the chain when it returns.
pub type TerminalFn = dyn Fn(&Request, &Value) -> Result<(), HandlerError> + Send + Sync;

/// Signature of a handler that advances the chain through [`Next`].
pub type ContinuableFn = dyn Fn(&Request, &Value, Next) + Send + Sync;

/// A single step of a handler chain.
#[derive(Clone)]
pub enum Handler {
    /// Runs, then completes the whole chain, even if handlers remain after it.
    /// Returning `Err` reports a navigation error instead.
    Terminal(Arc<TerminalFn>),
    /// Must resolve its [`Next`] to move on; may do so later, from anywhere.
    Continuable(Arc<ContinuableFn>),
}

impl Handler {
    pub fn terminal<F>(f: F) -> Self
    where
        F: Fn(&Request, &Value) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Handler::Terminal(Arc::new(f))
    }

    pub fn continuable<F>(f: F) -> Self
    where
        F: Fn(&Request, &Value, Next) + Send + Sync + 'static,
    {
        Handler::Continuable(Arc::new(f))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Handler::Terminal(_))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Terminal(_) => f.write_str("Handler::Terminal"),
            Handler::Continuable(_) => f.write_str("Handler::Continuable"),
        }
    }
}

/// An ordered, shareable sequence of handlers.
pub type HandlerChain = Arc<[Handler]>;
