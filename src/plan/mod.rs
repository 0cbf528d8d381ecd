//! Handler chains and their sequencing.
//!
//! # Data Flow
//! ```text
//! ExecutionPlan::start(request, data, done)
//!     → handler[0]
//!         Continuable: calls next.proceed() / next.fail(err) when ready
//!         Terminal:    returns; chain ends here, done() fires
//!     → handler[1] ...
//!     → done(None) when the chain runs out, done(Some(err)) on abort
//! ```
//!
//! # Design Decisions
//! - Handler kind is chosen explicitly at construction, never inferred
//! - `done` fires at most once per `start`
//! - No timeout and no retry: a continuation that is never resolved stalls the chain

pub mod execution;
pub mod handler;

pub use execution::{ExecutionPlan, Next};
pub use handler::{Handler, HandlerChain};
