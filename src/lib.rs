//! Client-side route dispatcher.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller ──▶ Dispatcher::dispatch(descriptor)
//!                 │
//!                 ├─▶ routing  (RouteTable lookup → Route + Request)
//!                 │
//!                 ├─▶ plan     (ExecutionPlan runs the context's handler chain)
//!                 │
//!                 └─▶ events   (navigate/success | navigate/error | navigate/notFound)
//!                                   │
//!                                   ▼
//!                               history (HistorySync pushes host state;
//!                                        back/forward replays via channel)
//!
//!   Cross-cutting: config (TOML + validation), observability (tracing, metrics)
//! ```

// Core subsystems
pub mod dispatcher;
pub mod events;
pub mod plan;
pub mod routing;

// Host integration
pub mod history;
pub mod host;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod observability;

pub use config::{DispatcherConfig, RouterConfig};
pub use dispatcher::{DispatchDescriptor, Dispatcher, Navigation, RouteSpec};
pub use error::{ConfigError, DeclareError, HandlerError, HostError, PatternError};
pub use events::{DispatchEvent, EventBus, NotFoundReason, SubscriptionId};
pub use history::HistorySync;
pub use host::{MemoryHost, NavigationHost};
pub use plan::{ExecutionPlan, Handler, HandlerChain, Next};
pub use routing::{Request, Route, RouteTable};
