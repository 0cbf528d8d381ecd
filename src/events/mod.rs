//! Publish/subscribe event bus and the dispatcher's lifecycle topics.
//!
//! # Design Decisions
//! - Delivery is synchronous and reentrant: a subscriber may publish
//! - Most recently subscribed runs first
//! - A failing subscriber is logged and skipped; its siblings still run

pub mod bus;
pub mod topics;

pub use bus::{EventBus, SubscriptionId};
pub use topics::{DispatchEvent, NotFoundReason};
