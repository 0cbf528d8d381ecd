//! Generic publish/subscribe.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SubscriberError;
use crate::observability::metrics;

type Callback<T> = dyn Fn(&T) -> Result<(), SubscriberError> + Send + Sync;

/// Opaque handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

struct Subscriber<T> {
    id: SubscriptionId,
    callback: Arc<Callback<T>>,
}

/// Topic-keyed publish/subscribe over payloads of type `T`.
pub struct EventBus<T> {
    topics: DashMap<String, Vec<Subscriber<T>>>,
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self {
            topics: DashMap::new(),
        }
    }

    /// Register `callback` for `topic`. Several callbacks may share a topic.
    pub fn subscribe<F>(&self, topic: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&T) -> Result<(), SubscriberError> + Send + Sync + 'static,
    {
        let id = SubscriptionId(Uuid::new_v4());
        self.topics.entry(topic.to_string()).or_default().push(Subscriber {
            id,
            callback: Arc::new(callback),
        });
        tracing::trace!(topic, %id, "subscribed");
        id
    }

    /// Remove one subscription. Returns whether it existed.
    pub fn unsubscribe(&self, topic: &str, id: SubscriptionId) -> bool {
        let removed = match self.topics.get_mut(topic) {
            Some(mut subscribers) => match subscribers.iter().position(|s| s.id == id) {
                Some(index) => {
                    subscribers.remove(index);
                    true
                }
                None => false,
            },
            None => false,
        };
        self.topics.remove_if(topic, |_, subscribers| subscribers.is_empty());
        removed
    }

    /// Deliver `payload` to every subscriber of `topic`, newest first.
    ///
    /// Returns `false` when the topic has no subscribers. The subscriber list
    /// is snapshotted before delivery, so callbacks may subscribe, unsubscribe
    /// or publish without deadlocking.
    pub fn publish(&self, topic: &str, payload: &T) -> bool {
        let snapshot: Vec<Arc<Callback<T>>> = match self.topics.get(topic) {
            Some(subscribers) if !subscribers.is_empty() => subscribers
                .iter()
                .map(|s| Arc::clone(&s.callback))
                .collect(),
            _ => return false,
        };

        for callback in snapshot.iter().rev() {
            if let Err(err) = callback(payload) {
                tracing::warn!(topic, error = %err, "subscriber failed");
                metrics::record_subscriber_error(topic);
            }
        }
        true
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, |s| s.len())
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for EventBus<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let topics: Vec<(String, usize)> = self
            .topics
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().len()))
            .collect();
        f.debug_struct("EventBus").field("topics", &topics).finish()
    }
}
