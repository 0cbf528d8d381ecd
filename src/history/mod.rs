//! History synchronization.
//!
//! # Data Flow
//! ```text
//! dispatcher/init/success      → arm back/forward handling
//! dispatcher/navigate/success  → first one after init: host.replace_state(navigation)
//!                              → otherwise host.push_state(navigation) when history = true
//! dispatcher/navigate/notFound
//! dispatcher/navigate/error    → initial page keeps no state
//!
//! host back/forward (state)    → on_pop_state
//!     → replay descriptor (history = false) on the replay channel
//!     → Dispatcher::drain_replays / run_replays
//! ```
//!
//! # Design Decisions
//! - Never touches the dispatcher directly; talks through events and a channel
//! - Replays are always marked history = false so back/forward never pushes
//! - The initial entry stores the init navigation so going back to it replays

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::dispatcher::{DispatchDescriptor, Navigation};
use crate::error::HostError;
use crate::events::topics::{
    DispatchEvent, INIT_SUCCESS, NAVIGATE_ERROR, NAVIGATE_NOT_FOUND, NAVIGATE_SUCCESS,
};
use crate::events::{EventBus, SubscriptionId};
use crate::host::NavigationHost;
use crate::observability::metrics;

struct Shared {
    host: Arc<dyn NavigationHost>,
    armed: AtomicBool,
    // set by init success until the initial navigation settles
    seeding: AtomicBool,
    replays: mpsc::UnboundedSender<DispatchDescriptor>,
}

impl Shared {
    fn push(&self, navigation: &Navigation) -> Result<(), HostError> {
        let state = serde_json::to_value(navigation)?;
        self.host
            .push_state(state, &navigation.path, &navigation.path)?;
        metrics::record_history_push();
        tracing::debug!(
            path = %navigation.path,
            context = %navigation.context,
            "history entry pushed"
        );
        Ok(())
    }

    fn store_initial(&self, navigation: &Navigation) -> Result<(), HostError> {
        let state = serde_json::to_value(navigation)?;
        self.host
            .replace_state(state, &navigation.path, &navigation.path)?;
        tracing::debug!(path = %navigation.path, "initial history entry stored");
        Ok(())
    }
}

/// Keeps the host's history in step with successful dispatches.
pub struct HistorySync {
    bus: Arc<EventBus<DispatchEvent>>,
    shared: Arc<Shared>,
    subscriptions: Vec<(&'static str, SubscriptionId)>,
}

impl HistorySync {
    /// Subscribe to the dispatcher topics.
    ///
    /// Returns the sync handle and the receiving end of the replay channel,
    /// to be handed to `Dispatcher::drain_replays` or `Dispatcher::run_replays`.
    pub fn install(
        bus: Arc<EventBus<DispatchEvent>>,
        host: Arc<dyn NavigationHost>,
    ) -> (Self, mpsc::UnboundedReceiver<DispatchDescriptor>) {
        let (replays, receiver) = mpsc::unbounded_channel();
        let shared = Arc::new(Shared {
            host,
            armed: AtomicBool::new(false),
            seeding: AtomicBool::new(false),
            replays,
        });

        let on_init = Arc::clone(&shared);
        let init_id = bus.subscribe(INIT_SUCCESS, move |_| {
            on_init.armed.store(true, Ordering::SeqCst);
            on_init.seeding.store(true, Ordering::SeqCst);
            tracing::debug!("back/forward handling armed");
            Ok(())
        });

        let on_navigate = Arc::clone(&shared);
        let navigate_id = bus.subscribe(NAVIGATE_SUCCESS, move |event| {
            if let DispatchEvent::NavigateSuccess { navigation } = event {
                if on_navigate.seeding.swap(false, Ordering::SeqCst) {
                    on_navigate.store_initial(navigation)?;
                } else if navigation.history {
                    on_navigate.push(navigation)?;
                }
            }
            Ok(())
        });

        let mut subscriptions = vec![(INIT_SUCCESS, init_id), (NAVIGATE_SUCCESS, navigate_id)];
        for topic in [NAVIGATE_NOT_FOUND, NAVIGATE_ERROR] {
            let on_failure = Arc::clone(&shared);
            let id = bus.subscribe(topic, move |_| {
                on_failure.seeding.store(false, Ordering::SeqCst);
                Ok(())
            });
            subscriptions.push((topic, id));
        }

        let sync = Self {
            bus,
            shared,
            subscriptions,
        };
        (sync, receiver)
    }

    /// Whether init has succeeded and back/forward states are being replayed.
    pub fn is_armed(&self) -> bool {
        self.shared.armed.load(Ordering::SeqCst)
    }

    /// Handle a back/forward navigation carrying a previously stored state.
    ///
    /// Returns `true` when a replay was queued.
    pub fn on_pop_state(&self, state: Value) -> bool {
        if !self.is_armed() {
            tracing::debug!("pop state before init; ignored");
            return false;
        }
        if state.is_null() {
            tracing::debug!("pop state without stored navigation; ignored");
            return false;
        }

        let navigation: Navigation = match serde_json::from_value(state) {
            Ok(navigation) => navigation,
            Err(err) => {
                tracing::warn!(error = %err, "unrecognized history state");
                return false;
            }
        };

        tracing::debug!(
            path = %navigation.path,
            context = %navigation.context,
            "replaying history entry"
        );
        self.shared.replays.send(navigation.replay()).is_ok()
    }
}

impl Drop for HistorySync {
    fn drop(&mut self) {
        for (topic, id) in self.subscriptions.drain(..) {
            self.bus.unsubscribe(topic, id);
        }
    }
}
