//! Route dispatch.
//!
//! # Responsibilities
//! - Hold the active configuration and route table
//! - Turn a navigation target into a resolved [`Navigation`]
//! - Run the matching handler chain and publish its outcome
//! - Bootstrap from the host's current location
//!
//! # Design Decisions
//! - `dispatch` returns whether a chain was found, never how it ended
//! - Outcomes (success, error, not found) are reported only through events
//! - The table is swapped copy-on-write, so handlers may declare or remove
//!   routes without disturbing the dispatch running them

pub mod descriptor;

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::config::validation::validate_dispatcher;
use crate::config::DispatcherConfig;
use crate::error::{ConfigError, DeclareError, HandlerError};
use crate::events::topics::{DispatchEvent, NotFoundReason};
use crate::events::EventBus;
use crate::host::NavigationHost;
use crate::observability::metrics::{self, Outcome};
use crate::plan::{ExecutionPlan, Handler, HandlerChain};
use crate::routing::path;
use crate::routing::{Request, RouteTable};

pub use descriptor::{DispatchDescriptor, Navigation, RouteSpec};

use descriptor::empty_data;

/// Resolves navigation paths to handler chains and runs them.
///
/// Constructed once by the application and shared by reference.
pub struct Dispatcher {
    config: ArcSwap<DispatcherConfig>,
    table: ArcSwap<RouteTable>,
    // serializes copy-on-write table updates
    writer: Mutex<()>,
    bus: Arc<EventBus<DispatchEvent>>,
    host: Arc<dyn NavigationHost>,
}

impl Dispatcher {
    /// Create a dispatcher with the default configuration.
    pub fn new(bus: Arc<EventBus<DispatchEvent>>, host: Arc<dyn NavigationHost>) -> Self {
        Self {
            config: ArcSwap::from_pointee(DispatcherConfig::default()),
            table: ArcSwap::from_pointee(RouteTable::new()),
            writer: Mutex::new(()),
            bus,
            host,
        }
    }

    /// Validate and apply `config`. The root path is normalized to `/x/` form.
    pub fn configure(&self, config: DispatcherConfig) -> Result<(), ConfigError> {
        validate_dispatcher(&config).map_err(ConfigError::Validation)?;

        let config = DispatcherConfig {
            root_path: path::normalize_root(&config.root_path),
            ..config
        };
        tracing::info!(
            root_path = %config.root_path,
            default_context = %config.default_context,
            default_history = config.default_history,
            "Dispatcher configured"
        );
        self.config.store(Arc::new(config));
        Ok(())
    }

    /// The active configuration.
    pub fn config(&self) -> Arc<DispatcherConfig> {
        self.config.load_full()
    }

    pub fn events(&self) -> &Arc<EventBus<DispatchEvent>> {
        &self.bus
    }

    /// Register `chain` for a pattern, under the given or default context.
    ///
    /// Returns the route key (normalized, root-prefixed path).
    pub fn declare<S, I>(&self, target: S, chain: I) -> Result<String, DeclareError>
    where
        S: Into<RouteSpec>,
        I: IntoIterator<Item = Handler>,
    {
        let spec = target.into();
        let config = self.config.load_full();
        let path = path::qualify(&config.root_path, &spec.path);
        let context = spec.context.unwrap_or_else(|| config.default_context.clone());
        let chain: HandlerChain = chain.into_iter().collect();

        let key = self.update_table(|table| table.declare(&path, &context, spec.history, chain))?;

        metrics::record_route_declared();
        tracing::debug!(key = %key, context = %context, history = ?spec.history, "route declared");
        Ok(key)
    }

    /// Delete the route declared for `path` (relative to the root path).
    /// Returns whether it existed.
    pub fn remove(&self, path: &str) -> bool {
        let config = self.config.load_full();
        self.remove_key(&path::qualify(&config.root_path, path))
    }

    /// Delete a route by the key `declare` returned.
    pub fn remove_key(&self, key: &str) -> bool {
        let key = path::normalize(key);
        let removed = self
            .update_table(|table| Ok::<_, DeclareError>(table.remove(&key)))
            .unwrap_or(false);
        tracing::debug!(key = %key, removed, "route removed");
        removed
    }

    fn update_table<T, E>(
        &self,
        update: impl FnOnce(&mut RouteTable) -> Result<T, E>,
    ) -> Result<T, E> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut table = RouteTable::clone(&self.table.load());
        let result = update(&mut table)?;
        self.table.store(Arc::new(table));
        Ok(result)
    }

    /// Route keys in declaration order.
    pub fn routes(&self) -> Vec<String> {
        self.table.load().keys().map(str::to_string).collect()
    }

    /// Contexts installed on the route at `key`, as returned by `declare`.
    pub fn contexts(&self, key: &str) -> Vec<String> {
        self.table
            .load()
            .get(&path::normalize(key))
            .map(|route| route.contexts().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Navigate to `target`.
    ///
    /// Returns `true` when a route with the requested context was found and
    /// its chain started. Completion is reported on the event bus.
    pub fn dispatch(&self, target: impl Into<DispatchDescriptor>) -> bool {
        let mut descriptor = target.into();
        let config = self.config.load_full();
        descriptor.path = path::qualify(&config.root_path, &descriptor.path);
        let context = descriptor
            .context
            .clone()
            .unwrap_or_else(|| config.default_context.clone());

        let table = self.table.load_full();
        let Some((route, request)) = table.lookup(&descriptor.path) else {
            self.not_found(descriptor, context, NotFoundReason::NoRoute);
            return false;
        };
        let Some(entry) = route.context(&context) else {
            self.not_found(descriptor, context, NotFoundReason::MissingContext);
            return false;
        };

        let history = descriptor
            .history
            .or(entry.history())
            .unwrap_or(config.default_history);
        let navigation = Navigation {
            path: descriptor.path,
            context,
            history,
            data: descriptor.data,
        };
        tracing::debug!(
            path = %navigation.path,
            route = %route.key(),
            context = %navigation.context,
            history,
            "dispatching"
        );

        let plan = ExecutionPlan::new(Arc::clone(entry.chain()));
        let bus = Arc::clone(&self.bus);
        let data = navigation.data.clone();
        plan.start(request, data, move |err| {
            complete_navigation(&bus, navigation, err);
        });
        true
    }

    /// [`Dispatcher::dispatch`] with an explicit payload.
    pub fn dispatch_with(&self, target: impl Into<DispatchDescriptor>, data: Value) -> bool {
        self.dispatch(target.into().with_data(data))
    }

    fn not_found(&self, descriptor: DispatchDescriptor, context: String, reason: NotFoundReason) {
        tracing::debug!(path = %descriptor.path, context = %context, ?reason, "no route");
        metrics::record_navigation(Outcome::NotFound);
        publish(
            &self.bus,
            DispatchEvent::NotFound {
                descriptor,
                context,
                reason,
            },
        );
    }

    /// Run `bootstrap` against the host's current location, then dispatch it.
    ///
    /// Returns `false` without publishing anything when the location lies
    /// outside the configured root path. The initial dispatch never pushes
    /// history.
    pub fn init<I>(self: &Arc<Self>, bootstrap: I) -> bool
    where
        I: IntoIterator<Item = Handler>,
    {
        let config = self.config.load_full();
        let location = self.host.current_location();
        let Some(relative) = path::strip_root(&config.root_path, &location) else {
            tracing::debug!(
                location = %location,
                root_path = %config.root_path,
                "location outside root path; init skipped"
            );
            return false;
        };

        let chain: HandlerChain = bootstrap.into_iter().collect();
        let request = Request::from_location(&relative);
        let dispatcher = Arc::downgrade(self);
        ExecutionPlan::new(chain).start(request, empty_data(), move |err| {
            let Some(dispatcher) = dispatcher.upgrade() else {
                return;
            };
            match err {
                Some(error) => {
                    tracing::warn!(path = %relative, error = %error, "init failed");
                    publish(
                        &dispatcher.bus,
                        DispatchEvent::InitError {
                            path: relative,
                            error,
                        },
                    );
                }
                None => {
                    tracing::info!(path = %relative, "init complete");
                    publish(
                        &dispatcher.bus,
                        DispatchEvent::InitSuccess {
                            path: relative.clone(),
                        },
                    );
                    dispatcher.dispatch(DispatchDescriptor::new(relative).with_history(false));
                }
            }
        });
        true
    }

    /// Dispatch every replay request already queued. Returns how many ran.
    pub fn drain_replays(
        &self,
        replays: &mut mpsc::UnboundedReceiver<DispatchDescriptor>,
    ) -> usize {
        let mut count = 0;
        while let Ok(descriptor) = replays.try_recv() {
            self.replay(descriptor);
            count += 1;
        }
        count
    }

    /// Dispatch replay requests as they arrive, until every sender is gone.
    pub async fn run_replays(
        self: Arc<Self>,
        mut replays: mpsc::UnboundedReceiver<DispatchDescriptor>,
    ) {
        while let Some(descriptor) = replays.recv().await {
            self.replay(descriptor);
        }
        tracing::debug!("replay channel closed");
    }

    // Replayed paths are full locations, as stored in history.
    fn replay(&self, mut descriptor: DispatchDescriptor) {
        let config = self.config.load_full();
        match path::strip_root(&config.root_path, &descriptor.path) {
            Some(relative) => {
                descriptor.path = relative;
                self.dispatch(descriptor);
            }
            None => tracing::debug!(
                path = %descriptor.path,
                root_path = %config.root_path,
                "replay outside root path; skipped"
            ),
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config.load_full())
            .field("routes", &self.routes())
            .finish_non_exhaustive()
    }
}

fn complete_navigation(
    bus: &EventBus<DispatchEvent>,
    navigation: Navigation,
    err: Option<HandlerError>,
) {
    match err {
        Some(error) => {
            tracing::warn!(
                path = %navigation.path,
                context = %navigation.context,
                error = %error,
                "navigation failed"
            );
            metrics::record_navigation(Outcome::Error);
            publish(bus, DispatchEvent::NavigateError { navigation, error });
        }
        None => {
            tracing::debug!(
                path = %navigation.path,
                context = %navigation.context,
                "navigation complete"
            );
            metrics::record_navigation(Outcome::Success);
            publish(bus, DispatchEvent::NavigateSuccess { navigation });
        }
    }
}

fn publish(bus: &EventBus<DispatchEvent>, event: DispatchEvent) {
    bus.publish(event.topic(), &event);
}
