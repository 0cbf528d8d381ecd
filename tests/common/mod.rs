//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};

use path_dispatcher::events::topics::{
    INIT_ERROR, INIT_SUCCESS, NAVIGATE_ERROR, NAVIGATE_NOT_FOUND, NAVIGATE_SUCCESS,
};
use path_dispatcher::{DispatchEvent, Dispatcher, EventBus, Handler, MemoryHost};

pub const ALL_TOPICS: [&str; 5] = [
    INIT_SUCCESS,
    INIT_ERROR,
    NAVIGATE_SUCCESS,
    NAVIGATE_ERROR,
    NAVIGATE_NOT_FOUND,
];

/// Records every dispatcher event in publication order.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<DispatchEvent>>>,
}

#[allow(dead_code)]
impl Recorder {
    pub fn attach(bus: &EventBus<DispatchEvent>) -> Self {
        let recorder = Self::default();
        for topic in ALL_TOPICS {
            let events = Arc::clone(&recorder.events);
            bus.subscribe(topic, move |event: &DispatchEvent| {
                events.lock().unwrap().push(event.clone());
                Ok(())
            });
        }
        recorder
    }

    pub fn events(&self) -> Vec<DispatchEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn topics(&self) -> Vec<&'static str> {
        self.events().iter().map(DispatchEvent::topic).collect()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

/// A dispatcher over an in-memory host with a recorder attached.
#[allow(dead_code)]
pub fn setup(location: &str) -> (Arc<Dispatcher>, Arc<MemoryHost>, Recorder) {
    let bus = Arc::new(EventBus::new());
    let host = Arc::new(MemoryHost::new(location));
    let recorder = Recorder::attach(&bus);
    let dispatcher = Arc::new(Dispatcher::new(bus, host.clone()));
    (dispatcher, host, recorder)
}

/// A terminal handler that appends `name` to `log`.
#[allow(dead_code)]
pub fn mark(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> Handler {
    let log = Arc::clone(log);
    Handler::terminal(move |_, _| {
        log.lock().unwrap().push(name.to_string());
        Ok(())
    })
}
