use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::types::{EventKind, VadEvent};

type Listener = Box<dyn FnMut(&VadEvent) + Send>;

/// Named-listener registry for detector events.
///
/// Multiple listeners may register per event kind. Delivery is synchronous,
/// in registration order. A panicking listener is caught and logged; it
/// never prevents the remaining listeners from running.
#[derive(Default)]
pub struct EventRegistry {
    listeners: Vec<(EventKind, Listener)>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn on<F>(&mut self, kind: EventKind, listener: F)
    where
        F: FnMut(&VadEvent) + Send + 'static,
    {
        self.listeners.push((kind, Box::new(listener)));
    }

    pub fn emit(&mut self, event: &VadEvent) {
        let kind = event.kind();
        for (registered, listener) in self.listeners.iter_mut() {
            if *registered != kind {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::error!(
                    ?kind,
                    "event listener panicked, continuing with remaining listeners"
                );
            }
        }
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.iter().filter(|(k, _)| *k == kind).count()
    }
}
