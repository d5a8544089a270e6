//! Process-wide set of listeners that the actions notify.

use std::fmt;
use std::sync::OnceLock;

use super::{AuthEvent, Listener};

static LISTENERS: OnceLock<EventRegistry> = OnceLock::new();

/// Listeners notified of every [`AuthEvent`], in registration order.
#[derive(Default)]
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventRegistry {
    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub(crate) async fn notify(&self, event: &AuthEvent) {
        log::debug!(
            target: "jwt_session::events",
            "msg=\"notifying listeners\" event=\"{}\" listeners={}",
            event.name(),
            self.listeners.len()
        );
        for listener in &self.listeners {
            listener.handle(event).await;
        }
    }
}

/// Installs the process-wide listeners.
///
/// Returns `false` and keeps the first set when listeners were already
/// installed.
pub fn register_event_listeners<F>(configure: F) -> bool
where
    F: FnOnce(&mut EventRegistry),
{
    let mut registry = EventRegistry::default();
    configure(&mut registry);

    let count = registry.len();
    match LISTENERS.set(registry) {
        Ok(()) => {
            log::debug!(
                target: "jwt_session::events",
                "msg=\"event listeners installed\" listeners={count}"
            );
            true
        }
        Err(_) => {
            log::warn!(
                target: "jwt_session::events",
                "msg=\"event listeners already installed, ignoring\" listeners={count}"
            );
            false
        }
    }
}

/// Hands `event` to the installed listeners, if any.
pub async fn dispatch(event: AuthEvent) {
    if let Some(registry) = LISTENERS.get() {
        registry.notify(&event).await;
    }
}
