//! Events fired by the authentication actions.
//!
//! If no listeners are registered, events are dropped.
//!
//! ```rust,ignore
//! use jwt_session::register_event_listeners;
//! use jwt_session::events::listeners::LoggingListener;
//!
//! register_event_listeners(|registry| {
//!     registry.listen(LoggingListener::new());
//! });
//! ```

mod event;
mod listener;
mod registry;

pub mod listeners;

pub use event::AuthEvent;
pub use listener::Listener;
pub use registry::{EventRegistry, dispatch, register_event_listeners};
