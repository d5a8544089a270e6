//! Named sessions stored in encrypted cookies.
//!
//! A request may touch any number of sessions. Three are special: the token
//! session, the default session and the default flash session, whose names
//! come from [`SessionConfig`](crate::SessionConfig).

mod context;
mod facade;
mod key;
mod message;
mod options;
mod store;

pub use context::RequestSessions;
pub use facade::Sessions;
pub use key::SessionKey;
pub use message::{Flash, Message};
pub use options::{CookieOptions, SameSite};
pub use store::{CookieSessionStore, MAX_COOKIE_VALUE_LENGTH, SessionData, StoreCell};
