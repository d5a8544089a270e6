//! Encrypted cookie sessions, flash messages and JWT authentication for actix-web.
//!
//! Build one [`SessionConfig`], hand it to a [`CookieSessionStore`], and wrap
//! the app in [`api::actix::SessionMiddleware`]. Handlers then take a
//! [`Sessions`] extractor for key/value and flash access, and the actions in
//! [`actions`] issue and validate tokens stored in the token session.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jwt_session::{CookieSessionStore, SessionConfig};
//! use jwt_session::api::actix::SessionMiddleware;
//!
//! let config = SessionConfig::new("a-secret-key-of-at-least-32-bytes!!")?;
//! let store = Arc::new(CookieSessionStore::new(config)?);
//!
//! App::new().wrap(SessionMiddleware::new(Arc::clone(&store)));
//! ```

pub mod actions;
pub mod api;
pub mod auth;
pub mod config;
pub mod credentials;
pub mod crypto;
pub mod events;
pub mod jwt;
mod secret;
pub mod session;

pub use auth::{AuthState, TokenLookup, TokenSource};
pub use config::SessionConfig;
pub use credentials::{CredentialVerifier, StaticCredentials};
pub use events::register_event_listeners;
pub use secret::SecretString;
pub use session::{
    CookieOptions, CookieSessionStore, Flash, Message, SameSite, SessionKey, Sessions, StoreCell,
};

/// Errors produced by the session facade, the token codec and the login flow.
///
/// None of these are fatal: callers map them to a redirect with a flash
/// message or to an [`api::ErrorResponse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to retrieve session {name}: {reason}")]
    SessionRetrieve { name: String, reason: String },
    #[error("Failed to save session {name}: {reason}")]
    SessionSave { name: String, reason: String },
    #[error("Session value {key} is not a {expected}")]
    Conversion { key: String, expected: &'static str },
    #[error("Session value {0} not found")]
    ValueNotFound(String),
    #[error("Token missing")]
    TokenMissing,
    #[error("Invalid token")]
    TokenInvalid,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Failed to fetch username from token")]
    TokenMissingSubject,
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Failed to hash password")]
    PasswordHashError,
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl AuthError {
    /// True for every failure that leaves a request unauthenticated because of
    /// the token itself rather than the session plumbing.
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            Self::TokenMissing | Self::TokenInvalid | Self::TokenExpired | Self::TokenMissingSubject
        )
    }
}
