//! The three authentication operations: log in, validate, log out.
//!
//! Each action logs its outcome, dispatches an [`AuthEvent`](crate::events::AuthEvent)
//! and, with the `tracing` feature, runs inside its own span.

pub mod jwt_login;
pub mod logout;
pub mod validate_token;

pub use jwt_login::{JwtLoginAction, JwtLoginResponse};
pub use logout::LogoutAction;
pub use validate_token::ValidateTokenAction;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use crate::{CookieSessionStore, SessionConfig, Sessions};

    pub(crate) const SECRET: &str = "test-secret-32-bytes-long-key-01";

    pub(crate) fn store() -> Arc<CookieSessionStore> {
        let config = SessionConfig::new(SECRET).unwrap();
        Arc::new(CookieSessionStore::new(config).unwrap())
    }

    /// Starts the next request with the cookies `previous` sent back.
    pub(crate) fn follow(store: &Arc<CookieSessionStore>, previous: &Sessions) -> Sessions {
        let cookies = previous
            .response_cookies()
            .into_iter()
            .filter(|c| !c.value().is_empty());
        Sessions::open(Arc::clone(store), cookies)
    }
}
