use chrono::Utc;

use crate::events::{AuthEvent, dispatch};
use crate::{AuthError, Sessions};

/// Expires the token, default and flash session cookies.
///
/// Tokens are stateless; one copied out of the cookie stays valid until it
/// expires.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogoutAction;

impl LogoutAction {
    pub fn new() -> Self {
        Self
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "logout", skip_all, err)
    )]
    pub async fn execute(&self, sessions: &Sessions) -> Result<(), AuthError> {
        sessions.delete_all()?;

        dispatch(AuthEvent::LogoutSuccess { at: Utc::now() }).await;
        log::info!(
            target: "jwt_session::auth",
            "msg=\"logout success\""
        );

        Ok(())
    }
}
