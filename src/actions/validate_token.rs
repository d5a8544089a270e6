use chrono::Utc;

use crate::events::{AuthEvent, dispatch};
use crate::jwt::JwtService;
use crate::{AuthError, AuthState, Sessions, TokenLookup};

/// Finds the request's token and verifies it.
///
/// The token is looked up with [`TokenLookup::HEADER_THEN_COOKIE`] unless
/// another lookup is configured.
#[derive(Debug, Clone)]
pub struct ValidateTokenAction {
    jwt: JwtService,
    lookup: TokenLookup,
}

impl ValidateTokenAction {
    pub fn new(jwt: JwtService) -> Self {
        Self {
            jwt,
            lookup: TokenLookup::HEADER_THEN_COOKIE,
        }
    }

    #[must_use]
    pub fn with_lookup(mut self, lookup: TokenLookup) -> Self {
        self.lookup = lookup;
        self
    }

    /// Returns the username the token was issued for.
    ///
    /// `authorization` is the raw `Authorization` header value, if any.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "validate_token", skip_all, err)
    )]
    pub async fn execute(
        &self,
        authorization: Option<&str>,
        sessions: &Sessions,
    ) -> Result<String, AuthError> {
        let result = self
            .lookup
            .find(authorization, sessions)
            .and_then(|(token, source)| {
                log::debug!(
                    target: "jwt_session::auth",
                    "msg=\"token found\" source=\"{source:?}\""
                );
                self.jwt.validate(&token)
            });

        if let Err(ref e) = result {
            log::debug!(
                target: "jwt_session::auth",
                "msg=\"token rejected\" reason=\"{e}\""
            );
            dispatch(AuthEvent::TokenRejected {
                reason: e.to_string(),
                at: Utc::now(),
            })
            .await;
        }

        result
    }

    pub async fn authenticate(&self, authorization: Option<&str>, sessions: &Sessions) -> AuthState {
        AuthState::from(self.execute(authorization, sessions).await)
    }
}
