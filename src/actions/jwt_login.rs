use chrono::Utc;

use crate::credentials::CredentialVerifier;
use crate::events::{AuthEvent, dispatch};
use crate::jwt::{JwtService, TokenIssuer, expires_at};
use crate::{AuthError, SecretString, Sessions};

/// Response from a successful login.
#[derive(Debug, Clone)]
pub struct JwtLoginResponse {
    pub username: String,
    pub token: SecretString,
    /// Token expiration timestamp (Unix seconds).
    pub expires_at: i64,
}

/// Checks credentials, issues a token and stores it in the token session.
///
/// The token validity and the token cookie's max-age both come from
/// [`SessionConfig::token_validity`](crate::SessionConfig::token_validity).
pub struct JwtLoginAction<C: CredentialVerifier, I: TokenIssuer = JwtService> {
    credentials: C,
    issuer: I,
}

impl<C: CredentialVerifier, I: TokenIssuer> JwtLoginAction<C, I> {
    pub fn new(credentials: C, issuer: I) -> Self {
        Self {
            credentials,
            issuer,
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "jwt_login", skip_all, err)
    )]
    pub async fn execute(
        &self,
        sessions: &Sessions,
        username: &str,
        password: &str,
    ) -> Result<JwtLoginResponse, AuthError> {
        if !self.credentials.verify(username, password).await? {
            log::warn!(
                target: "jwt_session::auth",
                "msg=\"login failed\" username=\"{username}\""
            );
            dispatch(AuthEvent::LoginFailed {
                username: username.to_owned(),
                reason: "invalid credentials".to_owned(),
                at: Utc::now(),
            })
            .await;
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let validity = sessions.config().token_validity();
        let expires_at = expires_at(now, validity)?;
        let token = self.issuer.issue(username, validity)?;
        sessions.set_token_string(&token, validity)?;

        log::info!(
            target: "jwt_session::auth",
            "msg=\"login success\" username=\"{username}\""
        );
        dispatch(AuthEvent::LoginSuccess {
            username: username.to_owned(),
            at: now,
        })
        .await;

        Ok(JwtLoginResponse {
            username: username.to_owned(),
            token: SecretString::new(token),
            expires_at: expires_at.timestamp(),
        })
    }
}
