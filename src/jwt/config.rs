use chrono::Duration;
use std::fmt;

use crate::config::{MAX_TOKEN_VALIDITY_DAYS, MIN_SECRET_LENGTH};
use crate::{AuthError, SecretString};

/// Configuration for token signing and validation.
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key used for signing tokens (HS256).
    pub(crate) secret: SecretString,
    /// Token validity. Default: 1 hour.
    pub(crate) expiry: Duration,
    /// Clock skew tolerated on `exp`, in seconds. Default: none.
    pub(crate) leeway: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("expiry", &self.expiry)
            .field("leeway", &self.leeway)
            .finish()
    }
}

impl JwtConfig {
    /// Creates a new configuration with the given secret.
    ///
    /// # Errors
    /// Returns `AuthError::ConfigurationError` if the secret is less than 32 bytes.
    pub fn new(secret: impl Into<SecretString>) -> Result<Self, AuthError> {
        let secret = secret.into();

        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AuthError::ConfigurationError(format!(
                "JWT secret must be at least {MIN_SECRET_LENGTH} bytes, got {}",
                secret.len()
            )));
        }

        Ok(Self {
            secret,
            expiry: Duration::hours(1),
            leeway: 0,
        })
    }

    /// Sets the token validity, capped at [`MAX_TOKEN_VALIDITY_DAYS`].
    #[must_use]
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry.min(Duration::days(MAX_TOKEN_VALIDITY_DAYS));
        self
    }

    #[must_use]
    pub fn with_leeway(mut self, seconds: u64) -> Self {
        self.leeway = seconds;
        self
    }

    pub fn expiry(&self) -> Duration {
        self.expiry
    }
}
