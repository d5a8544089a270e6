//! Process-wide session configuration.
//!
//! A [`SessionConfig`] is built once at startup, validated when the
//! [`CookieSessionStore`](crate::CookieSessionStore) is constructed, and never
//! mutated afterwards. Every component that needs a session name, the
//! secret or the default cookie options reads it from here.
//!
//! # Example
//!
//! ```rust
//! use chrono::Duration;
//! use jwt_session::{CookieOptions, SessionConfig};
//!
//! let config = SessionConfig::new("a-secret-key-of-at-least-32-bytes!!")
//!     .unwrap()
//!     .with_token_session_name("appToken")
//!     .with_default_options(CookieOptions::default().with_max_age(1800))
//!     .with_token_validity(Duration::minutes(30));
//!
//! assert_eq!(config.resolve_session_name(""), "myDefaultSessionName");
//! assert_eq!(config.resolve_flash_name("default"), "myDefaultFlashSessionName");
//! ```

use std::env::VarError;
use std::fmt;

use chrono::Duration;

use crate::jwt::JwtConfig;
use crate::session::CookieOptions;
use crate::{AuthError, SecretString};

/// Minimum length of the secret in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Upper bound on token validity, matching the longest cookie max-age
/// browsers honour.
pub const MAX_TOKEN_VALIDITY_DAYS: i64 = 400;

/// Session name that callers may pass instead of spelling out a default.
pub const DEFAULT_SESSION_ALIAS: &str = "default";

pub const DEFAULT_TOKEN_SESSION_NAME: &str = "jwtTokenSession";
pub const DEFAULT_SESSION_NAME: &str = "myDefaultSessionName";
pub const DEFAULT_FLASH_SESSION_NAME: &str = "myDefaultFlashSessionName";

/// Environment variables read by [`SessionConfig::from_env`].
pub const ENV_SECRET: &str = "JWT_SESSION_SECRET";
pub const ENV_TOKEN_SESSION_NAME: &str = "JWT_SESSION_TOKEN_NAME";
pub const ENV_DEFAULT_SESSION_NAME: &str = "JWT_SESSION_DEFAULT_NAME";
pub const ENV_FLASH_SESSION_NAME: &str = "JWT_SESSION_FLASH_NAME";

#[derive(Clone)]
pub struct SessionConfig {
    /// Shared secret for cookie encryption and token signing.
    pub(crate) secret: SecretString,
    /// Name of the session holding the token; also the key inside it.
    pub(crate) token_session_name: String,
    pub(crate) default_session_name: String,
    pub(crate) flash_session_name: String,
    pub(crate) default_options: CookieOptions,
    /// Token validity, also used as the token cookie's max-age.
    pub(crate) token_validity: Duration,
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("secret", &"[REDACTED]")
            .field("token_session_name", &self.token_session_name)
            .field("default_session_name", &self.default_session_name)
            .field("flash_session_name", &self.flash_session_name)
            .field("default_options", &self.default_options)
            .field("token_validity", &self.token_validity)
            .finish()
    }
}

impl SessionConfig {
    /// Creates a configuration with default names and cookie options.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ConfigurationError` if the secret is shorter than
    /// [`MIN_SECRET_LENGTH`] bytes.
    pub fn new(secret: impl Into<SecretString>) -> Result<Self, AuthError> {
        let secret = secret.into();
        check_secret(&secret)?;

        Ok(Self {
            secret,
            token_session_name: DEFAULT_TOKEN_SESSION_NAME.to_owned(),
            default_session_name: DEFAULT_SESSION_NAME.to_owned(),
            flash_session_name: DEFAULT_FLASH_SESSION_NAME.to_owned(),
            default_options: CookieOptions::default(),
            token_validity: Duration::hours(1),
        })
    }

    /// Builds a configuration from `JWT_SESSION_*` environment variables.
    ///
    /// The secret is required; the session names fall back to their
    /// defaults when unset.
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key), None)
    }

    /// Like [`from_env`](Self::from_env), but uses `fallback_secret` when
    /// `JWT_SESSION_SECRET` is unset. A secret that is set but invalid is
    /// still an error, as are invalid session names.
    pub fn from_env_or(fallback_secret: &str) -> Result<Self, AuthError> {
        Self::from_lookup(|key| std::env::var(key), Some(fallback_secret))
    }

    fn from_lookup<F>(lookup: F, fallback_secret: Option<&str>) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Result<String, VarError>,
    {
        let secret = match (lookup(ENV_SECRET), fallback_secret) {
            (Ok(secret), _) => secret,
            (Err(VarError::NotPresent), Some(fallback)) => {
                log::warn!(
                    target: "jwt_session::config",
                    "msg=\"{ENV_SECRET} is not set, using the fallback secret\""
                );
                fallback.to_owned()
            }
            (Err(VarError::NotPresent), None) => {
                return Err(AuthError::ConfigurationError(format!(
                    "{ENV_SECRET} must be set"
                )));
            }
            (Err(VarError::NotUnicode(_)), _) => {
                return Err(AuthError::ConfigurationError(format!(
                    "{ENV_SECRET} is not valid unicode"
                )));
            }
        };

        let mut config = Self::new(secret)?;
        if let Ok(name) = lookup(ENV_TOKEN_SESSION_NAME) {
            config.token_session_name = name;
        }
        if let Ok(name) = lookup(ENV_DEFAULT_SESSION_NAME) {
            config.default_session_name = name;
        }
        if let Ok(name) = lookup(ENV_FLASH_SESSION_NAME) {
            config.flash_session_name = name;
        }

        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_token_session_name(mut self, name: impl Into<String>) -> Self {
        self.token_session_name = name.into();
        self
    }

    #[must_use]
    pub fn with_default_session_name(mut self, name: impl Into<String>) -> Self {
        self.default_session_name = name.into();
        self
    }

    #[must_use]
    pub fn with_flash_session_name(mut self, name: impl Into<String>) -> Self {
        self.flash_session_name = name.into();
        self
    }

    #[must_use]
    pub fn with_default_options(mut self, options: CookieOptions) -> Self {
        self.default_options = options;
        self
    }

    #[must_use]
    pub fn with_token_validity(mut self, validity: Duration) -> Self {
        self.token_validity = validity;
        self
    }

    /// Checks the secret, the three session names and the token validity.
    ///
    /// Names must be non-empty, free of whitespace, distinct from each other
    /// and distinct from the `"default"` alias.
    pub fn validate(&self) -> Result<(), AuthError> {
        check_secret(&self.secret)?;

        let names = [
            ("token session name", &self.token_session_name),
            ("default session name", &self.default_session_name),
            ("flash session name", &self.flash_session_name),
        ];

        for (label, name) in names {
            if name.is_empty() {
                return Err(AuthError::ConfigurationError(format!(
                    "{label} must not be empty"
                )));
            }
            if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
                return Err(AuthError::ConfigurationError(format!(
                    "{label} must not contain whitespace, got \"{name}\""
                )));
            }
            if name == DEFAULT_SESSION_ALIAS {
                return Err(AuthError::ConfigurationError(format!(
                    "{label} must not be \"{DEFAULT_SESSION_ALIAS}\""
                )));
            }
        }

        if self.token_session_name == self.default_session_name
            || self.token_session_name == self.flash_session_name
            || self.default_session_name == self.flash_session_name
        {
            return Err(AuthError::ConfigurationError(
                "token, default and flash session names must be distinct".to_owned(),
            ));
        }

        if self.token_validity <= Duration::zero() {
            return Err(AuthError::ConfigurationError(
                "token validity must be positive".to_owned(),
            ));
        }
        if self.token_validity > Duration::days(MAX_TOKEN_VALIDITY_DAYS) {
            return Err(AuthError::ConfigurationError(format!(
                "token validity must not exceed {MAX_TOKEN_VALIDITY_DAYS} days"
            )));
        }

        Ok(())
    }

    /// Maps an empty name or the `"default"` alias to the default session.
    pub fn resolve_session_name<'a>(&'a self, name: &'a str) -> &'a str {
        if is_alias(name) {
            &self.default_session_name
        } else {
            name
        }
    }

    /// Maps an empty name or the `"default"` alias to the flash session.
    pub fn resolve_flash_name<'a>(&'a self, name: &'a str) -> &'a str {
        if is_alias(name) {
            &self.flash_session_name
        } else {
            name
        }
    }

    pub fn token_session_name(&self) -> &str {
        &self.token_session_name
    }

    pub fn default_session_name(&self) -> &str {
        &self.default_session_name
    }

    pub fn flash_session_name(&self) -> &str {
        &self.flash_session_name
    }

    pub fn default_options(&self) -> &CookieOptions {
        &self.default_options
    }

    pub fn token_validity(&self) -> Duration {
        self.token_validity
    }

    pub(crate) fn secret(&self) -> &SecretString {
        &self.secret
    }

    /// Token codec configuration sharing this config's secret and validity.
    pub fn jwt_config(&self) -> Result<JwtConfig, AuthError> {
        Ok(JwtConfig::new(self.secret.clone())?.with_expiry(self.token_validity))
    }
}

fn is_alias(name: &str) -> bool {
    name.is_empty() || name == DEFAULT_SESSION_ALIAS
}

fn check_secret(secret: &SecretString) -> Result<(), AuthError> {
    if secret.len() < MIN_SECRET_LENGTH {
        return Err(AuthError::ConfigurationError(format!(
            "secret must be at least {MIN_SECRET_LENGTH} bytes, got {}",
            secret.len()
        )));
    }
    Ok(())
}
