//! Encrypted cookie store.
//!
//! Sessions are serialized to JSON and sealed with the cookie crate's
//! private jar (authenticated encryption, key derived from the configured
//! secret). Nothing is kept server-side.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use actix_web::cookie::{Cookie, CookieJar, Key};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::CookieOptions;
use super::context::RequestSessions;
use crate::{AuthError, SessionConfig};

/// Largest encoded cookie value the store will emit.
pub const MAX_COOKIE_VALUE_LENGTH: usize = 4096;

/// Contents of one named session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flashes: Vec<Value>,
}

pub struct CookieSessionStore {
    config: SessionConfig,
    key: Key,
    open_scopes: Arc<AtomicUsize>,
}

impl fmt::Debug for CookieSessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieSessionStore")
            .field("config", &self.config)
            .field("key", &"[REDACTED]")
            .field("open_scopes", &self.open_scopes())
            .finish()
    }
}

impl CookieSessionStore {
    /// Validates the configuration and derives the cookie key from its secret.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ConfigurationError` if the configuration is invalid.
    pub fn new(config: SessionConfig) -> Result<Self, AuthError> {
        config.validate()?;
        // validate() guarantees the 32 bytes derive_from needs
        let key = Key::derive_from(config.secret().expose_secret().as_bytes());

        log::debug!(
            target: "jwt_session::store",
            "msg=\"cookie session store created\" token_session=\"{}\" default_session=\"{}\" flash_session=\"{}\"",
            config.token_session_name(),
            config.default_session_name(),
            config.flash_session_name()
        );

        Ok(Self {
            config,
            key,
            open_scopes: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Number of request scopes that have been opened and not yet dropped.
    pub fn open_scopes(&self) -> usize {
        self.open_scopes.load(Ordering::SeqCst)
    }

    pub(crate) fn open_scope<I>(&self, cookies: I) -> RequestSessions
    where
        I: IntoIterator<Item = Cookie<'static>>,
    {
        let mut jar = CookieJar::new();
        for cookie in cookies {
            jar.add_original(cookie);
        }
        RequestSessions::new(jar, Arc::clone(&self.open_scopes))
    }

    /// Reads a session out of the jar. An absent cookie yields an empty session.
    pub(crate) fn load(&self, jar: &CookieJar, name: &str) -> Result<SessionData, AuthError> {
        if jar.get(name).is_none() {
            return Ok(SessionData::default());
        }

        let cookie = jar.private(&self.key).get(name).ok_or_else(|| {
            log::warn!(
                target: "jwt_session::store",
                "msg=\"session cookie could not be decrypted\" session=\"{name}\""
            );
            AuthError::SessionRetrieve {
                name: name.to_owned(),
                reason: "cookie could not be decrypted".to_owned(),
            }
        })?;

        serde_json::from_str(cookie.value()).map_err(|e| AuthError::SessionRetrieve {
            name: name.to_owned(),
            reason: format!("malformed session payload: {e}"),
        })
    }

    /// Seals the session into the jar, or stages a removal cookie when the
    /// options are expired.
    pub(crate) fn save(
        &self,
        jar: &mut CookieJar,
        name: &str,
        data: &SessionData,
        options: &CookieOptions,
    ) -> Result<(), AuthError> {
        if options.is_expired() {
            jar.remove(options.build_cookie(name.to_owned(), String::new()));
            return Ok(());
        }

        let payload = serde_json::to_string(data).map_err(|e| AuthError::SessionSave {
            name: name.to_owned(),
            reason: e.to_string(),
        })?;

        let mut scratch = CookieJar::new();
        scratch
            .private_mut(&self.key)
            .add(options.build_cookie(name.to_owned(), payload));
        let sealed = scratch
            .get(name)
            .cloned()
            .ok_or_else(|| AuthError::SessionSave {
                name: name.to_owned(),
                reason: "cookie could not be encrypted".to_owned(),
            })?;

        if sealed.value().len() > MAX_COOKIE_VALUE_LENGTH {
            return Err(AuthError::SessionSave {
                name: name.to_owned(),
                reason: format!(
                    "encoded value is {} bytes, limit is {MAX_COOKIE_VALUE_LENGTH}",
                    sealed.value().len()
                ),
            });
        }

        jar.add(sealed);
        Ok(())
    }
}

/// One-time initializer for a shared store.
///
/// Concurrent callers of [`get_or_init`](Self::get_or_init) all receive the
/// same instance; the configuration closure runs at most once, and a failed
/// construction is cached like a successful one.
#[derive(Default)]
pub struct StoreCell {
    inner: OnceLock<Result<Arc<CookieSessionStore>, AuthError>>,
}

impl StoreCell {
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    pub fn get_or_init<F>(&self, config: F) -> Result<Arc<CookieSessionStore>, AuthError>
    where
        F: FnOnce() -> Result<SessionConfig, AuthError>,
    {
        self.inner
            .get_or_init(|| config().and_then(CookieSessionStore::new).map(Arc::new))
            .clone()
    }

    pub fn get(&self) -> Option<Arc<CookieSessionStore>> {
        self.inner.get().and_then(|result| result.as_ref().ok().cloned())
    }
}
