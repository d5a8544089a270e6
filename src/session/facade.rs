//! Helper API over the cookie store for one request.

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::rc::Rc;
use std::sync::Arc;

use actix_web::cookie::Cookie;
use chrono::Duration;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::context::{CachedSession, RequestSessions};
use super::store::{CookieSessionStore, SessionData};
use super::{Flash, Message, SessionKey};
use crate::{AuthError, SessionConfig};

/// Session access for the current request.
///
/// Cheap to clone; clones share the same request scope. Every mutating call
/// except [`delete`](Self::delete) re-seals the affected session into the
/// response jar immediately. Obtain one from the `Sessions` extractor in
/// handlers, or with [`Sessions::open`] outside of actix.
#[derive(Clone)]
pub struct Sessions {
    store: Arc<CookieSessionStore>,
    scope: Rc<RefCell<RequestSessions>>,
}

impl std::fmt::Debug for Sessions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sessions")
            .field("cached", &self.scope.borrow().cache.len())
            .finish()
    }
}

impl Sessions {
    /// Opens a request scope over the cookies the client sent.
    pub fn open<I>(store: Arc<CookieSessionStore>, cookies: I) -> Self
    where
        I: IntoIterator<Item = Cookie<'static>>,
    {
        let scope = store.open_scope(cookies);
        Self {
            store,
            scope: Rc::new(RefCell::new(scope)),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        self.store.config()
    }

    /// Cookies staged for the response: sealed sessions and removals.
    pub fn response_cookies(&self) -> Vec<Cookie<'static>> {
        self.scope.borrow().delta().cloned().collect()
    }

    // ---- generic values ----

    /// Writes `message.value` under `message.key` and persists the session.
    pub fn set_message(&self, message: Message) -> Result<(), AuthError> {
        let name = self
            .config()
            .resolve_session_name(&message.session_name)
            .to_owned();
        let options = message
            .options
            .unwrap_or_else(|| self.config().default_options().clone());
        let Message { key, value, .. } = message;

        self.update(&name, |session| {
            session.options = options;
            session.data.values.insert(key, value);
        })
    }

    /// Writes a value into the default session.
    pub fn set(&self, key: &str, value: impl Serialize) -> Result<(), AuthError> {
        let value = to_value(self.config().default_session_name(), value)?;
        self.set_message(Message::new(key, value))
    }

    /// Reads a raw value from the named session.
    pub fn get_session_value(&self, session_name: &str, key: &str) -> Result<Value, AuthError> {
        let name = self.config().resolve_session_name(session_name).to_owned();
        self.with_session(&name, |session| session.data.values.get(key).cloned())?
            .ok_or_else(|| AuthError::ValueNotFound(key.to_owned()))
    }

    /// Reads a value from the default session and deserializes it.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, AuthError> {
        let value = self.get_session_value("", key)?;
        serde_json::from_value(value).map_err(|_| AuthError::Conversion {
            key: key.to_owned(),
            expected: std::any::type_name::<T>(),
        })
    }

    pub fn get_string(&self, key: &str) -> Result<String, AuthError> {
        match self.get_session_value("", key)? {
            Value::String(s) => Ok(s),
            _ => Err(AuthError::Conversion {
                key: key.to_owned(),
                expected: "string",
            }),
        }
    }

    pub fn get_int(&self, key: &str) -> Result<i64, AuthError> {
        self.get_session_value("", key)?
            .as_i64()
            .ok_or_else(|| AuthError::Conversion {
                key: key.to_owned(),
                expected: "integer",
            })
    }

    /// Removes a key from the default session.
    pub fn delete(&self, key: &str) -> Result<(), AuthError> {
        self.delete_session_value("", key)
    }

    /// Removes a key from the named session as seen by this request.
    ///
    /// The cookie is not rewritten; a later write to the same session in this
    /// request persists the removal.
    pub fn delete_session_value(&self, session_name: &str, key: &str) -> Result<(), AuthError> {
        let name = self.config().resolve_session_name(session_name).to_owned();
        self.with_session(&name, |session| {
            session.data.values.remove(key);
        })
    }

    // ---- typed keys ----

    pub fn set_key<K: SessionKey>(&self, value: &K::Value) -> Result<(), AuthError> {
        let value = to_value(K::NAME, value)?;
        self.set_message(Message::new(K::NAME, value).in_session(K::SESSION))
    }

    pub fn get_key<K: SessionKey>(&self) -> Result<K::Value, AuthError> {
        let value = self.get_session_value(K::SESSION, K::NAME)?;
        serde_json::from_value(value).map_err(|_| AuthError::Conversion {
            key: K::NAME.to_owned(),
            expected: std::any::type_name::<K::Value>(),
        })
    }

    pub fn delete_key<K: SessionKey>(&self) -> Result<(), AuthError> {
        self.delete_session_value(K::SESSION, K::NAME)
    }

    // ---- flashes ----

    /// Adds a flash to the default flash session.
    pub fn set_flash(&self, value: impl Into<Value>) -> Result<(), AuthError> {
        self.set_session_flash(Flash::new(value))
    }

    pub fn set_session_flash(&self, flash: Flash) -> Result<(), AuthError> {
        let name = self.config().resolve_flash_name(&flash.session_name).to_owned();
        let Flash { value, .. } = flash;

        self.update(&name, |session| session.data.flashes.push(value))
    }

    /// Reads all flashes from the default flash session and deletes it.
    pub fn flashes(&self) -> Result<Vec<Value>, AuthError> {
        self.session_flashes("")
    }

    /// An unreadable flash cookie is still expired before its error is
    /// returned.
    pub fn session_flashes(&self, session_name: &str) -> Result<Vec<Value>, AuthError> {
        let name = self.config().resolve_flash_name(session_name).to_owned();
        let flashes =
            self.with_session(&name, |session| std::mem::take(&mut session.data.flashes));
        self.expire(&name)?;
        flashes
    }

    // ---- token ----

    /// Reads the token stored in the token session.
    pub fn token_string(&self) -> Result<String, AuthError> {
        let name = self.config().token_session_name().to_owned();
        match self.with_session(&name, |session| session.data.values.get(&name).cloned())? {
            Some(Value::String(token)) if !token.is_empty() => Ok(token),
            Some(Value::String(_)) | None => Err(AuthError::TokenMissing),
            Some(_) => Err(AuthError::Conversion {
                key: name,
                expected: "string",
            }),
        }
    }

    /// Stores a token in the token session with the given cookie lifetime.
    pub fn set_token_string(&self, token: &str, max_age: Duration) -> Result<(), AuthError> {
        let name = self.config().token_session_name().to_owned();
        let options = self
            .config()
            .default_options()
            .clone()
            .with_max_age(max_age.num_seconds());

        self.set_message(
            Message::new(name.clone(), token)
                .in_session(name)
                .with_options(options),
        )
    }

    // ---- deletion ----

    /// Expires the named session cookie so the browser drops it.
    pub fn delete_session(&self, session_name: &str) -> Result<(), AuthError> {
        let name = self.config().resolve_session_name(session_name).to_owned();
        self.expire(&name)
    }

    pub fn delete_token_session(&self) -> Result<(), AuthError> {
        let name = self.config().token_session_name().to_owned();
        self.expire(&name)
    }

    /// Expires the default and the default flash sessions.
    pub fn delete_normal_sessions(&self) -> Result<(), AuthError> {
        let default = self.config().default_session_name().to_owned();
        let flash = self.config().flash_session_name().to_owned();
        let first = self.expire(&default);
        let second = self.expire(&flash);
        first.and(second)
    }

    /// Expires the token, default and flash sessions.
    pub fn delete_all(&self) -> Result<(), AuthError> {
        let token = self.delete_token_session();
        let normal = self.delete_normal_sessions();
        token.and(normal)
    }

    // ---- internals ----

    /// Runs `f` on the named session, loading it on first access.
    fn with_session<R>(
        &self,
        name: &str,
        f: impl FnOnce(&mut CachedSession) -> R,
    ) -> Result<R, AuthError> {
        let mut guard = self.scope.borrow_mut();
        let scope = &mut *guard;

        let session = match scope.cache.entry(name.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let data = self.store.load(&scope.jar, name)?;
                entry.insert(CachedSession {
                    data,
                    options: self.store.config().default_options().clone(),
                })
            }
        };

        Ok(f(session))
    }

    /// Runs `f` on the named session and persists it.
    fn update(&self, name: &str, f: impl FnOnce(&mut CachedSession)) -> Result<(), AuthError> {
        self.with_session(name, f)?;

        let mut guard = self.scope.borrow_mut();
        let scope = &mut *guard;
        let Some(session) = scope.cache.get(name) else {
            return Ok(());
        };

        self.store
            .save(&mut scope.jar, name, &session.data, &session.options)
            .inspect_err(|e| {
                log::error!(target: "jwt_session::session", "msg=\"session save failed\" error=\"{e}\"");
            })
    }

    /// Stages a removal cookie and forgets the cached session.
    fn expire(&self, name: &str) -> Result<(), AuthError> {
        let mut guard = self.scope.borrow_mut();
        let scope = &mut *guard;

        let options = scope
            .cache
            .remove(name)
            .map_or_else(|| self.store.config().default_options().clone(), |s| s.options)
            .expired();

        self.store
            .save(&mut scope.jar, name, &SessionData::default(), &options)
    }
}

fn to_value(name: &str, value: impl Serialize) -> Result<Value, AuthError> {
    serde_json::to_value(value).map_err(|e| AuthError::SessionSave {
        name: name.to_owned(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CookieOptions;

    struct Greeting;

    impl SessionKey for Greeting {
        const NAME: &'static str = "hello";
        type Value = String;
    }

    struct CartItems;

    impl SessionKey for CartItems {
        const NAME: &'static str = "items";
        const SESSION: &'static str = "cart";
        type Value = Vec<u32>;
    }

    fn test_store() -> Arc<CookieSessionStore> {
        let config = SessionConfig::new("test-secret-32-bytes-long-key-01").unwrap();
        Arc::new(CookieSessionStore::new(config).unwrap())
    }

    /// Starts the next request with the cookies `previous` sent back.
    fn follow(store: &Arc<CookieSessionStore>, previous: &Sessions) -> Sessions {
        let cookies = previous
            .response_cookies()
            .into_iter()
            .filter(|c| !c.value().is_empty());
        Sessions::open(Arc::clone(store), cookies)
    }

    fn cookie_named<'a>(cookies: &'a [Cookie<'static>], name: &str) -> Option<&'a Cookie<'static>> {
        cookies.iter().find(|c| c.name() == name)
    }

    #[test]
    fn test_set_then_get_round_trip() {
        let store = test_store();
        let sessions = Sessions::open(Arc::clone(&store), Vec::new());

        sessions.set("hello", "world").unwrap();
        assert_eq!(sessions.get_string("hello").unwrap(), "world");

        let next = follow(&store, &sessions);
        assert_eq!(next.get_string("hello").unwrap(), "world");
    }

    #[test]
    fn test_get_int_and_conversion_errors() {
        let store = test_store();
        let sessions = Sessions::open(store, Vec::new());

        sessions.set("hello", 2017).unwrap();
        assert_eq!(sessions.get_int("hello").unwrap(), 2017);
        assert_eq!(
            sessions.get_string("hello"),
            Err(AuthError::Conversion {
                key: "hello".to_owned(),
                expected: "string"
            })
        );

        sessions.set("hello", "world").unwrap();
        assert!(matches!(
            sessions.get_int("hello"),
            Err(AuthError::Conversion { expected: "integer", .. })
        ));
        assert!(matches!(
            sessions.get::<u32>("hello"),
            Err(AuthError::Conversion { .. })
        ));
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let store = test_store();
        let sessions = Sessions::open(store, Vec::new());

        sessions.set("hello", "world").unwrap();
        sessions.delete("hello").unwrap();

        assert_eq!(
            sessions.get_string("hello"),
            Err(AuthError::ValueNotFound("hello".to_owned()))
        );
    }

    #[test]
    fn test_delete_does_not_rewrite_cookie() {
        let store = test_store();
        let first = Sessions::open(Arc::clone(&store), Vec::new());
        first.set("hello", "world").unwrap();

        let second = follow(&store, &first);
        second.delete("hello").unwrap();
        assert!(second.response_cookies().is_empty());

        // the browser still holds the value
        let third = follow(&store, &first);
        assert_eq!(third.get_string("hello").unwrap(), "world");
    }

    #[test]
    fn test_missing_value_is_not_found() {
        let sessions = Sessions::open(test_store(), Vec::new());
        assert_eq!(
            sessions.get_session_value("default", "nothing"),
            Err(AuthError::ValueNotFound("nothing".to_owned()))
        );
    }

    #[test]
    fn test_named_session_is_separate_cookie() {
        let store = test_store();
        let sessions = Sessions::open(Arc::clone(&store), Vec::new());

        sessions
            .set_message(Message::new("theme", "dark").in_session("prefs"))
            .unwrap();
        sessions.set("theme", "light").unwrap();

        let cookies = sessions.response_cookies();
        assert!(cookie_named(&cookies, "prefs").is_some());
        assert!(cookie_named(&cookies, "myDefaultSessionName").is_some());

        let next = follow(&store, &sessions);
        assert_eq!(next.get_session_value("prefs", "theme").unwrap(), "dark");
        assert_eq!(next.get_string("theme").unwrap(), "light");
    }

    #[test]
    fn test_message_options_applied() {
        let sessions = Sessions::open(test_store(), Vec::new());
        sessions
            .set_message(
                Message::new("theme", "dark")
                    .with_options(CookieOptions::default().with_max_age(60).with_path("/app")),
            )
            .unwrap();

        let cookies = sessions.response_cookies();
        let cookie = cookie_named(&cookies, "myDefaultSessionName").unwrap();
        assert_eq!(cookie.path(), Some("/app"));
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::seconds(60))
        );
    }

    #[test]
    fn test_typed_keys() {
        let store = test_store();
        let sessions = Sessions::open(Arc::clone(&store), Vec::new());

        sessions.set_key::<Greeting>(&"world".to_owned()).unwrap();
        sessions.set_key::<CartItems>(&vec![1, 2, 3]).unwrap();

        let next = follow(&store, &sessions);
        assert_eq!(next.get_key::<Greeting>().unwrap(), "world");
        assert_eq!(next.get_key::<CartItems>().unwrap(), vec![1, 2, 3]);
        assert_eq!(next.get_session_value("cart", "items").unwrap(), serde_json::json!([1, 2, 3]));

        next.delete_key::<CartItems>().unwrap();
        assert_eq!(
            next.get_key::<CartItems>(),
            Err(AuthError::ValueNotFound("items".to_owned()))
        );
    }

    #[test]
    fn test_typed_key_rejects_foreign_value() {
        let sessions = Sessions::open(test_store(), Vec::new());
        sessions.set("hello", 2017).unwrap();
        assert!(matches!(
            sessions.get_key::<Greeting>(),
            Err(AuthError::Conversion { .. })
        ));
    }

    #[test]
    fn test_flashes_are_single_use() {
        let store = test_store();
        let first = Sessions::open(Arc::clone(&store), Vec::new());
        first.set_flash("success : successful login").unwrap();
        first.set_flash("username : admin").unwrap();

        let second = follow(&store, &first);
        assert_eq!(
            second.flashes().unwrap(),
            vec![
                Value::from("success : successful login"),
                Value::from("username : admin")
            ]
        );
        assert!(second.flashes().unwrap().is_empty());

        // the flash cookie is dropped by the browser
        let cookies = second.response_cookies();
        let removal = cookie_named(&cookies, "myDefaultFlashSessionName").unwrap();
        assert_eq!(removal.value(), "");
    }

    #[test]
    fn test_named_flash_session() {
        let store = test_store();
        let first = Sessions::open(Arc::clone(&store), Vec::new());
        first
            .set_session_flash(Flash::new("saved").in_session("notices"))
            .unwrap();
        first.set_flash("other").unwrap();

        let second = follow(&store, &first);
        assert_eq!(second.session_flashes("notices").unwrap(), vec![Value::from("saved")]);
        assert_eq!(second.flashes().unwrap(), vec![Value::from("other")]);
    }

    #[test]
    fn test_token_string_round_trip() {
        let store = test_store();
        let first = Sessions::open(Arc::clone(&store), Vec::new());
        assert_eq!(first.token_string(), Err(AuthError::TokenMissing));

        first
            .set_token_string("a.b.c", Duration::minutes(30))
            .unwrap();

        let cookies = first.response_cookies();
        let cookie = cookie_named(&cookies, "jwtTokenSession").unwrap();
        assert_eq!(
            cookie.max_age(),
            Some(actix_web::cookie::time::Duration::seconds(1800))
        );

        let second = follow(&store, &first);
        assert_eq!(second.token_string().unwrap(), "a.b.c");
        // token lives in its own session, not the default one
        assert!(second.get_string("jwtTokenSession").is_err());
    }

    #[test]
    fn test_delete_all_removes_every_cookie() {
        let store = test_store();
        let first = Sessions::open(Arc::clone(&store), Vec::new());
        first.set_token_string("a.b.c", Duration::hours(1)).unwrap();
        first.set("hello", "world").unwrap();
        first.set_flash("hi").unwrap();

        let second = follow(&store, &first);
        second.delete_all().unwrap();

        let cookies = second.response_cookies();
        assert_eq!(cookies.len(), 3);
        assert!(cookies.iter().all(|c| c.value().is_empty()));
        assert_eq!(second.token_string(), Err(AuthError::TokenMissing));
    }

    #[test]
    fn test_delete_session_resolves_alias() {
        let store = test_store();
        let first = Sessions::open(Arc::clone(&store), Vec::new());
        first.set("hello", "world").unwrap();

        let second = follow(&store, &first);
        second.delete_session("default").unwrap();

        let cookies = second.response_cookies();
        assert!(cookie_named(&cookies, "myDefaultSessionName").is_some());
        assert!(second.get_string("hello").is_err());
    }

    #[test]
    fn test_tampered_cookie_surfaces_retrieve_error() {
        let store = test_store();
        let sessions = Sessions::open(
            store,
            vec![Cookie::new("myDefaultSessionName", "garbage")],
        );

        assert!(matches!(
            sessions.set("hello", "world"),
            Err(AuthError::SessionRetrieve { .. })
        ));
        // deletion still works on an unreadable cookie
        assert!(sessions.delete_session("").is_ok());
    }

    #[test]
    fn test_unreadable_flash_cookie_is_cleared() {
        let store = test_store();
        let sessions = Sessions::open(
            store,
            vec![Cookie::new("myDefaultFlashSessionName", "garbage")],
        );

        assert!(matches!(
            sessions.flashes(),
            Err(AuthError::SessionRetrieve { .. })
        ));

        let cookies = sessions.response_cookies();
        let removal = cookie_named(&cookies, "myDefaultFlashSessionName").unwrap();
        assert_eq!(removal.value(), "");

        // the same request can flash again
        sessions.set_flash("retry").unwrap();
        assert_eq!(sessions.flashes().unwrap(), vec![Value::from("retry")]);
    }

    #[test]
    fn test_scope_released_when_last_clone_drops() {
        let store = test_store();
        let sessions = Sessions::open(Arc::clone(&store), Vec::new());
        let clone = sessions.clone();
        assert_eq!(store.open_scopes(), 1);

        drop(sessions);
        assert_eq!(store.open_scopes(), 1);
        drop(clone);
        assert_eq!(store.open_scopes(), 0);
    }
}
