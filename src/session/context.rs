use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::cookie::{Cookie, CookieJar};

use super::CookieOptions;
use super::store::SessionData;

/// A session loaded during the current request.
#[derive(Debug, Clone)]
pub(crate) struct CachedSession {
    pub(crate) data: SessionData,
    pub(crate) options: CookieOptions,
}

/// Per-request session state: the request's cookie jar plus every session
/// touched so far, so repeated reads within one request see the same object.
///
/// Dropping it releases the request's memory and decrements the store's
/// open-scope counter.
#[derive(Debug)]
pub struct RequestSessions {
    pub(crate) jar: CookieJar,
    pub(crate) cache: HashMap<String, CachedSession>,
    open_scopes: Arc<AtomicUsize>,
}

impl RequestSessions {
    pub(crate) fn new(jar: CookieJar, open_scopes: Arc<AtomicUsize>) -> Self {
        open_scopes.fetch_add(1, Ordering::SeqCst);
        Self {
            jar,
            cache: HashMap::new(),
            open_scopes,
        }
    }

    /// Cookies to send back with the response.
    pub fn delta(&self) -> impl Iterator<Item = &Cookie<'static>> {
        self.jar.delta()
    }
}

impl Drop for RequestSessions {
    fn drop(&mut self) {
        self.open_scopes.fetch_sub(1, Ordering::SeqCst);
    }
}
