//! Shared fixtures for the integration suites.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::test::TestRequest;
use jwt_session::crypto::Argon2Hasher;
use jwt_session::jwt::JwtService;
use jwt_session::{CookieSessionStore, SessionConfig, StaticCredentials};

pub const SECRET: &str = "test-secret-32-bytes-long-key-01";

pub fn store() -> Arc<CookieSessionStore> {
    Arc::new(CookieSessionStore::new(SessionConfig::new(SECRET).unwrap()).unwrap())
}

pub fn jwt_service(store: &CookieSessionStore) -> JwtService {
    JwtService::new(store.config().jwt_config().unwrap())
}

/// The demo users with cheap hashing parameters.
pub fn credentials() -> StaticCredentials {
    StaticCredentials::new(
        [("admin", "admin"), ("user1", "user1"), ("user2", "user2")],
        Argon2Hasher::new(8, 1, 1),
    )
    .unwrap()
}

/// Builds the demo app around `$store`.
macro_rules! test_app {
    ($store:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(crate::common::credentials()))
                .app_data(actix_web::web::Data::new(crate::common::jwt_service(&$store)))
                .wrap(jwt_session::api::actix::SessionMiddleware::new(
                    std::sync::Arc::clone(&$store),
                ))
                .configure(jwt_session::api::actix::demo_routes::<jwt_session::StaticCredentials>),
        )
        .await
    };
}

/// Minimal cookie jar: keeps what `Set-Cookie` sets, drops what it removes.
#[derive(Debug, Default)]
pub struct Browser {
    cookies: BTreeMap<String, String>,
}

impl Browser {
    pub fn absorb<B>(&mut self, resp: &ServiceResponse<B>) {
        for cookie in resp.response().cookies() {
            let removed = cookie.value().is_empty()
                || cookie
                    .max_age()
                    .is_some_and(|age| age <= actix_web::cookie::time::Duration::ZERO);
            if removed {
                self.cookies.remove(cookie.name());
            } else {
                self.cookies
                    .insert(cookie.name().to_owned(), cookie.value().to_owned());
            }
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn set_raw(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_owned(), value.to_owned());
    }

    pub fn get(&self, uri: &str) -> TestRequest {
        self.attach(TestRequest::get().uri(uri))
    }

    pub fn post(&self, uri: &str) -> TestRequest {
        self.attach(TestRequest::post().uri(uri))
    }

    fn attach(&self, mut req: TestRequest) -> TestRequest {
        for (name, value) in &self.cookies {
            req = req.cookie(Cookie::new(name.clone(), value.clone()));
        }
        req
    }
}

pub fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Names of the cookies a response sets or removes.
pub fn set_cookie_names<B>(resp: &ServiceResponse<B>) -> Vec<String> {
    resp.response()
        .cookies()
        .map(|c| c.name().to_owned())
        .collect()
}
