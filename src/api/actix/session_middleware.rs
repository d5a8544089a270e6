//! Request-scope middleware and the `Sessions` extractor.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::cookie::Cookie;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::{LocalBoxFuture, Ready, ok, ready};

use super::middleware::AuthenticationError;
use crate::{AuthError, CookieSessionStore, Sessions};

/// Opens a session scope for every request and writes the staged session
/// cookies onto the response.
///
/// The scope is removed from the request once the response is produced. If
/// the inner service fails or the response future is dropped, the scope goes
/// away with the request's extensions when actix releases the request.
///
/// ```rust,ignore
/// let store = Arc::new(CookieSessionStore::new(config)?);
///
/// App::new()
///     .wrap(SessionMiddleware::new(Arc::clone(&store)))
///     .route("/", web::get().to(handler))
/// ```
#[derive(Clone)]
pub struct SessionMiddleware {
    store: Arc<CookieSessionStore>,
}

impl SessionMiddleware {
    #[must_use]
    pub fn new(store: Arc<CookieSessionStore>) -> Self {
        Self { store }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Transform = SessionMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddlewareService {
            service,
            store: Arc::clone(&self.store),
        })
    }
}

pub struct SessionMiddlewareService<S> {
    service: S,
    store: Arc<CookieSessionStore>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let cookies = request_cookies(&req);
        let sessions = Sessions::open(Arc::clone(&self.store), cookies);
        req.extensions_mut().insert(sessions.clone());

        // The router needs sole ownership of the request, so no clone of it
        // may be held across the inner call.
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            res.request().extensions_mut().remove::<Sessions>();

            for cookie in sessions.response_cookies() {
                if let Err(e) = res.response_mut().add_cookie(&cookie) {
                    log::error!(
                        target: "jwt_session::middleware",
                        "msg=\"failed to write session cookie\" cookie=\"{}\" error=\"{e}\"",
                        cookie.name()
                    );
                }
            }

            Ok(res)
        })
    }
}

fn request_cookies(req: &ServiceRequest) -> Vec<Cookie<'static>> {
    match req.cookies() {
        Ok(cookies) => cookies.iter().cloned().collect(),
        Err(e) => {
            log::warn!(
                target: "jwt_session::middleware",
                "msg=\"unparseable cookie header\" error=\"{e}\""
            );
            Vec::new()
        }
    }
}

/// Fails with a configuration error when [`SessionMiddleware`] is not installed.
impl FromRequest for Sessions {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(req.extensions().get::<Sessions>().cloned().ok_or_else(|| {
            AuthenticationError::from(AuthError::ConfigurationError(
                "SessionMiddleware is not installed".to_owned(),
            ))
        }))
    }
}
