use actix_web::web;

use super::handlers;
use crate::credentials::CredentialVerifier;

/// Configures the demo routes.
///
/// Requires [`SessionMiddleware`](super::SessionMiddleware) on the app, plus
/// `web::Data<C>` and `web::Data<JwtService>`.
///
/// Routes:
/// - `GET /login` - pending flashes, then clears all sessions
/// - `GET /logout` - same as `/login`
/// - `POST /validate-jwt-login` - form or JSON login, redirects
/// - `GET /`, `/index`, `/index.html` - home with login state
/// - `GET /some-cookie-example` - generic session helpers
/// - `GET /ping` - liveness
/// - `GET /me` - current user, token required
pub fn demo_routes<C>(cfg: &mut web::ServiceConfig)
where
    C: CredentialVerifier + 'static,
{
    cfg.route("/login", web::get().to(handlers::login_page))
        .route("/logout", web::get().to(handlers::login_page))
        .route(
            "/validate-jwt-login",
            web::post().to(handlers::validate_jwt_login::<C>),
        )
        .route("/", web::get().to(handlers::home))
        .route("/index", web::get().to(handlers::home))
        .route("/index.html", web::get().to(handlers::home))
        .route("/some-cookie-example", web::get().to(handlers::cookie_example))
        .route("/ping", web::get().to(handlers::ping))
        .route("/me", web::get().to(handlers::me));
}
