#![allow(
    clippy::print_stdout,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::str_to_string,
    clippy::doc_markdown
)]

//! Session Server Example
//!
//! Login, logout, flash messages and generic cookie sessions, all stored in
//! encrypted cookies. Nothing is kept server-side.
//!
//! Run with: `cargo run --example session_server`
//!
//! Test endpoints:
//!   curl -i -X POST http://localhost:8080/validate-jwt-login \
//!     -d 'username=admin&password=admin' -c cookies.txt
//!
//!   curl http://localhost:8080/ -b cookies.txt -c cookies.txt
//!
//!   curl http://localhost:8080/me -b cookies.txt
//!
//!   curl http://localhost:8080/logout -b cookies.txt -c cookies.txt

use std::sync::Arc;

use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use jwt_session::api::actix::{SessionMiddleware, demo_routes};
use jwt_session::events::listeners::LoggingListener;
use jwt_session::jwt::JwtService;
use jwt_session::{
    CookieSessionStore, SessionConfig, StaticCredentials, StoreCell, register_event_listeners,
};
use tracing_subscriber::EnvFilter;

static STORE: StoreCell = StoreCell::new();

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    register_event_listeners(|registry| {
        registry.listen(LoggingListener::new());
    });

    // In production, set JWT_SESSION_SECRET
    let store: Arc<CookieSessionStore> = STORE
        .get_or_init(|| SessionConfig::from_env_or("your-super-secret-key-at-least-32-bytes!"))
        .map_err(std::io::Error::other)?;

    let jwt_service = JwtService::new(
        store
            .config()
            .jwt_config()
            .expect("secret was validated by the store"),
    );

    // admin/admin, user1/user1, user2/user2
    let credentials = StaticCredentials::demo().expect("hashing demo passwords");
    let credentials = web::Data::new(credentials);
    let jwt_service = web::Data::new(jwt_service);

    println!("Starting session server on http://localhost:8080");
    println!();
    println!("Endpoints:");
    println!("  GET  /login               - Flashes, then clears all sessions");
    println!("  GET  /logout              - Same as /login");
    println!("  POST /validate-jwt-login  - Login with username/password");
    println!("  GET  /                    - Home, shows login state");
    println!("  GET  /some-cookie-example - Generic session helpers");
    println!("  GET  /me                  - Current user, token required");
    println!("  GET  /ping                - Liveness");
    println!();
    println!("Test users: admin/admin, user1/user1, user2/user2");

    HttpServer::new(move || {
        App::new()
            .app_data(credentials.clone())
            .app_data(jwt_service.clone())
            .wrap(SessionMiddleware::new(Arc::clone(&store)))
            .wrap(Logger::default())
            .configure(demo_routes::<StaticCredentials>)
    })
    .bind(("127.0.0.1", 8080))?
    .shutdown_timeout(5)
    .run()
    .await
}
