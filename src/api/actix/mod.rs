//! actix-web integration: session middleware, extractors and demo routes.

mod handlers;
mod jwt_middleware;
mod middleware;
mod routes;
mod session_middleware;

pub use jwt_middleware::JwtAuthenticatedUser;
pub use middleware::{AuthenticationError, authorization_header};
pub use routes::demo_routes;
pub use session_middleware::{SessionMiddleware, SessionMiddlewareService};
