//! HS256 session tokens.
//!
//! Tokens carry `iat`, `exp` and `sub` (the username) and are verified against
//! the same secret that encrypts the session cookies.
//!
//! # Example
//!
//! ```rust
//! use jwt_session::jwt::{JwtConfig, JwtService};
//!
//! let config = JwtConfig::new("a-secret-key-of-at-least-32-bytes!!")
//!     .unwrap()
//!     .with_expiry(chrono::Duration::minutes(30));
//! let service = JwtService::new(config);
//!
//! let token = service.encode("admin").unwrap();
//! assert_eq!(service.validate(&token).unwrap(), "admin");
//! ```

mod claims;
mod config;
mod service;

pub use claims::JwtClaims;
pub use config::JwtConfig;
pub use service::{JwtService, TokenIssuer};
pub(crate) use service::expires_at;
