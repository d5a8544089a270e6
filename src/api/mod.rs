//! HTTP surface: request/response types and the actix-web integration.

mod types;

pub use types::*;

pub mod actix;
