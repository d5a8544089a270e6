use async_trait::async_trait;

use crate::events::{AuthEvent, Listener};

/// Logs all authentication events through the `log` facade.
pub struct LoggingListener {
    level: log::Level,
}

impl LoggingListener {
    /// Creates a listener logging at INFO level.
    pub fn new() -> Self {
        Self {
            level: log::Level::Info,
        }
    }

    pub fn with_level(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &AuthEvent) {
        match event {
            AuthEvent::LoginSuccess { username, .. } => log::log!(
                target: "jwt_session::events",
                self.level,
                "event={} username=\"{username}\"",
                event.name()
            ),
            AuthEvent::LoginFailed {
                username, reason, ..
            } => log::log!(
                target: "jwt_session::events",
                self.level,
                "event={} username=\"{username}\" reason=\"{reason}\"",
                event.name()
            ),
            AuthEvent::LogoutSuccess { .. } => log::log!(
                target: "jwt_session::events",
                self.level,
                "event={}",
                event.name()
            ),
            AuthEvent::TokenRejected { reason, .. } => log::log!(
                target: "jwt_session::events",
                self.level,
                "event={} reason=\"{reason}\"",
                event.name()
            ),
        }
    }
}
