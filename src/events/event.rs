use chrono::{DateTime, Utc};

/// Authentication events emitted by the login, validation and logout actions.
///
/// If no listeners are registered, they are silently ignored. Register
/// listeners via [`register_event_listeners`](crate::register_event_listeners).
#[derive(Debug, Clone)]
pub enum AuthEvent {
    LoginSuccess {
        username: String,
        at: DateTime<Utc>,
    },
    LoginFailed {
        username: String,
        reason: String,
        at: DateTime<Utc>,
    },
    LogoutSuccess {
        at: DateTime<Utc>,
    },
    /// A request presented a token that failed validation, or none at all.
    TokenRejected {
        reason: String,
        at: DateTime<Utc>,
    },
}

impl AuthEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginSuccess { .. } => "auth.login.success",
            Self::LoginFailed { .. } => "auth.login.failed",
            Self::LogoutSuccess { .. } => "auth.logout.success",
            Self::TokenRejected { .. } => "auth.token.rejected",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::LoginSuccess { at, .. }
            | Self::LoginFailed { at, .. }
            | Self::LogoutSuccess { at }
            | Self::TokenRejected { at, .. } => *at,
        }
    }
}
