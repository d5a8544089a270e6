use serde_json::Value;

use super::CookieOptions;

/// A value to write into a session.
///
/// Usually only `key` and `value` are set; an empty `session_name` targets
/// the default session and `None` options apply the configured defaults.
///
/// ```rust
/// use jwt_session::{CookieOptions, Message};
///
/// let message = Message::new("theme", "dark")
///     .in_session("prefs")
///     .with_options(CookieOptions::default().with_max_age(86_400));
/// assert_eq!(message.session_name, "prefs");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub key: String,
    pub value: Value,
    pub session_name: String,
    pub options: Option<CookieOptions>,
}

impl Message {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            session_name: String::new(),
            options: None,
        }
    }

    #[must_use]
    pub fn in_session(mut self, session_name: impl Into<String>) -> Self {
        self.session_name = session_name.into();
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: CookieOptions) -> Self {
        self.options = Some(options);
        self
    }
}

/// A one-time value for a flash session. An empty `session_name` targets the
/// default flash session.
#[derive(Debug, Clone, PartialEq)]
pub struct Flash {
    pub value: Value,
    pub session_name: String,
}

impl Flash {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            session_name: String::new(),
        }
    }

    #[must_use]
    pub fn in_session(mut self, session_name: impl Into<String>) -> Self {
        self.session_name = session_name.into();
        self
    }
}
