use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::AuthError;

// Request DTOs

/// Login form, accepted as `application/x-www-form-urlencoded` or JSON.
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// Response DTOs

#[derive(Debug, Serialize)]
pub struct LoginPageResponse {
    pub title: &'static str,
    pub flashes: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub title: &'static str,
    /// Today's date as `YYYY-MM-DD`.
    pub now: String,
    pub flashes: Vec<Value>,
    pub login_flag: bool,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct CookieExampleResponse {
    #[serde(rename = "session message")]
    pub session_message: String,
    #[serde(rename = "session new message")]
    pub session_new_message: i64,
    #[serde(rename = "session read again after delete")]
    pub read_again_after_delete: String,
    pub status: u16,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl ErrorResponse {
    pub fn code(err: &AuthError) -> &'static str {
        match err {
            AuthError::SessionRetrieve { .. } => "SESSION_RETRIEVE_ERROR",
            AuthError::SessionSave { .. } => "SESSION_SAVE_ERROR",
            AuthError::Conversion { .. } => "CONVERSION_ERROR",
            AuthError::ValueNotFound(_) => "VALUE_NOT_FOUND",
            AuthError::TokenMissing => "TOKEN_MISSING",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::TokenMissingSubject => "TOKEN_MISSING_SUBJECT",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::PasswordHashError => "PASSWORD_HASH_ERROR",
            AuthError::ConfigurationError(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        ErrorResponse {
            code: Self::code(&err).to_owned(),
            error: err.to_string(),
        }
    }
}
