use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::AuthError;

/// Claims embedded in a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject - the username. `None` when absent or not a string.
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub: Option<String>,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at time (Unix timestamp).
    pub iat: i64,
}

impl JwtClaims {
    /// Returns the username carried by the token.
    pub fn username(&self) -> Result<&str, AuthError> {
        match self.sub.as_deref() {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(AuthError::TokenMissingSubject),
        }
    }
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_string_subject_is_none() {
        let claims: JwtClaims =
            serde_json::from_str(r#"{"sub":42,"exp":10,"iat":1}"#).unwrap();
        assert_eq!(claims.sub, None);
        assert_eq!(claims.username(), Err(AuthError::TokenMissingSubject));
    }

    #[test]
    fn test_missing_subject_is_none() {
        let claims: JwtClaims = serde_json::from_str(r#"{"exp":10,"iat":1}"#).unwrap();
        assert_eq!(claims.username(), Err(AuthError::TokenMissingSubject));
    }

    #[test]
    fn test_username() {
        let claims: JwtClaims =
            serde_json::from_str(r#"{"sub":"admin","exp":10,"iat":1}"#).unwrap();
        assert_eq!(claims.username().unwrap(), "admin");
    }
}
