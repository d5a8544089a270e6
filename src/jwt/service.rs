use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::{JwtClaims, JwtConfig};
use crate::AuthError;

/// Something that can mint a token for an authenticated user.
///
/// Implemented by [`JwtService`]; the login action only depends on this so
/// tests can observe whether a token was issued.
pub trait TokenIssuer {
    fn issue(&self, username: &str, validity: Duration) -> Result<String, AuthError>;
}

/// Service for encoding and decoding session tokens.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        let encoding_key = EncodingKey::from_secret(secret);
        let decoding_key = DecodingKey::from_secret(secret);

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Encodes a username into a token valid for the configured expiry.
    pub fn encode(&self, username: &str) -> Result<String, AuthError> {
        self.encode_with_validity(username, self.config.expiry())
    }

    /// Encodes a username into a token valid for `validity` from now.
    ///
    /// # Errors
    /// `AuthError::ConfigurationError` if `now + validity` is not a
    /// representable time.
    pub fn encode_with_validity(
        &self,
        username: &str,
        validity: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: Some(username.to_owned()),
            exp: expires_at(now, validity)?.timestamp(),
            iat: now.timestamp(),
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| {
                log::error!(target: "jwt_session::jwt", "msg=\"token encoding failed\" error=\"{e}\"");
                AuthError::TokenInvalid
            })
    }

    /// Decodes and verifies a token, returning the claims.
    pub fn decode(&self, token: &str) -> Result<JwtClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.config.leeway;
        validation.set_required_spec_claims(&["exp"]);

        let token_data = jsonwebtoken::decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            })?;

        Ok(token_data.claims)
    }

    /// Verifies a token and returns the username it was issued for.
    pub fn validate(&self, token: &str) -> Result<String, AuthError> {
        let claims = self.decode(token)?;
        claims.username().map(str::to_owned)
    }

    pub fn expiry(&self) -> Duration {
        self.config.expiry()
    }
}

/// `now + validity`, or a configuration error when that overflows.
pub(crate) fn expires_at(
    now: DateTime<Utc>,
    validity: Duration,
) -> Result<DateTime<Utc>, AuthError> {
    now.checked_add_signed(validity).ok_or_else(|| {
        AuthError::ConfigurationError(format!("token validity {validity} is out of range"))
    })
}

impl TokenIssuer for JwtService {
    fn issue(&self, username: &str, validity: Duration) -> Result<String, AuthError> {
        self.encode_with_validity(username, validity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-32-bytes-long-key-01";

    fn service() -> JwtService {
        JwtService::new(JwtConfig::new(SECRET).unwrap())
    }

    fn sign(claims: &serde_json::Value, secret: &str) -> String {
        let key = EncodingKey::from_secret(secret.as_bytes());
        jsonwebtoken::encode(&Header::default(), claims, &key).unwrap()
    }

    #[test]
    fn test_encode_validate() {
        let service = service();
        let token = service.encode("admin").unwrap();

        assert_eq!(token.split('.').count(), 3);
        assert_eq!(service.validate(&token).unwrap(), "admin");
    }

    #[test]
    fn test_claims_carry_validity() {
        let service = service();
        let token = service
            .encode_with_validity("user1", Duration::minutes(10))
            .unwrap();
        let claims = service.decode(&token).unwrap();

        assert_eq!(claims.exp - claims.iat, 600);
        assert_eq!(claims.sub.as_deref(), Some("user1"));
    }

    #[test]
    fn test_unrepresentable_expiry_is_an_error() {
        let result = service().encode_with_validity("admin", Duration::days(100_000_000));
        assert!(matches!(result, Err(AuthError::ConfigurationError(_))));
    }

    #[test]
    fn test_expiry_is_capped() {
        let config = JwtConfig::new(SECRET)
            .unwrap()
            .with_expiry(Duration::days(100_000_000));
        assert_eq!(
            config.expiry(),
            Duration::days(crate::config::MAX_TOKEN_VALIDITY_DAYS)
        );

        let service = JwtService::new(config);
        let token = service.encode("admin").unwrap();
        assert_eq!(service.validate(&token).unwrap(), "admin");
    }

    #[test]
    fn test_invalid_token() {
        assert_eq!(service().decode("not-a-token"), Err(AuthError::TokenInvalid));
        assert_eq!(service().validate(""), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_wrong_secret() {
        let other = JwtService::new(JwtConfig::new("test-secret-32-bytes-long-key-02").unwrap());
        let token = other.encode("admin").unwrap();

        assert_eq!(service().validate(&token), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp();
        let token = sign(
            &serde_json::json!({ "sub": "admin", "iat": now - 7200, "exp": now - 3600 }),
            SECRET,
        );

        assert_eq!(service().validate(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_just_expired_token_without_leeway() {
        let now = Utc::now().timestamp();
        let token = sign(
            &serde_json::json!({ "sub": "admin", "iat": now - 60, "exp": now - 5 }),
            SECRET,
        );

        assert_eq!(service().validate(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_non_string_subject_rejected() {
        let now = Utc::now().timestamp();
        let token = sign(
            &serde_json::json!({ "sub": 42, "iat": now, "exp": now + 3600 }),
            SECRET,
        );

        assert_eq!(service().validate(&token), Err(AuthError::TokenMissingSubject));
    }

    #[test]
    fn test_missing_subject_rejected() {
        let now = Utc::now().timestamp();
        let token = sign(&serde_json::json!({ "iat": now, "exp": now + 3600 }), SECRET);

        assert_eq!(service().validate(&token), Err(AuthError::TokenMissingSubject));
    }

    #[test]
    fn test_secret_too_short() {
        let err = JwtConfig::new("short").unwrap_err();
        assert!(
            matches!(err, AuthError::ConfigurationError(ref msg) if msg.contains("32 bytes")),
            "Expected ConfigurationError with '32 bytes' message"
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", service());
        assert!(!debug.contains(SECRET));
    }
}
