use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};

use crate::AuthError;
use crate::api::ErrorResponse;

/// Extractor failure carrying the underlying [`AuthError`].
///
/// Token problems and bad credentials answer 401; anything else is a
/// server-side fault and answers 500.
#[derive(Debug)]
pub struct AuthenticationError {
    pub error: AuthError,
}

impl From<AuthError> for AuthenticationError {
    fn from(error: AuthError) -> Self {
        Self { error }
    }
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        if self.error.is_token_error() || self.error == AuthError::InvalidCredentials {
            actix_web::http::StatusCode::UNAUTHORIZED
        } else {
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::from(self.error.clone()))
    }
}

/// Raw `Authorization` header value, if present and valid UTF-8.
pub fn authorization_header(req: &HttpRequest) -> Option<&str> {
    req.headers().get(header::AUTHORIZATION)?.to_str().ok()
}

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;
    use actix_web::test::TestRequest;

    use super::*;

    #[test]
    fn test_status_codes() {
        let unauthorized = [
            AuthError::TokenMissing,
            AuthError::TokenInvalid,
            AuthError::TokenExpired,
            AuthError::TokenMissingSubject,
            AuthError::InvalidCredentials,
        ];
        for error in unauthorized {
            assert_eq!(
                AuthenticationError::from(error).status_code(),
                StatusCode::UNAUTHORIZED
            );
        }

        let err = AuthenticationError::from(AuthError::ConfigurationError("x".to_owned()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_authorization_header() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc"))
            .to_http_request();
        assert_eq!(authorization_header(&req), Some("Bearer abc"));

        let req = TestRequest::default().to_http_request();
        assert_eq!(authorization_header(&req), None);
    }
}
