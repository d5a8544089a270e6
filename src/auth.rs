//! Where a request's token comes from, and what a validation outcome means.

use crate::{AuthError, Sessions};

/// Outcome of validating a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    Authenticated(String),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Authenticated(username) => Some(username),
            Self::Unauthenticated => None,
        }
    }
}

impl From<Result<String, AuthError>> for AuthState {
    fn from(result: Result<String, AuthError>) -> Self {
        match result {
            Ok(username) => Self::Authenticated(username),
            Err(_) => Self::Unauthenticated,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    /// The `Authorization` header, with or without a `Bearer ` prefix.
    AuthorizationHeader,
    /// The token session cookie.
    TokenCookie,
}

/// Ordered list of places to look for a token. The first source that yields
/// a non-empty token wins; the token is not checked here, so an invalid
/// header token is not retried against the cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLookup {
    sources: &'static [TokenSource],
}

impl TokenLookup {
    /// Header first, then cookie. Used by the validation action and the
    /// `JwtAuthenticatedUser` extractor.
    pub const HEADER_THEN_COOKIE: Self = Self {
        sources: &[TokenSource::AuthorizationHeader, TokenSource::TokenCookie],
    };

    pub const HEADER_ONLY: Self = Self {
        sources: &[TokenSource::AuthorizationHeader],
    };

    pub const COOKIE_ONLY: Self = Self {
        sources: &[TokenSource::TokenCookie],
    };

    pub fn sources(&self) -> &'static [TokenSource] {
        self.sources
    }

    /// Finds the token for a request.
    ///
    /// `authorization` is the raw `Authorization` header value, if any.
    ///
    /// # Errors
    ///
    /// `AuthError::TokenMissing` when no source has a token, and
    /// `AuthError::TokenInvalid` when the token cookie cannot be read.
    pub fn find(
        &self,
        authorization: Option<&str>,
        sessions: &Sessions,
    ) -> Result<(String, TokenSource), AuthError> {
        for source in self.sources {
            match source {
                TokenSource::AuthorizationHeader => {
                    if let Some(token) = authorization.and_then(bearer_token) {
                        return Ok((token.to_owned(), *source));
                    }
                }
                TokenSource::TokenCookie => match sessions.token_string() {
                    Ok(token) => return Ok((token, *source)),
                    Err(AuthError::TokenMissing) => {}
                    Err(e) => {
                        log::warn!(
                            target: "jwt_session::auth",
                            "msg=\"unreadable token cookie\" error=\"{e}\""
                        );
                        return Err(AuthError::TokenInvalid);
                    }
                },
            }
        }

        Err(AuthError::TokenMissing)
    }
}

impl Default for TokenLookup {
    fn default() -> Self {
        Self::HEADER_THEN_COOKIE
    }
}

/// Strips an optional, case-insensitive `Bearer` scheme. Blank values, and a
/// scheme with nothing after it, yield `None`.
pub fn bearer_token(header: &str) -> Option<&str> {
    const SCHEME: &str = "bearer";

    let header = header.trim_start();
    let token = match (header.get(..SCHEME.len()), header.get(SCHEME.len()..)) {
        (Some(scheme), Some(rest))
            if scheme.eq_ignore_ascii_case(SCHEME)
                && (rest.is_empty() || rest.starts_with(char::is_whitespace)) =>
        {
            rest
        }
        _ => header,
    };

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
