use std::future::Future;
use std::pin::Pin;

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use super::middleware::{AuthenticationError, authorization_header};
use crate::actions::ValidateTokenAction;
use crate::jwt::JwtService;
use crate::{AuthError, Sessions};

/// Username of a request carrying a valid token.
///
/// The token is taken from the `Authorization` header, or from the token
/// session cookie when the header is absent. Requires `web::Data<JwtService>`
/// and [`SessionMiddleware`](super::SessionMiddleware).
///
/// # Example
/// ```ignore
/// async fn me(user: JwtAuthenticatedUser) -> impl Responder {
///     format!("Hello, {}!", user.username())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtAuthenticatedUser {
    username: String,
}

impl JwtAuthenticatedUser {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn into_inner(self) -> String {
        self.username
    }
}

impl FromRequest for JwtAuthenticatedUser {
    type Error = AuthenticationError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let authorization = authorization_header(req).map(ToOwned::to_owned);

        let jwt_service = req
            .app_data::<web::Data<JwtService>>()
            .map(|data| data.get_ref().clone());

        let sessions = Sessions::from_request(req, payload).into_inner();

        Box::pin(async move {
            let jwt_service = jwt_service.ok_or_else(|| {
                AuthenticationError::from(AuthError::ConfigurationError(
                    "JwtService not found".to_owned(),
                ))
            })?;
            let sessions = sessions?;

            let username = ValidateTokenAction::new(jwt_service)
                .execute(authorization.as_deref(), &sessions)
                .await?;

            Ok(JwtAuthenticatedUser { username })
        })
    }
}
