use actix_web::http::header;
use actix_web::{Either, HttpRequest, HttpResponse, web};
use chrono::Local;
use serde_json::{Value, json};

use super::JwtAuthenticatedUser;
use super::middleware::authorization_header;
use crate::actions::{JwtLoginAction, LogoutAction, ValidateTokenAction};
use crate::api::{
    CookieExampleResponse, ErrorResponse, HomeResponse, LoginPageResponse, LoginRequest,
    MeResponse,
};
use crate::credentials::CredentialVerifier;
use crate::jwt::JwtService;
use crate::{AuthError, Sessions};

type LoginForm = Either<web::Form<LoginRequest>, web::Json<LoginRequest>>;

/// Shows pending flashes, then clears every session. Serves `/logout` too.
pub async fn login_page(sessions: Sessions) -> HttpResponse {
    let flashes = pending_flashes(&sessions);

    if let Err(err) = LogoutAction::new().execute(&sessions).await {
        return server_error(err);
    }

    HttpResponse::Ok().json(LoginPageResponse {
        title: "Jwt Login",
        flashes,
    })
}

pub async fn home(
    req: HttpRequest,
    sessions: Sessions,
    jwt: web::Data<JwtService>,
) -> HttpResponse {
    let flashes = pending_flashes(&sessions);

    let state = ValidateTokenAction::new(jwt.get_ref().clone())
        .authenticate(authorization_header(&req), &sessions)
        .await;

    HttpResponse::Ok().json(HomeResponse {
        title: "Main website",
        now: Local::now().format("%Y-%m-%d").to_string(),
        flashes,
        login_flag: state.is_authenticated(),
        username: state.username().unwrap_or_default().to_owned(),
    })
}

/// Checks the submitted credentials and redirects to `/` on success or back
/// to `/login` with a flash explaining the failure.
pub async fn validate_jwt_login<C>(
    form: Result<LoginForm, actix_web::Error>,
    sessions: Sessions,
    credentials: web::Data<C>,
    jwt: web::Data<JwtService>,
) -> HttpResponse
where
    C: CredentialVerifier + 'static,
{
    let form = match form {
        Ok(Either::Left(form)) => form.into_inner(),
        Ok(Either::Right(json)) => json.into_inner(),
        Err(err) => return back_to_login(&sessions, format!("Get login info error: {err}")),
    };

    if form.username.is_empty() || form.password.is_empty() {
        return back_to_login(
            &sessions,
            "Get login info error: username and password are required".to_owned(),
        );
    }

    let action = JwtLoginAction::new(credentials.into_inner(), jwt.get_ref().clone());

    match action.execute(&sessions, &form.username, &form.password).await {
        Ok(response) => {
            flash(&sessions, "success : successful login".to_owned());
            flash(&sessions, format!("username : {}", response.username));
            redirect("/")
        }
        Err(AuthError::InvalidCredentials) => {
            back_to_login(&sessions, "Error : username or password".to_owned())
        }
        Err(err) => back_to_login(&sessions, format!("Error set token string: {err}")),
    }
}

/// Exercises the generic session helpers in one request.
pub async fn cookie_example(sessions: Sessions) -> HttpResponse {
    match cookie_round_trip(&sessions) {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(err) => server_error(err),
    }
}

fn cookie_round_trip(sessions: &Sessions) -> Result<CookieExampleResponse, AuthError> {
    sessions.set("hello", "world")?;
    let session_message = sessions.get_string("hello")?;
    sessions.set("hello", 2017)?;
    let session_new_message = sessions.get_int("hello")?;
    sessions.delete("hello")?;
    let read_again_after_delete = sessions.get_string("hello").unwrap_or_default();

    Ok(CookieExampleResponse {
        session_message,
        session_new_message,
        read_again_after_delete,
        status: 200,
    })
}

pub async fn me(user: JwtAuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(MeResponse {
        username: user.into_inner(),
    })
}

pub async fn ping() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "ping": "pong" }))
}

/// An unreadable flash cookie shows as no flashes.
fn pending_flashes(sessions: &Sessions) -> Vec<Value> {
    sessions.flashes().unwrap_or_else(|err| {
        log::warn!(
            target: "jwt_session::handlers",
            "msg=\"failed to read flashes\" error=\"{err}\""
        );
        Vec::new()
    })
}

fn back_to_login(sessions: &Sessions, message: String) -> HttpResponse {
    flash(sessions, message);
    redirect("/login")
}

fn flash(sessions: &Sessions, message: String) {
    if let Err(err) = sessions.set_flash(message) {
        log::warn!(
            target: "jwt_session::handlers",
            "msg=\"failed to set flash\" error=\"{err}\""
        );
    }
}

fn redirect(location: &'static str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn server_error(err: AuthError) -> HttpResponse {
    log::error!(target: "jwt_session::handlers", "msg=\"session error\" error=\"{err}\"");
    HttpResponse::InternalServerError().json(ErrorResponse::from(err))
}
