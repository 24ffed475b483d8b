use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Form;
use gatehouse_core::session::Session;
use gatehouse_core::user::User;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// POST /auth/register — create an account and log it in.
pub async fn register(
    State(app): State<AppState>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(body) = form.map_err(form_error)?;
    tracing::info!(username = %body.username, "registering a new account");
    let user = app.users.insert(&body.username, &body.password).await?;
    start_session(&app, &user, "logged in after registration")
}

/// POST /auth/login — check credentials and issue a session cookie.
pub async fn login(
    State(app): State<AppState>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Result<Response, AppError> {
    let Form(body) = form.map_err(form_error)?;
    tracing::info!(username = %body.username, "logging in");
    let user = match app.users.get_and_verify(&body.username, &body.password).await {
        Ok(user) => user,
        Err(e) => {
            tracing::info!(username = %body.username, error = %e, "login rejected");
            return Err(e.into());
        }
    };
    start_session(&app, &user, "logged in")
}

/// POST /auth/logout — clear the session cookie.
pub async fn logout(State(app): State<AppState>) -> Response {
    tracing::info!("logging out");
    redirect_home(Session::cookie_logout(&app.config.session))
}

fn start_session(app: &AppState, user: &User, message: &str) -> Result<Response, AppError> {
    let session = Session::create(user, app.config.session.ttl())?;
    let cookie = session.cookie_login(&app.crypto, &app.config.session)?;
    tracing::info!(
        user_id = user.id,
        username = %user.username,
        session_id = %session.id,
        "{}",
        message
    );
    Ok(redirect_home(cookie))
}

fn form_error(rejection: FormRejection) -> AppError {
    tracing::info!(error = %rejection.body_text(), "unreadable credentials form");
    AppError::bad_request(rejection.body_text())
}

fn redirect_home(cookie: String) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(LOCATION, "/".to_string()), (SET_COOKIE, cookie)],
    )
        .into_response()
}
