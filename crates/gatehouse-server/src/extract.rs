use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use chrono::Utc;
use gatehouse_core::error::GatehouseError;
use gatehouse_core::session::Session;
use gatehouse_core::user::User;

use crate::error::AppError;
use crate::state::AppState;

/// A valid session together with the account it belongs to.
#[derive(Debug, Clone)]
pub struct LoggedIn {
    pub session: Session,
    pub user: User,
}

/// The visitor's login, if they carry a valid cookie for an existing account.
///
/// A forged, garbled or expired cookie, or one whose account has since been
/// removed, is logged and treated as no session so the visitor can still
/// reach the login form. Only a failing user store rejects the request.
#[derive(Debug, Clone)]
pub struct MaybeSession(pub Option<LoggedIn>);

impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session) = find_session(parts, state) else {
            tracing::info!("user is not logged in");
            return Ok(Self(None));
        };

        match state.users.require(session.user.id).await {
            Ok(user) => {
                tracing::info!(
                    session_id = %session.id,
                    user_id = user.id,
                    "user is logged in"
                );
                Ok(Self(Some(LoggedIn { session, user })))
            }
            Err(GatehouseError::UserNotFound(id)) => {
                tracing::warn!(
                    session_id = %session.id,
                    user_id = id,
                    "ignoring session for missing account"
                );
                Ok(Self(None))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn find_session(parts: &Parts, state: &AppState) -> Option<Session> {
    let cookie_name = &state.config.session.cookie_name;
    let now = Utc::now();

    // HTTP/2 clients may split cookies across several headers.
    for header in parts.headers.get_all(COOKIE) {
        let Ok(header) = header.to_str() else {
            continue;
        };
        match Session::from_cookie_header(header, cookie_name, &state.crypto, now) {
            Ok(Some(session)) => return Some(session),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "ignoring session cookie");
                return None;
            }
        }
    }
    None
}
