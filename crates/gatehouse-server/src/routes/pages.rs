use axum::extract::State;
use axum::response::Html;
use gatehouse_core::user::User;
use serde::Serialize;

use crate::error::AppError;
use crate::extract::MaybeSession;
use crate::state::AppState;

#[derive(Serialize)]
struct IndexContext<'a> {
    user: Option<&'a User>,
}

/// GET / — landing page showing login state.
pub async fn index(
    State(app): State<AppState>,
    MaybeSession(login): MaybeSession,
) -> Result<Html<String>, AppError> {
    let context = tera::Context::from_serialize(IndexContext {
        user: login.as_ref().map(|l| &l.user),
    })?;
    Ok(Html(app.templates.render("index.html", &context)?))
}
