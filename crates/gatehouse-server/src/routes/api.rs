use axum::Json;

use crate::extract::MaybeSession;

/// GET /api/session — who is logged in, as JSON.
pub async fn get_session(MaybeSession(login): MaybeSession) -> Json<serde_json::Value> {
    let Some(login) = login else {
        return Json(serde_json::json!({
            "user": null,
            "expires_at": null,
        }));
    };

    Json(serde_json::json!({
        "user": {
            "id": login.user.id,
            "username": login.user.username,
            "created_at": login.user.created_at,
        },
        "session_id": login.session.id,
        "expires_at": login.session.expires_at,
    }))
}

/// GET /healthz — liveness check.
pub async fn healthz() -> &'static str {
    "ok"
}
