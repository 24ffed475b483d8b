pub mod api;
pub mod auth;
pub mod pages;

use axum::http::StatusCode;

/// Fallback for unknown routes: 404 with an empty body.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
