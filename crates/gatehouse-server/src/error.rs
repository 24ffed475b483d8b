use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gatehouse_core::error::GatehouseError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 400 Bad Request errors
// ---------------------------------------------------------------------------

/// Carries an explicit 400 for request bodies that never reached the domain
/// layer, such as an unreadable form.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }

    fn status(&self) -> StatusCode {
        if self.0.downcast_ref::<BadRequestError>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        let Some(e) = self.0.downcast_ref::<GatehouseError>() else {
            return StatusCode::INTERNAL_SERVER_ERROR;
        };
        match e {
            GatehouseError::InvalidUsername(_) | GatehouseError::InvalidPassword(_) => {
                StatusCode::BAD_REQUEST
            }
            GatehouseError::UsernameTaken(_) => StatusCode::CONFLICT,
            GatehouseError::InvalidCredentials | GatehouseError::InvalidSession(_) => {
                StatusCode::UNAUTHORIZED
            }
            GatehouseError::UserNotFound(_) => StatusCode::NOT_FOUND,
            GatehouseError::MissingEnv(_)
            | GatehouseError::InvalidEnv { .. }
            | GatehouseError::InvalidKey(_)
            | GatehouseError::InvalidConfig(_)
            | GatehouseError::PasswordHash(_)
            | GatehouseError::Task(_)
            | GatehouseError::Io(_)
            | GatehouseError::Yaml(_)
            | GatehouseError::Json(_)
            | GatehouseError::Database(_)
            | GatehouseError::Migrate(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %format!("{:#}", self.0), "internal error");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
