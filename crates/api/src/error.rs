use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskboard_core::error::{CoreError, ErrorCode};

/// Application-level error type for domain services and HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`sqlx::Error`] for storage
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskboard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for service and handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// A body that failed to deserialize (unknown enum value, malformed id,
/// missing field, wrong content type) is a field validation failure.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::validation(rejection.body_text()))
    }
}

/// A path segment that is not a valid id is a field validation failure.
impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Core(CoreError::validation(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(CoreError::NotFound { entity, id, code }) => (
                StatusCode::NOT_FOUND,
                code.as_str(),
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation { message, code }) => {
                (StatusCode::BAD_REQUEST, code.as_str(), message.clone())
            }
            AppError::Database(err) => classify_sqlx_error(err),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound.as_str(),
            "Resource not found".to_string(),
        ),
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
