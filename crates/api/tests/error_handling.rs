//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no router or
//! database is involved.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use taskboard_api::error::AppError;
use taskboard_core::error::{CoreError, ErrorCode};

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Not found
// ---------------------------------------------------------------------------

#[tokio::test]
async fn project_not_found_returns_404_with_specific_code() {
    let id = uuid::Uuid::new_v4();
    let (status, json) = error_to_response(CoreError::project_not_found(id).into()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "PROJECT_NOT_FOUND");
    assert_eq!(json["error"], format!("Project with id {id} not found"));
}

#[tokio::test]
async fn task_not_found_returns_404_with_specific_code() {
    let id = uuid::Uuid::new_v4();
    let (status, json) = error_to_response(CoreError::task_not_found(id).into()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "TASK_NOT_FOUND");
}

#[tokio::test]
async fn row_not_found_returns_generic_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn date_validation_errors_return_400_with_their_code() {
    let err = CoreError::Validation {
        message: "End date must be after or equal to start date.".into(),
        code: ErrorCode::InvalidDateRange,
    };

    let (status, json) = error_to_response(err.into()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_DATE_RANGE");
    assert_eq!(json["error"], "End date must be after or equal to start date.");
}

#[tokio::test]
async fn field_validation_error_returns_400() {
    let (status, json) =
        error_to_response(CoreError::validation("name must not be empty").into()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "name must not be empty");
}

// ---------------------------------------------------------------------------
// Internal errors are sanitized
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unexpected_database_error_returns_500() {
    let err = AppError::Database(sqlx::Error::PoolTimedOut);

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}
