//! Request extractors whose rejections go through [`AppError`], so malformed
//! bodies and ids get the same `{error, code}` JSON as every other failure.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// [`axum::Json`] with rejections mapped to `400 VALIDATION_ERROR`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// [`axum::extract::Path`] with rejections mapped to `400 VALIDATION_ERROR`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);
