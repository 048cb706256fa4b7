//! Parsing and validation of user-supplied calendar dates.
//!
//! Accepted inputs:
//! - RFC 3339 timestamps (`2024-06-30T12:00:00Z`, `2024-06-30T12:00:00+02:00`)
//! - Naive date-times without an offset (`2024-06-30T12:00:00`), read as UTC
//! - Bare dates (`2024-06-30`), read as midnight UTC

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::error::{CoreError, ErrorCode};
use crate::types::Timestamp;

/// Parse a timestamp in any of the accepted formats. Returns `None` if the
/// input matches none of them.
pub fn parse_timestamp(value: &str) -> Option<Timestamp> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a task due date, failing with `INVALID_DUE_DATE`.
pub fn parse_due_date(value: &str) -> Result<Timestamp, CoreError> {
    parse_timestamp(value).ok_or_else(|| CoreError::Validation {
        message: "Invalid due date format.".to_string(),
        code: ErrorCode::InvalidDueDate,
    })
}

/// Parse a named project date field, failing with `INVALID_DATE`.
pub fn parse_date_field(field: &str, value: &str) -> Result<Timestamp, CoreError> {
    parse_timestamp(value).ok_or_else(|| CoreError::Validation {
        message: format!("Invalid {field} format."),
        code: ErrorCode::InvalidDate,
    })
}

/// Enforce `end >= start`, failing with `INVALID_DATE_RANGE`.
pub fn validate_date_range(start: Timestamp, end: Timestamp) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation {
            message: "end_date must not be before start_date.".to_string(),
            code: ErrorCode::InvalidDateRange,
        });
    }
    Ok(())
}
