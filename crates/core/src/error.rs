use serde::Serialize;

use crate::types::EntityId;

/// Machine-readable cause attached to every domain error.
///
/// Clients (and tests) match on the code rather than the message, so the
/// serialized names are part of the public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ProjectNotFound,
    TaskNotFound,
    ValidationError,
    InvalidDueDate,
    InvalidDate,
    InvalidDateRange,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ProjectNotFound => "PROJECT_NOT_FOUND",
            ErrorCode::TaskNotFound => "TASK_NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidDueDate => "INVALID_DUE_DATE",
            ErrorCode::InvalidDate => "INVALID_DATE",
            ErrorCode::InvalidDateRange => "INVALID_DATE_RANGE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound {
        entity: &'static str,
        id: EntityId,
        code: ErrorCode,
    },

    #[error("Validation failed: {message}")]
    Validation { message: String, code: ErrorCode },
}

impl CoreError {
    pub fn project_not_found(id: EntityId) -> Self {
        CoreError::NotFound {
            entity: "Project",
            id,
            code: ErrorCode::ProjectNotFound,
        }
    }

    pub fn task_not_found(id: EntityId) -> Self {
        CoreError::NotFound {
            entity: "Task",
            id,
            code: ErrorCode::TaskNotFound,
        }
    }

    /// Generic field validation failure (`VALIDATION_ERROR`).
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation {
            message: message.into(),
            code: ErrorCode::ValidationError,
        }
    }

    /// The machine-readable code carried by this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NotFound { code, .. } | CoreError::Validation { code, .. } => *code,
        }
    }
}
