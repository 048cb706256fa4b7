//! Project entity model and DTOs.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::types::{new_id, EntityId, Timestamp};
use validator::Validate;

/// A project row from the `projects` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub is_archived: bool,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Project {
    /// Build a new, not yet persisted project with a fresh id.
    pub fn new(
        name: String,
        description: String,
        is_archived: bool,
        start_date: Timestamp,
        end_date: Timestamp,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name,
            description,
            is_archived,
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// DTO for creating a new project. Dates arrive as strings and are parsed by
/// the service so malformed input maps to `INVALID_DATE`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    /// Defaults to `false` if omitted.
    #[serde(default)]
    pub is_archived: bool,
    pub start_date: String,
    pub end_date: String,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    pub is_archived: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
