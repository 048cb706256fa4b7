//! Task entity model and DTOs.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskboard_core::task_status::TaskStatus;
use taskboard_core::types::{new_id, EntityId, Timestamp};
use validator::Validate;

/// A task row from the `tasks` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Task {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: TaskStatus,
    pub due_date: Timestamp,
    pub project_id: EntityId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Task {
    /// Build a new, not yet persisted task with a fresh id.
    pub fn new(
        name: String,
        description: String,
        status: TaskStatus,
        due_date: Timestamp,
        project_id: EntityId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            name,
            description,
            status,
            due_date,
            project_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// DTO for creating a new task.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    /// Defaults to `PENDING` if omitted.
    pub status: Option<TaskStatus>,
    pub due_date: String,
    pub project_id: EntityId,
}

/// DTO for updating an existing task. All fields are optional; a supplied
/// `project_id` reassigns the task.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTask {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<String>,
    pub project_id: Option<EntityId>,
}
