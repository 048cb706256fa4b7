//! Task CRUD plus the two operations the overdue sweep is built from:
//! [`TaskService::find_overdue_candidates`] and [`TaskService::mark_as_overdue`].

use chrono::Utc;
use taskboard_core::dates::parse_due_date;
use taskboard_core::error::CoreError;
use taskboard_core::overdue::is_overdue_candidate;
use taskboard_core::task_status::TaskStatus;
use taskboard_core::types::{EntityId, Timestamp};
use taskboard_db::filter::{ProjectFilter, TaskFilter};
use taskboard_db::models::task::{CreateTask, Task, UpdateTask};
use taskboard_db::Session;

use super::validate_input;
use crate::error::AppResult;

pub struct TaskService<'s, S: Session> {
    session: &'s mut S,
}

impl<'s, S: Session> TaskService<'s, S> {
    pub fn new(session: &'s mut S) -> Self {
        Self { session }
    }

    pub async fn get_by_id(&mut self, id: EntityId) -> AppResult<Task> {
        self.load(id).await
    }

    /// Live tasks of a live project, earliest due date first.
    pub async fn list_by_project(&mut self, project_id: EntityId) -> AppResult<Vec<Task>> {
        self.ensure_project(project_id).await?;
        Ok(self
            .session
            .find_tasks(&TaskFilter::by_project(project_id))
            .await?)
    }

    /// Create a task under an existing, non-deleted project.
    ///
    /// Fails with `PROJECT_NOT_FOUND` for a missing project and
    /// `INVALID_DUE_DATE` for an unparseable due date.
    pub async fn create(&mut self, input: &CreateTask) -> AppResult<Task> {
        validate_input(input)?;
        self.ensure_project(input.project_id).await?;
        let due_date = parse_due_date(&input.due_date)?;

        let task = Task::new(
            input.name.clone(),
            input.description.clone(),
            input.status.unwrap_or_default(),
            due_date,
            input.project_id,
        );
        let task = self.session.persist_and_flush_task(task).await?;
        tracing::info!(task_id = %task.id, project_id = %task.project_id, "Task created");
        Ok(task)
    }

    /// Apply the supplied fields. A new `project_id` and a new `due_date`
    /// are validated exactly as on create.
    pub async fn update(&mut self, id: EntityId, input: &UpdateTask) -> AppResult<Task> {
        validate_input(input)?;
        let mut task = self.load(id).await?;

        if let Some(project_id) = input.project_id {
            self.ensure_project(project_id).await?;
            task.project_id = project_id;
        }
        if let Some(raw) = &input.due_date {
            task.due_date = parse_due_date(raw)?;
        }
        if let Some(name) = &input.name {
            task.name = name.clone();
        }
        if let Some(description) = &input.description {
            task.description = description.clone();
        }
        if let Some(status) = input.status {
            task.status = status;
        }

        Ok(self.session.persist_and_flush_task(task).await?)
    }

    /// Soft-delete: stamp `deleted_at` and return the deleted projection.
    pub async fn delete(&mut self, id: EntityId) -> AppResult<Task> {
        let mut task = self.load(id).await?;
        task.deleted_at = Some(Utc::now());
        let task = self.session.persist_and_flush_task(task).await?;
        tracing::info!(task_id = %id, "Task soft-deleted");
        Ok(task)
    }

    /// Every live task due strictly before `now` whose status is not
    /// COMPLETED, CANCELLED or OVERDUE. Read fully into memory.
    pub async fn find_overdue_candidates(&mut self, now: Timestamp) -> AppResult<Vec<Task>> {
        let tasks = self
            .session
            .find_tasks(&TaskFilter::overdue_candidates(now))
            .await?;
        debug_assert!(tasks
            .iter()
            .all(|t| is_overdue_candidate(t.due_date, t.status, t.deleted_at, now)));
        Ok(tasks)
    }

    /// Set OVERDUE on every task whose id is in `ids` and persist them in one
    /// flush. Eligibility is not re-checked; the caller has just computed it.
    ///
    /// Returns the number of rows found and updated, which is smaller than
    /// `ids.len()` when some ids no longer resolve.
    pub async fn mark_as_overdue(&mut self, ids: &[EntityId]) -> AppResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let tasks = self
            .session
            .find_tasks(&TaskFilter::by_ids(ids.to_vec()).with_deleted())
            .await?;
        let count = tasks.len();
        for mut task in tasks {
            task.status = TaskStatus::Overdue;
            self.session.persist_task(task);
        }
        self.session.flush().await?;
        Ok(count)
    }

    async fn load(&mut self, id: EntityId) -> AppResult<Task> {
        self.session
            .find_one_task(&TaskFilter::by_id(id))
            .await?
            .ok_or_else(|| CoreError::task_not_found(id).into())
    }

    async fn ensure_project(&mut self, project_id: EntityId) -> AppResult<()> {
        self.session
            .find_one_project(&ProjectFilter::by_id(project_id))
            .await?
            .map(|_| ())
            .ok_or_else(|| CoreError::project_not_found(project_id).into())
    }
}
