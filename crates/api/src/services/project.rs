//! Project CRUD with date-range enforcement.

use chrono::Utc;
use taskboard_core::dates::{parse_date_field, validate_date_range};
use taskboard_core::error::CoreError;
use taskboard_core::types::EntityId;
use taskboard_db::filter::ProjectFilter;
use taskboard_db::models::project::{CreateProject, Project, UpdateProject};
use taskboard_db::Session;

use super::validate_input;
use crate::error::AppResult;

pub struct ProjectService<'s, S: Session> {
    session: &'s mut S,
}

impl<'s, S: Session> ProjectService<'s, S> {
    pub fn new(session: &'s mut S) -> Self {
        Self { session }
    }

    /// All live projects, most recently created first.
    pub async fn list(&mut self) -> AppResult<Vec<Project>> {
        Ok(self.session.find_projects(&ProjectFilter::all()).await?)
    }

    pub async fn get_by_id(&mut self, id: EntityId) -> AppResult<Project> {
        self.load(id).await
    }

    /// Create a project after checking fields, date formats and `end >= start`.
    pub async fn create(&mut self, input: &CreateProject) -> AppResult<Project> {
        validate_input(input)?;
        let start_date = parse_date_field("start_date", &input.start_date)?;
        let end_date = parse_date_field("end_date", &input.end_date)?;
        validate_date_range(start_date, end_date)?;

        let project = Project::new(
            input.name.clone(),
            input.description.clone(),
            input.is_archived,
            start_date,
            end_date,
        );
        let project = self.session.persist_and_flush_project(project).await?;
        tracing::info!(project_id = %project.id, "Project created");
        Ok(project)
    }

    /// Apply the supplied fields. The date range is re-checked against the
    /// merged start/end, so moving only one side is still validated.
    pub async fn update(&mut self, id: EntityId, input: &UpdateProject) -> AppResult<Project> {
        validate_input(input)?;
        let mut project = self.load(id).await?;

        if let Some(raw) = &input.start_date {
            project.start_date = parse_date_field("start_date", raw)?;
        }
        if let Some(raw) = &input.end_date {
            project.end_date = parse_date_field("end_date", raw)?;
        }
        validate_date_range(project.start_date, project.end_date)?;

        if let Some(name) = &input.name {
            project.name = name.clone();
        }
        if let Some(description) = &input.description {
            project.description = description.clone();
        }
        if let Some(is_archived) = input.is_archived {
            project.is_archived = is_archived;
        }

        Ok(self.session.persist_and_flush_project(project).await?)
    }

    /// Soft-delete: stamp `deleted_at` and return the deleted projection.
    /// Tasks that reference the project are left untouched.
    pub async fn delete(&mut self, id: EntityId) -> AppResult<Project> {
        let mut project = self.load(id).await?;
        project.deleted_at = Some(Utc::now());
        let project = self.session.persist_and_flush_project(project).await?;
        tracing::info!(project_id = %id, "Project soft-deleted");
        Ok(project)
    }

    async fn load(&mut self, id: EntityId) -> AppResult<Project> {
        self.session
            .find_one_project(&ProjectFilter::by_id(id))
            .await?
            .ok_or_else(|| CoreError::project_not_found(id).into())
    }
}
