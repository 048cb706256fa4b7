//! Handlers for the `/projects` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::types::EntityId;
use taskboard_db::models::project::{CreateProject, Project, UpdateProject};
use taskboard_db::models::task::Task;
use taskboard_db::Store;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::services::{ProjectService, TaskService};
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let mut session = state.store.fork();
    let project = ProjectService::new(&mut session).create(&input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let mut session = state.store.fork();
    let projects = ProjectService::new(&mut session).list().await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> AppResult<Json<Project>> {
    let mut session = state.store.fork();
    let project = ProjectService::new(&mut session).get_by_id(id).await?;
    Ok(Json(project))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<UpdateProject>,
) -> AppResult<Json<Project>> {
    let mut session = state.store.fork();
    let project = ProjectService::new(&mut session).update(id, &input).await?;
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Soft-deletes and returns the deleted projection.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> AppResult<Json<Project>> {
    let mut session = state.store.fork();
    let project = ProjectService::new(&mut session).delete(id).await?;
    Ok(Json(project))
}

/// GET /api/v1/projects/{id}/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<EntityId>,
) -> AppResult<Json<Vec<Task>>> {
    let mut session = state.store.fork();
    let tasks = TaskService::new(&mut session)
        .list_by_project(project_id)
        .await?;
    Ok(Json(tasks))
}
