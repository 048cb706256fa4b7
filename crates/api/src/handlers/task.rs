//! Handlers for the `/tasks` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use taskboard_core::types::EntityId;
use taskboard_db::models::task::{CreateTask, Task, UpdateTask};
use taskboard_db::Store;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::services::TaskService;
use crate::state::AppState;

/// POST /api/v1/tasks
pub async fn create(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let mut session = state.store.fork();
    let task = TaskService::new(&mut session).create(&input).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> AppResult<Json<Task>> {
    let mut session = state.store.fork();
    let task = TaskService::new(&mut session).get_by_id(id).await?;
    Ok(Json(task))
}

/// PUT /api/v1/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
    AppJson(input): AppJson<UpdateTask>,
) -> AppResult<Json<Task>> {
    let mut session = state.store.fork();
    let task = TaskService::new(&mut session).update(id, &input).await?;
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/{id}
///
/// Soft-deletes and returns the deleted projection.
pub async fn delete(
    State(state): State<AppState>,
    AppPath(id): AppPath<EntityId>,
) -> AppResult<Json<Task>> {
    let mut session = state.store.fork();
    let task = TaskService::new(&mut session).delete(id).await?;
    Ok(Json(task))
}
