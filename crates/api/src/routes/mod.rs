pub mod health;
pub mod project;
pub mod task;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                        list, create
/// /projects/{id}                                   get, update, delete
/// /projects/{id}/tasks                             list tasks of a project
///
/// /tasks                                           create
/// /tasks/{id}                                      get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
}
