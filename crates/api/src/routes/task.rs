//! Route definitions for the `/tasks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id
/// PUT    /{id}                              -> update
/// DELETE /{id}                              -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(task::create)).route(
        "/{id}",
        get(task::get_by_id).put(task::update).delete(task::delete),
    )
}
