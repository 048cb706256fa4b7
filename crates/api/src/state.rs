use std::sync::Arc;

use taskboard_db::SqliteStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
/// Handlers never share a session: each request forks its own from `store`.
#[derive(Clone)]
pub struct AppState {
    /// Entity store; fork one session per request.
    pub store: SqliteStore,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
