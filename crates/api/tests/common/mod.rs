#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use taskboard_api::config::ServerConfig;
use taskboard_api::router::build_app_router;
use taskboard_api::state::AppState;
use taskboard_core::task_status::TaskStatus;
use taskboard_core::types::{EntityId, Timestamp};
use taskboard_db::filter::{ProjectFilter, TaskFilter};
use taskboard_db::models::project::Project;
use taskboard_db::models::task::Task;
use taskboard_db::{Session, SqliteSession, SqliteStore, Store};

/// Build a test `ServerConfig` with safe defaults. The overdue job is never
/// armed by the router, so the flag is irrelevant here.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        overdue_job_enabled: false,
    }
}

/// Build the full application router over `pool`, with the same middleware
/// stack `main.rs` uses.
pub fn build_test_app(pool: SqlitePool) -> Router {
    let state = AppState {
        store: SqliteStore::new(pool),
        config: Arc::new(test_config()),
    };
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn ts(raw: &str) -> Timestamp {
    DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
}

/// Insert a project spanning 2024 directly through a session.
pub async fn seed_project(store: &SqliteStore) -> Project {
    let mut session = store.fork();
    let project = Project::new(
        "Sweep Project".to_string(),
        "Project used by sweep tests".to_string(),
        false,
        ts("2024-01-01T00:00:00Z"),
        ts("2024-12-31T00:00:00Z"),
    );
    session.persist_and_flush_project(project).await.unwrap()
}

/// Insert a task with the given status and due date directly through a session.
pub async fn seed_task(
    store: &SqliteStore,
    project_id: EntityId,
    status: TaskStatus,
    due: &str,
) -> Task {
    let mut session = store.fork();
    let task = Task::new(
        format!("Task due {due}"),
        "Seeded task".to_string(),
        status,
        ts(due),
        project_id,
    );
    session.persist_and_flush_task(task).await.unwrap()
}

/// Re-read a task from storage, including soft-deleted rows.
pub async fn reload_task(store: &SqliteStore, id: EntityId) -> Task {
    let mut session = store.fork();
    session
        .find_one_task(&TaskFilter::by_id(id).with_deleted())
        .await
        .unwrap()
        .unwrap()
}

// ---------------------------------------------------------------------------
// Instrumented store
// ---------------------------------------------------------------------------

/// Counters shared by every session an [`InstrumentedStore`] forks.
#[derive(Default)]
pub struct Probe {
    pub task_queries: AtomicUsize,
    pub flushes: AtomicUsize,
    pub clears: AtomicUsize,
    /// Number of upcoming `find_tasks` calls that should fail.
    pub failing_task_queries: AtomicUsize,
    /// Make every `find_tasks` call panic.
    pub panic_on_task_query: AtomicBool,
}

impl Probe {
    pub fn fail_next_task_queries(&self, n: usize) {
        self.failing_task_queries.store(n, Ordering::SeqCst);
    }

    pub fn panic_on_task_queries(&self) {
        self.panic_on_task_query.store(true, Ordering::SeqCst);
    }

    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    pub fn task_queries(&self) -> usize {
        self.task_queries.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

/// A [`Store`] that delegates to SQLite while counting calls and injecting
/// query failures on demand.
pub struct InstrumentedStore {
    pub inner: SqliteStore,
    pub probe: Arc<Probe>,
}

impl InstrumentedStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            inner: SqliteStore::new(pool),
            probe: Arc::new(Probe::default()),
        }
    }
}

impl Store for InstrumentedStore {
    type Session = InstrumentedSession;

    fn fork(&self) -> InstrumentedSession {
        InstrumentedSession {
            inner: self.inner.fork(),
            probe: Arc::clone(&self.probe),
        }
    }
}

pub struct InstrumentedSession {
    inner: SqliteSession,
    probe: Arc<Probe>,
}

#[async_trait]
impl Session for InstrumentedSession {
    async fn find_projects(&mut self, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        self.inner.find_projects(filter).await
    }

    async fn find_tasks(&mut self, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error> {
        self.probe.task_queries.fetch_add(1, Ordering::SeqCst);
        if self.probe.panic_on_task_query.load(Ordering::SeqCst) {
            panic!("injected task query panic");
        }
        let should_fail = self
            .probe
            .failing_task_queries
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(sqlx::Error::Protocol("injected task query failure".into()));
        }
        self.inner.find_tasks(filter).await
    }

    fn persist_project(&mut self, project: Project) {
        self.inner.persist_project(project);
    }

    fn persist_task(&mut self, task: Task) {
        self.inner.persist_task(task);
    }

    async fn flush(&mut self) -> Result<(), sqlx::Error> {
        self.probe.flushes.fetch_add(1, Ordering::SeqCst);
        self.inner.flush().await
    }

    fn clear(&mut self) {
        self.probe.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear();
    }

    fn managed_project(&self, id: EntityId) -> Option<&Project> {
        self.inner.managed_project(id)
    }

    fn managed_task(&self, id: EntityId) -> Option<&Task> {
        self.inner.managed_task(id)
    }
}
