//! Unit-of-work sessions over the entity store.
//!
//! A [`Store`] is constructed once at process start and handed to whoever
//! needs persistence. Every independent actor (one HTTP request, one sweep
//! tick) calls [`Store::fork`] to get its own [`Session`]. A session owns an
//! identity map of the entities it has loaded or written and a set of staged
//! changes; nothing in it is visible to any other session until
//! [`Session::flush`] commits.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use taskboard_core::types::EntityId;

use crate::filter::{ProjectFilter, TaskFilter};
use crate::models::project::Project;
use crate::models::task::Task;
use crate::repositories::{ProjectRepo, TaskRepo};
use crate::DbPool;

/// Factory for isolated sessions.
pub trait Store: Send + Sync + 'static {
    type Session: Session + 'static;

    /// Open a fresh session that shares no cached state with any other.
    fn fork(&self) -> Self::Session;
}

/// Repository capabilities for projects and tasks plus unit-of-work control.
#[async_trait]
pub trait Session: Send {
    async fn find_projects(&mut self, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error>;

    async fn find_tasks(&mut self, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error>;

    /// Stage an insert or update. No I/O happens until [`Session::flush`].
    fn persist_project(&mut self, project: Project);

    /// Stage an insert or update. No I/O happens until [`Session::flush`].
    fn persist_task(&mut self, task: Task);

    /// Write every staged change in a single transaction. Each written
    /// entity gets a fresh `updated_at`.
    async fn flush(&mut self) -> Result<(), sqlx::Error>;

    /// Drop the identity map and any staged, unflushed changes.
    fn clear(&mut self);

    /// The session's current copy of a project, if it manages one.
    fn managed_project(&self, id: EntityId) -> Option<&Project>;

    /// The session's current copy of a task, if it manages one.
    fn managed_task(&self, id: EntityId) -> Option<&Task>;

    async fn find_one_project(
        &mut self,
        filter: &ProjectFilter,
    ) -> Result<Option<Project>, sqlx::Error> {
        Ok(self.find_projects(filter).await?.into_iter().next())
    }

    async fn find_one_task(&mut self, filter: &TaskFilter) -> Result<Option<Task>, sqlx::Error> {
        Ok(self.find_tasks(filter).await?.into_iter().next())
    }

    /// Stage, flush and return the stored copy (with its new `updated_at`).
    async fn persist_and_flush_project(&mut self, project: Project) -> Result<Project, sqlx::Error> {
        let id = project.id;
        self.persist_project(project.clone());
        self.flush().await?;
        Ok(self.managed_project(id).cloned().unwrap_or(project))
    }

    /// Stage, flush and return the stored copy (with its new `updated_at`).
    async fn persist_and_flush_task(&mut self, task: Task) -> Result<Task, sqlx::Error> {
        let id = task.id;
        self.persist_task(task.clone());
        self.flush().await?;
        Ok(self.managed_task(id).cloned().unwrap_or(task))
    }
}

// ---------------------------------------------------------------------------
// SQLite implementation
// ---------------------------------------------------------------------------

/// Store backed by a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

impl Store for SqliteStore {
    type Session = SqliteSession;

    fn fork(&self) -> SqliteSession {
        SqliteSession::new(self.pool.clone())
    }
}

/// One unit of work against the SQLite pool.
pub struct SqliteSession {
    pool: DbPool,
    projects: HashMap<EntityId, Project>,
    tasks: HashMap<EntityId, Task>,
    staged_projects: HashMap<EntityId, Project>,
    staged_tasks: HashMap<EntityId, Task>,
}

impl SqliteSession {
    fn new(pool: DbPool) -> Self {
        Self {
            pool,
            projects: HashMap::new(),
            tasks: HashMap::new(),
            staged_projects: HashMap::new(),
            staged_tasks: HashMap::new(),
        }
    }

    /// Number of staged changes waiting for a flush.
    pub fn pending_changes(&self) -> usize {
        self.staged_projects.len() + self.staged_tasks.len()
    }
}

#[async_trait]
impl Session for SqliteSession {
    async fn find_projects(&mut self, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        let rows = ProjectRepo::find(&self.pool, filter).await?;
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            // Unflushed edits made through this session win over the stored row.
            let current = match self.staged_projects.get(&row.id) {
                Some(staged) => staged.clone(),
                None => {
                    self.projects.insert(row.id, row.clone());
                    row
                }
            };
            if filter.matches(&current) {
                result.push(current);
            }
        }
        Ok(result)
    }

    async fn find_tasks(&mut self, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error> {
        let rows = TaskRepo::find(&self.pool, filter).await?;
        let mut result = Vec::with_capacity(rows.len());
        for row in rows {
            let current = match self.staged_tasks.get(&row.id) {
                Some(staged) => staged.clone(),
                None => {
                    self.tasks.insert(row.id, row.clone());
                    row
                }
            };
            if filter.matches(&current) {
                result.push(current);
            }
        }
        Ok(result)
    }

    fn persist_project(&mut self, project: Project) {
        self.staged_projects.insert(project.id, project);
    }

    fn persist_task(&mut self, task: Task) {
        self.staged_tasks.insert(task.id, task);
    }

    async fn flush(&mut self) -> Result<(), sqlx::Error> {
        if self.pending_changes() == 0 {
            return Ok(());
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        // Projects first so new tasks can reference projects staged alongside them.
        for project in self.staged_projects.values_mut() {
            project.updated_at = now;
            ProjectRepo::upsert(&mut *tx, project).await?;
        }
        for task in self.staged_tasks.values_mut() {
            task.updated_at = now;
            TaskRepo::upsert(&mut *tx, task).await?;
        }

        tx.commit().await?;

        let projects = std::mem::take(&mut self.staged_projects);
        let tasks = std::mem::take(&mut self.staged_tasks);
        tracing::debug!(
            projects = projects.len(),
            tasks = tasks.len(),
            "Session flushed"
        );
        self.projects.extend(projects);
        self.tasks.extend(tasks);
        Ok(())
    }

    fn clear(&mut self) {
        self.projects.clear();
        self.tasks.clear();
        self.staged_projects.clear();
        self.staged_tasks.clear();
    }

    fn managed_project(&self, id: EntityId) -> Option<&Project> {
        self.staged_projects
            .get(&id)
            .or_else(|| self.projects.get(&id))
    }

    fn managed_task(&self, id: EntityId) -> Option<&Task> {
        self.staged_tasks.get(&id).or_else(|| self.tasks.get(&id))
    }
}
