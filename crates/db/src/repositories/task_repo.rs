//! Repository for the `tasks` table.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::filter::{DeletedScope, TaskFilter};
use crate::models::task::Task;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, due_date, project_id, \
                       created_at, updated_at, deleted_at";

/// Provides filtered reads and upserts for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Load every task matching `filter`, earliest due date first.
    ///
    /// An explicit empty id set matches nothing and skips the round-trip.
    pub async fn find(pool: &DbPool, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error> {
        if filter.ids.as_ref().is_some_and(Vec::is_empty) {
            return Ok(Vec::new());
        }
        let mut query = select(filter);
        query.push(" ORDER BY due_date ASC, created_at ASC");
        query.build_query_as::<Task>().fetch_all(pool).await
    }

    /// Insert a task, or overwrite every mutable column if the id exists.
    pub async fn upsert(conn: &mut SqliteConnection, task: &Task) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO tasks
                (id, name, description, status, due_date, project_id,
                 created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                status = excluded.status,
                due_date = excluded.due_date,
                project_id = excluded.project_id,
                updated_at = excluded.updated_at,
                deleted_at = excluded.deleted_at",
        )
        .bind(task.id)
        .bind(&task.name)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.due_date)
        .bind(task.project_id)
        .bind(task.created_at)
        .bind(task.updated_at)
        .bind(task.deleted_at)
        .execute(conn)
        .await?;
        Ok(())
    }
}

fn select(filter: &TaskFilter) -> QueryBuilder<'_, Sqlite> {
    let mut query = QueryBuilder::new(format!("SELECT {COLUMNS} FROM tasks WHERE 1 = 1"));

    if filter.deleted == DeletedScope::Exclude {
        query.push(" AND deleted_at IS NULL");
    }
    if let Some(ids) = &filter.ids {
        query.push(" AND id IN (");
        let mut list = query.separated(", ");
        for id in ids {
            list.push_bind(*id);
        }
        list.push_unseparated(")");
    }
    if let Some(project_id) = filter.project_id {
        query.push(" AND project_id = ").push_bind(project_id);
    }
    if let Some(cutoff) = filter.due_before {
        query.push(" AND due_date < ").push_bind(cutoff);
    }
    if !filter.status_not_in.is_empty() {
        query.push(" AND status NOT IN (");
        let mut list = query.separated(", ");
        for status in &filter.status_not_in {
            list.push_bind(status.as_str());
        }
        list.push_unseparated(")");
    }

    query
}
