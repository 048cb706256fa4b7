//! Repository for the `projects` table.

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::filter::{DeletedScope, ProjectFilter};
use crate::models::project::Project;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, is_archived, start_date, end_date, \
                       created_at, updated_at, deleted_at";

/// Provides filtered reads and upserts for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Load every project matching `filter`, most recently created first.
    pub async fn find(pool: &DbPool, filter: &ProjectFilter) -> Result<Vec<Project>, sqlx::Error> {
        if filter.ids.as_ref().is_some_and(Vec::is_empty) {
            return Ok(Vec::new());
        }
        let mut query = select(filter);
        query.push(" ORDER BY created_at DESC");
        query.build_query_as::<Project>().fetch_all(pool).await
    }

    /// Insert a project, or overwrite every mutable column if the id exists.
    pub async fn upsert(conn: &mut SqliteConnection, project: &Project) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO projects
                (id, name, description, is_archived, start_date, end_date,
                 created_at, updated_at, deleted_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                is_archived = excluded.is_archived,
                start_date = excluded.start_date,
                end_date = excluded.end_date,
                updated_at = excluded.updated_at,
                deleted_at = excluded.deleted_at",
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.is_archived)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.created_at)
        .bind(project.updated_at)
        .bind(project.deleted_at)
        .execute(conn)
        .await?;
        Ok(())
    }
}

fn select(filter: &ProjectFilter) -> QueryBuilder<'_, Sqlite> {
    let mut query = QueryBuilder::new(format!("SELECT {COLUMNS} FROM projects WHERE 1 = 1"));

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

    query
}
