//! Declarative query filters.
//!
//! Filters are plain data: the repositories translate them to SQL, and the
//! session uses [`TaskFilter::matches`] / [`ProjectFilter::matches`] to decide
//! whether a staged (unflushed) entity still belongs in a result set.

use taskboard_core::overdue::SWEEP_EXEMPT_STATUSES;
use taskboard_core::task_status::TaskStatus;
use taskboard_core::types::{EntityId, Timestamp};

use crate::models::project::Project;
use crate::models::task::Task;

/// Whether soft-deleted rows take part in a query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeletedScope {
    #[default]
    Exclude,
    Include,
}

impl DeletedScope {
    fn admits(self, deleted_at: Option<Timestamp>) -> bool {
        self == DeletedScope::Include || deleted_at.is_none()
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub ids: Option<Vec<EntityId>>,
    pub deleted: DeletedScope,
}

impl ProjectFilter {
    /// Every live project.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: EntityId) -> Self {
        Self {
            ids: Some(vec![id]),
            ..Self::default()
        }
    }

    pub fn with_deleted(mut self) -> Self {
        self.deleted = DeletedScope::Include;
        self
    }

    pub fn matches(&self, project: &Project) -> bool {
        self.deleted.admits(project.deleted_at)
            && self.ids.as_ref().is_none_or(|ids| ids.contains(&project.id))
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub ids: Option<Vec<EntityId>>,
    pub project_id: Option<EntityId>,
    /// Strict upper bound on `due_date`.
    pub due_before: Option<Timestamp>,
    pub status_not_in: Vec<TaskStatus>,
    pub deleted: DeletedScope,
}

impl TaskFilter {
    pub fn by_id(id: EntityId) -> Self {
        Self::by_ids(vec![id])
    }

    pub fn by_ids(ids: Vec<EntityId>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::default()
        }
    }

    pub fn by_project(project_id: EntityId) -> Self {
        Self {
            project_id: Some(project_id),
            ..Self::default()
        }
    }

    /// Live tasks due strictly before `now` whose status is not exempt from
    /// the overdue sweep.
    pub fn overdue_candidates(now: Timestamp) -> Self {
        Self {
            due_before: Some(now),
            status_not_in: SWEEP_EXEMPT_STATUSES.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_deleted(mut self) -> Self {
        self.deleted = DeletedScope::Include;
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.deleted.admits(task.deleted_at)
            && self.ids.as_ref().is_none_or(|ids| ids.contains(&task.id))
            && self.project_id.is_none_or(|pid| pid == task.project_id)
            && self.due_before.is_none_or(|cutoff| task.due_date < cutoff)
            && !self.status_not_in.contains(&task.status)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use taskboard_core::overdue::is_overdue_candidate;

    use super::*;

    fn task(status: TaskStatus, due: Timestamp) -> Task {
        Task::new(
            "t".into(),
            "d".into(),
            status,
            due,
            uuid::Uuid::new_v4(),
        )
    }

    #[test]
    fn overdue_filter_agrees_with_core_rule() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let filter = TaskFilter::overdue_candidates(now);
        for status in TaskStatus::ALL {
            for due in [now - Duration::days(1), now, now + Duration::days(1)] {
                let t = task(status, due);
                let expected = is_overdue_candidate(t.due_date, t.status, t.deleted_at, now);
                assert_eq!(filter.matches(&t), expected, "{status} {due}");
            }
        }
    }

    #[test]
    fn deleted_rows_only_match_with_deleted_scope() {
        let mut t = task(TaskStatus::Pending, Utc::now());
        t.deleted_at = Some(Utc::now());
        assert!(!TaskFilter::by_id(t.id).matches(&t));
        assert!(TaskFilter::by_id(t.id).with_deleted().matches(&t));
    }
}
