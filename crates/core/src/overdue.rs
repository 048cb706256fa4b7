//! Eligibility rule for the automatic overdue sweep.
//!
//! The task repository mirrors this rule in SQL; both must agree.

use crate::task_status::TaskStatus;
use crate::types::Timestamp;

/// Statuses the sweep never touches.
pub const SWEEP_EXEMPT_STATUSES: [TaskStatus; 3] = [
    TaskStatus::Completed,
    TaskStatus::Cancelled,
    TaskStatus::Overdue,
];

/// Whether a task in `status` may be moved to OVERDUE by the sweep.
pub fn is_sweepable_status(status: TaskStatus) -> bool {
    !SWEEP_EXEMPT_STATUSES.contains(&status)
}

/// A task is a candidate iff its due date is strictly before `now`, its
/// status is not exempt, and it has not been soft-deleted.
pub fn is_overdue_candidate(
    due_date: Timestamp,
    status: TaskStatus,
    deleted_at: Option<Timestamp>,
    now: Timestamp,
) -> bool {
    deleted_at.is_none() && due_date < now && is_sweepable_status(status)
}
