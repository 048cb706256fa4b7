//! Background tasks and scheduled jobs.
//!
//! Each job is armed explicitly at startup and owns a [`CancellationToken`]
//! so it can be disarmed for graceful shutdown.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod overdue_tasks;

pub use overdue_tasks::{OverdueTasksJob, TickOutcome};
