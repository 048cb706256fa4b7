//! Domain vocabulary shared by every taskboard crate.
//!
//! This crate has zero internal dependencies so the database layer, the API
//! server and any future CLI tooling can all agree on ids, timestamps, task
//! statuses, the overdue eligibility rule and the error taxonomy.

pub mod dates;
pub mod error;
pub mod overdue;
pub mod task_status;
pub mod types;
