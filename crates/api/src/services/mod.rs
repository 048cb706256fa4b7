//! Domain services for projects and tasks.
//!
//! A service borrows one [`Session`](taskboard_db::Session) for its lifetime
//! and enforces the business rules (field validation, date parsing, parent
//! checks) on top of it. Handlers build a service per request from a freshly
//! forked session; the overdue sweep builds one per tick.

pub mod project;
pub mod task;

pub use project::ProjectService;
pub use task::TaskService;

use taskboard_core::error::CoreError;
use validator::Validate;

use crate::error::AppResult;

/// Run the DTO's declarative field rules, mapping failures to
/// `VALIDATION_ERROR`.
fn validate_input<T: Validate>(input: &T) -> AppResult<()> {
    input
        .validate()
        .map_err(|errors| CoreError::validation(errors.to_string()).into())
}
