//! Request handlers.
//!
//! Each submodule provides async handler functions for a single entity type.
//! Handlers fork a session from the shared store, delegate to the matching
//! domain service in [`crate::services`] and map errors via [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod project;
pub mod task;
