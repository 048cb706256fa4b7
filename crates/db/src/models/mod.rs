//! Entity models (one row struct per table) and their input DTOs.

pub mod project;
pub mod task;
