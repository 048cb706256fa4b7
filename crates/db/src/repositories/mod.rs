//! SQL for each table. Repositories are stateless; the session layer decides
//! when they run and inside which transaction.

pub mod project_repo;
pub mod task_repo;

pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
