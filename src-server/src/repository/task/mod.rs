//! Task Repository Module
//!
//! - task_repo: core CRUD
//! - task_positioning: dense positions and the reorder operation

mod task_positioning;
mod task_repo;

pub use task_positioning::TaskPositioningOperations;
pub use task_repo::TaskRepository;
