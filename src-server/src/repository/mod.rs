//! Repository Layer
//!
//! Data access abstractions and implementations.

mod db;
mod task;
mod traits;

#[cfg(test)]
mod tests;

pub use db::{init_db, DbConn};
pub use task::{TaskPositioningOperations, TaskRepository};
pub use traits::Repository;
