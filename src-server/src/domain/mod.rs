//! Domain Layer
//!
//! Entities, inputs and errors. The task model itself comes from the board
//! engine so both ends agree on the wire format.

mod entity;
mod task;

pub use entity::{DomainError, DomainResult, Entity};
pub use task::{validate_title, NewTask, Partition, TaskFilter};

pub use board_dragdrop::{Priority, ReorderCommand, Task, TaskId, TaskStatus, TaskUpdate};
