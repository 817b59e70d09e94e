//! Backend Commands
//!
//! Frontend bindings to the task server's REST API.

mod task;

pub use task::*;
