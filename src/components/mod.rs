//! UI Components
//!
//! Board components. Every column is a drop zone wired to the shared drag
//! controller from `AppContext`.

mod drop_indicator;
mod task_card;
mod task_column;
mod tasks_grid;
mod toast;
mod urgent_tasks;

pub use drop_indicator::DropIndicator;
pub use task_card::TaskCard;
pub use task_column::TaskColumn;
pub use tasks_grid::TasksGrid;
pub use toast::ToastStack;
pub use urgent_tasks::UrgentTasks;
