//! Frontend Models
//!
//! Wire types come from the engine crate; this module only arranges the
//! cached task list into board columns.

pub use board_dragdrop::{Board, ColumnKey, Priority, Task, TaskId, TaskStatus};

/// Tasks rendered in `column`, in server order
pub fn column_tasks(tasks: &[Task], column: ColumnKey) -> Vec<Task> {
    let mut out: Vec<Task> = tasks.iter().filter(|t| column.holds(t)).cloned().collect();
    out.sort_by_key(|t| (t.position, t.id));
    out
}

/// Urgent tasks that are not done. Finished urgent tasks have no column.
pub fn open_urgent_count(tasks: &[Task]) -> usize {
    tasks.iter().filter(|t| t.is_urgent && t.status != TaskStatus::Done).count()
}

pub fn priority_class(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "priority-low",
        Priority::Medium => "priority-medium",
        Priority::High => "priority-high",
        Priority::Urgent => "priority-urgent",
    }
}
