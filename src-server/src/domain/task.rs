//! Task Inputs and Partitions
//!
//! The task itself is the shared board model; this module adds what only the
//! store needs: creation drafts, list filters and the partition key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use board_dragdrop::{ColumnKey, Priority, Task, TaskStatus};

use super::entity::{DomainError, DomainResult};

/// Unit of dense positions: tasks sharing status and board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    pub status: TaskStatus,
    pub is_urgent: bool,
}

impl Partition {
    pub fn new(status: TaskStatus, is_urgent: bool) -> Self {
        Self { status, is_urgent }
    }

    pub fn of(task: &Task) -> Self {
        Self::new(task.status, task.is_urgent)
    }

    /// Column rendering this partition; urgent DONE has none
    pub fn column(&self) -> Option<ColumnKey> {
        if self.is_urgent {
            ColumnKey::urgent(self.status)
        } else {
            Some(ColumnKey::main(self.status))
        }
    }
}

/// Body of `POST /tasks/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    /// Defaults to `priority == URGENT`
    #[serde(default)]
    pub is_urgent: Option<bool>,
    #[serde(default)]
    pub project: Option<u32>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, status: TaskStatus, priority: Priority) -> Self {
        Self {
            title: title.into(),
            status,
            priority,
            ..Self::default()
        }
    }

    pub fn partition(&self) -> Partition {
        let urgent = self.is_urgent.unwrap_or(self.priority == Priority::Urgent);
        Partition::new(self.status, urgent)
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_title(&self.title)
    }
}

pub fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::InvalidInput("title must not be empty".to_string()));
    }
    Ok(())
}

/// Query string of `GET /tasks/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub project: Option<u32>,
    /// Main board only
    #[serde(default)]
    pub exclude_urgent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urgent_priority_lands_on_urgent_board_by_default() {
        let draft = NewTask::new("Rappeler", TaskStatus::Todo, Priority::Urgent);
        assert!(draft.partition().is_urgent);
        let draft = NewTask { is_urgent: Some(false), ..draft };
        assert!(!draft.partition().is_urgent);
    }

    #[test]
    fn urgent_done_partition_has_no_column() {
        assert_eq!(Partition::new(TaskStatus::Done, true).column(), None);
        assert_eq!(
            Partition::new(TaskStatus::Done, false).column(),
            Some(ColumnKey::main(TaskStatus::Done))
        );
    }

    #[test]
    fn blank_title_is_rejected() {
        let draft = NewTask::new("   ", TaskStatus::Todo, Priority::Low);
        assert!(matches!(draft.validate(), Err(DomainError::InvalidInput(_))));
    }
}
