//! Board Model
//!
//! Task representation shared by the front end and the backend, plus the
//! column keys that partition the board.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DragError;

/// Task identifier as issued by the backend
pub type TaskId = u32;

/// Workflow status, one column per status on the main board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "TODO",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Done => "DONE",
        }
    }

    /// Column title shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "À faire",
            TaskStatus::InProgress => "En cours",
            TaskStatus::Done => "Terminé",
        }
    }

    /// Sort rank used when listing the whole board
    pub fn rank(&self) -> i32 {
        match self {
            TaskStatus::Todo => 0,
            TaskStatus::InProgress => 1,
            TaskStatus::Done => 2,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = DragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TODO" => Ok(TaskStatus::Todo),
            "IN_PROGRESS" => Ok(TaskStatus::InProgress),
            "DONE" => Ok(TaskStatus::Done),
            other => Err(DragError::UnknownColumn(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Urgent => "URGENT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Basse",
            Priority::Medium => "Moyenne",
            Priority::High => "Haute",
            Priority::Urgent => "Urgente",
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Priority::Low),
            "MEDIUM" => Ok(Priority::Medium),
            "HIGH" => Ok(Priority::High),
            "URGENT" => Ok(Priority::Urgent),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// Which sub-board a column belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Board {
    /// Three status columns holding non-urgent tasks
    Main,
    /// TODO and IN_PROGRESS columns holding urgent tasks
    Urgent,
}

/// A drop-zone column: one `(status, is_urgent)` partition rendered on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnKey {
    pub board: Board,
    pub status: TaskStatus,
}

impl ColumnKey {
    pub const MAIN: [ColumnKey; 3] = [
        ColumnKey::main(TaskStatus::Todo),
        ColumnKey::main(TaskStatus::InProgress),
        ColumnKey::main(TaskStatus::Done),
    ];

    pub const URGENT: [ColumnKey; 2] = [
        ColumnKey { board: Board::Urgent, status: TaskStatus::Todo },
        ColumnKey { board: Board::Urgent, status: TaskStatus::InProgress },
    ];

    pub const fn main(status: TaskStatus) -> Self {
        Self { board: Board::Main, status }
    }

    /// Urgent board only has TODO and IN_PROGRESS columns
    pub fn urgent(status: TaskStatus) -> Option<Self> {
        match status {
            TaskStatus::Done => None,
            _ => Some(Self { board: Board::Urgent, status }),
        }
    }

    pub fn is_urgent(&self) -> bool {
        self.board == Board::Urgent
    }

    /// Value of the `data-drop-zone` / `data-task-column` attributes
    pub fn as_str(&self) -> &'static str {
        match (self.board, self.status) {
            (Board::Main, TaskStatus::Todo) => "TODO",
            (Board::Main, TaskStatus::InProgress) => "IN_PROGRESS",
            (Board::Main, TaskStatus::Done) => "DONE",
            (Board::Urgent, TaskStatus::Todo) => "URGENT_TODO",
            (Board::Urgent, TaskStatus::InProgress) => "URGENT_IN_PROGRESS",
            (Board::Urgent, TaskStatus::Done) => "URGENT_DONE",
        }
    }

    pub fn label(&self) -> String {
        match self.board {
            Board::Main => self.status.label().to_string(),
            Board::Urgent => format!("Urgent · {}", self.status.label()),
        }
    }

    /// Whether `task` is rendered in this column
    pub fn holds(&self, task: &Task) -> bool {
        task.status == self.status && task.is_urgent == self.is_urgent()
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKey {
    type Err = DragError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix("URGENT_") {
            Some(rest) => {
                let status = rest.parse::<TaskStatus>()?;
                ColumnKey::urgent(status).ok_or_else(|| DragError::UnknownColumn(s.to_string()))
            }
            None => Ok(ColumnKey::main(s.parse()?)),
        }
    }
}

/// Task as returned by the REST API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Lives on the urgent sub-board
    #[serde(default)]
    pub is_urgent: bool,
    /// Dense index within the `(status, is_urgent)` partition
    pub position: i32,
    #[serde(default)]
    pub project: Option<u32>,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: TaskId, title: impl Into<String>, status: TaskStatus, priority: Priority) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            description: String::new(),
            status,
            priority,
            is_urgent: priority == Priority::Urgent,
            position: 0,
            project: None,
            due_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Column the task is rendered in, if any
    ///
    /// Urgent tasks that are done have no column on either board.
    pub fn column(&self) -> Option<ColumnKey> {
        if self.is_urgent {
            ColumnKey::urgent(self.status)
        } else {
            Some(ColumnKey::main(self.status))
        }
    }
}

/// Snapshot written to the native drag data transfer at drag start
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragPayload {
    pub id: TaskId,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<i32>,
}

impl DragPayload {
    /// MIME type used on the data transfer channel
    pub const FORMAT: &'static str = "application/json";

    pub fn to_json(&self) -> Result<String, DragError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, DragError> {
        Ok(serde_json::from_str(raw)?)
    }
}

impl From<&Task> for DragPayload {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            status: task.status,
            priority: task.priority,
            position: Some(task.position),
        }
    }
}

/// Body of `PATCH /tasks/{id}/reorder/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderCommand {
    #[serde(skip)]
    pub id: TaskId,
    pub target_position: i32,
    pub target_status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_is_urgent: Option<bool>,
}

/// Partial body of `PATCH /tasks/{id}/`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_urgent: Option<bool>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self == &TaskUpdate::default()
    }
}

/// Paginated list envelope of `GET /tasks/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn single(results: Vec<T>) -> Self {
        Self { count: results.len(), next: None, previous: None, results }
    }
}
