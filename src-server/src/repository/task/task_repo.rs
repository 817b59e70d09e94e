//! Task Repository - Core CRUD Operations
//!
//! SQLite-backed implementation of task CRUD. Position bookkeeping lives in
//! `task_positioning`; every write here keeps each partition dense.

use std::fmt::Display;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::super::db::DbConn;
use super::super::traits::Repository;
use super::task_positioning::{next_position, partition_ids, renumber};
use crate::domain::{
    validate_title, DomainError, DomainResult, NewTask, Partition, Task, TaskFilter, TaskId, TaskUpdate,
};

pub(super) const TASK_COLUMNS: &str =
    "id, title, description, status, priority, is_urgent, position, project, due_at, created_at, updated_at";

/// SQLite implementation of the task repository
pub struct TaskRepository {
    pub(crate) conn: DbConn,
}

impl TaskRepository {
    pub fn new(conn: DbConn) -> Self {
        Self { conn }
    }

    /// Tasks of one partition in position order
    pub async fn list_partition(&self, partition: Partition) -> DomainResult<Vec<Task>> {
        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks WHERE status = ?1 AND is_urgent = ?2 ORDER BY position, id",
            TASK_COLUMNS
        ))?;
        let rows = stmt.query_map(params![partition.status.as_str(), partition.is_urgent], row_to_task)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

#[async_trait]
impl Repository<Task> for TaskRepository {
    type Draft = NewTask;
    type Patch = TaskUpdate;
    type Filter = TaskFilter;

    async fn create(&self, draft: &NewTask) -> DomainResult<Task> {
        draft.validate()?;
        let mut guard = self.conn.lock().await;
        let tx = guard.transaction()?;
        let partition = draft.partition();
        let position = next_position(&tx, partition)?;
        let now = Utc::now();
        tx.execute(
            "INSERT INTO tasks (title, description, status, priority, is_urgent, position, project, due_at, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)",
            params![
                draft.title.trim(),
                draft.description,
                draft.status.as_str(),
                draft.priority.as_str(),
                partition.is_urgent,
                position,
                draft.project,
                draft.due_at,
                now,
            ],
        )?;
        let id = tx.last_insert_rowid() as TaskId;
        let task = fetch_task(&tx, id)?.ok_or_else(|| DomainError::Internal(format!("Task {} vanished", id)))?;
        tx.commit()?;
        log::info!("created task {} in {:?}", id, partition);
        Ok(task)
    }

    async fn find_by_id(&self, id: TaskId) -> DomainResult<Option<Task>> {
        let conn = self.conn.lock().await;
        fetch_task(&conn, id)
    }

    async fn list(&self, filter: &TaskFilter) -> DomainResult<Vec<Task>> {
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            values.push(Value::Text(status.as_str().to_string()));
        }
        if let Some(priority) = filter.priority {
            clauses.push("priority = ?");
            values.push(Value::Text(priority.as_str().to_string()));
        }
        if let Some(project) = filter.project {
            clauses.push("project = ?");
            values.push(Value::Integer(i64::from(project)));
        }
        if filter.exclude_urgent {
            clauses.push("is_urgent = 0");
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let conn = self.conn.lock().await;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM tasks {}
             ORDER BY CASE status WHEN 'TODO' THEN 0 WHEN 'IN_PROGRESS' THEN 1 ELSE 2 END, is_urgent, position, id",
            TASK_COLUMNS, where_sql
        ))?;
        let rows = stmt.query_map(params_from_iter(values), row_to_task)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    async fn update(&self, id: TaskId, patch: &TaskUpdate) -> DomainResult<Task> {
        let mut guard = self.conn.lock().await;
        let tx = guard.transaction()?;
        let task = update_in(&tx, id, patch)?;
        tx.commit()?;
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let tx = guard.transaction()?;
        let task = fetch_task(&tx, id)?.ok_or_else(|| not_found(id))?;
        tx.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        let partition = Partition::of(&task);
        renumber(&tx, &partition_ids(&tx, partition, None)?)?;
        tx.commit()?;
        log::info!("deleted task {}, {:?} renumbered", id, partition);
        Ok(())
    }
}

/// Apply a partial update; a partition change appends the task to the new partition
fn update_in(conn: &Connection, id: TaskId, patch: &TaskUpdate) -> DomainResult<Task> {
    let mut task = fetch_task(conn, id)?.ok_or_else(|| not_found(id))?;
    let old = Partition::of(&task);

    if let Some(title) = &patch.title {
        validate_title(title)?;
        task.title = title.trim().to_string();
    }
    if let Some(description) = &patch.description {
        task.description = description.clone();
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(is_urgent) = patch.is_urgent {
        task.is_urgent = is_urgent;
    }

    let new = Partition::of(&task);
    if new != old {
        task.position = next_position(conn, new)?;
    }
    conn.execute(
        "UPDATE tasks SET title = ?1, description = ?2, status = ?3, priority = ?4, is_urgent = ?5, position = ?6, updated_at = ?7 WHERE id = ?8",
        params![
            task.title,
            task.description,
            task.status.as_str(),
            task.priority.as_str(),
            task.is_urgent,
            task.position,
            Utc::now(),
            id,
        ],
    )?;
    if new != old {
        renumber(conn, &partition_ids(conn, old, None)?)?;
        log::info!("task {} moved from {:?} to {:?}", id, old, new);
    }
    fetch_task(conn, id)?.ok_or_else(|| not_found(id))
}

pub(super) fn not_found(id: TaskId) -> DomainError {
    DomainError::NotFound(format!("Task {} not found", id))
}

pub(super) fn fetch_task(conn: &Connection, id: TaskId) -> DomainResult<Option<Task>> {
    Ok(conn
        .query_row(
            &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLUMNS),
            params![id],
            row_to_task,
        )
        .optional()?)
}

/// Convert a database row to Task
pub(super) fn row_to_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        status: parsed_column(row, 3)?,
        priority: parsed_column(row, 4)?,
        is_urgent: row.get(5)?,
        position: row.get(6)?,
        project: row.get(7)?,
        due_at: row.get(8)?,
        created_at: row.get(9)?,
        updated_at: row.get(10)?,
    })
}

/// Text column holding an enum; unknown values are a conversion error
fn parsed_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.to_string().into()))
}
