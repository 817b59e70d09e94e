//! Task Positioning Operations
//!
//! Keeps positions dense (`0..n-1`) inside every `(status, is_urgent)`
//! partition. All writes for one request happen inside a single transaction.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection};

use super::task_repo::{fetch_task, not_found, TaskRepository};
use crate::domain::{DomainError, DomainResult, Partition, Priority, ReorderCommand, Task, TaskId};

/// Trait for task positioning operations
#[async_trait]
pub trait TaskPositioningOperations {
    /// Position a new task gets in `partition` (its end)
    async fn get_next_position(&self, partition: Partition) -> DomainResult<i32>;

    /// Reindex a partition to be sequential (0, 1, 2, ...)
    async fn reindex_partition(&self, partition: Partition) -> DomainResult<()>;

    /// Move a task to `target_position` of the target partition, renumbering
    /// both the source and target partitions
    async fn reorder(&self, command: &ReorderCommand) -> DomainResult<Task>;
}

#[async_trait]
impl TaskPositioningOperations for TaskRepository {
    async fn get_next_position(&self, partition: Partition) -> DomainResult<i32> {
        let conn = self.conn.lock().await;
        next_position(&conn, partition)
    }

    async fn reindex_partition(&self, partition: Partition) -> DomainResult<()> {
        let mut guard = self.conn.lock().await;
        let tx = guard.transaction()?;
        renumber(&tx, &partition_ids(&tx, partition, None)?)?;
        tx.commit()?;
        Ok(())
    }

    async fn reorder(&self, command: &ReorderCommand) -> DomainResult<Task> {
        let mut guard = self.conn.lock().await;
        let tx = guard.transaction()?;
        let task = reorder_in(&tx, command)?;
        tx.commit()?;
        Ok(task)
    }
}

fn reorder_in(conn: &Connection, command: &ReorderCommand) -> DomainResult<Task> {
    if command.target_position < 0 {
        return Err(DomainError::InvalidInput(format!(
            "target_position must be >= 0, got {}",
            command.target_position
        )));
    }
    let id = command.id;
    let task = fetch_task(conn, id)?.ok_or_else(|| not_found(id))?;
    let source = Partition::of(&task);
    let target = Partition::new(
        command.target_status,
        command.target_is_urgent.unwrap_or(task.is_urgent),
    );

    let mut ids = partition_ids(conn, target, Some(id))?;
    let position = (command.target_position as usize).min(ids.len());
    ids.insert(position, id);

    // promotion forces URGENT; demotion keeps whatever priority the task had
    let priority = if command.target_is_urgent == Some(true) {
        Priority::Urgent
    } else {
        task.priority
    };
    conn.execute(
        "UPDATE tasks SET status = ?1, is_urgent = ?2, priority = ?3, updated_at = ?4 WHERE id = ?5",
        params![target.status.as_str(), target.is_urgent, priority.as_str(), Utc::now(), id],
    )?;
    renumber(conn, &ids)?;
    if source != target {
        renumber(conn, &partition_ids(conn, source, None)?)?;
    }

    log::info!(
        "task {} reordered: {:?}[{}] -> {:?}[{}]",
        id,
        source,
        task.position,
        target,
        position
    );
    fetch_task(conn, id)?.ok_or_else(|| not_found(id))
}

pub(super) fn next_position(conn: &Connection, partition: Partition) -> DomainResult<i32> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE status = ?1 AND is_urgent = ?2",
        params![partition.status.as_str(), partition.is_urgent],
        |row| row.get::<_, i32>(0),
    )?)
}

/// Ids of a partition in stored order, optionally leaving one out
pub(super) fn partition_ids(conn: &Connection, partition: Partition, except: Option<TaskId>) -> DomainResult<Vec<TaskId>> {
    let mut stmt =
        conn.prepare("SELECT id FROM tasks WHERE status = ?1 AND is_urgent = ?2 ORDER BY position, id")?;
    let rows = stmt.query_map(params![partition.status.as_str(), partition.is_urgent], |row| {
        row.get::<_, TaskId>(0)
    })?;
    let mut ids = Vec::new();
    for id in rows {
        let id = id?;
        if Some(id) != except {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Write positions `0..ids.len()` in the given order
pub(super) fn renumber(conn: &Connection, ids: &[TaskId]) -> DomainResult<()> {
    let mut stmt = conn.prepare("UPDATE tasks SET position = ?1 WHERE id = ?2 AND position != ?1")?;
    for (position, id) in ids.iter().enumerate() {
        stmt.execute(params![position as i32, id])?;
    }
    Ok(())
}
