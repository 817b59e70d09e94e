//! Database Connection and Setup
//!
//! Opens the SQLite file and runs migrations.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared connection; every repository call locks it for one transaction
pub type DbConn = Arc<Mutex<Connection>>;

/// Open (or create) the database at `db_path`; `:memory:` works for tests
pub fn init_db(db_path: &Path) -> DomainResult<DbConn> {
    let conn = if db_path.as_os_str() == ":memory:" {
        Connection::open_in_memory()
    } else {
        Connection::open(db_path)
    }
    .map_err(|e| DomainError::Internal(format!("Failed to open db: {}", e)))?;

    run_migrations(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> DomainResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;
    for name in names {
        if name? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'TODO',
            priority TEXT NOT NULL DEFAULT 'MEDIUM',
            position INTEGER NOT NULL DEFAULT 0,
            project INTEGER,
            due_at TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // board membership, split from priority so demotion can keep URGENT
    if !column_exists(conn, "tasks", "is_urgent")? {
        conn.execute("ALTER TABLE tasks ADD COLUMN is_urgent INTEGER NOT NULL DEFAULT 0", [])
            .map_err(|e| DomainError::Internal(format!("Failed to add is_urgent: {}", e)))?;
        conn.execute("UPDATE tasks SET is_urgent = 1 WHERE priority = 'URGENT'", [])?;
    }

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tasks_partition ON tasks(status, is_urgent, position)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let conn = init_db(Path::new(":memory:")).unwrap();
        let guard = conn.lock().await;
        run_migrations(&guard).unwrap();
        assert!(column_exists(&guard, "tasks", "is_urgent").unwrap());
        assert!(!column_exists(&guard, "tasks", "urgent").unwrap());
    }

    #[test]
    fn legacy_urgent_rows_are_backfilled() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(
                "CREATE TABLE tasks (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    status TEXT NOT NULL DEFAULT 'TODO',
                    priority TEXT NOT NULL DEFAULT 'MEDIUM',
                    position INTEGER NOT NULL DEFAULT 0,
                    project INTEGER,
                    due_at TEXT,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )",
                [],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO tasks (title, priority, created_at, updated_at) VALUES ('a', 'URGENT', 'x', 'x'), ('b', 'LOW', 'x', 'x')",
                [],
            )
            .unwrap();
        }
        let conn = Connection::open(&path).unwrap();
        run_migrations(&conn).unwrap();
        let urgent: i64 = conn
            .query_row("SELECT COUNT(*) FROM tasks WHERE is_urgent = 1", [], |r| r.get(0))
            .unwrap();
        assert_eq!(urgent, 1);
    }
}
