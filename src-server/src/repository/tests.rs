//! Repository Integration Tests
//!
//! TaskRepository against an in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::domain::{
        DomainError, NewTask, Partition, Priority, ReorderCommand, Task, TaskFilter, TaskStatus, TaskUpdate,
    };
    use crate::repository::{init_db, Repository, TaskPositioningOperations, TaskRepository};
    use std::path::Path;

    const TODO: Partition = Partition { status: TaskStatus::Todo, is_urgent: false };
    const DOING: Partition = Partition { status: TaskStatus::InProgress, is_urgent: false };
    const URGENT_TODO: Partition = Partition { status: TaskStatus::Todo, is_urgent: true };

    fn setup_test_db() -> TaskRepository {
        let conn = init_db(Path::new(":memory:")).expect("Failed to init test DB");
        TaskRepository::new(conn)
    }

    async fn seed(repo: &TaskRepository, titles: &[&str], status: TaskStatus, priority: Priority) -> Vec<Task> {
        let mut out = Vec::new();
        for title in titles {
            out.push(repo.create(&NewTask::new(*title, status, priority)).await.unwrap());
        }
        out
    }

    async fn titles(repo: &TaskRepository, partition: Partition) -> Vec<String> {
        repo.list_partition(partition)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect()
    }

    /// Every partition holds positions exactly 0..n-1
    async fn assert_dense(repo: &TaskRepository) {
        for status in TaskStatus::ALL {
            for is_urgent in [false, true] {
                let tasks = repo.list_partition(Partition::new(status, is_urgent)).await.unwrap();
                let positions: Vec<i32> = tasks.iter().map(|t| t.position).collect();
                let expected: Vec<i32> = (0..tasks.len() as i32).collect();
                assert_eq!(positions, expected, "partition {:?}/{}", status, is_urgent);
            }
        }
    }

    fn reorder(id: u32, position: i32, status: TaskStatus, urgent: Option<bool>) -> ReorderCommand {
        ReorderCommand { id, target_position: position, target_status: status, target_is_urgent: urgent }
    }

    #[tokio::test]
    async fn test_create_appends_to_partition() {
        let repo = setup_test_db();
        let created = seed(&repo, &["T1", "T2", "T3"], TaskStatus::Todo, Priority::Medium).await;
        assert!(created[0].id > 0);
        assert_eq!(created.iter().map(|t| t.position).collect::<Vec<_>>(), vec![0, 1, 2]);

        let urgent = repo
            .create(&NewTask::new("U1", TaskStatus::Todo, Priority::Urgent))
            .await
            .unwrap();
        assert!(urgent.is_urgent);
        assert_eq!(urgent.position, 0);
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let repo = setup_test_db();
        let created = repo.create(&NewTask::new("Find me", TaskStatus::Done, Priority::Low)).await.unwrap();

        let found = repo.find_by_id(created.id).await.expect("Find failed").unwrap();
        assert_eq!(found.title, "Find me");
        assert_eq!(found.status, TaskStatus::Done);
        assert_eq!(found.priority, Priority::Low);
        assert!(repo.find_by_id(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_by_status_board_and_position() {
        let repo = setup_test_db();
        seed(&repo, &["done"], TaskStatus::Done, Priority::Low).await;
        seed(&repo, &["u"], TaskStatus::Todo, Priority::Urgent).await;
        seed(&repo, &["a", "b"], TaskStatus::Todo, Priority::Medium).await;
        seed(&repo, &["doing"], TaskStatus::InProgress, Priority::High).await;

        let all: Vec<String> = repo.list(&TaskFilter::default()).await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(all, vec!["a", "b", "u", "doing", "done"]);

        let main_todo = TaskFilter { status: Some(TaskStatus::Todo), exclude_urgent: true, ..TaskFilter::default() };
        let main: Vec<String> = repo.list(&main_todo).await.unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(main, vec!["a", "b"]);

        let high = TaskFilter { priority: Some(Priority::High), ..TaskFilter::default() };
        assert_eq!(repo.list(&high).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reorder_within_column() {
        let repo = setup_test_db();
        let tasks = seed(&repo, &["T1", "T2", "T3"], TaskStatus::Todo, Priority::Medium).await;

        let moved = repo.reorder(&reorder(tasks[2].id, 0, TaskStatus::Todo, None)).await.unwrap();
        assert_eq!(moved.position, 0);
        assert_eq!(titles(&repo, TODO).await, vec!["T3", "T1", "T2"]);

        repo.reorder(&reorder(tasks[2].id, 2, TaskStatus::Todo, None)).await.unwrap();
        assert_eq!(titles(&repo, TODO).await, vec!["T1", "T2", "T3"]);
        assert_dense(&repo).await;
    }

    #[tokio::test]
    async fn test_reorder_across_columns_renumbers_both() {
        let repo = setup_test_db();
        let todo = seed(&repo, &["T1", "T2", "T3"], TaskStatus::Todo, Priority::Medium).await;
        seed(&repo, &["D1"], TaskStatus::InProgress, Priority::Medium).await;

        let moved = repo.reorder(&reorder(todo[0].id, 1, TaskStatus::InProgress, None)).await.unwrap();
        assert_eq!(moved.status, TaskStatus::InProgress);
        assert_eq!(moved.position, 1);
        assert_eq!(titles(&repo, TODO).await, vec!["T2", "T3"]);
        assert_eq!(titles(&repo, DOING).await, vec!["D1", "T1"]);
        assert_dense(&repo).await;
    }

    #[tokio::test]
    async fn test_target_position_is_clamped() {
        let repo = setup_test_db();
        let todo = seed(&repo, &["T1", "T2"], TaskStatus::Todo, Priority::Medium).await;
        let moved = repo.reorder(&reorder(todo[0].id, 50, TaskStatus::Todo, None)).await.unwrap();
        assert_eq!(moved.position, 1);
        assert_dense(&repo).await;
    }

    #[tokio::test]
    async fn test_negative_position_is_rejected() {
        let repo = setup_test_db();
        let todo = seed(&repo, &["T1"], TaskStatus::Todo, Priority::Medium).await;
        let err = repo.reorder(&reorder(todo[0].id, -1, TaskStatus::Todo, None)).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_reorder_unknown_task() {
        let repo = setup_test_db();
        let err = repo.reorder(&reorder(404, 0, TaskStatus::Todo, None)).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_promotion_forces_urgent_priority() {
        let repo = setup_test_db();
        let task = seed(&repo, &["M"], TaskStatus::InProgress, Priority::Medium).await.remove(0);

        let promoted = repo.reorder(&reorder(task.id, 0, TaskStatus::Todo, Some(true))).await.unwrap();
        assert!(promoted.is_urgent);
        assert_eq!(promoted.priority, Priority::Urgent);
        assert_eq!(promoted.status, TaskStatus::Todo);
        assert_eq!(promoted.position, 0);
        assert!(titles(&repo, DOING).await.is_empty());
    }

    #[tokio::test]
    async fn test_demotion_keeps_priority() {
        let repo = setup_test_db();
        let task = seed(&repo, &["U"], TaskStatus::Todo, Priority::Urgent).await.remove(0);
        seed(&repo, &["M"], TaskStatus::Todo, Priority::Medium).await;

        let demoted = repo.reorder(&reorder(task.id, 0, TaskStatus::Todo, Some(false))).await.unwrap();
        assert!(!demoted.is_urgent);
        assert_eq!(demoted.priority, Priority::Urgent);
        assert_eq!(titles(&repo, TODO).await, vec!["U", "M"]);
        assert!(titles(&repo, URGENT_TODO).await.is_empty());
    }

    #[tokio::test]
    async fn test_update_moves_to_end_of_new_partition() {
        let repo = setup_test_db();
        let todo = seed(&repo, &["T1", "T2", "T3"], TaskStatus::Todo, Priority::Medium).await;
        seed(&repo, &["D1", "D2"], TaskStatus::InProgress, Priority::Medium).await;

        let patch = TaskUpdate { status: Some(TaskStatus::InProgress), ..TaskUpdate::default() };
        let updated = repo.update(todo[0].id, &patch).await.unwrap();
        assert_eq!(updated.position, 2);
        assert_eq!(titles(&repo, DOING).await, vec!["D1", "D2", "T1"]);
        assert_eq!(titles(&repo, TODO).await, vec!["T2", "T3"]);
        assert_dense(&repo).await;
    }

    #[tokio::test]
    async fn test_update_in_place_keeps_position() {
        let repo = setup_test_db();
        let todo = seed(&repo, &["T1", "T2"], TaskStatus::Todo, Priority::Medium).await;
        let patch = TaskUpdate { title: Some("Renamed".into()), priority: Some(Priority::High), ..TaskUpdate::default() };
        let updated = repo.update(todo[1].id, &patch).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.priority, Priority::High);
        assert_eq!(updated.position, 1);

        let blank = TaskUpdate { title: Some(" ".into()), ..TaskUpdate::default() };
        assert!(matches!(repo.update(todo[1].id, &blank).await, Err(DomainError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_delete_renumbers_partition() {
        let repo = setup_test_db();
        let todo = seed(&repo, &["T1", "T2", "T3"], TaskStatus::Todo, Priority::Medium).await;

        repo.delete(todo[0].id).await.expect("Delete failed");
        assert!(repo.find_by_id(todo[0].id).await.unwrap().is_none());
        assert_eq!(titles(&repo, TODO).await, vec!["T2", "T3"]);
        assert_dense(&repo).await;

        assert!(matches!(repo.delete(todo[0].id).await, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_reindex_repairs_gaps() {
        let repo = setup_test_db();
        seed(&repo, &["T1", "T2"], TaskStatus::Todo, Priority::Medium).await;
        {
            let conn = repo.conn.lock().await;
            conn.execute("UPDATE tasks SET position = position * 10", []).unwrap();
        }
        repo.reindex_partition(TODO).await.unwrap();
        assert_dense(&repo).await;
        assert_eq!(repo.get_next_position(TODO).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_corrupt_enum_column_is_an_error() {
        let repo = setup_test_db();
        let task = seed(&repo, &["T1"], TaskStatus::Todo, Priority::Medium).await.remove(0);
        {
            let conn = repo.conn.lock().await;
            conn.execute("UPDATE tasks SET status = 'BACKLOG' WHERE id = ?1", [task.id]).unwrap();
        }
        assert!(matches!(repo.find_by_id(task.id).await, Err(DomainError::Internal(_))));

        {
            let conn = repo.conn.lock().await;
            conn.execute("UPDATE tasks SET status = 'TODO', priority = 'SOMEDAY' WHERE id = ?1", [task.id])
                .unwrap();
        }
        assert!(matches!(repo.find_by_id(task.id).await, Err(DomainError::Internal(_))));
    }
}
