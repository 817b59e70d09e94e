//! Reorder Command Dispatcher
//!
//! Classifies a drop (in-place reorder, move across columns, promotion into or
//! demotion out of the urgent board) and issues the backend mutation(s).
//! No local renumbering happens here: every call that changed server state
//! asks the caller to refetch.

use async_trait::async_trait;

use crate::config::MoveStrategy;
use crate::controller::DropRequest;
use crate::error::ApiError;
use crate::model::{Priority, ReorderCommand, Task, TaskId, TaskUpdate};

/// Backend mutations the dispatcher needs
#[async_trait(?Send)]
pub trait TaskApi {
    /// `PATCH /tasks/{id}/reorder/`
    async fn reorder_task(&self, command: &ReorderCommand) -> Result<Task, ApiError>;

    /// `PATCH /tasks/{id}/`
    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<Task, ApiError>;
}

// ========================
// Planning
// ========================

#[derive(Debug, Clone, PartialEq)]
pub enum ReorderPlan {
    /// Card would land where it already is
    Noop,
    Reorder(ReorderCommand),
    UpdateThenReorder(TaskUpdate, ReorderCommand),
}

impl ReorderPlan {
    pub fn call_count(&self) -> usize {
        match self {
            ReorderPlan::Noop => 0,
            ReorderPlan::Reorder(_) => 1,
            ReorderPlan::UpdateThenReorder(..) => 2,
        }
    }
}

/// Final position in the target partition once the card has left its slot
pub fn final_position(request: &DropRequest) -> usize {
    if request.source == request.target && request.target_index > request.source_index {
        request.target_index - 1
    } else {
        request.target_index
    }
}

pub fn plan(request: &DropRequest, strategy: MoveStrategy) -> ReorderPlan {
    let id = request.task_id();
    let position = final_position(request);
    let target = request.target;

    if request.source == target {
        if position == request.source_index {
            return ReorderPlan::Noop;
        }
        return ReorderPlan::Reorder(ReorderCommand {
            id,
            target_position: position as i32,
            target_status: target.status,
            target_is_urgent: None,
        });
    }

    let promote = target.is_urgent();
    match strategy {
        MoveStrategy::Combined => ReorderPlan::Reorder(ReorderCommand {
            id,
            target_position: position as i32,
            target_status: target.status,
            target_is_urgent: Some(promote),
        }),
        MoveStrategy::TwoStep => {
            let update = TaskUpdate {
                status: Some(target.status),
                priority: promote.then_some(Priority::Urgent),
                is_urgent: Some(promote),
                ..TaskUpdate::default()
            };
            let command = ReorderCommand {
                id,
                target_position: position as i32,
                target_status: target.status,
                target_is_urgent: None,
            };
            ReorderPlan::UpdateThenReorder(update, command)
        }
    }
}

// ========================
// Notices
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoticeVariant {
    #[default]
    Default,
    Destructive,
}

/// Transient, non-blocking user notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn reordered() -> Self {
        Self {
            title: "Tâche réordonnée".to_string(),
            description: "La position de la tâche a été mise à jour.".to_string(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn moved(column_label: &str) -> Self {
        Self {
            title: "Tâche déplacée".to_string(),
            description: format!("La tâche a été déplacée vers \"{}\".", column_label),
            variant: NoticeVariant::Default,
        }
    }

    pub fn failed() -> Self {
        Self {
            title: "Erreur".to_string(),
            description: "Impossible de déplacer la tâche.".to_string(),
            variant: NoticeVariant::Destructive,
        }
    }
}

// ========================
// Dispatcher
// ========================

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchOutcome {
    /// Mutations attempted, including a failing one
    pub calls: usize,
    /// Server state changed; the board must be reloaded
    pub needs_refetch: bool,
    pub task: Option<Task>,
    pub notice: Option<Notice>,
    pub error: Option<ApiError>,
}

impl DispatchOutcome {
    fn noop() -> Self {
        Self { calls: 0, needs_refetch: false, task: None, notice: None, error: None }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

pub struct ReorderDispatcher<A> {
    api: A,
    strategy: MoveStrategy,
}

impl<A: TaskApi> ReorderDispatcher<A> {
    pub fn new(api: A, strategy: MoveStrategy) -> Self {
        Self { api, strategy }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn strategy(&self) -> MoveStrategy {
        self.strategy
    }

    pub async fn dispatch(&self, request: &DropRequest) -> DispatchOutcome {
        let plan = plan(request, self.strategy);
        let success = if request.source == request.target {
            Notice::reordered()
        } else {
            Notice::moved(&request.target.label())
        };

        match plan {
            ReorderPlan::Noop => {
                log::debug!("[DND] task {} dropped in place", request.task_id());
                DispatchOutcome::noop()
            }
            ReorderPlan::Reorder(command) => match self.api.reorder_task(&command).await {
                Ok(task) => DispatchOutcome {
                    calls: 1,
                    needs_refetch: true,
                    task: Some(task),
                    notice: Some(success),
                    error: None,
                },
                Err(e) => {
                    log::error!("[DND] reorder of task {} failed: {}", command.id, e);
                    DispatchOutcome {
                        calls: 1,
                        needs_refetch: false,
                        task: None,
                        notice: Some(Notice::failed()),
                        error: Some(e),
                    }
                }
            },
            ReorderPlan::UpdateThenReorder(update, command) => {
                if let Err(e) = self.api.update_task(command.id, &update).await {
                    log::error!("[DND] update of task {} failed: {}", command.id, e);
                    return DispatchOutcome {
                        calls: 1,
                        needs_refetch: false,
                        task: None,
                        notice: Some(Notice::failed()),
                        error: Some(e),
                    };
                }
                match self.api.reorder_task(&command).await {
                    Ok(task) => DispatchOutcome {
                        calls: 2,
                        needs_refetch: true,
                        task: Some(task),
                        notice: Some(success),
                        error: None,
                    },
                    Err(e) => {
                        // status already changed server-side
                        log::error!("[DND] reorder of task {} failed after update: {}", command.id, e);
                        DispatchOutcome {
                            calls: 2,
                            needs_refetch: true,
                            task: None,
                            notice: Some(Notice::failed()),
                            error: Some(e),
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::model::{ColumnKey, DragPayload, TaskStatus};

    const TODO: ColumnKey = ColumnKey::main(TaskStatus::Todo);
    const DOING: ColumnKey = ColumnKey::main(TaskStatus::InProgress);

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Reorder(ReorderCommand),
        Update(TaskId, TaskUpdate),
    }

    #[derive(Default)]
    struct RecordingApi {
        calls: RefCell<Vec<Call>>,
        fail_reorder: bool,
        fail_update: bool,
    }

    #[async_trait(?Send)]
    impl TaskApi for RecordingApi {
        async fn reorder_task(&self, command: &ReorderCommand) -> Result<Task, ApiError> {
            self.calls.borrow_mut().push(Call::Reorder(command.clone()));
            if self.fail_reorder {
                return Err(ApiError::Rejected { status: 500, message: "boom".into() });
            }
            let mut task = Task::new(command.id, "T", command.target_status, Priority::Medium);
            task.position = command.target_position;
            Ok(task)
        }

        async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<Task, ApiError> {
            self.calls.borrow_mut().push(Call::Update(id, update.clone()));
            if self.fail_update {
                return Err(ApiError::Network("offline".into()));
            }
            Ok(Task::new(id, "T", update.status.unwrap_or_default(), Priority::Medium))
        }
    }

    fn request(id: TaskId, source: ColumnKey, source_index: usize, target: ColumnKey, target_index: usize) -> DropRequest {
        DropRequest {
            payload: DragPayload { id, status: source.status, priority: Priority::Medium, position: None },
            source,
            source_index,
            target,
            target_index,
        }
    }

    #[test]
    fn moving_down_in_place_subtracts_one() {
        // [T1,T2,T3], T1 dropped before T3 (index 2) lands at 1
        let req = request(1, TODO, 0, TODO, 2);
        assert_eq!(final_position(&req), 1);
        match plan(&req, MoveStrategy::Combined) {
            ReorderPlan::Reorder(cmd) => {
                assert_eq!(cmd.target_position, 1);
                assert_eq!(cmd.target_status, TaskStatus::Todo);
                assert_eq!(cmd.target_is_urgent, None);
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn moving_up_keeps_the_index() {
        let req = request(3, TODO, 2, TODO, 0);
        assert_eq!(final_position(&req), 0);
    }

    #[test]
    fn same_slot_is_noop() {
        assert_eq!(plan(&request(2, TODO, 1, TODO, 1), MoveStrategy::Combined), ReorderPlan::Noop);
        assert_eq!(plan(&request(2, TODO, 1, TODO, 2), MoveStrategy::TwoStep), ReorderPlan::Noop);
    }

    #[test]
    fn promotion_forces_urgent_priority_in_two_step() {
        let urgent_todo = ColumnKey::urgent(TaskStatus::Todo).unwrap();
        match plan(&request(5, DOING, 0, urgent_todo, 0), MoveStrategy::TwoStep) {
            ReorderPlan::UpdateThenReorder(update, cmd) => {
                assert_eq!(update.status, Some(TaskStatus::Todo));
                assert_eq!(update.priority, Some(Priority::Urgent));
                assert_eq!(update.is_urgent, Some(true));
                assert_eq!(cmd.target_position, 0);
            }
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[test]
    fn demotion_keeps_priority() {
        let urgent_todo = ColumnKey::urgent(TaskStatus::Todo).unwrap();
        match plan(&request(5, urgent_todo, 0, DOING, 0), MoveStrategy::TwoStep) {
            ReorderPlan::UpdateThenReorder(update, _) => {
                assert_eq!(update.priority, None);
                assert_eq!(update.is_urgent, Some(false));
            }
            other => panic!("unexpected plan {:?}", other),
        }
        match plan(&request(5, urgent_todo, 0, DOING, 0), MoveStrategy::Combined) {
            ReorderPlan::Reorder(cmd) => assert_eq!(cmd.target_is_urgent, Some(false)),
            other => panic!("unexpected plan {:?}", other),
        }
    }

    #[tokio::test]
    async fn noop_issues_no_call() {
        let dispatcher = ReorderDispatcher::new(RecordingApi::default(), MoveStrategy::Combined);
        let outcome = dispatcher.dispatch(&request(2, TODO, 1, TODO, 1)).await;
        assert_eq!(outcome.calls, 0);
        assert!(!outcome.needs_refetch);
        assert!(outcome.notice.is_none());
        assert!(dispatcher.api().calls.borrow().is_empty());
    }

    #[tokio::test]
    async fn cross_column_combined_is_one_call() {
        let dispatcher = ReorderDispatcher::new(RecordingApi::default(), MoveStrategy::Combined);
        let outcome = dispatcher.dispatch(&request(1, TODO, 0, DOING, 0)).await;
        assert!(outcome.is_success());
        assert!(outcome.needs_refetch);
        assert_eq!(outcome.notice, Some(Notice::moved("En cours")));
        let calls = dispatcher.api().calls.borrow();
        assert_eq!(
            *calls,
            vec![Call::Reorder(ReorderCommand {
                id: 1,
                target_position: 0,
                target_status: TaskStatus::InProgress,
                target_is_urgent: Some(false),
            })]
        );
    }

    #[tokio::test]
    async fn reorder_in_place_notice() {
        let dispatcher = ReorderDispatcher::new(RecordingApi::default(), MoveStrategy::Combined);
        let outcome = dispatcher.dispatch(&request(3, TODO, 2, TODO, 0)).await;
        assert_eq!(outcome.notice, Some(Notice::reordered()));
        assert_eq!(outcome.task.map(|t| t.position), Some(0));
    }

    #[tokio::test]
    async fn failed_reorder_notifies_without_refetch() {
        let api = RecordingApi { fail_reorder: true, ..RecordingApi::default() };
        let dispatcher = ReorderDispatcher::new(api, MoveStrategy::Combined);
        let outcome = dispatcher.dispatch(&request(3, TODO, 2, TODO, 0)).await;
        assert!(!outcome.is_success());
        assert!(!outcome.needs_refetch);
        assert_eq!(outcome.notice.map(|n| n.variant), Some(NoticeVariant::Destructive));
    }

    #[tokio::test]
    async fn partial_two_step_failure_still_refetches() {
        let api = RecordingApi { fail_reorder: true, ..RecordingApi::default() };
        let dispatcher = ReorderDispatcher::new(api, MoveStrategy::TwoStep);
        let outcome = dispatcher.dispatch(&request(1, TODO, 0, DOING, 0)).await;
        assert_eq!(outcome.calls, 2);
        assert!(outcome.needs_refetch);
        assert_eq!(outcome.notice, Some(Notice::failed()));
    }

    #[tokio::test]
    async fn failed_update_skips_reorder() {
        let api = RecordingApi { fail_update: true, ..RecordingApi::default() };
        let dispatcher = ReorderDispatcher::new(api, MoveStrategy::TwoStep);
        let outcome = dispatcher.dispatch(&request(1, TODO, 0, DOING, 0)).await;
        assert_eq!(outcome.calls, 1);
        assert!(!outcome.needs_refetch);
        assert_eq!(dispatcher.api().calls.borrow().len(), 1);
        assert!(matches!(outcome.error, Some(ApiError::Network(_))));
    }
}
