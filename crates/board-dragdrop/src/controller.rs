//! Drag Session State Machine
//!
//! `Idle -> Dragging -> Idle`. One controller is shared by every column of
//! every board, so a card can travel between the main and urgent boards.

use crate::error::DragError;
use crate::geometry::Point;
use crate::model::{ColumnKey, DragPayload, TaskId};
use crate::resolver::{BoardLayout, Slot};
use crate::session::DragSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Dragging,
}

/// Insertion line position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropIndicator {
    pub column: ColumnKey,
    pub index: usize,
}

/// A drop the dispatcher should act on
///
/// `target_index` is in the target column's display order, dragged card included.
#[derive(Debug, Clone, PartialEq)]
pub struct DropRequest {
    pub payload: DragPayload,
    pub source: ColumnKey,
    pub source_index: usize,
    pub target: ColumnKey,
    pub target_index: usize,
}

impl DropRequest {
    pub fn task_id(&self) -> TaskId {
        self.payload.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Released over no registered column
    OutsideTargets,
    /// Non-empty column without an indicator (no-op slot or over the card itself)
    NoIndicator,
    /// Escape, touch cancel, or `dragend` without a drop
    Aborted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    Drop(DropRequest),
    Cancelled(CancelReason),
    /// No matching session; nothing to do
    Ignored,
}

#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
    drag_over: Option<ColumnKey>,
    indicator: Option<DropIndicator>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        if self.session.is_some() {
            DragPhase::Dragging
        } else {
            DragPhase::Idle
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn dragged_item_id(&self) -> Option<TaskId> {
        self.session.as_ref().map(DragSession::task_id)
    }

    /// Column currently hovered
    pub fn drag_over(&self) -> Option<ColumnKey> {
        self.drag_over
    }

    pub fn indicator(&self) -> Option<DropIndicator> {
        self.indicator
    }

    /// Whole-column highlight, only for empty columns
    pub fn is_column_highlighted(&self, column: ColumnKey, column_len: usize) -> bool {
        column_len == 0 && self.drag_over == Some(column)
    }

    /// Indicator index if the line belongs in `column`
    pub fn indicator_in(&self, column: ColumnKey) -> Option<usize> {
        self.indicator.filter(|i| i.column == column).map(|i| i.index)
    }

    pub fn begin(&mut self, session: DragSession) -> Result<(), DragError> {
        if let Some(active) = &self.session {
            return Err(DragError::SessionActive(active.task_id()));
        }
        log::debug!(
            "[DND] begin task={} from {}[{}] via {:?}",
            session.task_id(),
            session.source,
            session.source_index,
            session.mode
        );
        self.session = Some(session);
        self.drag_over = None;
        self.indicator = None;
        Ok(())
    }

    /// Begin a session, ending any stale one first
    ///
    /// A single pointer is in one gesture at a time, so a session still open
    /// when the pointer grabs again lost its `dragend`.
    pub fn restart(&mut self, session: DragSession) {
        if let Some(stale) = self.dragged_item_id() {
            log::warn!("[DND] session for task {} never ended; replacing it", stale);
            self.terminate();
        }
        self.session = Some(session);
        self.drag_over = None;
        self.indicator = None;
    }

    /// Recompute hovered column and indicator for a pointer position
    pub fn hover(&mut self, layout: &BoardLayout, at: Point) {
        let Some(session) = &self.session else {
            return;
        };
        match layout.resolve(at, Some(session.task_id())) {
            None => {
                self.drag_over = None;
                self.indicator = None;
            }
            Some(res) => {
                self.drag_over = Some(res.column);
                self.indicator = match res.slot {
                    Slot::At(index) if !session.is_noop_slot(res.column, index) => {
                        Some(DropIndicator { column: res.column, index })
                    }
                    _ => None,
                };
            }
        }
    }

    /// Pointer left a drop zone; the session keeps going
    pub fn leave(&mut self) {
        self.drag_over = None;
    }

    /// Release over an explicit column (native `drop` on a drop zone)
    pub fn drop_on(
        &mut self,
        column: ColumnKey,
        column_len: usize,
        payload: Option<&DragPayload>,
    ) -> DropOutcome {
        let Some(session) = &self.session else {
            log::debug!("[DND] drop on {} without a session", column);
            return DropOutcome::Ignored;
        };
        if let Some(p) = payload {
            if p.id != session.task_id() {
                log::warn!("[DND] payload names task {} but session holds {}", p.id, session.task_id());
                self.terminate();
                return DropOutcome::Ignored;
            }
        }

        let target_index = match self.indicator_in(column) {
            Some(index) => index,
            None if column_len == 0 => 0,
            None => {
                self.terminate();
                return DropOutcome::Cancelled(CancelReason::NoIndicator);
            }
        };

        let request = DropRequest {
            payload: session.payload.clone(),
            source: session.source,
            source_index: session.source_index,
            target: column,
            target_index,
        };
        self.terminate();
        log::debug!("[DND] drop task={} on {}[{}]", request.task_id(), column, target_index);
        DropOutcome::Drop(request)
    }

    /// Release at a point (touch end): resolve the column from the layout
    pub fn drop_at(&mut self, layout: &BoardLayout, at: Point, payload: Option<&DragPayload>) -> DropOutcome {
        if self.session.is_none() {
            return DropOutcome::Ignored;
        }
        self.hover(layout, at);
        match layout.column_at(at) {
            Some(region) => {
                let (column, len) = (region.column, region.len());
                self.drop_on(column, len, payload)
            }
            None => {
                self.terminate();
                DropOutcome::Cancelled(CancelReason::OutsideTargets)
            }
        }
    }

    /// Escape / touch cancel. Returns whether a session was terminated.
    pub fn cancel(&mut self) -> bool {
        self.terminate()
    }

    /// `dragend` / `touchend` bookkeeping; a no-op after a drop already ended the session
    pub fn end(&mut self) -> bool {
        self.terminate()
    }

    fn terminate(&mut self) -> bool {
        self.drag_over = None;
        self.indicator = None;
        match self.session.take() {
            Some(session) => {
                log::debug!("[DND] session for task {} ended", session.task_id());
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{Priority, Task, TaskStatus};
    use crate::resolver::ColumnRegion;
    use crate::session::{Grab, InputMode};

    const TODO: ColumnKey = ColumnKey::main(TaskStatus::Todo);
    const DOING: ColumnKey = ColumnKey::main(TaskStatus::InProgress);

    fn layout() -> BoardLayout {
        let mut todo = ColumnRegion::new(TODO, Rect::new(0.0, 0.0, 240.0, 600.0));
        for (i, id) in [1u32, 2, 3].iter().enumerate() {
            todo = todo.with_card(*id, Rect::new(10.0, 50.0 + i as f64 * 48.0, 220.0, 40.0));
        }
        BoardLayout::new()
            .with_column(todo)
            .with_column(ColumnRegion::new(DOING, Rect::new(250.0, 0.0, 240.0, 600.0)))
    }

    fn start(ctl: &mut DragController, id: u32, index: usize) {
        let task = Task::new(id, format!("T{}", id), TaskStatus::Todo, Priority::Medium);
        let grab = Grab::new(&task, TODO, index, Point::new(100.0, 70.0), 0.0);
        ctl.begin(DragSession::from_grab(grab, InputMode::Mouse)).unwrap();
    }

    #[test]
    fn idle_controller_has_no_dragged_item() {
        let ctl = DragController::new();
        assert_eq!(ctl.phase(), DragPhase::Idle);
        assert_eq!(ctl.dragged_item_id(), None);
    }

    #[test]
    fn second_session_is_rejected() {
        let mut ctl = DragController::new();
        start(&mut ctl, 1, 0);
        let task = Task::new(2, "T2", TaskStatus::Todo, Priority::Medium);
        let grab = Grab::new(&task, TODO, 1, Point::default(), 0.0);
        assert!(matches!(
            ctl.begin(DragSession::from_grab(grab, InputMode::Mouse)),
            Err(DragError::SessionActive(1))
        ));
    }

    #[test]
    fn restart_replaces_a_session_whose_end_was_lost() {
        let mut ctl = DragController::new();
        start(&mut ctl, 1, 0);
        ctl.hover(&layout(), Point::new(300.0, 200.0));

        let task = Task::new(3, "T3", TaskStatus::Todo, Priority::Medium);
        let grab = Grab::new(&task, TODO, 2, Point::new(100.0, 160.0), 0.0);
        ctl.restart(DragSession::from_grab(grab, InputMode::Mouse));

        assert_eq!(ctl.dragged_item_id(), Some(3));
        assert_eq!(ctl.drag_over(), None);
        ctl.hover(&layout(), Point::new(100.0, 55.0));
        assert_eq!(
            ctl.drop_on(TODO, 3, None),
            DropOutcome::Drop(DropRequest {
                payload: DragPayload::from(&task),
                source: TODO,
                source_index: 2,
                target: TODO,
                target_index: 0,
            })
        );
    }

    #[test]
    fn hover_non_empty_column_sets_indicator_not_highlight() {
        let mut ctl = DragController::new();
        start(&mut ctl, 3, 2);
        ctl.hover(&layout(), Point::new(100.0, 55.0));
        assert_eq!(ctl.indicator(), Some(DropIndicator { column: TODO, index: 0 }));
        assert!(!ctl.is_column_highlighted(TODO, 3));
    }

    #[test]
    fn hover_empty_column_highlights_without_indicator() {
        let mut ctl = DragController::new();
        start(&mut ctl, 1, 0);
        ctl.hover(&layout(), Point::new(300.0, 200.0));
        assert_eq!(ctl.drag_over(), Some(DOING));
        assert_eq!(ctl.indicator(), None);
        assert!(ctl.is_column_highlighted(DOING, 0));
    }

    #[test]
    fn noop_slots_show_nothing() {
        let mut ctl = DragController::new();
        start(&mut ctl, 2, 1);
        // below card 1's midpoint resolves to slot 2, right after the dragged card
        ctl.hover(&layout(), Point::new(100.0, 75.0));
        assert_eq!(ctl.indicator(), None);
        // above card 1's midpoint is a real move
        ctl.hover(&layout(), Point::new(100.0, 60.0));
        assert_eq!(ctl.indicator(), Some(DropIndicator { column: TODO, index: 0 }));
        // at the bottom: slot 3 is a real move too
        ctl.hover(&layout(), Point::new(100.0, 400.0));
        assert_eq!(ctl.indicator(), Some(DropIndicator { column: TODO, index: 3 }));
        // back onto the dragged card
        ctl.hover(&layout(), Point::new(100.0, 110.0));
        assert_eq!(ctl.indicator(), None);
        assert_eq!(ctl.drag_over(), Some(TODO));
    }

    #[test]
    fn leave_keeps_session_and_clears_column() {
        let mut ctl = DragController::new();
        start(&mut ctl, 1, 0);
        ctl.hover(&layout(), Point::new(300.0, 200.0));
        ctl.leave();
        assert_eq!(ctl.drag_over(), None);
        assert_eq!(ctl.phase(), DragPhase::Dragging);
    }

    #[test]
    fn drop_uses_live_indicator() {
        let mut ctl = DragController::new();
        start(&mut ctl, 3, 2);
        ctl.hover(&layout(), Point::new(100.0, 55.0));
        let outcome = ctl.drop_on(TODO, 3, None);
        let DropOutcome::Drop(req) = outcome else { panic!("expected a drop, got {:?}", outcome) };
        assert_eq!(req.target_index, 0);
        assert_eq!(req.source_index, 2);
        assert_eq!(ctl.dragged_item_id(), None);
    }

    #[test]
    fn drop_into_empty_column_lands_at_zero() {
        let mut ctl = DragController::new();
        start(&mut ctl, 1, 0);
        let outcome = ctl.drop_at(&layout(), Point::new(300.0, 400.0), None);
        let DropOutcome::Drop(req) = outcome else { panic!("expected a drop, got {:?}", outcome) };
        assert_eq!((req.target, req.target_index), (DOING, 0));
    }

    #[test]
    fn drop_without_indicator_on_non_empty_column_cancels() {
        let mut ctl = DragController::new();
        start(&mut ctl, 2, 1);
        assert_eq!(ctl.drop_on(TODO, 3, None), DropOutcome::Cancelled(CancelReason::NoIndicator));
        assert_eq!(ctl.phase(), DragPhase::Idle);
    }

    #[test]
    fn drop_outside_columns_cancels() {
        let mut ctl = DragController::new();
        start(&mut ctl, 1, 0);
        assert_eq!(
            ctl.drop_at(&layout(), Point::new(900.0, 10.0), None),
            DropOutcome::Cancelled(CancelReason::OutsideTargets)
        );
    }

    #[test]
    fn mismatched_payload_is_ignored() {
        let mut ctl = DragController::new();
        start(&mut ctl, 1, 0);
        let stranger = DragPayload::from(&Task::new(99, "x", TaskStatus::Done, Priority::Low));
        assert_eq!(ctl.drop_on(DOING, 0, Some(&stranger)), DropOutcome::Ignored);
        assert!(!ctl.is_dragging());
    }

    #[test]
    fn terminal_events_are_idempotent() {
        let mut ctl = DragController::new();
        start(&mut ctl, 3, 2);
        ctl.hover(&layout(), Point::new(100.0, 55.0));
        assert!(matches!(ctl.drop_on(TODO, 3, None), DropOutcome::Drop(_)));
        // dragend fires on the source after the drop handler
        assert!(!ctl.end());
        assert!(!ctl.cancel());
        assert_eq!(ctl.drop_on(TODO, 3, None), DropOutcome::Ignored);
        assert_eq!(ctl.indicator(), None);
    }
}
