//! Pointer Session Tracker
//!
//! Identity and origin of the card being dragged, independent of whether the
//! gesture came from a mouse or a finger.

use crate::geometry::Point;
use crate::model::{ColumnKey, DragPayload, Task, TaskId};

/// Input model a board was mounted with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Native HTML drag-and-drop (`dragstart` / `dragover` / `drop` / `dragend`)
    #[default]
    Mouse,
    /// Hand-rolled gestures on `touchstart` / `touchmove` / `touchend` / `touchcancel`
    Touch,
}

impl InputMode {
    /// Pick the mode once from touch-capability detection
    pub fn detect(touch_capable: bool) -> Self {
        if touch_capable {
            InputMode::Touch
        } else {
            InputMode::Mouse
        }
    }
}

/// What a card knows about itself when it is grabbed
#[derive(Debug, Clone, PartialEq)]
pub struct Grab {
    pub payload: DragPayload,
    pub source: ColumnKey,
    pub source_index: usize,
    pub at: Point,
    pub now_ms: f64,
}

impl Grab {
    pub fn new(task: &Task, source: ColumnKey, source_index: usize, at: Point, now_ms: f64) -> Self {
        Self {
            payload: DragPayload::from(task),
            source,
            source_index,
            at,
            now_ms,
        }
    }
}

/// An active drag
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub payload: DragPayload,
    pub source: ColumnKey,
    pub source_index: usize,
    pub mode: InputMode,
    pub origin: Point,
}

impl DragSession {
    pub fn from_grab(grab: Grab, mode: InputMode) -> Self {
        Self {
            payload: grab.payload,
            source: grab.source,
            source_index: grab.source_index,
            mode,
            origin: grab.at,
        }
    }

    pub fn task_id(&self) -> TaskId {
        self.payload.id
    }

    /// Indicator slots that would leave the card where it already is
    pub fn is_noop_slot(&self, column: ColumnKey, index: usize) -> bool {
        column == self.source && (index == self.source_index || index == self.source_index + 1)
    }
}
