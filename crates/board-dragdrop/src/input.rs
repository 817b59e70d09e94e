//! Input Drivers
//!
//! One capability interface (`start`, `track`, `release`, `cancel`) with a mouse
//! implementation over native drag events and a touch implementation that adds
//! long-press activation. A board picks its driver once, at mount.

use crate::config::DragConfig;
use crate::controller::{DragController, DropOutcome};
use crate::error::DragError;
use crate::geometry::Point;
use crate::model::DragPayload;
use crate::resolver::BoardLayout;
use crate::session::{DragSession, Grab, InputMode};

/// Result of a `start` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartEffect {
    /// Session is live
    Active,
    /// Waiting for the long press to complete
    Pending,
}

/// Result of a `track` or `poll` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackEffect {
    /// Nothing in progress for this driver
    Ignored,
    /// Long press still counting down
    Pending,
    /// Finger moved too far before activation; the page should scroll
    Abandoned,
    /// Long press completed; the session just began
    Activated,
    /// Session live, indicator recomputed
    Hovering,
}

impl TrackEffect {
    /// Whether the host should suppress the browser's default handling
    pub fn captures_pointer(&self) -> bool {
        matches!(self, TrackEffect::Activated | TrackEffect::Hovering)
    }
}

pub trait DragDriver: Send + Sync {
    fn mode(&self) -> InputMode;

    fn start(&mut self, ctl: &mut DragController, grab: Grab) -> Result<StartEffect, DragError>;

    fn track(&mut self, ctl: &mut DragController, layout: &BoardLayout, at: Point, now_ms: f64) -> TrackEffect;

    fn release(
        &mut self,
        ctl: &mut DragController,
        layout: &BoardLayout,
        at: Point,
        payload: Option<&DragPayload>,
    ) -> DropOutcome;

    fn cancel(&mut self, ctl: &mut DragController) -> bool;

    /// Timer tick; only the touch driver has deferred work
    fn poll(&mut self, _ctl: &mut DragController, _now_ms: f64) -> TrackEffect {
        TrackEffect::Ignored
    }
}

pub fn driver_for(mode: InputMode, config: &DragConfig) -> Box<dyn DragDriver> {
    match mode {
        InputMode::Mouse => Box::new(MouseDriver),
        InputMode::Touch => Box::new(TouchDriver::new(config)),
    }
}

// ========================
// Mouse
// ========================

/// Native HTML drag-and-drop: the session starts on `dragstart`
#[derive(Debug, Default)]
pub struct MouseDriver;

impl DragDriver for MouseDriver {
    fn mode(&self) -> InputMode {
        InputMode::Mouse
    }

    fn start(&mut self, ctl: &mut DragController, grab: Grab) -> Result<StartEffect, DragError> {
        ctl.restart(DragSession::from_grab(grab, InputMode::Mouse));
        Ok(StartEffect::Active)
    }

    fn track(&mut self, ctl: &mut DragController, layout: &BoardLayout, at: Point, _now_ms: f64) -> TrackEffect {
        if !ctl.is_dragging() {
            return TrackEffect::Ignored;
        }
        ctl.hover(layout, at);
        TrackEffect::Hovering
    }

    fn release(
        &mut self,
        ctl: &mut DragController,
        layout: &BoardLayout,
        at: Point,
        payload: Option<&DragPayload>,
    ) -> DropOutcome {
        ctl.drop_at(layout, at, payload)
    }

    fn cancel(&mut self, ctl: &mut DragController) -> bool {
        ctl.cancel()
    }
}

// ========================
// Touch
// ========================

/// Touch gestures with long-press activation
#[derive(Debug)]
pub struct TouchDriver {
    delay_ms: f64,
    threshold_px: f64,
    pending: Option<Grab>,
}

impl TouchDriver {
    pub fn new(config: &DragConfig) -> Self {
        Self {
            delay_ms: f64::from(config.long_press_delay_ms),
            threshold_px: config.move_threshold_px,
            pending: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn activate(&mut self, ctl: &mut DragController) -> TrackEffect {
        let Some(grab) = self.pending.take() else {
            return TrackEffect::Ignored;
        };
        match ctl.begin(DragSession::from_grab(grab, InputMode::Touch)) {
            Ok(()) => TrackEffect::Activated,
            Err(e) => {
                log::warn!("[DND] long press not activated: {}", e);
                TrackEffect::Ignored
            }
        }
    }

    fn elapsed(&self, now_ms: f64) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|g| now_ms - g.now_ms >= self.delay_ms)
    }
}

impl DragDriver for TouchDriver {
    fn mode(&self) -> InputMode {
        InputMode::Touch
    }

    fn start(&mut self, ctl: &mut DragController, grab: Grab) -> Result<StartEffect, DragError> {
        if let Some(active) = ctl.dragged_item_id() {
            return Err(DragError::SessionActive(active));
        }
        self.pending = Some(grab);
        Ok(StartEffect::Pending)
    }

    fn track(&mut self, ctl: &mut DragController, layout: &BoardLayout, at: Point, now_ms: f64) -> TrackEffect {
        if let Some(grab) = &self.pending {
            if at.moved_beyond(grab.at, self.threshold_px) {
                log::debug!("[DND] long press on task {} abandoned", grab.payload.id);
                self.pending = None;
                return TrackEffect::Abandoned;
            }
            if !self.elapsed(now_ms) {
                return TrackEffect::Pending;
            }
            let effect = self.activate(ctl);
            if effect == TrackEffect::Activated {
                ctl.hover(layout, at);
            }
            return effect;
        }
        if !ctl.is_dragging() {
            return TrackEffect::Ignored;
        }
        ctl.hover(layout, at);
        TrackEffect::Hovering
    }

    fn release(
        &mut self,
        ctl: &mut DragController,
        layout: &BoardLayout,
        at: Point,
        payload: Option<&DragPayload>,
    ) -> DropOutcome {
        if self.pending.take().is_some() {
            // a tap
            return DropOutcome::Ignored;
        }
        ctl.drop_at(layout, at, payload)
    }

    fn cancel(&mut self, ctl: &mut DragController) -> bool {
        let had_pending = self.pending.take().is_some();
        ctl.cancel() || had_pending
    }

    fn poll(&mut self, ctl: &mut DragController, now_ms: f64) -> TrackEffect {
        if !self.elapsed(now_ms) {
            return if self.pending.is_some() { TrackEffect::Pending } else { TrackEffect::Ignored };
        }
        self.activate(ctl)
    }
}
