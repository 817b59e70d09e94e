//! Leptos binding
//!
//! Owns one [`DragController`] plus the input driver picked at mount, and
//! mirrors the controller state into signals the columns render from.
//! Layout is measured from the DOM on every move:
//! `[data-drop-zone="<COLUMN>"]` marks a column, `[data-task-id]` marks a card
//! inside it, `[data-board-scroll]` is the horizontally scrolling container.

use gloo_timers::callback::{Interval, Timeout};
use leptos::prelude::*;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use crate::autoscroll::{scroll_step, ScrollStep, Viewport};
use crate::config::DragConfig;
use crate::controller::{DragController, DropIndicator, DropOutcome};
use crate::geometry::{Point, Rect};
use crate::input::{driver_for, DragDriver, StartEffect, TrackEffect};
use crate::model::{ColumnKey, DragPayload, Task, TaskId};
use crate::resolver::{BoardLayout, ColumnRegion};
use crate::session::{Grab, InputMode};

pub const DROP_ZONE_ATTR: &str = "data-drop-zone";
pub const TASK_ID_ATTR: &str = "data-task-id";
pub const SCROLL_CONTAINER_SELECTOR: &str = "[data-board-scroll]";

const LONG_PRESS_RETRY_MS: u32 = 16;

struct Engine {
    controller: DragController,
    driver: Box<dyn DragDriver>,
}

/// Browser timers of the current touch gesture. Dropping one clears it.
#[derive(Default)]
struct GestureTimers {
    long_press: Option<Timeout>,
    feedback: Option<Timeout>,
    auto_scroll: Option<Interval>,
}

/// Drag state shared by every column through context
#[derive(Clone, Copy)]
pub struct BoardDnd {
    engine: StoredValue<Engine>,
    config: StoredValue<DragConfig>,
    last_point: StoredValue<Option<Point>>,
    timers: StoredValue<GestureTimers, LocalStorage>,
    pub mode: InputMode,
    pub dragging_id_read: ReadSignal<Option<TaskId>>,
    dragging_id_write: WriteSignal<Option<TaskId>>,
    pub drag_over_read: ReadSignal<Option<ColumnKey>>,
    drag_over_write: WriteSignal<Option<ColumnKey>>,
    pub indicator_read: ReadSignal<Option<DropIndicator>>,
    indicator_write: WriteSignal<Option<DropIndicator>>,
    /// Card under a long press that has not activated yet
    pub pressing_id_read: ReadSignal<Option<TaskId>>,
    pressing_id_write: WriteSignal<Option<TaskId>>,
}

impl BoardDnd {
    pub fn new(mode: InputMode, config: DragConfig) -> Self {
        let (dragging_id_read, dragging_id_write) = signal(None::<TaskId>);
        let (drag_over_read, drag_over_write) = signal(None::<ColumnKey>);
        let (indicator_read, indicator_write) = signal(None::<DropIndicator>);
        let (pressing_id_read, pressing_id_write) = signal(None::<TaskId>);
        Self {
            engine: StoredValue::new(Engine {
                controller: DragController::new(),
                driver: driver_for(mode, &config),
            }),
            config: StoredValue::new(config),
            last_point: StoredValue::new(None),
            timers: StoredValue::new_local(GestureTimers::default()),
            mode,
            dragging_id_read,
            dragging_id_write,
            drag_over_read,
            drag_over_write,
            indicator_read,
            indicator_write,
            pressing_id_read,
            pressing_id_write,
        }
    }

    pub fn config(&self) -> DragConfig {
        self.config.get_value()
    }

    /// Tracked: column showing the insertion line at `index`, if any
    pub fn indicator_in(&self, column: ColumnKey) -> Option<usize> {
        self.indicator_read
            .get()
            .filter(|i| i.column == column)
            .map(|i| i.index)
    }

    /// Tracked: empty column currently hovered
    pub fn is_column_highlighted(&self, column: ColumnKey, column_len: usize) -> bool {
        column_len == 0 && self.drag_over_read.get() == Some(column)
    }

    pub fn is_dragging(&self, task_id: TaskId) -> bool {
        self.dragging_id_read.get() == Some(task_id)
    }

    /// Last pointer position of an active touch drag
    pub fn last_point(&self) -> Option<Point> {
        self.last_point.get_value()
    }

    /// `None` once the owning board has been disposed
    fn with_engine<U>(&self, f: impl FnOnce(&mut Engine) -> U) -> Option<U> {
        let mut out = None;
        self.engine.update_value(|engine| out = Some(f(engine)));
        out
    }

    fn sync(&self) {
        let Some((dragged, over, indicator)) = self.engine.try_with_value(|e| {
            (e.controller.dragged_item_id(), e.controller.drag_over(), e.controller.indicator())
        }) else {
            return;
        };
        self.dragging_id_write.set(dragged);
        self.drag_over_write.set(over);
        self.indicator_write.set(indicator);
        if dragged.is_none() {
            self.last_point.set_value(None);
            self.timers.try_update_value(|t| t.auto_scroll = None);
        }
    }

    // ========================
    // Mouse (native drag events)
    // ========================

    pub fn on_drag_start(&self, ev: &web_sys::DragEvent, task: &Task, source: ColumnKey, index: usize) {
        let payload = DragPayload::from(task);
        if let Some(dt) = ev.data_transfer() {
            match payload.to_json() {
                Ok(json) => {
                    let _ = dt.set_data(DragPayload::FORMAT, &json);
                }
                Err(e) => log::warn!("[DND] payload not written: {}", e),
            }
            dt.set_effect_allowed("move");
        }
        let grab = Grab::new(task, source, index, event_point(ev), now_ms());
        if let Some(Err(e)) = self.with_engine(|en| en.driver.start(&mut en.controller, grab)) {
            log::warn!("[DND] drag start refused: {}", e);
        }
        self.sync();
    }

    pub fn on_drag_over(&self, ev: &web_sys::DragEvent) {
        ev.prevent_default();
        if let Some(dt) = ev.data_transfer() {
            dt.set_drop_effect("move");
        }
        let layout = measure_layout();
        let at = event_point(ev);
        self.with_engine(|en| en.driver.track(&mut en.controller, &layout, at, now_ms()));
        self.sync();
    }

    pub fn on_drag_leave(&self, _ev: &web_sys::DragEvent) {
        self.with_engine(|en| en.controller.leave());
        self.sync();
    }

    pub fn on_drop(&self, ev: &web_sys::DragEvent) -> DropOutcome {
        ev.prevent_default();
        let payload = ev
            .data_transfer()
            .and_then(|dt| dt.get_data(DragPayload::FORMAT).ok())
            .filter(|raw| !raw.is_empty())
            .and_then(|raw| match DragPayload::from_json(&raw) {
                Ok(p) => Some(p),
                Err(e) => {
                    log::warn!("[DND] unreadable drop payload: {}", e);
                    None
                }
            });
        let layout = measure_layout();
        let at = event_point(ev);
        let outcome = self
            .with_engine(|en| en.driver.release(&mut en.controller, &layout, at, payload.as_ref()))
            .unwrap_or(DropOutcome::Ignored);
        self.sync();
        outcome
    }

    pub fn on_drag_end(&self) {
        self.cancel();
    }

    // ========================
    // Touch
    // ========================

    pub fn on_touch_start(&self, ev: &web_sys::TouchEvent, task: &Task, source: ColumnKey, index: usize) {
        let Some(at) = touch_point(&ev.touches()) else {
            return;
        };
        let grab = Grab::new(task, source, index, at, now_ms());
        match self.with_engine(|en| en.driver.start(&mut en.controller, grab)) {
            Some(Ok(StartEffect::Pending)) => {
                self.clear_press();
                self.schedule_feedback(task.id);
                self.schedule_long_press(self.config.with_value(|c| c.long_press_delay_ms));
            }
            Some(Err(e)) => log::warn!("[DND] touch start refused: {}", e),
            _ => {}
        }
        self.sync();
    }

    pub fn on_touch_move(&self, ev: &web_sys::TouchEvent) -> TrackEffect {
        let Some(at) = touch_point(&ev.touches()) else {
            return TrackEffect::Ignored;
        };
        let layout = measure_layout();
        let effect = self
            .with_engine(|en| en.driver.track(&mut en.controller, &layout, at, now_ms()))
            .unwrap_or(TrackEffect::Ignored);
        match effect {
            TrackEffect::Abandoned => self.clear_press(),
            TrackEffect::Activated => self.activated(),
            _ => {}
        }
        if effect.captures_pointer() {
            ev.prevent_default();
            self.last_point.set_value(Some(at));
        }
        self.sync();
        effect
    }

    pub fn on_touch_end(&self, ev: &web_sys::TouchEvent) -> DropOutcome {
        self.clear_press();
        let at = touch_point(&ev.changed_touches()).or_else(|| self.last_point());
        let outcome = match at {
            Some(at) => {
                let layout = measure_layout();
                self.with_engine(|en| en.driver.release(&mut en.controller, &layout, at, None))
                    .unwrap_or(DropOutcome::Ignored)
            }
            None => {
                self.cancel();
                DropOutcome::Ignored
            }
        };
        if matches!(outcome, DropOutcome::Drop(_)) {
            vibrate(self.config.with_value(|c| c.vibration.drop_ms));
        }
        self.sync();
        outcome
    }

    pub fn on_touch_cancel(&self) {
        self.cancel();
    }

    /// Escape or a cancelled gesture. Returns whether anything was terminated.
    pub fn cancel(&self) -> bool {
        self.clear_press();
        let ended = self
            .with_engine(|en| en.driver.cancel(&mut en.controller))
            .unwrap_or(false);
        self.sync();
        ended
    }

    fn activated(&self) {
        self.clear_press();
        vibrate(self.config.with_value(|c| c.vibration.start_ms));
        self.start_auto_scroll();
    }

    /// Drop the pending long-press and feedback timers and the pressed look
    fn clear_press(&self) {
        self.timers.try_update_value(|t| {
            t.long_press = None;
            t.feedback = None;
        });
        self.pressing_id_write.set(None);
    }

    /// Pressed look only once the finger has rested, so quick taps don't flash
    fn schedule_feedback(&self, task_id: TaskId) {
        let delay = self.config.with_value(|c| c.feedback_delay_ms);
        let dnd = *self;
        let timer = Timeout::new(delay, move || dnd.pressing_id_write.set(Some(task_id)));
        self.timers.try_update_value(|t| t.feedback = Some(timer));
    }

    fn schedule_long_press(&self, delay_ms: u32) {
        let dnd = *self;
        let timer = Timeout::new(delay_ms, move || {
            match dnd.with_engine(|en| en.driver.poll(&mut en.controller, now_ms())) {
                Some(TrackEffect::Activated) => {
                    dnd.activated();
                    dnd.sync();
                }
                // fired a little early
                Some(TrackEffect::Pending) => dnd.schedule_long_press(LONG_PRESS_RETRY_MS),
                _ => {}
            }
        });
        self.timers.try_update_value(|t| t.long_press = Some(timer));
    }

    fn start_auto_scroll(&self) {
        let interval_ms = self.config.with_value(|c| c.auto_scroll.interval_ms);
        let dnd = *self;
        let ticker = Interval::new(interval_ms, move || {
            dnd.auto_scroll_tick();
        });
        self.timers.try_update_value(|t| t.auto_scroll = Some(ticker));
    }

    /// One auto-scroll tick at the last touch position
    pub fn auto_scroll_tick(&self) -> ScrollStep {
        let Some(at) = self.last_point() else {
            return ScrollStep::default();
        };
        let step = scroll_step(at, &read_viewport(), &self.config.with_value(|c| c.auto_scroll));
        apply_scroll(step);
        step
    }
}

// ========================
// DOM helpers
// ========================

pub fn is_touch_device() -> bool {
    let Some(win) = web_sys::window() else {
        return false;
    };
    let has_handler = js_sys::Reflect::has(&win, &JsValue::from_str("ontouchstart")).unwrap_or(false);
    has_handler || win.navigator().max_touch_points() > 0
}

pub fn vibrate(ms: u32) {
    if ms == 0 {
        return;
    }
    if let Some(win) = web_sys::window() {
        let _ = win.navigator().vibrate_with_duration(ms);
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_default()
}

fn event_point(ev: &web_sys::MouseEvent) -> Point {
    Point::new(f64::from(ev.client_x()), f64::from(ev.client_y()))
}

fn touch_point(list: &web_sys::TouchList) -> Option<Point> {
    list.get(0)
        .map(|t| Point::new(f64::from(t.client_x()), f64::from(t.client_y())))
}

fn element_rect(el: &web_sys::Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

fn query_all(root: &web_sys::Element, selector: &str) -> Vec<web_sys::Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
        .collect()
}

/// Snapshot every registered drop zone and its cards
pub fn measure_layout() -> BoardLayout {
    let mut layout = BoardLayout::new();
    let Some(root) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.document_element())
    else {
        return layout;
    };
    for zone in query_all(&root, &format!("[{}]", DROP_ZONE_ATTR)) {
        let Some(column) = zone
            .get_attribute(DROP_ZONE_ATTR)
            .and_then(|v| v.parse::<ColumnKey>().ok())
        else {
            continue;
        };
        let mut region = ColumnRegion::new(column, element_rect(&zone));
        for card in query_all(&zone, &format!("[{}]", TASK_ID_ATTR)) {
            if let Some(id) = card.get_attribute(TASK_ID_ATTR).and_then(|v| v.parse::<TaskId>().ok()) {
                region = region.with_card(id, element_rect(&card));
            }
        }
        layout.register(region);
    }
    layout
}

fn scroll_container() -> Option<web_sys::Element> {
    web_sys::window()?
        .document()?
        .query_selector(SCROLL_CONTAINER_SELECTOR)
        .ok()
        .flatten()
}

fn read_viewport() -> Viewport {
    let Some(win) = web_sys::window() else {
        return Viewport::default();
    };
    let width = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or_default();
    let height = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or_default();
    let scroll_height = win
        .document()
        .and_then(|d| d.document_element())
        .map(|el| f64::from(el.scroll_height()))
        .unwrap_or_default();
    let (container_scroll_x, container_max_scroll_x) = scroll_container()
        .map(|el| {
            (
                f64::from(el.scroll_left()),
                f64::from(el.scroll_width() - el.client_width()),
            )
        })
        .unwrap_or_default();
    Viewport {
        width,
        height,
        scroll_y: win.scroll_y().unwrap_or_default(),
        max_scroll_y: (scroll_height - height).max(0.0),
        container_scroll_x,
        container_max_scroll_x,
    }
}

fn apply_scroll(step: ScrollStep) {
    if step.dy != 0.0 {
        if let Some(win) = web_sys::window() {
            win.scroll_by_with_x_and_y(0.0, step.dy);
        }
    }
    if step.dx != 0.0 {
        if let Some(el) = scroll_container() {
            el.scroll_by_with_x_and_y(step.dx, 0.0);
        }
    }
}

/// Document-level `Escape` cancels the active drag
pub fn bind_escape_cancel(dnd: BoardDnd) {
    let on_keydown = Closure::<dyn FnMut(web_sys::KeyboardEvent)>::new(move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Escape" && dnd.dragging_id_read.get_untracked().is_some() && dnd.cancel() {
            log::debug!("[DND] cancelled with Escape");
        }
    });
    if let Some(doc) = web_sys::window().and_then(|w| w.document()) {
        let _ = doc.add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
    }
    on_keydown.forget();
}
