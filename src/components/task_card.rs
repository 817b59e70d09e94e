//! Task Card Component
//!
//! A draggable card. Mouse boards use native drag events; touch boards use
//! long-press gestures so a plain swipe still scrolls the page.

use leptos::prelude::*;
use web_sys::{DragEvent, TouchEvent};

use board_dragdrop::{ColumnKey, InputMode};
use crate::context::AppContext;
use crate::models::{priority_class, Task};

/// No panning, selection or iOS callout on a touch card
const TOUCH_CARD_STYLE: &str =
    "touch-action: none; -webkit-user-select: none; user-select: none; -webkit-touch-callout: none;";

#[component]
pub fn TaskCard(task: Task, column: ColumnKey, index: usize) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let dnd = ctx.dnd;
    let id = task.id;
    let is_touch = dnd.mode == InputMode::Touch;

    let priority = priority_class(task.priority);
    let class = move || {
        let mut c = format!("task-card {}", priority);
        if dnd.is_dragging(id) { c.push_str(" dragging"); }
        if dnd.pressing_id_read.get() == Some(id) { c.push_str(" pressing"); }
        c
    };

    // touch-action is latched when the finger lands, so the card can never
    // be pannable if a long press on it is to become a drag
    let style = if is_touch { TOUCH_CARD_STYLE } else { "" };

    let drag_task = task.clone();
    let on_dragstart = move |ev: DragEvent| {
        if !is_touch {
            dnd.on_drag_start(&ev, &drag_task, column, index);
        }
    };

    let on_dragend = move |_: DragEvent| {
        if !is_touch {
            dnd.on_drag_end();
        }
    };

    let touch_task = task.clone();
    let on_touchstart = move |ev: TouchEvent| {
        if is_touch {
            dnd.on_touch_start(&ev, &touch_task, column, index);
        }
    };

    let on_touchmove = move |ev: TouchEvent| {
        if is_touch {
            dnd.on_touch_move(&ev);
        }
    };

    let on_touchend = move |ev: TouchEvent| {
        if is_touch {
            ctx.dispatch_drop(dnd.on_touch_end(&ev));
        }
    };

    let on_touchcancel = move |_: TouchEvent| {
        if is_touch {
            dnd.on_touch_cancel();
        }
    };

    view! {
        <div
            class=class
            style=style
            data-task-id=id
            draggable=if is_touch { "false" } else { "true" }
            on:dragstart=on_dragstart
            on:dragend=on_dragend
            on:touchstart=on_touchstart
            on:touchmove=on_touchmove
            on:touchend=on_touchend
            on:touchcancel=on_touchcancel
        >
            <div class="task-card-title">{task.title.clone()}</div>
            {(!task.description.is_empty()).then(|| view! {
                <div class="task-card-description">{task.description.clone()}</div>
            })}
            <div class="task-card-meta">
                <span class="task-card-priority">{task.priority.label()}</span>
                {task.due_at.map(|due| view! {
                    <span class="task-card-due">{due.format("%d/%m").to_string()}</span>
                })}
            </div>
        </div>
    }
}
