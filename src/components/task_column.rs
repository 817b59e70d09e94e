//! Task Column Component
//!
//! One drop zone: a `(status, board)` partition of the task list. An empty
//! column highlights while hovered; a non-empty one shows the insertion line.

use leptos::prelude::*;
use web_sys::DragEvent;

use board_dragdrop::ColumnKey;
use crate::components::{DropIndicator, TaskCard};
use crate::context::AppContext;
use crate::models::{column_tasks, Task};
use crate::store::BoardStateStoreFields;

#[component]
pub fn TaskColumn(column: ColumnKey) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let dnd = ctx.dnd;

    let tasks = Memo::new(move |_| ctx.store.tasks().with(|all| column_tasks(all, column)));
    let len = move || tasks.with(|t| t.len());

    let class = move || {
        let mut c = format!("task-column {}", column.as_str().to_lowercase());
        if column.is_urgent() { c.push_str(" urgent"); }
        if dnd.is_column_highlighted(column, len()) { c.push_str(" highlighted"); }
        c
    };

    let on_dragover = move |ev: DragEvent| dnd.on_drag_over(&ev);
    let on_dragleave = move |ev: DragEvent| dnd.on_drag_leave(&ev);
    let on_drop = move |ev: DragEvent| ctx.dispatch_drop(dnd.on_drop(&ev));

    view! {
        <section
            class=class
            data-drop-zone=column.as_str()
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:drop=on_drop
        >
            <header class="task-column-header">
                <span class="task-column-title">{column.label()}</span>
                <span class="task-column-count">{len}</span>
            </header>

            <div class="task-column-body">
                <For
                    each={move || tasks.get().into_iter().enumerate().collect::<Vec<(usize, Task)>>()}
                    key={|(index, task)| (task.id, *index, task.updated_at)}
                    children={move |(index, task)| {
                        view! {
                            <DropIndicator column=column index=index />
                            <TaskCard task=task column=column index=index />
                        }
                    }}
                />
                {move || (len() > 0).then(|| view! { <DropIndicator column=column index=len() /> })}
                {move || (len() == 0).then(|| view! { <div class="task-column-empty">"Aucune tâche"</div> })}
            </div>
        </section>
    }
}
