//! Urgent Tasks Component
//!
//! Sub-board above the grid. Dropping a card here promotes it; dragging a
//! card out demotes it. Finished urgent tasks are not shown.

use leptos::prelude::*;

use board_dragdrop::ColumnKey;
use crate::components::TaskColumn;
use crate::context::AppContext;
use crate::models::open_urgent_count;
use crate::store::BoardStateStoreFields;

#[component]
pub fn UrgentTasks() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let count = move || ctx.store.tasks().with(|tasks| open_urgent_count(tasks));

    view! {
        <section class="urgent-tasks">
            <header class="urgent-tasks-header">
                <h2>"Urgent"</h2>
                <span class="urgent-tasks-count">{count}</span>
            </header>
            <div class="urgent-tasks-columns">
                {ColumnKey::URGENT
                    .into_iter()
                    .map(|column| view! { <TaskColumn column=column /> })
                    .collect_view()}
            </div>
        </section>
    }
}
