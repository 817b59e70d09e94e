//! Tasks Grid Component
//!
//! Main board: TODO, IN_PROGRESS and DONE columns of non-urgent tasks.
//! The row scrolls horizontally on narrow screens.

use leptos::prelude::*;

use board_dragdrop::ColumnKey;
use crate::components::TaskColumn;

#[component]
pub fn TasksGrid() -> impl IntoView {
    view! {
        <div class="tasks-grid" data-board-scroll="">
            {ColumnKey::MAIN
                .into_iter()
                .map(|column| view! { <TaskColumn column=column /> })
                .collect_view()}
        </div>
    }
}
