//! Lia Task Board App
//!
//! Urgent sub-board above the main three-column grid. The server owns every
//! position: after each drop the whole list is refetched.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;

use board_dragdrop::web::{bind_escape_cancel, BoardDnd};

use crate::components::{TasksGrid, ToastStack, UrgentTasks};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::mobile::detect_input_mode;
use crate::store::{store_set_load_error, store_set_tasks, BoardState, BoardStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let config = AppConfig::load();
    let (reload_trigger, set_reload_trigger) = signal(0u32);
    let store = Store::new(BoardState::default());
    let dnd = BoardDnd::new(detect_input_mode(), config.drag);

    let ctx = AppContext::new((reload_trigger, set_reload_trigger), config, store, dnd);
    provide_context(ctx);

    bind_escape_cancel(dnd);

    // Load tasks on mount and after every settled drop
    Effect::new(move |_| {
        let trigger = reload_trigger.get();
        let api = ctx.api();
        spawn_local(async move {
            match api.list_tasks().await {
                Ok(tasks) => {
                    log::debug!("[APP] loaded {} tasks (trigger={})", tasks.len(), trigger);
                    store_set_tasks(&store, tasks);
                }
                Err(e) => {
                    log::error!("[APP] task list unavailable: {}", e);
                    store_set_load_error(&store, e.to_string());
                }
            }
        });
    });

    view! {
        <div class="app-layout">
            <main class="main-content">
                <h1>"Tâches"</h1>

                {move || store.load_error().get().map(|e| view! {
                    <p class="load-error">{format!("Impossible de charger les tâches : {}", e)}</p>
                })}

                <UrgentTasks />
                <TasksGrid />

                <p class="task-count">{move || format!("{} tâches", store.tasks().with(|t| t.len()))}</p>
            </main>

            <ToastStack />
        </div>
    }
}
