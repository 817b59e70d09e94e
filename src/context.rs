//! Application Context
//!
//! Shared state provided via Leptos Context API.

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::task::spawn_local;

use board_dragdrop::web::BoardDnd;
use board_dragdrop::{DropOutcome, Notice, ReorderDispatcher};

use crate::commands::HttpTaskApi;
use crate::config::{page_origin, AppConfig};
use crate::store::{store_dismiss_toast, store_push_toast, BoardStore, TOAST_TTL_MS};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Trigger to refetch tasks from the server - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to refetch tasks from the server - write
    set_reload_trigger: WriteSignal<u32>,
    config: StoredValue<AppConfig>,
    pub store: BoardStore,
    /// One drag controller shared by both boards
    pub dnd: BoardDnd,
}

impl AppContext {
    pub fn new(
        reload_trigger: (ReadSignal<u32>, WriteSignal<u32>),
        config: AppConfig,
        store: BoardStore,
        dnd: BoardDnd,
    ) -> Self {
        Self {
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
            config: StoredValue::new(config),
            store,
            dnd,
        }
    }

    /// Trigger a refetch of the task list
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }

    pub fn api(&self) -> HttpTaskApi {
        let root = self.config.with_value(|c| c.api_root(&page_origin()));
        HttpTaskApi::new(root)
    }

    /// Show a toast that dismisses itself
    pub fn notify(&self, notice: Notice) {
        let store = self.store;
        let id = store_push_toast(&store, notice);
        Timeout::new(TOAST_TTL_MS, move || store_dismiss_toast(&store, id)).forget();
    }

    /// Send the backend calls for a finished gesture
    pub fn dispatch_drop(&self, outcome: DropOutcome) {
        let request = match outcome {
            DropOutcome::Drop(request) => request,
            DropOutcome::Cancelled(reason) => {
                log::debug!("[DND] drop cancelled: {:?}", reason);
                return;
            }
            DropOutcome::Ignored => return,
        };
        let ctx = *self;
        let strategy = self.config.with_value(|c| c.drag.strategy);
        let dispatcher = ReorderDispatcher::new(self.api(), strategy);
        spawn_local(async move {
            let result = dispatcher.dispatch(&request).await;
            if let Some(err) = &result.error {
                log::error!("[DND] task {} not moved: {}", request.task_id(), err);
            }
            if let Some(notice) = result.notice {
                ctx.notify(notice);
            }
            if result.needs_refetch {
                ctx.reload();
            }
        });
    }
}
