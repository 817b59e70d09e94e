//! Board State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The task list is
//! a cache of the server: it is replaced wholesale on every refetch and never
//! renumbered locally.

use leptos::prelude::*;
use reactive_stores::Store;

use board_dragdrop::Notice;
use crate::models::Task;

/// How long a toast stays on screen
pub const TOAST_TTL_MS: u32 = 4_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Toast {
    pub id: u32,
    pub notice: Notice,
}

/// Board state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct BoardState {
    /// Every task the server returned, both boards
    pub tasks: Vec<Task>,
    /// Last load failure, cleared on success
    pub load_error: Option<String>,
    pub toasts: Vec<Toast>,
    pub next_toast_id: u32,
}

pub type BoardStore = Store<BoardState>;

// ========================
// Store Helper Functions
// ========================

pub fn store_set_tasks(store: &BoardStore, tasks: Vec<Task>) {
    *store.tasks().write() = tasks;
    *store.load_error().write() = None;
}

pub fn store_set_load_error(store: &BoardStore, error: String) {
    *store.load_error().write() = Some(error);
}

/// Queue a toast and return its id
pub fn store_push_toast(store: &BoardStore, notice: Notice) -> u32 {
    let id = store.next_toast_id().get_untracked();
    *store.next_toast_id().write() = id.wrapping_add(1);
    store.toasts().write().push(Toast { id, notice });
    id
}

pub fn store_dismiss_toast(store: &BoardStore, id: u32) {
    store.toasts().write().retain(|t| t.id != id);
}
