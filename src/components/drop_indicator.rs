//! Drop Indicator Component
//!
//! Horizontal insertion line between cards, shown at the slot the engine
//! resolved for the pointer.

use leptos::prelude::*;

use board_dragdrop::ColumnKey;
use crate::context::AppContext;

#[component]
pub fn DropIndicator(
    column: ColumnKey,
    /// Slot in display order; the line sits before the card at this index
    index: usize,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let active = move || ctx.dnd.indicator_in(column) == Some(index);

    view! {
        <div
            class=move || if active() { "drop-indicator active" } else { "drop-indicator hidden" }
            data-indicator-index=index
        />
    }
}
