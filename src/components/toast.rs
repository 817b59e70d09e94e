//! Toast Component
//!
//! Non-blocking notifications raised after a drop settles.

use leptos::prelude::*;

use board_dragdrop::NoticeVariant;
use crate::context::AppContext;
use crate::store::{store_dismiss_toast, BoardStateStoreFields};

#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = ctx.store;

    view! {
        <div class="toast-stack" role="status">
            <For
                each=move || store.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.notice.variant {
                        NoticeVariant::Default => "toast",
                        NoticeVariant::Destructive => "toast destructive",
                    };
                    view! {
                        <div class=class on:click=move |_| store_dismiss_toast(&store, id)>
                            <div class="toast-title">{toast.notice.title}</div>
                            <div class="toast-description">{toast.notice.description}</div>
                        </div>
                    }
                }
            />
        </div>
    }
}
