//! HTTP Layer
//!
//! REST routes for the board, mounted under `/api`.

mod error;
mod extract;
mod handlers;

use std::sync::Arc;

use axum::routing::{get, patch};
use axum::Router;

use crate::repository::TaskRepository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<TaskRepository>,
}

impl AppState {
    pub fn new(repo: TaskRepository) -> Self {
        Self { repo: Arc::new(repo) }
    }
}

pub fn build_router(state: AppState) -> Router {
    let tasks = Router::new()
        .route("/tasks/", get(handlers::list_tasks).post(handlers::create_task))
        .route(
            "/tasks/:id/",
            get(handlers::get_task)
                .patch(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/tasks/:id/reorder/", patch(handlers::reorder_task));

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .nest("/api", tasks)
        .with_state(state)
}
