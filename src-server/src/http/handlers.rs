//! Task endpoints

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::AppState;
use crate::domain::{DomainError, DomainResult, NewTask, ReorderCommand, Task, TaskFilter, TaskId, TaskUpdate};
use crate::repository::{Repository, TaskPositioningOperations};
use board_dragdrop::Page;

pub(super) async fn list_tasks(
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<TaskFilter>,
) -> DomainResult<Json<Page<Task>>> {
    let tasks = state.repo.list(&filter).await?;
    Ok(Json(Page::single(tasks)))
}

pub(super) async fn create_task(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<NewTask>,
) -> DomainResult<(StatusCode, Json<Task>)> {
    let task = state.repo.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub(super) async fn get_task(State(state): State<AppState>, ApiPath(id): ApiPath<TaskId>) -> DomainResult<Json<Task>> {
    state
        .repo
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| DomainError::NotFound(format!("Task {} not found", id)))
}

pub(super) async fn update_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TaskId>,
    ApiJson(patch): ApiJson<TaskUpdate>,
) -> DomainResult<Json<Task>> {
    Ok(Json(state.repo.update(id, &patch).await?))
}

pub(super) async fn delete_task(State(state): State<AppState>, ApiPath(id): ApiPath<TaskId>) -> DomainResult<StatusCode> {
    state.repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /tasks/{id}/reorder/`
pub(super) async fn reorder_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<TaskId>,
    ApiJson(mut command): ApiJson<ReorderCommand>,
) -> DomainResult<Json<Task>> {
    command.id = id;
    Ok(Json(state.repo.reorder(&command).await?))
}
