//! Task Commands
//!
//! REST bindings for `/tasks/`. Implements the engine's [`TaskApi`] so the
//! reorder dispatcher talks to the server directly.

use async_trait::async_trait;
use board_dragdrop::{ApiError, Page, ReorderCommand, Task, TaskApi, TaskId, TaskUpdate};
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    /// Absolute API root, e.g. `http://localhost:8000/api`
    root: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

impl HttpTaskApi {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            root: root.into(),
        }
    }

    pub fn tasks_url(&self) -> String {
        format!("{}/tasks/", self.root)
    }

    pub fn task_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{}/", self.root, id)
    }

    pub fn reorder_url(&self, id: TaskId) -> String {
        format!("{}/tasks/{}/reorder/", self.root, id)
    }

    /// Every task, following `next` links until the last page
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let mut tasks = Vec::new();
        let mut url = Some(self.tasks_url());
        while let Some(current) = url.take() {
            let page: Page<Task> = read_json(self.client.get(&current).send().await).await?;
            tasks.extend(page.results);
            url = page.next;
        }
        Ok(tasks)
    }
}

#[async_trait(?Send)]
impl TaskApi for HttpTaskApi {
    async fn reorder_task(&self, command: &ReorderCommand) -> Result<Task, ApiError> {
        log::debug!(
            "[API] reorder task {} -> {} #{} (urgent: {:?})",
            command.id,
            command.target_status,
            command.target_position,
            command.target_is_urgent
        );
        let res = self.client.patch(self.reorder_url(command.id)).json(command).send().await;
        read_json(res).await
    }

    async fn update_task(&self, id: TaskId, update: &TaskUpdate) -> Result<Task, ApiError> {
        log::debug!("[API] update task {}", id);
        let res = self.client.patch(self.task_url(id)).json(update).send().await;
        read_json(res).await
    }
}

async fn read_json<T: DeserializeOwned>(
    res: Result<reqwest::Response, reqwest::Error>,
) -> Result<T, ApiError> {
    let res = res.map_err(|e| ApiError::Network(e.to_string()))?;
    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message: detail_of(&body),
        });
    }
    res.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
}

/// `{"detail": ...}` when the server sent one, the raw body otherwise
fn detail_of(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| body.trim().to_string())
}
