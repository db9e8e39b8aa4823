//! REST client for the Task Board backend.
//!
//! Four operations against `<origin>/api`: list, create, patch-completion,
//! delete. No retries, no caching, no request deduplication; any non-2xx
//! response or transport failure is an error the caller handles.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

use crate::types::{Task, TaskCreate, TaskPatch, TaskResponse};

/// Fixed per-request timeout; there is no retry layer on top.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors returned by [`ApiClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server returned 404 for the addressed task.
    #[error("task not found")]
    NotFound,

    /// Any other non-2xx response, with the backend's `detail` when present.
    #[error("HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The request never completed (connect, timeout, or I/O failure).
    #[error("request failed: {0}")]
    Transport(String),

    /// The response body could not be decoded into the expected shape.
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// Error body the backend attaches to 404/422 responses.
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api{path}", self.base_url)
    }

    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let (status, body) = self.execute(self.http.get(self.endpoint("/tasks"))).await?;
        check_status(status, &body)?;
        let tasks: Vec<Task> = decode(&body)?;
        debug!(count = tasks.len(), "listed tasks");
        Ok(tasks)
    }

    pub async fn create_task(&self, title: &str) -> Result<Task, ApiError> {
        let payload = TaskCreate {
            title: title.to_string(),
        };
        let (status, body) = self
            .execute(self.http.post(self.endpoint("/tasks")).json(&payload))
            .await?;
        check_status(status, &body)?;
        let response: TaskResponse = decode(&body)?;
        log_meta("created task", &response);
        Ok(response.task)
    }

    pub async fn set_completed(&self, id: Uuid, completed: bool) -> Result<Task, ApiError> {
        let payload = TaskPatch { completed };
        let (status, body) = self
            .execute(
                self.http
                    .patch(self.endpoint(&format!("/tasks/{id}")))
                    .json(&payload),
            )
            .await?;
        check_status(status, &body)?;
        let response: TaskResponse = decode(&body)?;
        log_meta("patched task", &response);
        Ok(response.task)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), ApiError> {
        let (status, body) = self
            .execute(self.http.delete(self.endpoint(&format!("/tasks/{id}"))))
            .await?;
        check_status(status, &body)?;
        Ok(())
    }

    async fn execute(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<(StatusCode, String), ApiError> {
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok((status, body))
    }
}

fn check_status(status: StatusCode, body: &str) -> Result<(), ApiError> {
    if status.is_success() {
        return Ok(());
    }
    if status == StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound);
    }
    let detail = serde_json::from_str::<ErrorDetail>(body)
        .map(|parsed| parsed.detail)
        .unwrap_or_else(|_| body.trim().to_string());
    Err(ApiError::Status {
        status: status.as_u16(),
        detail,
    })
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))
}

fn log_meta(action: &str, response: &TaskResponse) {
    if let Some(meta) = &response.meta {
        debug!(
            task_id = %response.task.id,
            saved_at = %meta.saved_at,
            stored = meta.count,
            "{action}"
        );
    } else {
        debug!(task_id = %response.task.id, "{action}");
    }
}
