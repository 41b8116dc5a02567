//! Remote task API client.
//!
//! The store only ever pushes completion changes during a bulk toggle, so the
//! client surface is a single "update task" call.

use crate::types::{Task, TaskPatch};
use reqwest::Client;
use std::future::Future;
use thiserror::Error;

/// Errors that can occur when talking to the remote task API
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Response parsing failed
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// API answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
}

/// Remote task service
///
/// This trait abstracts over the backend that owns the canonical task list.
pub trait TaskApi: Send + Sync {
    /// Apply a partial update to a task
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Network request fails
    /// - The service rejects the update
    /// - The response is not a task
    fn update_task(
        &self,
        patch: TaskPatch,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;
}

/// HTTP implementation of [`TaskApi`]
///
/// Updates are sent as `PATCH {base_url}/todos/{id}` with the patch as JSON.
#[derive(Clone, Debug)]
pub struct HttpTaskApi {
    client: Client,
    base_url: String,
}

impl HttpTaskApi {
    /// Create a client for the service at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl TaskApi for HttpTaskApi {
    fn update_task(
        &self,
        patch: TaskPatch,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send {
        let request = self
            .client
            .patch(format!("{}/todos/{}", self.base_url, patch.id))
            .json(&patch);

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ApiError::Status {
                    status: status.as_u16(),
                    message,
                });
            }

            response
                .json::<Task>()
                .await
                .map_err(|e| ApiError::ResponseParseFailed(e.to_string()))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use crate::types::TaskId;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn update_task_sends_patch() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/todos/1"))
            .and(body_json(json!({"id": 1, "completed": true})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"id": 1, "title": "Buy milk", "completed": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let api = HttpTaskApi::new(format!("{}/", server.uri()));
        let task = api
            .update_task(TaskPatch::new(TaskId::new(1)).with_completed(true))
            .await
            .unwrap();

        assert_eq!(task, Task::new(1, "Buy milk").with_completed(true));
    }

    #[tokio::test]
    async fn update_task_maps_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such task"))
            .mount(&server)
            .await;

        let api = HttpTaskApi::new(server.uri());
        let err = api
            .update_task(TaskPatch::new(TaskId::new(9)).with_completed(false))
            .await
            .unwrap_err();

        match err {
            ApiError::Status { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "no such task");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_task_rejects_non_task_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let api = HttpTaskApi::new(server.uri());
        let err = api
            .update_task(TaskPatch::new(TaskId::new(2)).with_completed(true))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::ResponseParseFailed(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        assert_eq!(
            HttpTaskApi::new("http://localhost:3000//").base_url(),
            "http://localhost:3000"
        );
    }
}
