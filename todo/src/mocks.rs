//! Mock task API for testing.

use crate::api::{ApiError, TaskApi};
use crate::types::{Task, TaskPatch};
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

/// Mock task API.
///
/// Records every update it receives instead of sending it anywhere. Clones
/// share the same log.
#[derive(Debug, Clone)]
pub struct RecordingTaskApi {
    calls: Arc<Mutex<Vec<TaskPatch>>>,
    /// Whether to simulate success or failure.
    pub should_succeed: bool,
}

impl RecordingTaskApi {
    /// Create a mock that accepts every update.
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Arc::default(),
            should_succeed: true,
        }
    }

    /// Create a mock that rejects every update.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            calls: Arc::default(),
            should_succeed: false,
        }
    }

    /// Updates received so far, in arrival order.
    #[must_use]
    pub fn calls(&self) -> Vec<TaskPatch> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for RecordingTaskApi {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskApi for RecordingTaskApi {
    fn update_task(
        &self,
        patch: TaskPatch,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(patch.clone());
        let should_succeed = self.should_succeed;

        async move {
            if !should_succeed {
                return Err(ApiError::Status {
                    status: 503,
                    message: "service unavailable".to_string(),
                });
            }

            Ok(Task {
                id: patch.id,
                title: patch.title.unwrap_or_default(),
                completed: patch.completed.unwrap_or_default(),
            })
        }
    }
}
