//! Task list state container.
//!
//! Holds a list of tasks, a visibility filter and transient UI flags, and
//! keeps the list persisted across sessions. It demonstrates:
//!
//! - A pure reducer over a small domain model
//! - Remote side effects returned as effect descriptions, never run inline
//! - A post-dispatch hook persisting only the task list
//! - Separate read (`subscribe`) and write (`dispatcher`) channels
//!
//! # Quick Start
//!
//! ```no_run
//! use todo_store::{
//!     mount, MemorySlot, RecordingTaskApi, SnapshotStore, Task, TodoAction, TodoEnvironment,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = mount(
//!     SnapshotStore::new(MemorySlot::new()),
//!     TodoEnvironment::new(RecordingTaskApi::new()),
//! );
//!
//! let dispatch = store.dispatcher();
//! let state = store.subscribe();
//!
//! dispatch.send(TodoAction::AddTodo(Task::new(1, "Buy milk"))).await?;
//! assert_eq!(state.borrow().active_count(), 1);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod app;
pub mod config;
pub mod mocks;
pub mod reducer;
pub mod snapshot;
pub mod types;

// Re-export commonly used types
pub use api::{ApiError, HttpTaskApi, TaskApi};
pub use app::{mount, mount_from_config, TodoStore};
pub use config::{ConfigError, TodoConfig};
pub use mocks::RecordingTaskApi;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use snapshot::{
    FileSlot, KeyValueSlot, MemorySlot, SnapshotError, SnapshotStore, SnapshotSync, StorageError,
    DEFAULT_SNAPSHOT_KEY,
};
pub use types::{Status, Task, TaskId, TaskPatch, TodoAction, TodoState};
