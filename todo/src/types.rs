//! Domain types for the task list.
//!
//! A task list is an ordered sequence of tasks plus the UI-facing flags that
//! travel with it (filter, error banner, loading indicator).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifier of a task
///
/// Assigned outside the store (by the creation form or the remote API) and
/// serialized as a bare JSON number.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Creates a `TaskId` from its numeric value
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for TaskId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single task
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,
    /// What needs doing
    pub title: String,
    /// Whether the task is done
    pub completed: bool,
}

impl Task {
    /// Creates a new, not yet completed task
    #[must_use]
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(id),
            title: title.into(),
            completed: false,
        }
    }

    /// Returns the task with its completion flag set
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Overwrites the fields present in `patch`, leaving the rest untouched
    ///
    /// The id is never changed.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Partial update of a task
///
/// Absent fields mean "keep the current value". Used both for local edits
/// and as the body of a remote update request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Task to update
    pub id: TaskId,
    /// New title, if changing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New completion flag, if changing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Creates an empty patch for the given task
    #[must_use]
    pub const fn new(id: TaskId) -> Self {
        Self {
            id,
            title: None,
            completed: None,
        }
    }

    /// Sets the new title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the new completion flag
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// True if applying the patch would change nothing
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.completed.is_none()
    }
}

impl From<Task> for TaskPatch {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: Some(task.title),
            completed: Some(task.completed),
        }
    }
}

/// Visibility filter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Every task
    #[default]
    All,
    /// Tasks not yet completed
    Active,
    /// Completed tasks
    Completed,
}

impl Status {
    /// Whether `task` is visible under this filter
    #[must_use]
    pub const fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// Error returned when parsing an unknown filter name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status filter: {0}")]
pub struct ParseStatusError(String);

impl FromStr for Status {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// State of the task list
///
/// Only `todos` survives a reload; every other field starts from its default
/// each session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoState {
    /// Tasks in insertion order
    pub todos: Vec<Task>,
    /// Active visibility filter
    pub filter_by: Status,
    /// Last reported failure, cleared by `SetError(None)`
    pub error: Option<String>,
    /// Whether an operation on `selected_todo_id` is in flight
    pub loading: bool,
    /// Task the loading indicator refers to
    pub selected_todo_id: TaskId,
}

impl TodoState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the initial session state from a persisted task list
    #[must_use]
    pub fn from_snapshot(todos: Vec<Task>) -> Self {
        Self {
            todos,
            ..Self::default()
        }
    }

    /// Tasks visible under the current filter, in list order
    pub fn visible_todos(&self) -> impl Iterator<Item = &Task> {
        let filter = self.filter_by;
        self.todos.iter().filter(move |task| filter.matches(task))
    }

    /// Returns a task by id
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.todos.iter().find(|task| task.id == id)
    }

    /// Number of tasks
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Number of tasks not yet completed
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.todos.iter().filter(|task| !task.completed).count()
    }

    /// Number of completed tasks
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|task| task.completed).count()
    }

    /// True if the list is non-empty and every task is completed
    ///
    /// This is the value a "toggle all" control passes to `SetToggleAll`.
    #[must_use]
    pub fn all_completed(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|task| task.completed)
    }
}

/// Actions accepted by the task list store
///
/// On the wire an action is `{"type": "<kind>", "payload": ...}`. A `type`
/// this enum does not know deserializes to [`TodoAction::Unknown`] whatever
/// its payload, and the reducer ignores it. A missing payload reads as `null`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum TodoAction {
    /// Replace the visibility filter
    Filter(Status),

    /// Replace the whole task list (session load or refresh)
    SetTodos(Vec<Task>),

    /// Append a task to the end of the list
    AddTodo(Task),

    /// Remove the task with this id, if present
    ///
    /// Without an id nothing is removed.
    DeleteTodo(Option<TaskId>),

    /// Remove every completed task
    ClearCompleted,

    /// Set or clear the error message
    SetError(Option<String>),

    /// Set the loading flag and the task it refers to
    Loading {
        /// Whether an operation is in flight
        load: bool,
        /// Task the operation targets
        id: TaskId,
    },

    /// Merge the present fields of the patch into the matching task
    EditTodo(TaskPatch),

    /// Flip the completion flag of the matching task
    ToggleTodo(TaskId),

    /// Set every task's completion flag to the negation of the payload
    ///
    /// The payload is "are all tasks currently completed?", so `true` marks
    /// everything active and `false` marks everything completed. Each task is
    /// also pushed to the remote task API.
    SetToggleAll(bool),

    /// Any action kind not listed above
    Unknown,
}

/// Envelope every action is read through before its kind is known
#[derive(Deserialize)]
struct RawAction {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct LoadingPayload {
    load: bool,
    id: TaskId,
}

impl TryFrom<RawAction> for TodoAction {
    type Error = serde_json::Error;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        use serde_json::from_value;

        let RawAction { kind, payload } = raw;
        let action = match kind.as_str() {
            "filter" => Self::Filter(from_value(payload)?),
            "setTodos" => Self::SetTodos(from_value(payload)?),
            "addTodo" => Self::AddTodo(from_value(payload)?),
            "deleteTodo" => Self::DeleteTodo(from_value(payload)?),
            "clearCompleted" => Self::ClearCompleted,
            "setError" => Self::SetError(from_value(payload)?),
            "loading" => {
                let LoadingPayload { load, id } = from_value(payload)?;
                Self::Loading { load, id }
            }
            "editTodo" => Self::EditTodo(from_value(payload)?),
            "toggleTodo" => Self::ToggleTodo(from_value(payload)?),
            "setToggleAll" => Self::SetToggleAll(from_value(payload)?),
            _ => {
                tracing::debug!(%kind, "Unrecognized action kind");
                Self::Unknown
            }
        };
        Ok(action)
    }
}

impl<'de> Deserialize<'de> for TodoAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawAction::deserialize(deserializer)?;
        Self::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl TodoAction {
    /// Wire name of the action kind, for logging
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Filter(_) => "filter",
            Self::SetTodos(_) => "setTodos",
            Self::AddTodo(_) => "addTodo",
            Self::DeleteTodo(_) => "deleteTodo",
            Self::ClearCompleted => "clearCompleted",
            Self::SetError(_) => "setError",
            Self::Loading { .. } => "loading",
            Self::EditTodo(_) => "editTodo",
            Self::ToggleTodo(_) => "toggleTodo",
            Self::SetToggleAll(_) => "setToggleAll",
            Self::Unknown => "unknown",
        }
    }
}
