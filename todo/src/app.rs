//! Store wiring.
//!
//! Mounting a store seeds it from the persisted snapshot and attaches the
//! hook that writes the task list back whenever it changes.

use crate::api::{HttpTaskApi, TaskApi};
use crate::config::TodoConfig;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::snapshot::{FileSlot, KeyValueSlot, SnapshotStore, SnapshotSync};
use crate::types::{TodoAction, TodoState};
use todo_store_runtime::Store;

/// Store specialised to the task list
pub type TodoStore<A> = Store<TodoState, TodoAction, TodoEnvironment<A>, TodoReducer<A>>;

/// Mount a task list store
///
/// The initial state is the default state with `todos` taken from the
/// snapshot; filter, error and loading flags always start fresh. Nothing is
/// written until the first dispatch that changes the task list.
#[must_use]
pub fn mount<K, A>(snapshots: SnapshotStore<K>, environment: TodoEnvironment<A>) -> TodoStore<A>
where
    K: KeyValueSlot + 'static,
    A: TaskApi + 'static,
{
    let initial = TodoState::from_snapshot(snapshots.load());
    tracing::info!(
        key = %snapshots.key(),
        tasks = initial.todos.len(),
        "Mounted todo store"
    );

    Store::new(initial, TodoReducer::new(), environment).with_observer(SnapshotSync::new(snapshots))
}

/// Mount a store persisting to disk and syncing with the HTTP task API
#[must_use]
pub fn mount_from_config(config: &TodoConfig) -> TodoStore<HttpTaskApi> {
    let snapshots = SnapshotStore::new(FileSlot::new(&config.storage_dir))
        .with_key(config.storage_key.clone());
    let environment = TodoEnvironment::new(HttpTaskApi::new(config.api_base_url.clone()));

    mount(snapshots, environment)
}
