//! Reducer logic for the task list.
//!
//! Every action is a plain state transition. The one exception is
//! `SetToggleAll`, which also returns an effect that pushes each task's new
//! completion flag to the remote task API. The state is committed before
//! those requests start and nothing they return flows back into it.

use crate::api::TaskApi;
use crate::types::{Task, TaskPatch, TodoAction, TodoState};
use std::sync::Arc;
use todo_store_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Environment dependencies for the task list reducer
pub struct TodoEnvironment<A> {
    /// Remote task service
    pub api: Arc<A>,
}

impl<A: TaskApi> TodoEnvironment<A> {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(api: A) -> Self {
        Self { api: Arc::new(api) }
    }

    /// Creates an environment sharing an existing client
    #[must_use]
    pub const fn from_arc(api: Arc<A>) -> Self {
        Self { api }
    }
}

impl<A> Clone for TodoEnvironment<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

/// Reducer for the task list
///
/// Generic over the task API type so tests can inject a recording client.
#[derive(Debug, Clone, Copy)]
pub struct TodoReducer<A> {
    _phantom: std::marker::PhantomData<A>,
}

impl<A> TodoReducer<A> {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<A> Default for TodoReducer<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: TaskApi + 'static> TodoReducer<A> {
    /// One fire-and-forget update per task carrying its new completion flag
    fn push_completion(todos: &[Task], env: &TodoEnvironment<A>) -> Effect<TodoAction> {
        Effect::merge(
            todos
                .iter()
                .map(|task| {
                    let api = Arc::clone(&env.api);
                    let patch = TaskPatch::new(task.id).with_completed(task.completed);

                    Effect::fire_and_forget(async move {
                        let id = patch.id;
                        match api.update_task(patch).await {
                            Ok(_) => {
                                tracing::debug!(%id, "Remote task updated");
                                metrics::counter!("todo.remote_update.succeeded").increment(1);
                            }
                            Err(error) => {
                                tracing::warn!(%id, %error, "Remote task update failed");
                                metrics::counter!("todo.remote_update.failed").increment(1);
                            }
                        }
                    })
                })
                .collect(),
        )
    }
}

impl<A: TaskApi + 'static> Reducer for TodoReducer<A> {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment<A>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(kind = action.kind(), "Reducing action");

        match action {
            TodoAction::Filter(status) => {
                state.filter_by = status;
            }
            TodoAction::SetTodos(todos) => {
                state.todos = todos;
            }
            TodoAction::AddTodo(task) => {
                state.todos.push(task);
            }
            TodoAction::DeleteTodo(Some(id)) => {
                state.todos.retain(|task| task.id != id);
            }
            TodoAction::DeleteTodo(None) => {}
            TodoAction::ClearCompleted => {
                state.todos.retain(|task| !task.completed);
            }
            TodoAction::SetError(error) => {
                state.error = error;
            }
            TodoAction::Loading { load, id } => {
                state.loading = load;
                state.selected_todo_id = id;
            }
            TodoAction::EditTodo(patch) => {
                for task in state.todos.iter_mut().filter(|task| task.id == patch.id) {
                    task.apply(&patch);
                }
            }
            TodoAction::ToggleTodo(id) => {
                for task in state.todos.iter_mut().filter(|task| task.id == id) {
                    task.completed = !task.completed;
                }
            }
            TodoAction::SetToggleAll(all_completed) => {
                let completed = !all_completed;
                for task in &mut state.todos {
                    task.completed = completed;
                }
                return smallvec![Self::push_completion(&state.todos, env)];
            }
            TodoAction::Unknown => {
                tracing::debug!("Ignoring unrecognized action");
            }
        }

        SmallVec::new()
    }
}
