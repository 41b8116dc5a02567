//! # Todo Store Testing
//!
//! Testing utilities and helpers for the todo store.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for reducers
//! - [`assertions`]: Effect assertion helpers
//! - [`mocks`]: Recording implementations of runtime hooks
//!
//! ## Example
//!
//! ```ignore
//! use todo_store_testing::{assertions, ReducerTest};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(test_environment())
//!     .given_state(TodoState::default())
//!     .when_action(TodoAction::ClearCompleted)
//!     .then_state(|state| assert!(state.todos.is_empty()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

pub mod reducer_test;

/// Mock implementations of runtime hooks
pub mod mocks {
    use std::sync::{Arc, Mutex, PoisonError};
    use todo_store_runtime::StateObserver;

    /// Observer that records every `(previous, current)` pair it is handed
    ///
    /// Clones share the same log, so keep one clone for assertions and give
    /// the other to the store.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_store_runtime::StateObserver;
    /// use todo_store_testing::mocks::RecordingObserver;
    ///
    /// let observer = RecordingObserver::<i32>::new();
    /// observer.on_change(&1, &2);
    /// assert_eq!(observer.changes(), vec![(1, 2)]);
    /// ```
    #[derive(Debug)]
    pub struct RecordingObserver<S> {
        changes: Arc<Mutex<Vec<(S, S)>>>,
    }

    impl<S: Clone> RecordingObserver<S> {
        /// Create an observer with an empty log
        #[must_use]
        pub fn new() -> Self {
            Self {
                changes: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// All recorded changes, oldest first
        #[must_use]
        pub fn changes(&self) -> Vec<(S, S)> {
            self.changes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of dispatches observed
        #[must_use]
        pub fn len(&self) -> usize {
            self.changes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Whether nothing has been observed yet
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl<S: Clone> Default for RecordingObserver<S> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<S> Clone for RecordingObserver<S> {
        fn clone(&self) -> Self {
            Self {
                changes: Arc::clone(&self.changes),
            }
        }
    }

    impl<S: Clone + Send> StateObserver<S> for RecordingObserver<S> {
        fn on_change(&self, previous: &S, current: &S) {
            self.changes
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((previous.clone(), current.clone()));
        }
    }
}

// Re-export commonly used items
pub use mocks::RecordingObserver;
pub use reducer_test::{assertions, ReducerTest};

#[cfg(test)]
mod tests {
    use super::*;
    use todo_store_runtime::StateObserver;

    #[test]
    fn test_recording_observer_shares_log_between_clones() {
        let observer = RecordingObserver::<u8>::new();
        let handed_out = observer.clone();

        handed_out.on_change(&0, &1);
        handed_out.on_change(&1, &1);

        assert_eq!(observer.len(), 2);
        assert_eq!(observer.changes(), vec![(0, 1), (1, 1)]);
    }
}
