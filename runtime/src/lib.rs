//! # Todo Store Runtime
//!
//! Runtime implementation for the todo store.
//!
//! This crate provides the [`Store`] that owns application state, runs the
//! reducer for every dispatched action, and executes the effects it returns.
//!
//! ## Core Components
//!
//! - **Store**: Owns state, runs the reducer, executes effects
//! - **Read channel**: [`Store::subscribe`] yields the latest full state to every subscriber
//! - **Write channel**: [`Dispatcher`] accepts actions and nothing else
//! - **Observers**: [`StateObserver`] hooks run after each dispatch with the previous and new state
//!
//! ## Example
//!
//! ```ignore
//! use todo_store_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment)
//!     .with_observer(persist_on_change);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use todo_store_core::{effect::Effect, reducer::Reducer};
use tokio::sync::{watch, RwLock};

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        ///
        /// Some effects were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),
    }
}

pub use error::StoreError;

/// Post-dispatch hook
///
/// Observers run synchronously after the reducer, while the store still
/// holds its write lock, so they see dispatches strictly in order. They
/// receive the state as it was before the action and as it is now, which
/// lets them react only to the fields they care about.
///
/// Observers must be quick. They run on an async worker thread and every
/// other dispatch waits on the lock until they return, so an observer that
/// blocks (for example on synchronous file I/O) stalls the whole store for
/// that long.
///
/// Closures `Fn(&S, &S)` implement this trait.
pub trait StateObserver<S>: Send + Sync {
    /// Called once per dispatched action
    fn on_change(&self, previous: &S, current: &S);
}

impl<S, F> StateObserver<S> for F
where
    F: Fn(&S, &S) + Send + Sync,
{
    fn on_change(&self, previous: &S, current: &S) {
        self(previous, current);
    }
}

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`] to allow waiting for the effects spawned by
/// that one action. Actions fed back by those effects are dispatched on their
/// own and are not tracked by this handle.
///
/// # Example
///
/// ```ignore
/// let mut handle = store.send(Action::Start).await?;
/// handle.wait_with_timeout(Duration::from_secs(5)).await?;
/// // All effects from Action::Start are now complete
/// ```
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    /// Create a new effect handle and the tracking context that feeds it
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (handle, _tracking) = Self::new();
        handle
    }

    /// Number of effects from this dispatch that are still running
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                // Every tracking context is gone, so nothing is left to run
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns `Err(())` if the timeout expires before all effects complete.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), ()> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| ())
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: Effect tracking context passed through effect execution
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    /// Increment the effect counter (effect started)
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    /// Decrement the effect counter (effect completed)
    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            // Counter reached zero, notify waiters
            self.notifier.send_replace(());
        }
    }
}

/// Internal: RAII guard that decrements effect counter on drop
///
/// Ensures the effect counter is always decremented, even if the effect panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

type DispatchFn<A> = dyn Fn(A) -> BoxFuture<'static, Result<EffectHandle, StoreError>> + Send + Sync;

/// Write-only side of a store
///
/// A `Dispatcher` can send actions but cannot read state. Hand it to code
/// that only produces input (forms, buttons, background jobs).
pub struct Dispatcher<A> {
    dispatch: Arc<DispatchFn<A>>,
}

impl<A> Dispatcher<A> {
    /// Dispatch an action to the owning store
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
    pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
        (self.dispatch)(action).await
    }
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            dispatch: Arc::clone(&self.dispatch),
        }
    }
}

impl<A> std::fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Dispatcher, Duration,
        Effect, EffectHandle, EffectTracking, Ordering, Reducer, RwLock, StateObserver,
        StoreError,
    };
    use tokio::sync::watch;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, single writer)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. State broadcast to subscribers
    /// 5. Post-dispatch observers
    /// 6. Effect execution (with feedback loop)
    ///
    /// Cloning a store yields another handle to the same state.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        observers: Vec<Arc<dyn StateObserver<S>>>,
        /// Latest committed state, republished after every dispatch.
        state_broadcast: Arc<watch::Sender<S>>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Clone + Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (state_broadcast, _) = watch::channel(initial_state.clone());

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                observers: Vec::new(),
                state_broadcast: Arc::new(state_broadcast),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Register a post-dispatch observer
        ///
        /// Observers are shared by clones made after registration, so register
        /// them before handing the store out.
        #[must_use]
        pub fn with_observer(mut self, observer: impl StateObserver<S> + 'static) -> Self {
            self.observers.push(Arc::new(observer));
            self
        }

        /// Send an action to the store
        ///
        /// Runs the reducer under the write lock, notifies observers,
        /// republishes the state to subscribers, then starts the returned
        /// effects. Effects never delay the state update.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Example
        ///
        /// ```ignore
        /// let mut handle = store.send(TodoAction::ClearCompleted).await?;
        /// handle.wait().await;
        /// ```
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: A) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let (handle, tracking) = EffectHandle::new();

            let effects = {
                let mut state = self.state.write().await;
                tracing::trace!("Acquired write lock on state");

                let previous = (!self.observers.is_empty()).then(|| state.clone());

                let start = std::time::Instant::now();
                let effects = {
                    let span = tracing::debug_span!("reducer_execution");
                    let _enter = span.enter();
                    self.reducer.reduce(&mut state, action, &self.environment)
                };
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                if let Some(previous) = previous {
                    for observer in &self.observers {
                        observer.on_change(&previous, &state);
                    }
                }

                self.state_broadcast.send_replace(state.clone());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());
                effects
            };

            for effect in effects {
                self.execute_effect(effect, &tracking);
            }

            Ok(handle)
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.todos.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&state)
        }

        /// Subscribe to state changes (read channel)
        ///
        /// The receiver always holds the latest committed state. Slow
        /// subscribers skip intermediate states but never see a partial one.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<S> {
            self.state_broadcast.subscribe()
        }

        /// Get the write-only dispatch handle (write channel)
        #[must_use]
        pub fn dispatcher(&self) -> Dispatcher<A> {
            let store = self.clone();
            Dispatcher {
                dispatch: Arc::new(move |action| {
                    let store = store.clone();
                    Box::pin(async move { store.send(action).await })
                }),
            }
        }

        /// Number of effects still running across all dispatches
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::SeqCst)
        }

        /// Initiate graceful shutdown of the store
        ///
        /// New actions are rejected from this point on. Waits for in-flight
        /// effects to complete.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if the timeout expires before all
        /// pending effects complete.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let deadline = tokio::time::Instant::now() + timeout;
            loop {
                let pending = self.pending_effects.load(Ordering::SeqCst);
                if pending == 0 {
                    tracing::info!("Graceful shutdown completed");
                    return Ok(());
                }
                if tokio::time::Instant::now() >= deadline {
                    tracing::error!(pending, "Shutdown timed out with effects still running");
                    return Err(StoreError::ShutdownTimeout(pending));
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        }

        /// Execute an effect with tracking
        ///
        /// - `None`: No-op
        /// - `Future`: Spawned; a resulting `Some(action)` is sent back to the store
        /// - `Parallel`: Each child is executed independently
        ///
        /// Effect failures are the effect's own business. A panicking effect
        /// only kills its task; the [`DecrementGuard`] keeps the counters right.
        fn execute_effect(&self, effect: Effect<A>, tracking: &EffectTracking) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Parallel(effects) => {
                    tracing::trace!("Executing Effect::Parallel with {} effects", effects.len());
                    metrics::counter!("store.effects.executed", "type" => "parallel").increment(1);
                    for effect in effects {
                        self.execute_effect(effect, tracking);
                    }
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    tracking.increment();

                    self.pending_effects.fetch_add(1, Ordering::SeqCst);
                    let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

                    let guard = DecrementGuard(tracking.clone());
                    let store = self.clone();

                    tokio::spawn(async move {
                        let _guard = guard;
                        let _pending_guard = pending_guard;

                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            if let Err(error) = store.send(action).await {
                                tracing::warn!(%error, "Dropped action produced by effect");
                            }
                        }
                    });
                },
            }
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                observers: self.observers.clone(),
                state_broadcast: Arc::clone(&self.state_broadcast),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use std::sync::Mutex;
    use todo_store_core::{smallvec, SmallVec};

    #[derive(Debug, Clone, PartialEq)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Increment,
        NoOp,
        ProduceEffect,
        ProduceParallelEffects,
        ProducePanickingEffect,
    }

    #[derive(Debug, Clone)]
    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::ProduceParallelEffects => {
                    smallvec![Effect::merge(vec![
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                        Effect::Future(Box::pin(async { Some(TestAction::Increment) })),
                    ])]
                },
                TestAction::ProducePanickingEffect => {
                    #[allow(clippy::panic)] // Intentional panic for testing error handling
                    {
                        smallvec![Effect::Future(Box::pin(async {
                            panic!("Intentional panic in effect for testing");
                        }))]
                    }
                },
            }
        }
    }

    fn new_store() -> Store<TestState, TestAction, (), TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, ())
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = new_store();
        assert_eq!(store.state(|s| s.value).await, 0);
        assert_eq!(store.subscribe().borrow().value, 0);
    }

    #[tokio::test]
    async fn test_send_action() {
        let store = new_store();
        let _ = store.send(TestAction::Increment).await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_feedback() {
        let store = new_store();
        let mut handle = store.send(TestAction::ProduceEffect).await.unwrap();
        handle.wait().await;

        // Feedback dispatch happens inside the effect task before it completes
        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_parallel_effects_tracked() {
        let store = new_store();
        let mut handle = store.send(TestAction::ProduceParallelEffects).await.unwrap();
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(handle.pending(), 0);
        assert_eq!(store.state(|s| s.value).await, 3);
    }

    #[tokio::test]
    async fn test_panicking_effect_does_not_poison_store() {
        let store = new_store();
        let mut handle = store.send(TestAction::ProducePanickingEffect).await.unwrap();
        handle
            .wait_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();

        let _ = store.send(TestAction::Increment).await;
        assert_eq!(store.state(|s| s.value).await, 1);
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn test_observer_sees_previous_and_current() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let store = new_store().with_observer(move |prev: &TestState, next: &TestState| {
            sink.lock().unwrap().push((prev.value, next.value));
        });

        let _ = store.send(TestAction::Increment).await;
        let _ = store.send(TestAction::NoOp).await;
        let _ = store.send(TestAction::Increment).await;

        assert_eq!(*seen.lock().unwrap(), vec![(0, 1), (1, 1), (1, 2)]);
    }

    #[tokio::test]
    async fn test_subscribers_get_latest_state() {
        let store = new_store();
        let mut first = store.subscribe();
        let second = store.subscribe();

        let _ = store.send(TestAction::Increment).await;

        assert!(first.has_changed().unwrap());
        assert_eq!(first.borrow_and_update().value, 1);
        assert_eq!(second.borrow().value, 1);
    }

    #[tokio::test]
    async fn test_dispatcher_writes_to_store() {
        let store = new_store();
        let dispatcher = store.dispatcher();

        let _ = dispatcher.send(TestAction::Increment).await;
        let _ = dispatcher.clone().send(TestAction::Increment).await;

        assert_eq!(store.state(|s| s.value).await, 2);
    }

    #[tokio::test]
    async fn test_shutdown_rejects_new_actions() {
        let store = new_store();
        store.shutdown(Duration::from_secs(1)).await.unwrap();

        let result = store.send(TestAction::Increment).await;
        assert_eq!(result.unwrap_err(), StoreError::ShutdownInProgress);
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_completed_handle_returns_immediately() {
        let mut handle = EffectHandle::completed();
        handle
            .wait_with_timeout(Duration::from_millis(10))
            .await
            .unwrap();
    }
}
