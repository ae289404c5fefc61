//! # Tasklist Runtime
//!
//! Runtime implementation for the task list reducer architecture.
//!
//! This crate provides the Store runtime that coordinates reducer execution,
//! snapshot publication and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns the current snapshot and serializes every mutation
//! - **Observers**: Synchronous callbacks notified of every published snapshot
//! - **Watch channel**: Async view of the latest snapshot
//! - **Effect Executor**: Executes effect descriptions and feeds actions back to the reducer
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Re-render on every published snapshot
//! let _subscription = store.subscribe(|snapshot| render(snapshot));
//!
//! // Send an action
//! store.send(Action::DoSomething);
//!
//! // Read state
//! let value = store.state(|s| s.some_field.clone());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tasklist_core::{effect::Effect, reducer::Reducer};

mod observer;

pub use error::StoreError;
pub use observer::Subscription;
pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while observing a Store
    ///
    /// Dispatching actions never fails; only waiting on the store can.
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Timeout waiting for a matching snapshot
        ///
        /// Returned by `wait_for` when the timeout expires before a
        /// published snapshot satisfies the predicate.
        #[error("Timeout waiting for snapshot")]
        Timeout,
    }
}

/// Guard that decrements an atomic counter on drop (pending effect tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl AtomicCounterGuard {
    fn new(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - The runtime for reducers
///
/// Store runtime for coordinating reducer execution, snapshot publication and
/// effect handling.
pub mod store {
    use super::observer::{Observer, ObserverRegistry, Subscription};
    use super::{Arc, AtomicCounterGuard, AtomicUsize, Effect, Ordering, Reducer, StoreError};
    use std::sync::{Mutex, PoisonError};
    use std::time::Duration;
    use tokio::sync::watch;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. The current snapshot (an immutable `Arc<S>`, replaced on every action)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Observers and the snapshot watch channel
    /// 5. Effect execution (with feedback loop)
    ///
    /// Cloning a Store yields another handle to the same state.
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
        /// Serializes reducer runs: read, reduce, publish happen as one step
        dispatch: Arc<Mutex<()>>,
        snapshot: Arc<watch::Sender<Arc<S>>>,
        observers: Arc<ObserverRegistry<S>>,
        reducer: Arc<R>,
        environment: Arc<E>,
        pending_effects: Arc<AtomicUsize>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                dispatch: Arc::clone(&self.dispatch),
                snapshot: Arc::clone(&self.snapshot),
                observers: Arc::clone(&self.observers),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                pending_effects: Arc::clone(&self.pending_effects),
            }
        }
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        S: Clone + Send + Sync + 'static,
        A: Send + 'static,
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
            let (snapshot, _) = watch::channel(Arc::new(initial_state));

            Self {
                dispatch: Arc::new(Mutex::new(())),
                snapshot: Arc::new(snapshot),
                observers: Arc::new(ObserverRegistry::new()),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                pending_effects: Arc::new(AtomicUsize::new(0)),
            }
        }

        /// Send an action to the store
        ///
        /// This is the only way to change state:
        /// 1. Acquires the dispatch lock
        /// 2. Clones the current snapshot and reduces the action into the clone
        /// 3. Publishes the result as the new snapshot, then releases the lock
        /// 4. Notifies every observer with the new snapshot
        /// 5. Executes returned effects
        ///
        /// All observers have been called by the time `send` returns. A new
        /// snapshot is published for every action, even when the reducer
        /// leaves the state unchanged.
        ///
        /// Observers run after the dispatch lock is released, so an observer
        /// may itself call `send`. With several threads sending at once an
        /// observer may be handed snapshots out of order; [`Store::snapshot`]
        /// always returns the latest one.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic propagates to the caller and the
        /// previous snapshot stays published.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub fn send(&self, action: A) {
            metrics::counter!("store.actions.total").increment(1);

            let (published, effects) = {
                let _dispatch = self
                    .dispatch
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                tracing::trace!("Acquired dispatch lock");

                let current = Arc::clone(&self.snapshot.borrow());
                let mut next = S::clone(&current);

                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();

                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut next, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                let published = Arc::new(next);
                self.snapshot.send_replace(Arc::clone(&published));
                tracing::trace!(effects = effects.len(), "Snapshot published");

                (published, effects)
            };

            let notified = self.observers.notify(&published);
            metrics::counter!("store.observers.notified").increment(notified as u64);
            tracing::debug!(observers = notified, "Action processed");

            for effect in effects {
                self.execute_effect(effect);
            }
        }

        /// Latest published snapshot
        #[must_use]
        pub fn snapshot(&self) -> Arc<S> {
            Arc::clone(&self.snapshot.borrow())
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let task_count = store.state(|s| s.tasks.len());
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            f(&self.snapshot())
        }

        /// Register a synchronous observer for every published snapshot
        ///
        /// The observer is detached when the returned [`Subscription`] is
        /// dropped.
        pub fn subscribe<F>(&self, observer: F) -> Subscription
        where
            F: Fn(&Arc<S>) + Send + Sync + 'static,
        {
            let observer: Observer<S> = Arc::new(observer);
            self.observers.register(observer)
        }

        /// Number of currently attached observers
        #[must_use]
        pub fn observer_count(&self) -> usize {
            self.observers.len()
        }

        /// Async receiver that always holds the latest snapshot
        ///
        /// Unlike observers, a slow receiver only sees the most recent
        /// snapshot, not every intermediate one.
        #[must_use]
        pub fn watch(&self) -> watch::Receiver<Arc<S>> {
            self.snapshot.subscribe()
        }

        /// Wait until a published snapshot satisfies `predicate`
        ///
        /// The current snapshot is checked first, so this resolves
        /// immediately when the condition already holds.
        ///
        /// The predicate runs on a cloned snapshot with no lock held, so it
        /// may read from or send to the store.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching snapshot within `timeout`
        pub async fn wait_for<F>(&self, mut predicate: F, timeout: Duration) -> Result<Arc<S>, StoreError>
        where
            F: FnMut(&S) -> bool,
        {
            let mut rx = self.snapshot.subscribe();

            // `self` keeps the sender alive, so `changed` only fails after the
            // store is gone; park until the timeout fires in that case.
            let wait = async {
                loop {
                    let current = Arc::clone(&rx.borrow_and_update());
                    if predicate(&current) {
                        return current;
                    }
                    if rx.changed().await.is_err() {
                        std::future::pending::<()>().await;
                    }
                }
            };

            if let Ok(found) = tokio::time::timeout(timeout, wait).await {
                Ok(found)
            } else {
                tracing::warn!(timeout_ms = timeout.as_millis(), "Timed out waiting for snapshot");
                Err(StoreError::Timeout)
            }
        }

        /// Number of `Effect::Future` effects still running
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::SeqCst)
        }

        /// Execute an effect
        ///
        /// - `None`: No-op
        /// - `Parallel`: Executes each effect independently
        /// - `Future`: Spawned on the ambient Tokio runtime; a produced action
        ///   is sent back to the store. Dropped with an error log when no
        ///   runtime is available.
        fn execute_effect(&self, effect: Effect<A>) {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                },
                Effect::Parallel(effects) => {
                    tracing::trace!(count = effects.len(), "Executing Effect::Parallel");
                    metrics::counter!("store.effects.executed", "type" => "parallel")
                        .increment(1);
                    for effect in effects {
                        self.execute_effect(effect);
                    }
                },
                Effect::Future(fut) => {
                    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                        tracing::error!("Dropping Effect::Future: no Tokio runtime available");
                        metrics::counter!("store.effects.dropped").increment(1);
                        return;
                    };

                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);

                    let pending = AtomicCounterGuard::new(&self.pending_effects);
                    let store = self.clone();

                    runtime.spawn(async move {
                        let _pending = pending;
                        if let Some(action) = fut.await {
                            tracing::trace!("Effect::Future produced an action, sending to store");
                            store.send(action);
                        }
                    });
                },
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use tasklist_core::{smallvec, SmallVec};

    #[derive(Clone, Debug, Default, PartialEq)]
    struct CounterState {
        count: i64,
    }

    #[derive(Debug)]
    enum CounterAction {
        Increment,
        Touch,
        IncrementLater,
        IncrementTwiceLater,
    }

    struct CounterReducer;

    impl Reducer for CounterReducer {
        type State = CounterState;
        type Action = CounterAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut CounterState,
            action: CounterAction,
            _env: &(),
        ) -> SmallVec<[Effect<CounterAction>; 4]> {
            match action {
                CounterAction::Increment => {
                    state.count += 1;
                    SmallVec::new()
                },
                CounterAction::Touch => smallvec![Effect::None],
                CounterAction::IncrementLater => {
                    smallvec![Effect::future(async { Some(CounterAction::Increment) })]
                },
                CounterAction::IncrementTwiceLater => smallvec![Effect::merge(vec![
                    Effect::future(async { Some(CounterAction::Increment) }),
                    Effect::future(async { Some(CounterAction::Increment) }),
                ])],
            }
        }
    }

    fn counter_store() -> Store<CounterState, CounterAction, (), CounterReducer> {
        Store::new(CounterState::default(), CounterReducer, ())
    }

    #[test]
    fn send_replaces_snapshot_without_touching_the_old_one() {
        let store = counter_store();
        let before = store.snapshot();

        store.send(CounterAction::Increment);

        assert_eq!(before.count, 0);
        assert_eq!(store.state(|s| s.count), 1);
        assert!(!Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn unchanged_state_still_publishes_and_notifies() {
        let store = counter_store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let _sub = store.subscribe(move |s| sink.lock().unwrap().push(s.count));

        let before = store.snapshot();
        store.send(CounterAction::Touch);

        assert_eq!(*seen.lock().unwrap(), vec![0]);
        assert!(!Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn future_effect_without_runtime_is_dropped() {
        let store = counter_store();
        store.send(CounterAction::IncrementLater);
        assert_eq!(store.state(|s| s.count), 0);
        assert_eq!(store.pending_effects(), 0);
    }

    #[tokio::test]
    async fn future_effect_feeds_action_back() {
        let store = counter_store();
        store.send(CounterAction::IncrementLater);

        let snapshot = store
            .wait_for(|s| s.count == 1, Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(snapshot.count, 1);
    }

    #[tokio::test]
    async fn parallel_effects_all_run() {
        let store = counter_store();
        store.send(CounterAction::IncrementTwiceLater);

        store
            .wait_for(|s| s.count == 2, Duration::from_secs(1))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wait_for_times_out() {
        let store = counter_store();
        let result = store
            .wait_for(|s| s.count == 5, Duration::from_millis(20))
            .await;
        assert_eq!(result, Err(StoreError::Timeout));
    }

    #[tokio::test]
    async fn wait_for_predicate_may_send() {
        let store = counter_store();
        let driver = store.clone();

        let snapshot = store
            .wait_for(
                move |s| {
                    if s.count < 3 {
                        driver.send(CounterAction::Increment);
                    }
                    s.count >= 3
                },
                Duration::from_secs(1),
            )
            .await
            .unwrap();
        assert_eq!(snapshot.count, 3);
    }

    #[tokio::test]
    async fn watch_sees_latest_snapshot() {
        let store = counter_store();
        let mut rx = store.watch();

        store.send(CounterAction::Increment);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().count, 1);
    }
}
