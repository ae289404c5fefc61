//! # Tasklist Testing
//!
//! Testing utilities and helpers for the task list reducer architecture.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - A recorder for snapshots published by a store
//!
//! ## Example
//!
//! ```ignore
//! use tasklist_testing::{SequentialIdGenerator, SnapshotRecorder};
//!
//! let store = TaskListStore::with_ids(Arc::new(SequentialIdGenerator::new()));
//! let recorder = SnapshotRecorder::new();
//! let _sub = store.subscribe(recorder.observer());
//!
//! store.set_text_input("buy milk");
//! store.create_task();
//!
//! assert_eq!(recorder.len(), 2);
//! ```

use tasklist_core::Uuid;
use tasklist_core::environment::IdGenerator;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{IdGenerator, Uuid};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Predictable id generator for deterministic tests
    ///
    /// Hands out `00000000-0000-0000-0000-000000000001`, then `…0002`, and so on.
    ///
    /// # Example
    ///
    /// ```
    /// use tasklist_testing::mocks::SequentialIdGenerator;
    /// use tasklist_core::environment::IdGenerator;
    /// use tasklist_core::Uuid;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id(), Uuid::from_u128(1));
    /// assert_eq!(ids.next_id(), Uuid::from_u128(2));
    /// ```
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is `1`
        #[must_use]
        pub const fn new() -> Self {
            Self {
                next: AtomicU64::new(0),
            }
        }

        /// How many ids have been handed out so far
        #[must_use]
        pub fn issued(&self) -> u64 {
            self.next.load(Ordering::SeqCst)
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> Uuid {
            let n = self.next.fetch_add(1, Ordering::SeqCst) + 1;
            Uuid::from_u128(u128::from(n))
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    use std::sync::{Arc, Mutex, PoisonError};

    /// Records every snapshot handed to a store observer
    ///
    /// Clones share the same recording, so a clone can be moved into the
    /// observer while the test keeps the original.
    #[derive(Debug)]
    pub struct SnapshotRecorder<S> {
        snapshots: Arc<Mutex<Vec<Arc<S>>>>,
    }

    impl<S> Clone for SnapshotRecorder<S> {
        fn clone(&self) -> Self {
            Self {
                snapshots: Arc::clone(&self.snapshots),
            }
        }
    }

    impl<S> Default for SnapshotRecorder<S> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<S> SnapshotRecorder<S> {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self {
                snapshots: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Observer callback that appends to this recording
        pub fn observer(&self) -> impl Fn(&Arc<S>) + Send + Sync + 'static
        where
            S: Send + Sync + 'static,
        {
            let recorder = self.clone();
            move |snapshot: &Arc<S>| recorder.record(snapshot)
        }

        /// Append a snapshot
        pub fn record(&self, snapshot: &Arc<S>) {
            self.snapshots
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(Arc::clone(snapshot));
        }

        /// All snapshots recorded so far, oldest first
        #[must_use]
        pub fn snapshots(&self) -> Vec<Arc<S>> {
            self.snapshots
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Most recent snapshot, if any
        #[must_use]
        pub fn last(&self) -> Option<Arc<S>> {
            self.snapshots
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .last()
                .cloned()
        }

        /// Number of snapshots recorded
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Whether nothing has been recorded yet
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }
}

// Re-export commonly used items
pub use helpers::SnapshotRecorder;
pub use mocks::SequentialIdGenerator;
pub use reducer_test::{ReducerTest, assertions};
