//! Observer registration for published snapshots
//!
//! Observers are plain synchronous callbacks. Each registration returns a
//! [`Subscription`] handle; dropping the handle detaches the observer.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// A registered snapshot observer
pub(crate) type Observer<S> = Arc<dyn Fn(&Arc<S>) + Send + Sync>;

/// Registered observer plus the flag cleared when it is detached
struct Entry<S> {
    live: Arc<AtomicBool>,
    observer: Observer<S>,
}

impl<S> Clone for Entry<S> {
    fn clone(&self) -> Self {
        Self {
            live: Arc::clone(&self.live),
            observer: Arc::clone(&self.observer),
        }
    }
}

/// Registry of live observers, notified in registration order
pub(crate) struct ObserverRegistry<S> {
    next_id: AtomicU64,
    observers: Mutex<BTreeMap<u64, Entry<S>>>,
}

impl<S: 'static> ObserverRegistry<S> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            observers: Mutex::new(BTreeMap::new()),
        }
    }

    /// Register an observer and hand back the handle that owns its lifetime
    pub(crate) fn register(self: &Arc<Self>, observer: Observer<S>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                Entry {
                    live: Arc::new(AtomicBool::new(true)),
                    observer,
                },
            );

        tracing::debug!(subscription_id = id, "Observer registered");

        let registry: Weak<Self> = Arc::downgrade(self);
        Subscription {
            id,
            detach: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    registry.remove(id);
                }
            })),
        }
    }

    /// Call every observer with `snapshot`, returning how many were called
    ///
    /// The observer list is copied first so observers may subscribe,
    /// unsubscribe or dispatch actions from inside their callback. An entry
    /// detached after the copy is skipped.
    pub(crate) fn notify(&self, snapshot: &Arc<S>) -> usize {
        let entries: Vec<Entry<S>> = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();

        let mut called = 0;
        for entry in &entries {
            if entry.live.load(Ordering::SeqCst) {
                (entry.observer)(snapshot);
                called += 1;
            }
        }
        called
    }

    pub(crate) fn len(&self) -> usize {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn remove(&self, id: u64) {
        let removed = self
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        if let Some(entry) = removed {
            entry.live.store(false, Ordering::SeqCst);
            tracing::debug!(subscription_id = id, "Observer detached");
        }
    }
}

/// Handle for a registered observer
///
/// The observer stays registered for as long as this handle lives. Dropping it
/// (or calling [`Subscription::unsubscribe`]) detaches the observer; no further
/// notifications start after that returns, including the remainder of a
/// notification pass already in progress.
#[must_use = "dropping a Subscription detaches the observer immediately"]
pub struct Subscription {
    id: u64,
    detach: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    /// Identifier of this registration, unique per store
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Detach the observer now
    pub fn unsubscribe(mut self) {
        self.detach_now();
    }

    fn detach_now(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("attached", &self.detach.is_some())
            .finish()
    }
}
