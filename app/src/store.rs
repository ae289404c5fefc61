//! `TaskListStore`: the task list's state container.
//!
//! A thin, typed front for the generic [`Store`] runtime. Each method maps to
//! exactly one [`TaskListAction`], and every call publishes a new snapshot
//! to all observers before it returns.

use crate::reducer::{TaskListEnvironment, TaskListReducer};
use crate::types::{TaskId, TaskListAction, TaskListState};
use std::sync::Arc;
use tasklist_core::environment::IdGenerator;
use tasklist_runtime::{Store, Subscription};
use tokio::sync::watch;

/// The generic runtime specialised to the task list
pub type TaskListRuntime =
    Store<TaskListState, TaskListAction, TaskListEnvironment, TaskListReducer>;

/// State container for one task list screen
///
/// Clones are handles to the same state.
#[derive(Clone)]
pub struct TaskListStore {
    runtime: TaskListRuntime,
}

impl TaskListStore {
    /// Empty store with random task identifiers
    #[must_use]
    pub fn new() -> Self {
        Self::from_environment(TaskListEnvironment::production())
    }

    /// Empty store drawing task identifiers from `ids`
    #[must_use]
    pub fn with_ids(ids: Arc<dyn IdGenerator>) -> Self {
        Self::from_environment(TaskListEnvironment::new(ids))
    }

    fn from_environment(environment: TaskListEnvironment) -> Self {
        Self {
            runtime: Store::new(TaskListState::new(), TaskListReducer::new(), environment),
        }
    }

    /// Replace the add-task field value
    pub fn set_text_input(&self, value: impl Into<String>) {
        self.send(TaskListAction::SetTextInput {
            value: value.into(),
        });
    }

    /// Replace the search field value
    pub fn set_search(&self, value: impl Into<String>) {
        self.send(TaskListAction::SetSearch {
            value: value.into(),
        });
    }

    /// Prepend a task made from the add-task field and clear the field
    pub fn create_task(&self) {
        self.send(TaskListAction::CreateTask);
    }

    /// Remove the task with `id`, if there is one
    pub fn remove_task(&self, id: TaskId) {
        self.send(TaskListAction::RemoveTask { id });
    }

    /// Dispatch a raw action
    pub fn send(&self, action: TaskListAction) {
        self.runtime.send(action);
    }

    /// Latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> Arc<TaskListState> {
        self.runtime.snapshot()
    }

    /// Register an observer for every published snapshot
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&Arc<TaskListState>) + Send + Sync + 'static,
    {
        self.runtime.subscribe(observer)
    }

    /// Async receiver holding the latest snapshot
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<TaskListState>> {
        self.runtime.watch()
    }

    /// The underlying generic runtime
    #[must_use]
    pub const fn runtime(&self) -> &TaskListRuntime {
        &self.runtime
    }
}

impl Default for TaskListStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TaskListStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskListStore")
            .field("state", &self.snapshot())
            .field("observers", &self.runtime.observer_count())
            .finish()
    }
}
