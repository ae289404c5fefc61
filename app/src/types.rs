//! Domain types for the task list.
//!
//! A task list is an ordered sequence of tasks, newest first, plus the two
//! text inputs bound to the screen.

use serde::{Deserialize, Serialize};
use tasklist_core::Uuid;

/// Unique identifier for a task
///
/// Identity is independent of content: two tasks with the same text never
/// share an id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a `TaskId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, fixed for the task's lifetime
    pub id: TaskId,
    /// Text of the task (may be empty)
    pub content: String,
}

impl Task {
    /// Creates a new task
    #[must_use]
    pub fn new(id: TaskId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// State of the task list screen
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListState {
    /// Current value of the add-task field
    pub text_input: String,
    /// Current value of the search field (stored, never used for filtering)
    pub search: String,
    /// Tasks, newest first
    pub tasks: Vec<Task>,
}

impl TaskListState {
    /// Creates an empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of tasks
    #[must_use]
    pub fn count(&self) -> usize {
        self.tasks.len()
    }

    /// Returns a task by ID
    #[must_use]
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Checks if a task exists
    #[must_use]
    pub fn exists(&self, id: &TaskId) -> bool {
        self.get(id).is_some()
    }

    /// Task contents in list order
    #[must_use]
    pub fn contents(&self) -> Vec<&str> {
        self.tasks.iter().map(|task| task.content.as_str()).collect()
    }
}

/// Everything that can happen to the task list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskListAction {
    /// The add-task field changed
    SetTextInput {
        /// New field value
        value: String,
    },

    /// The search field changed
    SetSearch {
        /// New field value
        value: String,
    },

    /// Turn the current add-task field value into a new task
    CreateTask,

    /// Remove a task; unknown ids are ignored
    RemoveTask {
        /// Task to remove
        id: TaskId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_id() {
        let a = Task::new(TaskId::from_uuid(Uuid::from_u128(1)), "a");
        let b = Task::new(TaskId::from_uuid(Uuid::from_u128(2)), "b");
        let state = TaskListState {
            tasks: vec![b.clone(), a.clone()],
            ..TaskListState::new()
        };

        assert_eq!(state.count(), 2);
        assert_eq!(state.get(&a.id), Some(&a));
        assert!(!state.exists(&TaskId::from_uuid(Uuid::from_u128(3))));
        assert_eq!(state.contents(), vec!["b", "a"]);
    }

    #[test]
    fn task_id_serializes_as_plain_uuid() {
        let id = TaskId::from_uuid(Uuid::from_u128(1));
        assert_eq!(
            serde_json::to_string(&id).ok().as_deref(),
            Some("\"00000000-0000-0000-0000-000000000001\"")
        );
        assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000001");
    }
}
