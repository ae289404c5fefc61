//! Reducer logic for the task list.
//!
//! Every action is total: there is nothing to validate, so the reducer never
//! records an error and never produces effects.

use crate::types::{Task, TaskId, TaskListAction, TaskListState};
use std::sync::Arc;
use tasklist_core::{
    SmallVec,
    effect::Effect,
    environment::{IdGenerator, RandomIdGenerator},
    reducer::Reducer,
};

/// Environment dependencies for the task list reducer
#[derive(Clone)]
pub struct TaskListEnvironment {
    /// Source of fresh task identifiers
    pub ids: Arc<dyn IdGenerator>,
}

impl TaskListEnvironment {
    /// Creates a new `TaskListEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Environment backed by random UUIDs
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(RandomIdGenerator))
    }
}

impl std::fmt::Debug for TaskListEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskListEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the task list
#[derive(Clone, Debug, Default)]
pub struct TaskListReducer;

impl TaskListReducer {
    /// Creates a new `TaskListReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TaskListReducer {
    type State = TaskListState;
    type Action = TaskListAction;
    type Environment = TaskListEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            TaskListAction::SetTextInput { value } => {
                state.text_input = value;
            },

            TaskListAction::SetSearch { value } => {
                state.search = value;
            },

            TaskListAction::CreateTask => {
                let id = TaskId::from_uuid(env.ids.next_id());
                let content = std::mem::take(&mut state.text_input);
                tracing::debug!(task_id = %id, "Task created");
                state.tasks.insert(0, Task::new(id, content));
            },

            TaskListAction::RemoveTask { id } => {
                let before = state.tasks.len();
                state.tasks.retain(|task| task.id != id);
                if state.tasks.len() == before {
                    tracing::trace!(task_id = %id, "Remove ignored: no such task");
                } else {
                    tracing::debug!(task_id = %id, "Task removed");
                }
            },
        }

        SmallVec::new()
    }
}
