//! Single-screen task list.
//!
//! A text field and an "Add" button create tasks; tapping a task removes it.
//! State lives in a [`TaskListStore`], which publishes an immutable snapshot
//! after every change. The [`view`] module turns snapshots into a [`Screen`]
//! and user interactions into store calls.
//!
//! - New tasks are prepended, so the list reads newest first
//! - Every task gets a fresh identifier; rows are keyed by it
//! - Nothing is validated: empty tasks are fine, removing an unknown id does nothing
//! - The search field is stored but does not filter anything
//!
//! # Quick Start
//!
//! ```
//! use tasklist::TaskListStore;
//!
//! let store = TaskListStore::new();
//!
//! store.set_text_input("buy milk");
//! store.create_task();
//!
//! let state = store.snapshot();
//! assert_eq!(state.contents(), vec!["buy milk"]);
//! assert_eq!(state.text_input, "");
//!
//! let id = state.tasks[0].id;
//! store.remove_task(id);
//! assert_eq!(store.snapshot().count(), 0);
//! ```

pub mod config;
pub mod reducer;
pub mod shell;
pub mod store;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use config::{AppConfig, ConfigError};
pub use reducer::{TaskListEnvironment, TaskListReducer};
pub use store::{TaskListRuntime, TaskListStore};
pub use tasklist_runtime::Subscription;
pub use types::{Task, TaskId, TaskListAction, TaskListState};
pub use view::{Renderer, Screen, TaskListView, TextRenderer, UiEvent, ViewConfig};
