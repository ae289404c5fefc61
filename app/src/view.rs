//! View bindings for the task list screen.
//!
//! The view holds no logic of its own: it turns a snapshot into a [`Screen`]
//! and turns [`UiEvent`]s into store calls. Rendering is pushed to a
//! [`Renderer`] once on mount and again after every published snapshot.

use crate::store::TaskListStore;
use crate::types::{TaskId, TaskListState};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use tasklist_runtime::Subscription;

/// Text of the title bar
pub const TITLE: &str = "Todo";

/// Label of the add button
pub const ADD_LABEL: &str = "Add";

/// Default label of the add-task field
pub const DEFAULT_FIELD_LABEL: &str = "Task";

/// Presentation options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Whether the "Todo" title bar is shown
    pub show_title_bar: bool,
    /// Label of the add-task field
    pub field_label: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            show_title_bar: false,
            field_label: DEFAULT_FIELD_LABEL.to_string(),
        }
    }
}

/// Title bar at the top of the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleBar {
    /// Title text
    pub title: String,
}

/// Labelled single-line text field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextField {
    /// Field label
    pub label: String,
    /// Current value
    pub value: String,
}

/// Push button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Button label
    pub label: String,
}

/// One task row, keyed by task id rather than position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Identity of the task shown in this row
    pub key: TaskId,
    /// Text shown in the row
    pub content: String,
}

/// Everything visible on the screen for one snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    /// Optional title bar
    pub title_bar: Option<TitleBar>,
    /// Add-task field
    pub field: TextField,
    /// Add button
    pub add_button: Button,
    /// Task rows, newest first
    pub rows: Vec<Row>,
}

impl Screen {
    /// Build the screen for `state`
    #[must_use]
    pub fn from_state(state: &TaskListState, config: &ViewConfig) -> Self {
        Self {
            title_bar: config.show_title_bar.then(|| TitleBar {
                title: TITLE.to_string(),
            }),
            field: TextField {
                label: config.field_label.clone(),
                value: state.text_input.clone(),
            },
            add_button: Button {
                label: ADD_LABEL.to_string(),
            },
            rows: state
                .tasks
                .iter()
                .map(|task| Row {
                    key: task.id,
                    content: task.content.clone(),
                })
                .collect(),
        }
    }

    /// Key of the row at `index` (0-based), if any
    #[must_use]
    pub fn row_key(&self, index: usize) -> Option<TaskId> {
        self.rows.get(index).map(|row| row.key)
    }
}

/// User interaction forwarded to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The add-task field changed
    TextChanged(String),
    /// The search field changed
    SearchChanged(String),
    /// The add button was pressed
    AddPressed,
    /// A row was tapped
    RowTapped(TaskId),
}

/// Something that can draw a [`Screen`]
pub trait Renderer: Send {
    /// Draw `screen`, replacing whatever was drawn before
    fn render(&mut self, screen: &Screen);
}

/// The mounted task list screen
///
/// Mounting renders once and subscribes to the store; every published
/// snapshot triggers a synchronous re-render from the latest state.
/// Dropping the view detaches it from the store.
pub struct TaskListView<R> {
    store: TaskListStore,
    config: ViewConfig,
    renderer: Arc<Mutex<R>>,
    _subscription: Subscription,
}

impl<R: Renderer + 'static> TaskListView<R> {
    /// Attach a view to `store`
    pub fn mount(store: &TaskListStore, config: ViewConfig, renderer: R) -> Self {
        let renderer = Arc::new(Mutex::new(renderer));

        let subscription = {
            let handle = store.clone();
            let config = config.clone();
            let renderer = Arc::clone(&renderer);
            store.subscribe(move |_published: &Arc<TaskListState>| {
                redraw(&handle, &config, &renderer);
            })
        };
        redraw(store, &config, &renderer);

        tracing::debug!(subscription_id = subscription.id(), "View mounted");

        Self {
            store: store.clone(),
            config,
            renderer,
            _subscription: subscription,
        }
    }

    /// Forward a user interaction to the store
    pub fn dispatch(&self, event: UiEvent) {
        tracing::debug!(?event, "UI event");
        match event {
            UiEvent::TextChanged(value) => self.store.set_text_input(value),
            UiEvent::SearchChanged(value) => self.store.set_search(value),
            UiEvent::AddPressed => self.store.create_task(),
            UiEvent::RowTapped(id) => self.store.remove_task(id),
        }
    }

    /// Screen for the latest snapshot
    #[must_use]
    pub fn screen(&self) -> Screen {
        Screen::from_state(&self.store.snapshot(), &self.config)
    }

    /// Access the renderer
    pub fn with_renderer<T>(&self, f: impl FnOnce(&R) -> T) -> T {
        f(&self.renderer.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

fn redraw<R: Renderer>(store: &TaskListStore, config: &ViewConfig, renderer: &Mutex<R>) {
    let screen = Screen::from_state(&store.snapshot(), config);
    renderer
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .render(&screen);
}

/// Draw `screen` as plain text
///
/// ```text
/// == Todo ==
/// Task: [buy milk] [Add]
///   1. walk the dog
///   2. water plants
/// ```
#[must_use]
pub fn render_text(screen: &Screen) -> String {
    let mut out = String::new();

    if let Some(title_bar) = &screen.title_bar {
        out.push_str(&format!("== {} ==\n", title_bar.title));
    }

    out.push_str(&format!(
        "{}: [{}] [{}]\n",
        screen.field.label, screen.field.value, screen.add_button.label
    ));

    if screen.rows.is_empty() {
        out.push_str("  (no tasks)\n");
    }
    for (index, row) in screen.rows.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n", index + 1, row.content));
    }

    out
}

/// Renderer that writes [`render_text`] output to any writer
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write + Send> TextRenderer<W> {
    /// Wrap a writer
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Borrow the writer
    pub const fn get_ref(&self) -> &W {
        &self.out
    }
}

impl<W: Write + Send> Renderer for TextRenderer<W> {
    fn render(&mut self, screen: &Screen) {
        let text = render_text(screen);
        if let Err(error) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush())
        {
            tracing::warn!(%error, "Failed to draw screen");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Task;
    use tasklist_core::Uuid;

    fn id(n: u128) -> TaskId {
        TaskId::from_uuid(Uuid::from_u128(n))
    }

    fn sample_state() -> TaskListState {
        TaskListState {
            text_input: "draft".to_string(),
            search: String::new(),
            tasks: vec![Task::new(id(2), "walk the dog"), Task::new(id(1), "water plants")],
        }
    }

    #[test]
    fn rows_are_keyed_by_task_id() {
        let screen = Screen::from_state(&sample_state(), &ViewConfig::default());

        assert_eq!(screen.row_key(0), Some(id(2)));
        assert_eq!(screen.row_key(1), Some(id(1)));
        assert_eq!(screen.row_key(2), None);
        assert_eq!(screen.field.value, "draft");
        assert_eq!(screen.add_button.label, "Add");
    }

    #[test]
    fn title_bar_is_hidden_by_default() {
        let hidden = Screen::from_state(&sample_state(), &ViewConfig::default());
        assert!(hidden.title_bar.is_none());

        let config = ViewConfig {
            show_title_bar: true,
            ..ViewConfig::default()
        };
        let shown = Screen::from_state(&sample_state(), &config);
        assert_eq!(
            shown.title_bar,
            Some(TitleBar {
                title: "Todo".to_string()
            })
        );
    }

    #[test]
    fn text_rendering() {
        let config = ViewConfig {
            show_title_bar: true,
            ..ViewConfig::default()
        };
        let screen = Screen::from_state(&sample_state(), &config);

        assert_eq!(
            render_text(&screen),
            "== Todo ==\nTask: [draft] [Add]\n  1. walk the dog\n  2. water plants\n"
        );
    }

    #[test]
    fn text_rendering_of_empty_list() {
        let screen = Screen::from_state(&TaskListState::new(), &ViewConfig::default());
        assert_eq!(render_text(&screen), "Task: [] [Add]\n  (no tasks)\n");
    }

    #[test]
    fn text_renderer_writes_each_frame() {
        let mut renderer = TextRenderer::new(Vec::new());
        let screen = Screen::from_state(&TaskListState::new(), &ViewConfig::default());

        renderer.render(&screen);
        renderer.render(&screen);

        let written = String::from_utf8(renderer.into_inner()).unwrap_or_default();
        assert_eq!(written.matches("[Add]").count(), 2);
    }
}
