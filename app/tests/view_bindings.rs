//! View bindings driven by UI events
//!
//! Mounts a `TaskListView` with a recording renderer and checks that UI
//! events reach the store and that every change triggers a re-render.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use std::sync::Arc;
use tasklist::view::render_text;
use tasklist::{Renderer, Screen, TaskListStore, TaskListView, TextRenderer, UiEvent, ViewConfig};
use tasklist_testing::SequentialIdGenerator;

#[derive(Default)]
struct FrameLog {
    frames: Vec<Screen>,
}

impl Renderer for FrameLog {
    fn render(&mut self, screen: &Screen) {
        self.frames.push(screen.clone());
    }
}

fn mounted() -> (TaskListStore, TaskListView<FrameLog>) {
    let store = TaskListStore::with_ids(Arc::new(SequentialIdGenerator::new()));
    let view = TaskListView::mount(&store, ViewConfig::default(), FrameLog::default());
    (store, view)
}

fn frame_count(view: &TaskListView<FrameLog>) -> usize {
    view.with_renderer(|log| log.frames.len())
}

fn last_frame(view: &TaskListView<FrameLog>) -> Screen {
    view.with_renderer(|log| log.frames.last().cloned().expect("at least one frame"))
}

#[test]
fn mount_renders_initial_screen() {
    let (_store, view) = mounted();

    assert_eq!(frame_count(&view), 1);
    let screen = last_frame(&view);
    assert_eq!(screen.field.label, "Task");
    assert_eq!(screen.field.value, "");
    assert_eq!(screen.add_button.label, "Add");
    assert!(screen.rows.is_empty());
    assert!(screen.title_bar.is_none());
}

#[test]
fn typing_and_pressing_add_creates_a_row() {
    let (store, view) = mounted();

    view.dispatch(UiEvent::TextChanged("buy milk".to_string()));
    assert_eq!(last_frame(&view).field.value, "buy milk");

    view.dispatch(UiEvent::AddPressed);

    let screen = last_frame(&view);
    assert_eq!(frame_count(&view), 3);
    assert_eq!(screen.field.value, "");
    assert_eq!(screen.rows.len(), 1);
    assert_eq!(screen.rows[0].content, "buy milk");
    assert_eq!(screen.rows[0].key, store.snapshot().tasks[0].id);
}

#[test]
fn tapping_a_row_removes_that_task() {
    let (store, view) = mounted();
    for text in ["C", "B", "A"] {
        view.dispatch(UiEvent::TextChanged(text.to_string()));
        view.dispatch(UiEvent::AddPressed);
    }

    let b = view.screen().row_key(1).unwrap();
    view.dispatch(UiEvent::RowTapped(b));

    let contents: Vec<_> = last_frame(&view).rows.into_iter().map(|row| row.content).collect();
    assert_eq!(contents, vec!["A", "C"]);
    assert!(!store.snapshot().exists(&b));
}

#[test]
fn rows_keep_their_key_when_positions_shift() {
    let (_store, view) = mounted();
    view.dispatch(UiEvent::TextChanged("first".to_string()));
    view.dispatch(UiEvent::AddPressed);
    let first = view.screen().row_key(0).unwrap();

    view.dispatch(UiEvent::TextChanged("second".to_string()));
    view.dispatch(UiEvent::AddPressed);

    let screen = view.screen();
    assert_eq!(screen.row_key(1), Some(first));
    assert_eq!(screen.rows[1].content, "first");
}

#[test]
fn search_events_rerender_without_filtering() {
    let (store, view) = mounted();
    view.dispatch(UiEvent::TextChanged("keep".to_string()));
    view.dispatch(UiEvent::AddPressed);
    let before = frame_count(&view);

    view.dispatch(UiEvent::SearchChanged("nothing matches".to_string()));

    assert_eq!(frame_count(&view), before + 1);
    assert_eq!(last_frame(&view).rows.len(), 1);
    assert_eq!(store.snapshot().search, "nothing matches");
}

#[test]
fn changes_made_directly_on_the_store_are_rendered() {
    let (store, view) = mounted();

    store.set_text_input("direct");
    store.create_task();

    assert_eq!(last_frame(&view).rows[0].content, "direct");
}

#[test]
fn dropping_the_view_detaches_it() {
    let (store, view) = mounted();
    assert_eq!(store.runtime().observer_count(), 1);

    drop(view);

    assert_eq!(store.runtime().observer_count(), 0);
    store.set_text_input("nobody is watching");
}

#[test]
fn text_renderer_draws_every_frame() {
    let store = TaskListStore::with_ids(Arc::new(SequentialIdGenerator::new()));
    let config = ViewConfig {
        show_title_bar: true,
        ..ViewConfig::default()
    };
    let view = TaskListView::mount(&store, config, TextRenderer::new(Vec::new()));

    view.dispatch(UiEvent::TextChanged("water plants".to_string()));
    view.dispatch(UiEvent::AddPressed);

    let output = view.with_renderer(|r| String::from_utf8(r.get_ref().clone()).unwrap());
    assert_eq!(output.matches("== Todo ==").count(), 3);
    assert!(output.ends_with(&render_text(&view.screen())));
    assert!(output.ends_with("Task: [] [Add]\n  1. water plants\n"));
}
