//! Terminal front end for the task list.
//!
//! Reads commands from stdin and redraws the screen on stdout after every
//! change. Logs go to stderr.

use anyhow::Context;
use tasklist::config::{DEFAULT_LOG_FILTER, LOG_VAR};
use std::borrow::Cow;
use tasklist::shell::{Command, HELP, decode_line};
use tasklist::{AppConfig, TaskListStore, TaskListView, TextRenderer, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = match &config.log_filter {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid {LOG_VAR} filter: {directive}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(show_title_bar = config.view.show_title_bar, "Starting task list");

    let store = TaskListStore::new();
    let view = TaskListView::mount(&store, config.view.clone(), TextRenderer::new(std::io::stdout()));

    let mut input = BufReader::new(tokio::io::stdin());
    let mut raw = Vec::new();
    loop {
        raw.clear();
        if input.read_until(b'\n', &mut raw).await.context("Failed to read stdin")? == 0 {
            break;
        }
        let line = decode_line(&raw);
        if matches!(line, Cow::Owned(_)) {
            tracing::warn!("Input line was not valid UTF-8; invalid bytes replaced");
        }

        match Command::parse(&line) {
            Command::Ui(event) => view.dispatch(event),
            Command::Tap(row) => match view.screen().row_key(row - 1) {
                Some(id) => view.dispatch(UiEvent::RowTapped(id)),
                None => eprintln!("No row {row}"),
            },
            Command::Dump => {
                let json = serde_json::to_string_pretty(&*store.snapshot())
                    .context("Failed to serialize state")?;
                println!("{json}");
            },
            Command::Help => print!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(other) => eprintln!("Unknown command: {other} (try /help)"),
        }
    }

    tracing::info!(tasks = store.snapshot().count(), "Task list closed");
    Ok(())
}
