//! Line-oriented demo for the task list store.
//!
//! Reads one JSON action per line from stdin, for example
//! `{"type":"addTodo","payload":{"id":1,"title":"Buy milk","completed":false}}`,
//! dispatches it, and prints the visible tasks whenever the state changes.

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use todo_store::{mount_from_config, TodoAction, TodoConfig, TodoState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn render(state: &TodoState) {
    println!("--- filter: {} ---", state.filter_by);
    for task in state.visible_todos() {
        let mark = if task.completed { "x" } else { " " };
        println!("  [{mark}] {} (#{})", task.title, task.id);
    }
    println!("{} items left", state.active_count());
    if let Some(error) = &state.error {
        println!("error: {error}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,todo_store=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = TodoConfig::from_env().context("reading configuration")?;
    tracing::info!(
        storage_dir = %config.storage_dir.display(),
        api = %config.api_base_url,
        "Starting todo store"
    );

    let store = mount_from_config(&config);
    let dispatcher = store.dispatcher();
    let mut updates = store.subscribe();

    render(&updates.borrow_and_update());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let action = match serde_json::from_str::<TodoAction>(line) {
            Ok(action) => action,
            Err(error) => {
                tracing::warn!(%error, "Skipping malformed action");
                continue;
            }
        };

        dispatcher.send(action).await?;

        if updates.has_changed()? {
            render(&updates.borrow_and_update());
        }
    }

    store
        .shutdown(config.shutdown_timeout)
        .await
        .context("waiting for remote updates")?;

    Ok(())
}
