//! Interactive task list in the terminal.
//!
//! Reads one command per line from stdin and redraws the list after every
//! change. The list is kept in `<TODO_DATA_DIR>/<TODO_SLOT>.json`.

use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tasklist_core::environment::UuidGenerator;
use tasklist_runtime::Store;
use todo::command::{Command, HELP, edit_session_actions};
use todo::config::TodoConfig;
use todo::router::{DEFAULT_ROUTE, parse_route};
use todo::view::{ViewModel, render};
use todo::{FileSlotStorage, TodoAction, TodoEnvironment, TodoReducer, TodoState, TodoStorage};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let config = TodoConfig::from_env().context("invalid configuration")?;

    // Logs go to stderr so they never interleave with the rendered list.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let storage = TodoStorage::new(
        Arc::new(FileSlotStorage::new(&config.data_dir)),
        config.slot.clone(),
    );
    let items = storage.load();
    tracing::info!(
        count = items.len(),
        slot = storage.slot(),
        dir = %config.data_dir.display(),
        "Loaded task list"
    );

    let env = TodoEnvironment::new(Arc::new(UuidGenerator), storage);
    let mut store = Store::new(TodoState::with_items(items), TodoReducer::new(), env);
    store.subscribe(|state: &TodoState| {
        print!("{}", render(&ViewModel::from_state(state)));
    });

    println!("type `help` for commands");
    store.send(TodoAction::SetFilter {
        filter: parse_route(DEFAULT_ROUTE),
    })?;

    let stdin = io::stdin();
    prompt(false)?;
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let editing = store.state(|s| s.editing.is_some());

        let actions = if editing {
            edit_session_actions(&line)
        } else if line.trim().is_empty() {
            Vec::new()
        } else {
            match Command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(Command::Help) => {
                    println!("{HELP}");
                    Vec::new()
                },
                Ok(command) => store.state(|s| command.into_actions(s)).unwrap_or_else(|error| {
                    eprintln!("{error}");
                    Vec::new()
                }),
                Err(error) => {
                    eprintln!("{error}");
                    Vec::new()
                },
            }
        };

        for action in actions {
            store.send(action)?;
        }
        prompt(store.state(|s| s.editing.is_some()))?;
    }

    tracing::info!("Bye");
    Ok(())
}

fn prompt(editing: bool) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", if editing { "edit> " } else { "> " })?;
    stdout.flush()
}
