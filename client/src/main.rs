//! `todo` - command line front end for the todo store.

use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use todo_client::{ClientConfig, StoreMode, TodoContext, TodoState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long to wait for the first collection before giving up.
const LOAD_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Parser)]
#[command(name = "todo", about = "Manage todos on this device or on a todo server")]
struct Cli {
    /// Backend to use: local or remote (overrides TODO_STORE_MODE).
    #[arg(long)]
    mode: Option<StoreMode>,

    /// Todo server URL (overrides TODO_REMOTE_URL).
    #[arg(long)]
    remote_url: Option<String>,

    /// Directory of the local store (overrides TODO_DATA_DIR).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print all todos, newest first.
    List,

    /// Add a todo.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Flip the completion flag of a todo.
    Toggle { id: String },

    /// Delete a todo.
    Delete { id: String },

    /// Replace the text of a todo.
    Update {
        id: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete every todo.
    Clear,

    /// Print the list again whenever it changes.
    Watch,
}

impl Cli {
    /// Flags win over environment variables.
    fn config(&self) -> Result<ClientConfig, todo_client::ConfigError> {
        let mut overrides = HashMap::new();
        if let Some(mode) = self.mode {
            overrides.insert("TODO_STORE_MODE", mode.to_string());
        }
        if let Some(url) = &self.remote_url {
            overrides.insert("TODO_REMOTE_URL", url.clone());
        }
        if let Some(dir) = &self.data_dir {
            overrides.insert("TODO_DATA_DIR", dir.display().to_string());
        }

        ClientConfig::from_lookup(|key| {
            overrides
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
        })
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match cli.config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let context = match TodoContext::open(&config).await {
        Ok(context) => context,
        Err(e) => {
            eprintln!("Failed to open todo store: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&context, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(context: &TodoContext, command: Command) -> todo_client::Result<()> {
    match command {
        Command::List => {
            let state = wait_loaded(context).await?;
            print_state(&state);
        }
        Command::Add { text } => context.add_todo(&text.join(" ")).await?,
        Command::Toggle { id } => context.toggle_todo(&id).await?,
        Command::Delete { id } => context.delete_todo(&id).await?,
        Command::Update { id, text } => context.update_todo(&id, &text.join(" ")).await?,
        Command::Clear => {
            let deleted = context.clear_all_todos().await?;
            println!("Deleted {deleted} todo(s)");
        }
        Command::Watch => {
            let mut rx = context.subscribe();
            loop {
                let state = rx.borrow_and_update().clone();
                if !state.is_loading {
                    print_state(&state);
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    }
    Ok(())
}

async fn wait_loaded(context: &TodoContext) -> todo_client::Result<TodoState> {
    tokio::time::timeout(LOAD_TIMEOUT, context.loaded())
        .await
        .map_err(|_| todo_client::Error::Transport("timed out loading todos".to_string()))
}

fn print_state(state: &TodoState) {
    println!(
        "{} of {} completed ({:.0}%)",
        state.completed_count(),
        state.total_count(),
        state.progress_percentage()
    );
    for todo in &state.todos {
        let mark = if todo.is_completed { "x" } else { " " };
        println!("[{mark}] {}  ({})", todo.text, todo.id);
    }
}
