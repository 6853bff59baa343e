//! tasklist - terminal client for the tasklist REST API.
//!
//! Each subcommand drives the in-memory [`TaskStore`] the way the web pages
//! do and prints the resulting state.
//!
//! # Environment Variables
//!
//! - `TASKLIST_API_URL` - backend base URL (default `http://localhost:8080`)
//! - `TASKLIST_TIMEOUT_SECS` - request timeout in seconds (default 15)
//! - `RUST_LOG` - log filter (default `warn`)
//!
//! # Examples
//!
//! ```bash
//! tasklist list
//! tasklist create --title "Buy milk" --description "2 liters"
//! tasklist update 3f2a --status completed
//! tasklist delete 3f2a
//! tasklist open /tasks/3f2a
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use tasklist::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, ENV_API_URL, ENV_TIMEOUT_SECS};
use tasklist::views::{render_list, render_task};
use tasklist::{
    ClientConfig, CreateTaskRequest, HttpTaskService, Route, ServiceError, StoreEvent,
    StoreObserver, TaskStatus, TaskStore, UpdateTaskRequest,
};

/// Terminal client for the tasklist API.
#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "List, create, edit and delete tasks")]
#[command(version)]
struct Cli {
    /// Backend base URL
    #[arg(long, global = true, env = ENV_API_URL, default_value = DEFAULT_BASE_URL)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        env = ENV_TIMEOUT_SECS,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    timeout_secs: u64,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all tasks
    List,

    /// Show one task
    Show {
        /// Task ID
        id: String,
    },

    /// Create a task
    Create {
        /// Task title
        #[arg(long, short)]
        title: String,

        /// Optional description
        #[arg(long, short)]
        description: Option<String>,
    },

    /// Edit a task; omitted fields keep their current value
    #[command(group(
        ArgGroup::new("changes")
            .required(true)
            .multiple(true)
            .args(["title", "description", "status"])
    ))]
    Update {
        /// Task ID
        id: String,

        /// New title
        #[arg(long, short)]
        title: Option<String>,

        /// New description (empty string clears it)
        #[arg(long, short)]
        description: Option<String>,

        /// New status: pending, `in_progress`, or completed
        #[arg(long, short)]
        status: Option<TaskStatus>,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },

    /// Open a view by path (`/`, `/tasks`, `/tasks/create`, `/tasks/<id>`)
    Open {
        /// View path
        path: String,
    },
}

/// Logs store changes at debug level.
struct LogObserver;

impl StoreObserver for LogObserver {
    fn name(&self) -> &'static str {
        "log"
    }

    fn on_event(&self, event: &StoreEvent) {
        match event {
            StoreEvent::TasksChanged { count } => debug!(count, "Tasks changed"),
            StoreEvent::LoadingListChanged { loading } => debug!(loading, "Loading list"),
            StoreEvent::LoadingMutationChanged { loading } => {
                debug!(loading, "Loading mutation");
            }
            StoreEvent::ErrorChanged { error } => debug!(error = ?error, "Error changed"),
        }
    }
}

/// Wrap a failed store call with the message the store recorded for it.
fn store_failure(store: &TaskStore, err: ServiceError) -> anyhow::Error {
    let message = store.error().unwrap_or_else(|| err.to_string());
    anyhow::Error::new(err).context(message)
}

async fn show_list(store: &TaskStore) -> Result<()> {
    store
        .load_tasks()
        .await
        .map_err(|e| store_failure(store, e))?;
    print!("{}", render_list(&store.snapshot()));
    Ok(())
}

async fn open(store: &TaskStore, path: &str) -> Result<()> {
    let resolution = Route::resolve(path);
    if let Some(from) = &resolution.redirected_from {
        info!(from = %from, to = %resolution.route, "Redirected");
    }

    match resolution.route {
        Route::TaskList => show_list(store).await,
        Route::TaskCreate => {
            println!("Create a task with: tasklist create --title <TITLE> [--description <TEXT>]");
            Ok(())
        }
        Route::TaskEdit { id } => match store.get_task_by_id(&id).await {
            Ok(task) => {
                print!("{}", render_task(&task));
                Ok(())
            }
            Err(e) => {
                let message = store.error().unwrap_or_else(|| e.to_string());
                warn!(task_id = %id, error = %e, "Task not available, back to list");
                eprintln!("{}", message.red());
                show_list(store).await
            }
        },
        Route::NotFound { path } => bail!("No view at '{path}'"),
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::default()
        .with_base_url(cli.api_url)
        .with_timeout(Duration::from_secs(cli.timeout_secs));
    let service = HttpTaskService::new(&config).context("Failed to create task service")?;

    let store = TaskStore::new(Arc::new(service));
    store.subscribe(Arc::new(LogObserver));

    match cli.command {
        Commands::List => show_list(&store).await?,

        Commands::Show { id } => {
            let task = store
                .get_task_by_id(&id)
                .await
                .map_err(|e| store_failure(&store, e))?;
            print!("{}", render_task(&task));
        }

        Commands::Create { title, description } => {
            let created = store
                .create_task(CreateTaskRequest::new(title, description))
                .await
                .map_err(|e| store_failure(&store, e))?;
            println!("{} {}", "Created".green(), created.id);
            print!("{}", render_task(&created));
        }

        Commands::Update {
            id,
            title,
            description,
            status,
        } => {
            // Like the edit form: start from the current values.
            let current = store
                .get_task_by_id(&id)
                .await
                .map_err(|e| store_failure(&store, e))?;

            let payload = UpdateTaskRequest {
                title: Some(title.unwrap_or(current.title)),
                description: description.or(current.description),
                status: Some(status.unwrap_or(current.status)),
            };
            let updated = store
                .update_task(&id, payload)
                .await
                .map_err(|e| store_failure(&store, e))?;
            println!("{} {}", "Updated".green(), updated.id);
            print!("{}", render_task(&updated));
        }

        Commands::Delete { id } => {
            store
                .delete_task(&id)
                .await
                .map_err(|e| store_failure(&store, e))?;
            println!("{} {id}", "Deleted".green());
        }

        Commands::Open { path } => open(&store, &path).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("info,tasklist=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}
