//! CLI entry point for tasklist.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt::format::FmtSpan};

use tasklist_app::{ProjectConfig, TaskService};
use tasklist_store_sqlite::SqliteStore;

mod commands;

/// Personal task list backed by a local SQLite file.
#[derive(Parser, Debug)]
#[command(
    name = "tasklist",
    version,
    about = "tasklist: filter, sort and page through your to-dos"
)]
struct Cli {
    /// Project directory or any subdir (defaults to current).
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Database file, overriding `[store] path` from the config.
    #[arg(long)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new task.
    New {
        #[arg(long)]
        title: String,
        /// LOW, MEDIUM or HIGH.
        #[arg(long)]
        priority: String,
        /// Due date as YYYY-MM-DD.
        #[arg(long)]
        due: String,
        #[arg(long)]
        description: Option<String>,
        /// Create the task already completed.
        #[arg(long)]
        done: bool,
    },

    /// Change fields of an existing task.
    Edit {
        #[arg(long)]
        task: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// pending or completed.
        #[arg(long)]
        status: Option<String>,
    },

    /// Mark a task as completed.
    Done {
        #[arg(long)]
        task: String,
    },

    /// Delete a task.
    Rm {
        #[arg(long)]
        task: String,
    },

    /// Print a task as JSON.
    Show {
        #[arg(long)]
        task: String,
    },

    /// List tasks one page at a time.
    Ls {
        /// Case-insensitive match on title or priority name.
        #[arg(short = 's', long)]
        search: Option<String>,
        /// all, low, medium or high.
        #[arg(long)]
        priority: Option<String>,
        /// all, pending or completed.
        #[arg(long)]
        status: Option<String>,
        /// all, pending or completed; combined with --status.
        #[arg(long)]
        tab: Option<String>,
        /// due_date, priority or title.
        #[arg(long)]
        sort: Option<String>,
        /// asc or desc.
        #[arg(long)]
        direction: Option<String>,
        #[arg(long)]
        page: Option<usize>,
        #[arg(long)]
        per_page: Option<usize>,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// Show total, pending and completed counts.
    Stats,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    #[default]
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli { dir, db, cmd } = Cli::parse();
    install_tracing();

    let start = dir.unwrap_or_else(|| PathBuf::from("."));
    execute_command(start, db, cmd)
}

fn execute_command(start: PathBuf, db: Option<PathBuf>, command: Command) -> Result<()> {
    let (root, config) = ProjectConfig::load(&start)?;
    let db_path = db.unwrap_or_else(|| config.database_path(&root));
    debug!(root = %root.display(), db = %db_path.display(), "Resolved project");

    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Failed to open task database {}", db_path.display()))?;
    let service = TaskService::new(store);
    commands::run(command, &service, &config.view)
}

/// Filter for `directives` in `RUST_LOG` syntax; INFO when they name no level.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .parse_lossy(directives)
}

fn install_tracing() {
    // Stderr keeps stdout parseable.
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
