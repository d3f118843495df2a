use std::str::FromStr;

use anyhow::{Context, Result, bail};
use tasklist_app::{TaskService, TaskStore, ViewConfig};
use tasklist_core::dates::parse_date;
use tasklist_core::{Priority, StatusFilter, TaskId};
use time::Date;

use crate::Command;

mod handlers;
mod render;

/// Dispatch a parsed command against the task service.
pub fn run<S: TaskStore>(command: Command, service: &TaskService<S>, view: &ViewConfig) -> Result<()> {
    match command {
        Command::New {
            title,
            priority,
            due,
            description,
            done,
        } => handlers::handle_new(service, title, &priority, &due, description, done),
        Command::Edit {
            task,
            title,
            priority,
            due,
            description,
            status,
        } => handlers::handle_edit(
            service,
            &task,
            handlers::EditArgs {
                title,
                priority,
                due,
                description,
                status,
            },
        ),
        Command::Done { task } => handlers::handle_done(service, &task),
        Command::Rm { task } => handlers::handle_rm(service, &task),
        Command::Show { task } => handlers::handle_show(service, &task),
        Command::Ls {
            search,
            priority,
            status,
            tab,
            sort,
            direction,
            page,
            per_page,
            format,
        } => handlers::handle_ls(
            service,
            view,
            &handlers::LsArgs {
                search,
                priority,
                status,
                tab,
                sort,
                direction,
                page,
                per_page,
            },
            format,
        ),
        Command::Stats => handlers::handle_stats(service),
    }
}

fn parse_task_id(raw: &str) -> Result<TaskId> {
    TaskId::from_str(raw).with_context(|| format!("Invalid task id: {raw}"))
}

fn parse_priority(raw: &str) -> Result<Priority> {
    Priority::from_str(raw).with_context(|| format!("Invalid priority: {raw} (use LOW, MEDIUM or HIGH)"))
}

fn parse_due(raw: &str) -> Result<Date> {
    parse_date(raw.trim()).with_context(|| format!("Invalid due date: {raw} (expected YYYY-MM-DD)"))
}

fn parse_completion(raw: &str) -> Result<bool> {
    match StatusFilter::from_str(raw)? {
        StatusFilter::Completed => Ok(true),
        StatusFilter::Pending => Ok(false),
        StatusFilter::All => bail!("Status must be pending or completed, not {raw}"),
    }
}
