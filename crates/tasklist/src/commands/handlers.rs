use anyhow::{Result, anyhow, bail};
use serde::Serialize;
use tasklist_app::{
    CreateTaskInput, QueryBuildResult, TaskEdit, TaskService, TaskStore, ViewConfig,
    ViewQueryBuilder,
};
use tasklist_core::{TaskPage, ViewParams, page_window};
use tracing::debug;

use super::{parse_completion, parse_due, parse_priority, parse_task_id, render};
use crate::LsFormat;

pub struct EditArgs {
    pub title: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
}

pub struct LsArgs {
    pub search: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub tab: Option<String>,
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

pub fn handle_new<S: TaskStore>(
    service: &TaskService<S>,
    title: String,
    priority: &str,
    due: &str,
    description: Option<String>,
    done: bool,
) -> Result<()> {
    let task = service.create(CreateTaskInput {
        title,
        description,
        priority: Some(parse_priority(priority)?),
        due_date: Some(parse_due(due)?),
        status: done,
    })?;
    println!("created task: {} ({})", task.id, task.title);
    Ok(())
}

pub fn handle_edit<S: TaskStore>(service: &TaskService<S>, task: &str, args: EditArgs) -> Result<()> {
    let id = parse_task_id(task)?;
    let edit = TaskEdit {
        title: args.title,
        description: args.description,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        due_date: args.due.as_deref().map(parse_due).transpose()?,
        status: args.status.as_deref().map(parse_completion).transpose()?,
    };
    if edit.is_empty() {
        bail!("Nothing to change; pass at least one of --title, --priority, --due, --description, --status");
    }
    let task = service.update(id, edit)?;
    println!("updated task: {} ({})", task.id, task.title);
    Ok(())
}

pub fn handle_done<S: TaskStore>(service: &TaskService<S>, task: &str) -> Result<()> {
    let task = service.mark_complete(parse_task_id(task)?)?;
    println!("completed task: {} ({})", task.id, task.title);
    Ok(())
}

pub fn handle_rm<S: TaskStore>(service: &TaskService<S>, task: &str) -> Result<()> {
    let task = service.delete(parse_task_id(task)?)?;
    println!("deleted task: {} ({})", task.id, task.title);
    Ok(())
}

pub fn handle_show<S: TaskStore>(service: &TaskService<S>, task: &str) -> Result<()> {
    let task = service.get(parse_task_id(task)?)?;
    println!("{}", serde_json::to_string_pretty(&task)?);
    Ok(())
}

pub fn handle_ls<S: TaskStore>(
    service: &TaskService<S>,
    view: &ViewConfig,
    args: &LsArgs,
    format: LsFormat,
) -> Result<()> {
    let params = build_params(args, view)?;
    debug!(?params, "Listing tasks");
    let snapshot = service.snapshot()?;
    let page = snapshot.view(&params);

    match format {
        LsFormat::Table if page.tasks.is_empty() => println!("{}", render::empty_message(&page)),
        LsFormat::Table => println!("{}", render::task_table(&page, &params, view.page_links())),
        LsFormat::Json => println!("{}", listing_json(&page, view.page_links())?),
    }
    Ok(())
}

pub fn handle_stats<S: TaskStore>(service: &TaskService<S>) -> Result<()> {
    println!("{}", render::counts_line(service.counts()?));
    Ok(())
}

fn build_params(args: &LsArgs, view: &ViewConfig) -> Result<ViewParams> {
    query_params(args, view).map_err(|err| anyhow!(err.describe_user_facing()))
}

fn query_params(args: &LsArgs, view: &ViewConfig) -> QueryBuildResult<ViewParams> {
    ViewQueryBuilder::new()
        .with_search(args.search.clone())
        .with_priority(args.priority.as_deref())?
        .with_status(args.status.as_deref())?
        .with_tab(args.tab.as_deref())?
        .with_sort(args.sort.as_deref(), args.direction.as_deref())?
        .with_page(args.page, args.per_page)
        .build(view)
}

#[derive(Serialize)]
struct Listing<'a> {
    #[serde(flatten)]
    page: &'a TaskPage<'a>,
    page_links: Vec<usize>,
}

fn listing_json(page: &TaskPage<'_>, max_links: usize) -> Result<String> {
    let listing = Listing {
        page,
        page_links: page_window(page.page.page(), page.total_pages, max_links),
    };
    Ok(serde_json::to_string_pretty(&listing)?)
}
