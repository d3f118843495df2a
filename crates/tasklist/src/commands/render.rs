use tasklist_core::dates::format_date;
use tasklist_core::{SortField, TaskCounts, TaskPage, ViewParams, page_window};

const COLUMNS: [(&str, Option<SortField>); 6] = [
    ("#", None),
    ("ID", None),
    ("Task", Some(SortField::Title)),
    ("Priority", Some(SortField::Priority)),
    ("Due Date", Some(SortField::DueDate)),
    ("Status", None),
];

/// Table with row numbers, a summary line, page links and counts.
pub fn task_table(page: &TaskPage<'_>, params: &ViewParams, page_links: usize) -> String {
    let headers: Vec<String> = COLUMNS
        .iter()
        .map(|(name, field)| match field {
            Some(field) if *field == params.sort_field => {
                format!("{name} {}", params.sort_direction.arrow())
            }
            _ => (*name).to_owned(),
        })
        .collect();
    let rule: Vec<String> = headers
        .iter()
        .map(|header| "-".repeat(header.chars().count()))
        .collect();

    let mut lines = vec![headers.join(" | "), rule.join(" | ")];
    for (ordinal, task) in page.rows() {
        lines.push(format!(
            "{ordinal} | {} | {} | {} | {} | {}",
            task.id,
            task.title,
            task.priority.label(),
            format_date(task.due_date),
            task.status_label(),
        ));
    }

    let first = page.page.offset() + 1;
    let last = page.page.offset() + page.tasks.len();
    lines.push(String::new());
    lines.push(format!(
        "Showing {first}-{last} of {} tasks (page {} of {})",
        page.total_filtered,
        page.page.page(),
        page.total_pages
    ));
    lines.push(page_links_line(page, page_links));
    lines.push(counts_line(page.counts));
    lines.join("\n")
}

/// `« 2 [3] 4 »`: the current page in brackets, arrows when neighbours exist.
pub fn page_links_line(page: &TaskPage<'_>, max_links: usize) -> String {
    let current = page.page.page();
    let mut parts = Vec::new();
    if page.has_previous() {
        parts.push("«".to_owned());
    }
    parts.extend(
        page_window(current, page.total_pages, max_links)
            .into_iter()
            .map(|number| {
                if number == current {
                    format!("[{number}]")
                } else {
                    number.to_string()
                }
            }),
    );
    if page.has_next() {
        parts.push("»".to_owned());
    }
    format!("Pages: {}", parts.join(" "))
}

/// Message shown instead of an empty table.
pub fn empty_message(page: &TaskPage<'_>) -> String {
    if page.counts.total == 0 {
        "No tasks found".to_owned()
    } else if page.total_filtered == 0 {
        "No tasks matched the provided filters".to_owned()
    } else {
        format!(
            "Page {} is out of range (1-{})",
            page.page.page(),
            page.total_pages
        )
    }
}

/// Single-line dashboard counts.
pub fn counts_line(counts: TaskCounts) -> String {
    format!(
        "Total: {} | Pending: {} | Completed: {}",
        counts.total, counts.pending, counts.completed
    )
}
