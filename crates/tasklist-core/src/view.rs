//! The task list view-model.
//!
//! [`compute_view`] turns a snapshot of non-deleted tasks plus a [`ViewParams`]
//! value into the page of rows to render. It holds no state between calls.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::collation::collate;
use crate::text_matcher::TextMatcher;
use crate::{ParseEnumError, Priority, Task, normalize_token};

/// Page size used when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Priority clause of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriorityFilter {
    /// Accept every priority.
    #[default]
    All,
    /// Accept a single priority.
    Only(Priority),
}

impl PriorityFilter {
    /// Whether `priority` passes this clause.
    #[must_use]
    pub fn matches(self, priority: Priority) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == priority,
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if normalize_token(s) == "all" {
            return Ok(Self::All);
        }
        s.parse()
            .map(Self::Only)
            .map_err(|_| ParseEnumError::new("priority filter", s))
    }
}

/// Completion clause of the filter (used for both the status filter and the tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusFilter {
    /// Accept every task.
    #[default]
    All,
    /// Only completed tasks.
    Completed,
    /// Only pending tasks.
    Pending,
}

impl StatusFilter {
    /// Whether a task with completion flag `status` passes this clause.
    #[must_use]
    pub const fn matches(self, status: bool) -> bool {
        match self {
            Self::All => true,
            Self::Completed => status,
            Self::Pending => !status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "all" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "pending" | "todo" => Ok(Self::Pending),
            _ => Err(ParseEnumError::new("status filter", s)),
        }
    }
}

/// Key used to order the filtered tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Order by due date.
    #[default]
    DueDate,
    /// Order by priority rank.
    Priority,
    /// Order by title.
    Title,
}

impl SortField {
    /// Configuration / CLI spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DueDate => "due_date",
            Self::Priority => "priority",
            Self::Title => "title",
        }
    }

    /// Compare two tasks by this key in ascending order.
    #[must_use]
    pub fn compare(self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::DueDate => a.due_date.cmp(&b.due_date),
            Self::Priority => a.priority.ordinal().cmp(&b.priority.ordinal()),
            Self::Title => collate(&a.title, &b.title),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "due_date" | "due" | "date" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "title" | "task" => Ok(Self::Title),
            _ => Err(ParseEnumError::new("sort field", s)),
        }
    }
}

/// Direction applied to the sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Smallest key first.
    #[default]
    Asc,
    /// Largest key first.
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Arrow glyph for headers.
    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "asc" | "ascending" => Ok(Self::Asc),
            "desc" | "descending" => Ok(Self::Desc),
            _ => Err(ParseEnumError::new("sort direction", s)),
        }
    }
}

/// Rejected pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are numbered from 1.
    #[error("page numbers start at 1")]
    ZeroPage,
    /// A page must hold at least one row.
    #[error("page size must be at least 1")]
    ZeroPageSize,
}

/// A validated 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: usize,
    per_page: usize,
}

impl PageRequest {
    /// Validate a page number and size.
    ///
    /// # Errors
    /// Returns an error when either value is zero.
    pub const fn new(page: usize, per_page: usize) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if per_page == 0 {
            return Err(PageRequestError::ZeroPageSize);
        }
        Ok(Self { page, per_page })
    }

    /// First page with the given size.
    ///
    /// # Errors
    /// Returns an error when `per_page` is zero.
    pub const fn first(per_page: usize) -> Result<Self, PageRequestError> {
        Self::new(1, per_page)
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(self) -> usize {
        self.page
    }

    /// Maximum rows per page.
    #[must_use]
    pub const fn per_page(self) -> usize {
        self.per_page
    }

    /// Index of the first row on this page within the sorted sequence.
    #[must_use]
    pub const fn offset(self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }

    const fn with_page(self, page: usize) -> Self {
        Self {
            page,
            per_page: self.per_page,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Every user-chosen knob of the task list, passed by value into [`compute_view`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewParams {
    /// Search text; empty matches everything.
    pub search: String,
    /// Priority clause.
    pub priority: PriorityFilter,
    /// Status clause.
    pub status: StatusFilter,
    /// Optional tab clause, combined with `status` by logical AND.
    pub tab: Option<StatusFilter>,
    /// Sort key.
    pub sort_field: SortField,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Page window.
    pub page: PageRequest,
}

impl ViewParams {
    /// Replace the search text and return to the first page.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self.reset_page()
    }

    /// Replace the priority clause and return to the first page.
    #[must_use]
    pub fn with_priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = priority;
        self.reset_page()
    }

    /// Replace the status clause and return to the first page.
    #[must_use]
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self.reset_page()
    }

    /// Replace the tab clause and return to the first page.
    #[must_use]
    pub fn with_tab(mut self, tab: Option<StatusFilter>) -> Self {
        self.tab = tab;
        self.reset_page()
    }

    /// Change the page size and return to the first page.
    ///
    /// # Errors
    /// Returns an error when `per_page` is zero.
    pub fn with_page_size(mut self, per_page: usize) -> Result<Self, PageRequestError> {
        self.page = PageRequest::first(per_page)?;
        Ok(self)
    }

    /// Pick a sort key: the active key flips direction, a new key starts ascending.
    #[must_use]
    pub fn toggle_sort(mut self, field: SortField) -> Self {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Asc;
        }
        self
    }

    /// Move to `page` when it lies within `1..=total_pages`; otherwise keep the current page.
    #[must_use]
    pub fn go_to_page(mut self, page: usize, total_pages: usize) -> Self {
        if (1..=total_pages).contains(&page) {
            self.page = self.page.with_page(page);
        }
        self
    }

    /// Whether `task` survives every filter clause.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.passes(TextMatcher::new(&self.search).as_ref(), task)
    }

    fn passes(&self, matcher: Option<&TextMatcher>, task: &Task) -> bool {
        matcher.is_none_or(|m| m.matches(task))
            && self.priority.matches(task.priority)
            && self.status.matches(task.status)
            && self.tab.is_none_or(|tab| tab.matches(task.status))
    }

    fn reset_page(mut self) -> Self {
        self.page = self.page.with_page(1);
        self
    }
}

/// Dashboard tallies over the unfiltered snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskCounts {
    /// Number of tasks.
    pub total: usize,
    /// Tasks not yet completed.
    pub pending: usize,
    /// Completed tasks.
    pub completed: usize,
}

impl TaskCounts {
    /// Count tasks by completion flag.
    #[must_use]
    pub fn tally(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.status).count();
        Self {
            total: tasks.len(),
            pending: tasks.len() - completed,
            completed,
        }
    }
}

/// One rendered page of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPage<'a> {
    /// Rows on this page, in display order.
    pub tasks: Vec<&'a Task>,
    /// Number of tasks surviving all filters.
    pub total_filtered: usize,
    /// `ceil(total_filtered / per_page)`.
    pub total_pages: usize,
    /// Counts over the unfiltered input.
    pub counts: TaskCounts,
    /// Page that was requested.
    pub page: PageRequest,
}

impl<'a> TaskPage<'a> {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page.page() > 1
    }

    /// Whether a following page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page.page() < self.total_pages
    }

    /// Rows paired with their 1-based position in the full sorted list.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &'a Task)> + '_ {
        let base = self.page.offset();
        self.tasks
            .iter()
            .enumerate()
            .map(move |(index, task)| (base + index + 1, *task))
    }
}

/// Filter, sort and paginate `tasks` according to `params`.
#[must_use]
pub fn compute_view<'a>(tasks: &'a [Task], params: &ViewParams) -> TaskPage<'a> {
    let matcher = TextMatcher::new(&params.search);
    let mut filtered: Vec<&'a Task> = tasks
        .iter()
        .filter(|task| params.passes(matcher.as_ref(), task))
        .collect();

    let field = params.sort_field;
    // `sort_by` is stable, so equal keys keep their filtered order in both directions.
    match params.sort_direction {
        SortDirection::Asc => filtered.sort_by(|a, b| field.compare(a, b)),
        SortDirection::Desc => filtered.sort_by(|a, b| field.compare(b, a)),
    }

    let total_filtered = filtered.len();
    let per_page = params.page.per_page();
    let visible = filtered
        .into_iter()
        .skip(params.page.offset())
        .take(per_page)
        .collect();

    TaskPage {
        tasks: visible,
        total_filtered,
        total_pages: total_filtered.div_ceil(per_page),
        counts: TaskCounts::tally(tasks),
        page: params.page,
    }
}
