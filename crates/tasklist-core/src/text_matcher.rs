use crate::Task;

/// Case-insensitive substring matcher for task search.
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Build a matcher for `query`. Returns `None` for the empty query, which matches every task.
    ///
    /// The query is not trimmed here; callers that accept free-form user input
    /// should normalize it first.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        if query.is_empty() {
            return None;
        }
        Some(Self {
            needle: query.to_lowercase(),
        })
    }

    /// Whether the title or the priority name contains the query.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_field(&task.title) || self.matches_field(task.priority.as_str())
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}
