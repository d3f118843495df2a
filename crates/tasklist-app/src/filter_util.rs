
use tasklist_core::{
    PageRequest, PageRequestError, ParseEnumError, PriorityFilter, SortDirection, SortField,
    StatusFilter, ViewParams,
};
use thiserror::Error;

use crate::config::ViewConfig;

/// Error type returned while constructing view parameters from user-facing inputs.
#[derive(Debug, Error)]
pub enum QueryBuildError {
    /// A filter, sort or direction token was not recognised.
    #[error(transparent)]
    InvalidToken(#[from] ParseEnumError),
    /// Page number or size was zero.
    #[error(transparent)]
    InvalidPage(#[from] PageRequestError),
    /// Page size is not among the configured options.
    #[error("page size {requested} is not offered (allowed: {allowed:?})")]
    PageSizeNotOffered {
        /// Requested size.
        requested: usize,
        /// Configured options.
        allowed: Vec<usize>,
    },
}

/// Result alias for query construction helpers.
pub type QueryBuildResult<T> = Result<T, QueryBuildError>;

/// Builder that accepts user-facing strings and normalizes them into [`ViewParams`].
#[derive(Debug, Clone, Default)]
pub struct ViewQueryBuilder {
    search: Option<String>,
    priority: Option<PriorityFilter>,
    status: Option<StatusFilter>,
    tab: Option<StatusFilter>,
    sort_field: Option<SortField>,
    sort_direction: Option<SortDirection>,
    page: Option<usize>,
    per_page: Option<usize>,
}

impl ViewQueryBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the optional search text (whitespace-only inputs become `None`).
    #[must_use]
    pub fn with_search(mut self, text: Option<String>) -> Self {
        self.search = text.and_then(|raw| {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        });
        self
    }

    /// Parse the priority clause (`all`, `low`, `medium`, `high`).
    ///
    /// # Errors
    /// Returns an error if the token is not a known priority.
    pub fn with_priority(mut self, token: Option<&str>) -> QueryBuildResult<Self> {
        self.priority = parse_optional(token)?;
        Ok(self)
    }

    /// Parse the status clause (`all`, `pending`, `completed`).
    ///
    /// # Errors
    /// Returns an error if the token is not a known status.
    pub fn with_status(mut self, token: Option<&str>) -> QueryBuildResult<Self> {
        self.status = parse_optional(token)?;
        Ok(self)
    }

    /// Parse the tab clause; it narrows the status clause further.
    ///
    /// # Errors
    /// Returns an error if the token is not a known status.
    pub fn with_tab(mut self, token: Option<&str>) -> QueryBuildResult<Self> {
        self.tab = parse_optional(token)?;
        Ok(self)
    }

    /// Parse the sort key and direction.
    ///
    /// # Errors
    /// Returns an error if either token is unknown.
    pub fn with_sort(
        mut self,
        field: Option<&str>,
        direction: Option<&str>,
    ) -> QueryBuildResult<Self> {
        self.sort_field = parse_optional(field)?;
        self.sort_direction = parse_optional(direction)?;
        Ok(self)
    }

    /// Select the page number and size.
    #[must_use]
    pub const fn with_page(mut self, page: Option<usize>, per_page: Option<usize>) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    /// Build the final [`ViewParams`], filling gaps from `config`.
    ///
    /// # Errors
    /// Returns an error if the page is zero or the page size is not offered.
    pub fn build(self, config: &ViewConfig) -> QueryBuildResult<ViewParams> {
        let per_page = match self.per_page {
            Some(requested) if !config.offers_page_size(requested) => {
                return Err(QueryBuildError::PageSizeNotOffered {
                    requested,
                    allowed: config.page_size_options().to_vec(),
                });
            }
            Some(requested) => requested,
            None => config.page_size(),
        };

        let mut params = ViewParams {
            sort_field: self.sort_field.unwrap_or_else(|| config.sort_field()),
            sort_direction: self
                .sort_direction
                .unwrap_or_else(|| config.sort_direction()),
            ..ViewParams::default()
        }
        .with_search(self.search.unwrap_or_default())
        .with_priority(self.priority.unwrap_or_default())
        .with_status(self.status.unwrap_or_default())
        .with_tab(self.tab)
        .with_page_size(per_page)?;

        if let Some(page) = self.page {
            params.page = PageRequest::new(page, per_page)?;
        }
        Ok(params)
    }
}

fn parse_optional<T>(token: Option<&str>) -> QueryBuildResult<Option<T>>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    token
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(str::parse)
        .transpose()
        .map_err(QueryBuildError::from)
}

impl QueryBuildError {
    /// Convert the error into a message that is friendly for end-users.
    #[must_use]
    pub fn describe_user_facing(&self) -> String {
        match self {
            Self::InvalidToken(err) => format!("Unrecognised {}: '{}'", err.kind, err.token),
            Self::InvalidPage(PageRequestError::ZeroPage) => "Pages are numbered from 1".to_owned(),
            Self::InvalidPage(PageRequestError::ZeroPageSize) => {
                "Page size must be at least 1".to_owned()
            }
            Self::PageSizeNotOffered { requested, allowed } => {
                let options = allowed
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Page size {requested} is not available. Choose one of: {options}")
            }
        }
    }
}
