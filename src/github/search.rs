//! Repository search parameters and query construction.

use std::fmt;
use std::str::FromStr;

use super::error::GitHubError;
use super::locator::encode_component;

/// Results requested per search page.
pub const SEARCH_PER_PAGE: u8 = 10;

/// Sort key accepted by `/search/repositories`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchSort {
    /// Star count.
    #[default]
    Stars,
    /// Fork count.
    Forks,
    /// Last update.
    Updated,
    /// Issues labelled `help-wanted`.
    HelpWantedIssues,
}

impl SearchSort {
    /// Returns the API string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stars => "stars",
            Self::Forks => "forks",
            Self::Updated => "updated",
            Self::HelpWantedIssues => "help-wanted-issues",
        }
    }
}

impl FromStr for SearchSort {
    type Err = GitHubError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "stars" => Ok(Self::Stars),
            "forks" => Ok(Self::Forks),
            "updated" => Ok(Self::Updated),
            "help-wanted-issues" => Ok(Self::HelpWantedIssues),
            other => Err(GitHubError::InvalidSearch {
                message: format!(
                    "unknown sort '{other}' (expected stars, forks, updated, or help-wanted-issues)"
                ),
            }),
        }
    }
}

impl fmt::Display for SearchSort {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Largest first.
    #[default]
    Desc,
    /// Smallest first.
    Asc,
}

impl SortOrder {
    /// Returns the API string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Desc => "desc",
            Self::Asc => "asc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = GitHubError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "desc" => Ok(Self::Desc),
            "asc" => Ok(Self::Asc),
            other => Err(GitHubError::InvalidSearch {
                message: format!("unknown order '{other}' (expected desc or asc)"),
            }),
        }
    }
}

/// Parameters of a repository search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Free-text search terms.
    pub query: String,
    /// Restrict to a language.
    pub language: Option<String>,
    /// Minimum star count; zero disables the filter.
    pub min_stars: u64,
    /// Sort key.
    pub sort: SearchSort,
    /// Sort direction.
    pub order: SortOrder,
    /// Include archived repositories.
    pub include_archived: bool,
    /// Page number (1-based).
    pub page: u32,
    /// Results per page.
    pub per_page: u8,
}

impl SearchParams {
    /// Creates parameters with defaults for everything but the query.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: None,
            min_stars: 0,
            sort: SearchSort::default(),
            order: SortOrder::default(),
            include_archived: false,
            page: 1,
            per_page: SEARCH_PER_PAGE,
        }
    }

    /// Validates the parameters.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidSearch` for a blank query, page zero, or
    /// a zero page size.
    pub fn validate(&self) -> Result<(), GitHubError> {
        if self.query.trim().is_empty() {
            return Err(GitHubError::InvalidSearch {
                message: "search terms are required".to_owned(),
            });
        }
        if self.page == 0 {
            return Err(GitHubError::InvalidSearch {
                message: "page must be at least 1".to_owned(),
            });
        }
        if self.per_page == 0 {
            return Err(GitHubError::InvalidSearch {
                message: "per_page must be at least 1".to_owned(),
            });
        }
        Ok(())
    }

    /// Builds the `q` value with qualifiers appended.
    #[must_use]
    pub fn qualified_query(&self) -> String {
        let mut query = self.query.trim().to_owned();

        if let Some(language) = self
            .language
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
        {
            query.push_str(&format!(" language:{language}"));
        }

        if self.min_stars > 0 {
            query.push_str(&format!(" stars:>={}", self.min_stars));
        }

        if !self.include_archived {
            query.push_str(" archived:false");
        }

        query
    }

    pub(crate) fn path(&self) -> String {
        format!(
            "/search/repositories?q={}&sort={}&order={}&per_page={}&page={}",
            encode_component(&self.qualified_query()).replace('/', "%2F"),
            self.sort.as_str(),
            self.order.as_str(),
            self.per_page,
            self.page
        )
    }
}
