//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.repolens.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `REPOLENS_URL`, `REPOLENS_TOKEN`, or
//!    `GITHUB_TOKEN` as a token fallback
//! 4. **Command-line arguments** – `--url`/`-u`, `--token`/`-t`, `--view`/`-v`
//!
//! # Configuration File
//!
//! ```toml
//! url = "https://github.com/rust-lang/rust"
//! token = "ghp_example"
//! view = "stats"
//! contributor_retry_delay_ms = 2000
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::github::auth::AccessToken;
use crate::github::error::GitHubError;
use crate::github::gateway::StatsRetryPolicy;
use crate::github::search::{SearchParams, SearchSort, SortOrder};

/// Which view the CLI renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewMode {
    /// Repository overview.
    #[default]
    Summary,
    /// README text.
    Readme,
    /// Branch list and commit history.
    Commits,
    /// Branch comparison.
    Compare,
    /// Statistics charts.
    Stats,
    /// Repository search.
    Search,
    /// Rate-limit status.
    Limits,
}

impl FromStr for ViewMode {
    type Err = GitHubError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(Self::Summary),
            "readme" => Ok(Self::Readme),
            "commits" | "branches" => Ok(Self::Commits),
            "compare" => Ok(Self::Compare),
            "stats" | "statistics" => Ok(Self::Stats),
            "search" => Ok(Self::Search),
            "limits" | "rate-limit" => Ok(Self::Limits),
            other => Err(GitHubError::Configuration {
                message: format!(
                    "unknown view '{other}' (expected summary, readme, commits, compare, stats, \
                     search, or limits)"
                ),
            }),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Summary => "summary",
            Self::Readme => "readme",
            Self::Commits => "commits",
            Self::Compare => "compare",
            Self::Stats => "stats",
            Self::Search => "search",
            Self::Limits => "limits",
        };
        formatter.write_str(name)
    }
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use repolens::RepolensConfig;
///
/// let config = RepolensConfig::load().expect("failed to load configuration");
/// let view = config.view_mode().expect("view should be valid");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "REPOLENS",
    discovery(
        dotfile_name = ".repolens.toml",
        config_file_name = "repolens.toml",
        app_name = "repolens"
    )
)]
pub struct RepolensConfig {
    /// GitHub repository URL, e.g. `https://github.com/owner/repo`.
    ///
    /// Can be provided via:
    /// - CLI: `--url <URL>` or `-u <URL>`
    /// - Environment: `REPOLENS_URL`
    /// - Config file: `url = "..."`
    #[ortho_config(cli_short = 'u')]
    pub url: Option<String>,

    /// Personal access token; optional, raises the rate limit.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `REPOLENS_TOKEN` or `GITHUB_TOKEN`
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// View to render: summary, readme, commits, compare, stats, search, or
    /// limits.
    #[ortho_config(cli_short = 'v')]
    pub view: Option<String>,

    /// Branch whose commits the `commits` view lists.
    #[ortho_config(cli_short = 'b')]
    pub branch: Option<String>,

    /// Base branch for `compare`.
    #[ortho_config()]
    pub base: Option<String>,

    /// Head branch for `compare`.
    #[ortho_config()]
    pub head: Option<String>,

    /// Search terms for `search`.
    #[ortho_config(cli_short = 'q')]
    pub query: Option<String>,

    /// Restrict search results to a language.
    #[ortho_config()]
    pub language: Option<String>,

    /// Minimum stars for search results.
    #[ortho_config()]
    pub min_stars: Option<u64>,

    /// Search sort key: stars, forks, updated, or help-wanted-issues.
    #[ortho_config()]
    pub sort: Option<String>,

    /// Search sort order: desc or asc.
    #[ortho_config()]
    pub order: Option<String>,

    /// Include archived repositories in search results.
    ///
    /// Environment variables are not read for booleans by `ortho_config`.
    #[ortho_config()]
    pub include_archived: bool,

    /// Search results page (1-based).
    #[ortho_config()]
    pub page: Option<u32>,

    /// Delay before retrying pending contributor statistics.
    #[ortho_config()]
    pub contributor_retry_delay_ms: u64,

    /// Interval between rate-limit polls when watching limits.
    #[ortho_config()]
    pub rate_limit_poll_seconds: u64,

    /// Keep polling the rate limit instead of printing it once.
    #[ortho_config(cli_short = 'w')]
    pub watch: bool,
}

const DEFAULT_CONTRIBUTOR_RETRY_DELAY_MS: u64 = 2_000;
const DEFAULT_RATE_LIMIT_POLL_SECONDS: u64 = 300;

impl Default for RepolensConfig {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            view: None,
            branch: None,
            base: None,
            head: None,
            query: None,
            language: None,
            min_stars: None,
            sort: None,
            order: None,
            include_archived: false,
            page: None,
            contributor_retry_delay_ms: DEFAULT_CONTRIBUTOR_RETRY_DELAY_MS,
            rate_limit_poll_seconds: DEFAULT_RATE_LIMIT_POLL_SECONDS,
            watch: false,
        }
    }
}

impl RepolensConfig {
    /// Resolves the token from configuration or the `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// Blank values count as absent; `None` means anonymous access.
    #[must_use]
    pub fn resolve_token(&self) -> Option<AccessToken> {
        AccessToken::from_optional(self.token.as_deref()).or_else(|| {
            env::var("GITHUB_TOKEN")
                .ok()
                .and_then(|value| AccessToken::from_optional(Some(&value)))
        })
    }

    /// Returns the repository URL or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::MissingRepositoryUrl`] when no URL is configured.
    pub fn require_url(&self) -> Result<&str, GitHubError> {
        self.url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(GitHubError::MissingRepositoryUrl)
    }

    /// Parses the configured view, defaulting to the summary.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Configuration`] for an unknown view name.
    pub fn view_mode(&self) -> Result<ViewMode, GitHubError> {
        self.view
            .as_deref()
            .map_or(Ok(ViewMode::default()), ViewMode::from_str)
    }

    /// Returns the base and head branches for a comparison.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Configuration`] when either is missing.
    pub fn require_compare_branches(&self) -> Result<(&str, &str), GitHubError> {
        match (self.base.as_deref(), self.head.as_deref()) {
            (Some(base), Some(head)) => Ok((base, head)),
            (None, _) => Err(GitHubError::Configuration {
                message: "base branch is required (use --base)".to_owned(),
            }),
            (_, None) => Err(GitHubError::Configuration {
                message: "head branch is required (use --head)".to_owned(),
            }),
        }
    }

    /// Builds search parameters from the search fields.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidSearch`] for a missing query or an
    /// unknown sort key or order.
    pub fn search_params(&self) -> Result<SearchParams, GitHubError> {
        let query = self
            .query
            .as_deref()
            .ok_or_else(|| GitHubError::InvalidSearch {
                message: "search terms are required (use --query or -q)".to_owned(),
            })?;

        let sort = self
            .sort
            .as_deref()
            .map_or(Ok(SearchSort::default()), SearchSort::from_str)?;
        let order = self
            .order
            .as_deref()
            .map_or(Ok(SortOrder::default()), SortOrder::from_str)?;

        let params = SearchParams {
            language: self.language.clone(),
            min_stars: self.min_stars.unwrap_or(0),
            sort,
            order,
            include_archived: self.include_archived,
            page: self.page.unwrap_or(1),
            ..SearchParams::new(query)
        };
        params.validate()?;
        Ok(params)
    }

    /// Retry policy for pending contributor statistics.
    #[must_use]
    pub const fn stats_retry_policy(&self) -> StatsRetryPolicy {
        StatsRetryPolicy::once_after(Duration::from_millis(self.contributor_retry_delay_ms))
    }

    /// Interval between rate-limit polls.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Configuration`] when the interval is zero.
    pub fn rate_limit_poll_interval(&self) -> Result<Duration, GitHubError> {
        if self.rate_limit_poll_seconds == 0 {
            return Err(GitHubError::Configuration {
                message: "rate_limit_poll_seconds must be at least 1".to_owned(),
            });
        }
        Ok(Duration::from_secs(self.rate_limit_poll_seconds))
    }
}
