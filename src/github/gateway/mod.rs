//! Gateways for loading repository data from the GitHub REST API.
//!
//! [`RepositoryGateway`] is the seam the views depend on, so tests can swap in
//! a mock. [`ApiRepositoryGateway`] is the real implementation built on
//! [`GitHubClient`](crate::github::client::GitHubClient).

mod api;
mod error_mapping;
mod retry;

pub use api::ApiRepositoryGateway;
pub use retry::{DEFAULT_STATS_RETRY_DELAY, StatsRetryPolicy};

use async_trait::async_trait;

use crate::github::error::GitHubError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{
    Branch, CommitRecord, Comparison, ContributorStats, LanguageBytes, Readme, RepositoryInfo,
    SearchResults,
};
use crate::github::search::SearchParams;

/// Gateway for repository-level reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Fetch repository metadata.
    async fn repository(&self, locator: &RepositoryLocator)
    -> Result<RepositoryInfo, GitHubError>;

    /// Fetch the first page of branches.
    async fn branches(&self, locator: &RepositoryLocator) -> Result<Vec<Branch>, GitHubError>;

    /// Fetch bytes of source per language.
    async fn languages(&self, locator: &RepositoryLocator) -> Result<LanguageBytes, GitHubError>;

    /// Fetch the latest commits on the default branch.
    async fn commits(&self, locator: &RepositoryLocator)
    -> Result<Vec<CommitRecord>, GitHubError>;

    /// Fetch the latest commits on `branch`.
    async fn branch_commits(
        &self,
        locator: &RepositoryLocator,
        branch: &str,
    ) -> Result<Vec<CommitRecord>, GitHubError>;

    /// Compare `base...head`.
    async fn compare(
        &self,
        locator: &RepositoryLocator,
        base: &str,
        head: &str,
    ) -> Result<Comparison, GitHubError>;

    /// Fetch and decode the README.
    async fn readme(&self, locator: &RepositoryLocator) -> Result<Readme, GitHubError>;

    /// Fetch weekly contributor statistics.
    ///
    /// An empty list means GitHub is still computing the statistics.
    async fn contributor_stats(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<ContributorStats>, GitHubError>;

    /// Search repositories.
    async fn search_repositories(
        &self,
        params: &SearchParams,
    ) -> Result<SearchResults, GitHubError>;
}
