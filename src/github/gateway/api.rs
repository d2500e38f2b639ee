//! [`RepositoryGateway`] implementation backed by [`GitHubClient`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backon::Retryable;
use http::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::github::auth::TokenProvider;
use crate::github::client::{ApiResponse, GitHubClient};
use crate::github::error::GitHubError;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{
    ApiBranch, ApiCommit, ApiComparison, ApiContributorStats, ApiReadme, ApiSearchResponse,
    Branch, CommitRecord, Comparison, ContributorStats, LanguageBytes, Readme, RepositoryInfo,
    SearchResults, into_records,
};
use crate::github::search::SearchParams;

use super::RepositoryGateway;
use super::error_mapping::map_status_error;
use super::retry::StatsRetryPolicy;

/// Outcome of one `/stats/contributors` attempt.
#[derive(Debug)]
enum StatsAttempt {
    /// GitHub is still computing statistics.
    Pending,
    Failed(GitHubError),
}

/// Gateway that issues one bearer-authenticated GET per operation.
pub struct ApiRepositoryGateway<P> {
    client: Arc<GitHubClient<P>>,
    stats_retry: StatsRetryPolicy,
}

impl<P> ApiRepositoryGateway<P>
where
    P: TokenProvider,
{
    /// Creates a gateway sharing `client`.
    #[must_use]
    pub fn new(client: Arc<GitHubClient<P>>) -> Self {
        Self {
            client,
            stats_retry: StatsRetryPolicy::default(),
        }
    }

    /// Overrides the retry policy for pending contributor statistics.
    #[must_use]
    pub const fn with_stats_retry(mut self, policy: StatsRetryPolicy) -> Self {
        self.stats_retry = policy;
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
    ) -> Result<T, GitHubError> {
        let response = self.client.request(path).await?;
        ensure_success(operation, &response)?;
        response.json(operation)
    }

    async fn fetch_contributor_stats(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<ContributorStats>, StatsAttempt> {
        let response = self
            .client
            .request(&locator.contributor_stats_path())
            .await
            .map_err(StatsAttempt::Failed)?;

        if matches!(
            response.status,
            StatusCode::ACCEPTED | StatusCode::NO_CONTENT
        ) {
            return Err(StatsAttempt::Pending);
        }
        ensure_success("contributor stats", &response).map_err(StatsAttempt::Failed)?;

        let stats: Vec<ApiContributorStats> = response
            .json("contributor stats")
            .map_err(StatsAttempt::Failed)?;
        if stats.is_empty() {
            return Err(StatsAttempt::Pending);
        }
        Ok(stats.into_iter().map(ContributorStats::from).collect())
    }
}

fn ensure_success(operation: &str, response: &ApiResponse) -> Result<(), GitHubError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(map_status_error(operation, response))
    }
}

#[async_trait]
impl<P> RepositoryGateway for ApiRepositoryGateway<P>
where
    P: TokenProvider,
{
    async fn repository(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<RepositoryInfo, GitHubError> {
        self.get_json("repository", &locator.repository_path())
            .await
    }

    async fn branches(&self, locator: &RepositoryLocator) -> Result<Vec<Branch>, GitHubError> {
        let branches: Vec<ApiBranch> = self.get_json("branches", &locator.branches_path()).await?;
        Ok(branches.into_iter().map(Branch::from).collect())
    }

    async fn languages(&self, locator: &RepositoryLocator) -> Result<LanguageBytes, GitHubError> {
        self.get_json("languages", &locator.languages_path()).await
    }

    async fn commits(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<CommitRecord>, GitHubError> {
        let commits: Vec<ApiCommit> = self
            .get_json("commits", &locator.commits_path(None))
            .await?;
        Ok(into_records(commits))
    }

    async fn branch_commits(
        &self,
        locator: &RepositoryLocator,
        branch: &str,
    ) -> Result<Vec<CommitRecord>, GitHubError> {
        let commits: Vec<ApiCommit> = self
            .get_json("branch commits", &locator.commits_path(Some(branch)))
            .await?;
        Ok(into_records(commits))
    }

    async fn compare(
        &self,
        locator: &RepositoryLocator,
        base: &str,
        head: &str,
    ) -> Result<Comparison, GitHubError> {
        if base.trim().is_empty() || head.trim().is_empty() {
            return Err(GitHubError::InvalidComparison {
                message: "both a base and a head branch are required".to_owned(),
            });
        }
        if base == head {
            return Err(GitHubError::InvalidComparison {
                message: format!("cannot compare {base} with itself"),
            });
        }

        let comparison: ApiComparison = self
            .get_json("compare", &locator.compare_path(base, head))
            .await?;
        Ok(comparison.into())
    }

    async fn readme(&self, locator: &RepositoryLocator) -> Result<Readme, GitHubError> {
        let readme: ApiReadme = self.get_json("readme", &locator.readme_path()).await?;
        readme.decode()
    }

    async fn contributor_stats(
        &self,
        locator: &RepositoryLocator,
    ) -> Result<Vec<ContributorStats>, GitHubError> {
        let attempt = || self.fetch_contributor_stats(locator);
        let outcome = attempt
            .retry(self.stats_retry.into_backoff())
            .when(|error: &StatsAttempt| matches!(error, StatsAttempt::Pending))
            .notify(|_: &StatsAttempt, delay: Duration| {
                debug!(
                    delay_ms = delay.as_millis(),
                    "contributor statistics pending, retrying"
                );
            })
            .await;

        match outcome {
            Ok(stats) => Ok(stats),
            Err(StatsAttempt::Pending) => {
                warn!(
                    repository = %locator.full_name(),
                    "contributor statistics still pending after retry"
                );
                Ok(Vec::new())
            }
            Err(StatsAttempt::Failed(error)) => Err(error),
        }
    }

    async fn search_repositories(
        &self,
        params: &SearchParams,
    ) -> Result<SearchResults, GitHubError> {
        params.validate()?;

        let response: ApiSearchResponse = self.get_json("search", &params.path()).await?;
        let has_next_page = response.items.len() >= usize::from(params.per_page);

        Ok(SearchResults {
            total_count: response.total_count,
            items: response.items,
            page: params.page,
            has_next_page,
        })
    }
}
