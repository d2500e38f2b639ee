//! Branch picker and commit history.
//!
//! Switching branches quickly can leave several loads in flight. Every load
//! takes a ticket from a [`RequestSequencer`] keyed by repository, and only
//! the newest load's result is returned; older ones resolve to `None`.

use std::io::Write;

use tracing::debug;

use crate::github::error::GitHubError;
use crate::github::gateway::RepositoryGateway;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{Branch, CommitRecord};
use crate::github::sequence::RequestSequencer;

use super::output::io_error;

/// Commits for the selected branch plus the branches to choose from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchCommitsView {
    /// Selected branch name.
    pub branch: String,
    /// Branches available for selection.
    pub branches: Vec<Branch>,
    /// Latest commits on `branch`, newest first.
    pub commits: Vec<CommitRecord>,
}

impl BranchCommitsView {
    /// Writes the branch list and commit history.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Io` when writing fails.
    pub fn render<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        let names: Vec<&str> = self
            .branches
            .iter()
            .map(|branch| branch.name.as_str())
            .collect();
        writeln!(writer, "Branches ({}): {}", names.len(), names.join(", "))
            .map_err(|e| io_error(&e))?;
        writeln!(
            writer,
            "Commits on {} ({}):",
            self.branch,
            self.commits.len()
        )
        .map_err(|e| io_error(&e))?;

        if self.commits.is_empty() {
            writeln!(writer, "  no commits found").map_err(|e| io_error(&e))?;
        }
        for commit in &self.commits {
            writeln!(
                writer,
                "  {} {} ({}, {})",
                commit.short_sha(),
                commit.summary(),
                commit.display_author(),
                commit.author_date.format("%Y-%m-%d %H:%M")
            )
            .map_err(|e| io_error(&e))?;
        }
        Ok(())
    }
}

/// Loads branch commits, discarding superseded results.
pub struct BranchCommitsIntake<'client, Gateway>
where
    Gateway: RepositoryGateway + ?Sized,
{
    client: &'client Gateway,
    sequencer: RequestSequencer,
}

impl<'client, Gateway> BranchCommitsIntake<'client, Gateway>
where
    Gateway: RepositoryGateway + ?Sized,
{
    /// Create a new intake using the provided gateway.
    #[must_use]
    pub fn new(client: &'client Gateway) -> Self {
        Self {
            client,
            sequencer: RequestSequencer::new(),
        }
    }

    /// Load commits for `branch`, or the default branch when `None`.
    ///
    /// Returns `Ok(None)` when a newer load for the same repository was
    /// started while this one was in flight, whether this load succeeded or
    /// failed.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures of the current load.
    pub async fn load(
        &self,
        locator: &RepositoryLocator,
        branch: Option<&str>,
    ) -> Result<Option<BranchCommitsView>, GitHubError> {
        let ticket = self.sequencer.issue(&locator.full_name());

        match self.fetch(locator, branch).await {
            Ok(view) => Ok(self.sequencer.accept(&ticket, view)),
            Err(error) if !self.sequencer.is_current(&ticket) => {
                debug!(%error, "discarding failure of superseded branch load");
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    async fn fetch(
        &self,
        locator: &RepositoryLocator,
        branch: Option<&str>,
    ) -> Result<BranchCommitsView, GitHubError> {
        let branches = self.client.branches(locator).await?;
        let (selected, commits) = match branch {
            Some(name) => (
                name.to_owned(),
                self.client.branch_commits(locator, name).await?,
            ),
            None => {
                let info = self.client.repository(locator).await?;
                let commits = self.client.commits(locator).await?;
                (info.default_branch, commits)
            }
        };

        Ok(BranchCommitsView {
            branch: selected,
            branches,
            commits,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use rstest::rstest;
    use tokio::sync::Notify;

    use super::{BranchCommitsIntake, BranchCommitsView};
    use crate::github::error::GitHubError;
    use crate::github::gateway::{MockRepositoryGateway, RepositoryGateway};
    use crate::github::locator::RepositoryLocator;
    use crate::github::models::test_support::commit_at;
    use crate::github::models::{
        Branch, CommitRecord, Comparison, ContributorStats, LanguageBytes, Readme,
        RepositoryInfo, SearchResults,
    };
    use crate::github::search::SearchParams;

    fn locator() -> RepositoryLocator {
        RepositoryLocator::from_owner_repo("octo", "repo").expect("valid locator")
    }

    fn branch(name: &str) -> Branch {
        Branch {
            name: name.to_owned(),
            head_sha: None,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn default_branch_is_resolved_from_repository() {
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_branches()
            .returning(|_| Ok(vec![branch("main"), branch("dev")]));
        gateway.expect_repository().times(1).returning(|_| {
            Ok(RepositoryInfo {
                default_branch: "main".to_owned(),
                ..RepositoryInfo::default()
            })
        });
        gateway
            .expect_commits()
            .times(1)
            .returning(|_| Ok(vec![commit_at("abcdef123", "2024-05-01T10:00:00Z")]));
        gateway.expect_branch_commits().never();

        let intake = BranchCommitsIntake::new(&gateway);
        let view = intake
            .load(&locator(), None)
            .await
            .expect("load should succeed")
            .expect("only load is current");

        assert_eq!(view.branch, "main");
        assert_eq!(view.branches.len(), 2);
        assert_eq!(view.commits.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn selected_branch_is_passed_through() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_branches().returning(|_| Ok(vec![branch("dev")]));
        gateway
            .expect_branch_commits()
            .withf(|_, name| name == "dev")
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let intake = BranchCommitsIntake::new(&gateway);
        let view = intake
            .load(&locator(), Some("dev"))
            .await
            .expect("load should succeed")
            .expect("only load is current");

        assert_eq!(view.branch, "dev");
        assert!(view.commits.is_empty());
    }

    /// Gateway whose `main` commits wait until released, so a later `dev`
    /// load can finish first. With `fail_main` set, the released `main` load
    /// fails instead.
    struct SlowMainGateway {
        release_main: Arc<Notify>,
        fail_main: bool,
    }

    #[async_trait]
    impl RepositoryGateway for SlowMainGateway {
        async fn repository(&self, _: &RepositoryLocator) -> Result<RepositoryInfo, GitHubError> {
            Ok(RepositoryInfo::default())
        }

        async fn branches(&self, _: &RepositoryLocator) -> Result<Vec<Branch>, GitHubError> {
            Ok(vec![branch("main"), branch("dev")])
        }

        async fn languages(&self, _: &RepositoryLocator) -> Result<LanguageBytes, GitHubError> {
            Ok(LanguageBytes::new())
        }

        async fn commits(&self, _: &RepositoryLocator) -> Result<Vec<CommitRecord>, GitHubError> {
            Ok(Vec::new())
        }

        async fn branch_commits(
            &self,
            _: &RepositoryLocator,
            branch_name: &str,
        ) -> Result<Vec<CommitRecord>, GitHubError> {
            if branch_name == "main" {
                self.release_main.notified().await;
                if self.fail_main {
                    return Err(GitHubError::Api {
                        message: "branch commits failed with status 502 Bad Gateway: \
                                  unknown error"
                            .to_owned(),
                    });
                }
                return Ok(vec![commit_at("0000001", "2024-01-01T00:00:00Z")]);
            }
            Ok(vec![commit_at("0000002", "2024-01-02T00:00:00Z")])
        }

        async fn compare(
            &self,
            _: &RepositoryLocator,
            _: &str,
            _: &str,
        ) -> Result<Comparison, GitHubError> {
            Ok(Comparison::default())
        }

        async fn readme(&self, _: &RepositoryLocator) -> Result<Readme, GitHubError> {
            Err(GitHubError::NotFound {
                message: "no readme".to_owned(),
            })
        }

        async fn contributor_stats(
            &self,
            _: &RepositoryLocator,
        ) -> Result<Vec<ContributorStats>, GitHubError> {
            Ok(Vec::new())
        }

        async fn search_repositories(
            &self,
            _: &SearchParams,
        ) -> Result<SearchResults, GitHubError> {
            Ok(SearchResults::default())
        }
    }

    #[rstest]
    #[case::stale_success(false)]
    #[case::stale_failure(true)]
    #[tokio::test]
    async fn stale_response_is_discarded(#[case] fail_main: bool) {
        let release_main = Arc::new(Notify::new());
        let gateway = SlowMainGateway {
            release_main: Arc::clone(&release_main),
            fail_main,
        };
        let intake = BranchCommitsIntake::new(&gateway);
        let target = locator();

        let releaser = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            release_main.notify_one();
        };
        let (first_result, second_result, ()) = tokio::join!(
            intake.load(&target, Some("main")),
            async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                intake.load(&target, Some("dev")).await
            },
            releaser
        );

        let first = first_result.expect("superseded load should not surface errors");
        let second = second_result.expect("second load should not fail");
        assert!(first.is_none(), "older selection must be discarded");
        assert_eq!(second.map(|view| view.branch), Some("dev".to_owned()));
    }

    #[rstest]
    #[tokio::test]
    async fn current_failure_is_propagated() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_branches().returning(|_| {
            Err(GitHubError::Api {
                message: "branches failed with status 502 Bad Gateway: unknown error".to_owned(),
            })
        });

        let intake = BranchCommitsIntake::new(&gateway);
        let result = intake.load(&locator(), Some("dev")).await;

        assert!(
            matches!(&result, Err(GitHubError::Api { message }) if message.contains("502")),
            "expected Api error, got {result:?}"
        );
    }

    #[rstest]
    fn render_lists_commits() {
        let view = BranchCommitsView {
            branch: "main".to_owned(),
            branches: vec![branch("main")],
            commits: vec![commit_at("abcdef1234", "2024-05-01T10:00:00Z")],
        };
        let mut buffer = Vec::new();
        view.render(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("utf-8 output");

        assert!(output.contains("Branches (1): main"), "output: {output}");
        assert!(output.contains("abcdef1 Commit abcdef1234"), "output: {output}");
        assert!(output.contains("mona"), "output: {output}");
    }
}
