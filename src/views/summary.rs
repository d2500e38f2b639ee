//! Repository overview: metadata, counts, and top languages.

use std::io::Write;

use crate::github::error::GitHubError;
use crate::github::gateway::RepositoryGateway;
use crate::github::locator::RepositoryLocator;
use crate::github::models::RepositoryInfo;
use crate::stats::{LanguageShare, language_shares};

use super::output::{io_error, short_date};

/// Data shown on the summary page.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    /// Repository metadata.
    pub info: RepositoryInfo,
    /// Branches on the first page of `/branches`.
    pub branch_count: usize,
    /// Top languages by bytes.
    pub languages: Vec<LanguageShare>,
}

impl SummaryView {
    /// Loads metadata, branches, and languages.
    ///
    /// # Errors
    ///
    /// Propagates the first gateway failure.
    pub async fn load<G>(gateway: &G, locator: &RepositoryLocator) -> Result<Self, GitHubError>
    where
        G: RepositoryGateway + ?Sized,
    {
        let info = gateway.repository(locator).await?;
        let branches = gateway.branches(locator).await?;
        let languages = gateway.languages(locator).await?;

        Ok(Self {
            info,
            branch_count: branches.len(),
            languages: language_shares(&languages),
        })
    }

    /// Writes the summary as text.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Io` when writing fails.
    pub fn render<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        let info = &self.info;
        let description = info
            .description
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .unwrap_or("No description provided");

        writeln!(writer, "{}", info.full_name).map_err(|e| io_error(&e))?;
        writeln!(writer, "{description}").map_err(|e| io_error(&e))?;
        if info.archived {
            writeln!(writer, "(archived)").map_err(|e| io_error(&e))?;
        }
        writeln!(writer).map_err(|e| io_error(&e))?;
        writeln!(
            writer,
            "Stars: {}  Forks: {}  Watchers: {}  Open issues: {}",
            info.stargazers_count, info.forks_count, info.watchers_count, info.open_issues_count
        )
        .map_err(|e| io_error(&e))?;
        writeln!(
            writer,
            "Default branch: {} ({} branches)",
            info.default_branch, self.branch_count
        )
        .map_err(|e| io_error(&e))?;
        writeln!(
            writer,
            "Primary language: {}",
            info.language.as_deref().unwrap_or("none detected")
        )
        .map_err(|e| io_error(&e))?;
        writeln!(
            writer,
            "Created: {}  Updated: {}",
            short_date(info.created_at),
            short_date(info.updated_at)
        )
        .map_err(|e| io_error(&e))?;

        if let Some(homepage) = info.homepage.as_deref().filter(|url| !url.is_empty()) {
            writeln!(writer, "Homepage: {homepage}").map_err(|e| io_error(&e))?;
        }
        if let Some(url) = info.html_url.as_deref() {
            writeln!(writer, "GitHub: {url}").map_err(|e| io_error(&e))?;
        }
        if !info.topics.is_empty() {
            writeln!(writer, "Topics: {}", info.topics.join(", ")).map_err(|e| io_error(&e))?;
        }

        if !self.languages.is_empty() {
            writeln!(writer).map_err(|e| io_error(&e))?;
            writeln!(writer, "Languages:").map_err(|e| io_error(&e))?;
            for share in &self.languages {
                writeln!(writer, "  {:<16} {:>5.1}%", share.name, share.percentage)
                    .map_err(|e| io_error(&e))?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tokio::runtime::Runtime;

    use super::SummaryView;
    use crate::github::error::GitHubError;
    use crate::github::gateway::MockRepositoryGateway;
    use crate::github::locator::RepositoryLocator;
    use crate::github::models::{Branch, LanguageBytes, RepositoryInfo};

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
    fn loads_and_renders_overview() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_repository().times(1).returning(|_| {
            Ok(RepositoryInfo {
                full_name: "octo/repo".to_owned(),
                description: Some("A test repository".to_owned()),
                stargazers_count: 42,
                default_branch: "main".to_owned(),
                topics: vec!["cli".to_owned(), "github".to_owned()],
                ..RepositoryInfo::default()
            })
        });
        gateway
            .expect_branches()
            .times(1)
            .returning(|_| Ok(vec![branch("main"), branch("dev")]));
        gateway.expect_languages().times(1).returning(|_| {
            Ok(LanguageBytes::from([
                ("Rust".to_owned(), 750),
                ("Shell".to_owned(), 250),
            ]))
        });

        let runtime = Runtime::new().expect("runtime should start");
        let view = runtime
            .block_on(SummaryView::load(&gateway, &locator()))
            .expect("summary should load");

        let mut buffer = Vec::new();
        view.render(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("utf-8 output");

        assert!(output.contains("octo/repo"), "output: {output}");
        assert!(output.contains("Stars: 42"), "output: {output}");
        assert!(output.contains("Default branch: main (2 branches)"), "output: {output}");
        assert!(output.contains("Topics: cli, github"), "output: {output}");
        assert!(output.contains("Rust") && output.contains("75.0%"), "output: {output}");
    }

    #[rstest]
    fn repository_failure_stops_loading() {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_repository().times(1).returning(|_| {
            Err(GitHubError::NotFound {
                message: "repository failed with status 404 Not Found: Not Found".to_owned(),
            })
        });
        gateway.expect_branches().never();
        gateway.expect_languages().never();

        let runtime = Runtime::new().expect("runtime should start");
        let result = runtime.block_on(SummaryView::load(&gateway, &locator()));

        assert!(matches!(result, Err(GitHubError::NotFound { .. })));
    }

    #[rstest]
    fn missing_description_has_placeholder() {
        let view = SummaryView {
            info: RepositoryInfo {
                full_name: "octo/empty".to_owned(),
                ..RepositoryInfo::default()
            },
            branch_count: 0,
            languages: Vec::new(),
        };

        let mut buffer = Vec::new();
        view.render(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("utf-8 output");

        assert!(output.contains("No description provided"));
        assert!(!output.contains("Languages:"));
    }
}
