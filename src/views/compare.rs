//! Branch comparison: status, commits, and changed files.

use std::io::Write;

use crate::github::error::GitHubError;
use crate::github::gateway::RepositoryGateway;
use crate::github::locator::RepositoryLocator;
use crate::github::models::{ChangedFile, Comparison};
use crate::stats::{CompareSummary, DiffLineKind, classify_patch};

use super::output::io_error;

/// Comparison of `head` against `base`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareView {
    /// Base branch.
    pub base: String,
    /// Head branch.
    pub head: String,
    /// Classified status.
    pub summary: CompareSummary,
    /// Raw comparison payload.
    pub comparison: Comparison,
}

/// Line counts of a patch by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatchLineCounts {
    /// `+` lines.
    pub additions: usize,
    /// `-` lines.
    pub deletions: usize,
    /// Context and hunk header lines.
    pub context: usize,
}

impl PatchLineCounts {
    /// Counts the lines of `patch` by kind.
    #[must_use]
    pub fn of(patch: &str) -> Self {
        classify_patch(patch).fold(Self::default(), |mut counts, (kind, _)| {
            match kind {
                DiffLineKind::Addition => counts.additions = counts.additions.saturating_add(1),
                DiffLineKind::Deletion => counts.deletions = counts.deletions.saturating_add(1),
                DiffLineKind::Context => counts.context = counts.context.saturating_add(1),
            }
            counts
        })
    }
}

impl CompareView {
    /// Compares `head` against `base`.
    ///
    /// Identical branch names are rejected before any request is made.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidComparison` for identical or blank
    /// branch names and propagates gateway failures.
    pub async fn load<G>(
        gateway: &G,
        locator: &RepositoryLocator,
        base: &str,
        head: &str,
    ) -> Result<Self, GitHubError>
    where
        G: RepositoryGateway + ?Sized,
    {
        if base.trim().is_empty() || head.trim().is_empty() {
            return Err(GitHubError::InvalidComparison {
                message: "select both a base and a head branch".to_owned(),
            });
        }
        if base == head {
            return Err(GitHubError::InvalidComparison {
                message: "select two different branches to compare".to_owned(),
            });
        }

        let comparison = gateway.compare(locator, base, head).await?;
        Ok(Self {
            base: base.to_owned(),
            head: head.to_owned(),
            summary: CompareSummary::from_comparison(&comparison),
            comparison,
        })
    }

    /// Writes the status, commits, and per-file patches.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Io` when writing fails.
    pub fn render<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        writeln!(writer, "{} ← {}", self.base, self.head).map_err(|e| io_error(&e))?;
        writeln!(writer, "{}", self.summary.message(&self.head)).map_err(|e| io_error(&e))?;

        if self.summary != CompareSummary::Identical {
            let merge_base = self
                .comparison
                .merge_base_sha
                .as_deref()
                .map_or("", |sha| sha.get(..7).unwrap_or(sha));
            let tip = self
                .comparison
                .commits
                .last()
                .map_or("", |commit| commit.short_sha());
            writeln!(writer, "Comparing {merge_base} and {tip}").map_err(|e| io_error(&e))?;
        }

        if !self.comparison.commits.is_empty() {
            writeln!(writer).map_err(|e| io_error(&e))?;
            writeln!(writer, "Commits ({}):", self.comparison.commits.len())
                .map_err(|e| io_error(&e))?;
            for commit in &self.comparison.commits {
                writeln!(
                    writer,
                    "  {} {} ({})",
                    commit.short_sha(),
                    commit.summary(),
                    commit.author_name
                )
                .map_err(|e| io_error(&e))?;
            }
        }

        if !self.comparison.files.is_empty() {
            writeln!(writer).map_err(|e| io_error(&e))?;
            writeln!(writer, "Files changed ({}):", self.comparison.files.len())
                .map_err(|e| io_error(&e))?;
            for file in &self.comparison.files {
                write_file(writer, file)?;
            }
        }

        Ok(())
    }
}

fn write_file<W: Write>(writer: &mut W, file: &ChangedFile) -> Result<(), GitHubError> {
    writeln!(
        writer,
        "  {} [{}] +{} -{}",
        file.filename, file.status, file.additions, file.deletions
    )
    .map_err(|e| io_error(&e))?;

    let Some(patch) = file.patch.as_deref() else {
        return writeln!(writer, "    (no textual diff)").map_err(|e| io_error(&e));
    };
    let counts = PatchLineCounts::of(patch);
    writeln!(
        writer,
        "    {} added, {} removed, {} context lines shown",
        counts.additions, counts.deletions, counts.context
    )
    .map_err(|e| io_error(&e))?;
    for (kind, line) in classify_patch(patch) {
        let gutter = match kind {
            DiffLineKind::Addition => "A",
            DiffLineKind::Deletion => "D",
            DiffLineKind::Context => " ",
        };
        writeln!(writer, "    {gutter} {line}").map_err(|e| io_error(&e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use tokio::runtime::Runtime;

    use super::{CompareView, PatchLineCounts};
    use crate::github::error::GitHubError;
    use crate::github::gateway::MockRepositoryGateway;
    use crate::github::locator::RepositoryLocator;
    use crate::github::models::test_support::commit_at;
    use crate::github::models::{ChangedFile, Comparison};
    use crate::stats::CompareSummary;

    fn load(
        gateway: &MockRepositoryGateway,
        base: &str,
        head: &str,
    ) -> Result<CompareView, GitHubError> {
        let locator = RepositoryLocator::from_owner_repo("octo", "repo").expect("valid locator");
        Runtime::new()
            .expect("runtime should start")
            .block_on(CompareView::load(gateway, &locator, base, head))
    }

    #[rstest]
    #[case("main", "main")]
    #[case("", "dev")]
    fn invalid_selection_makes_no_request(#[case] base: &str, #[case] head: &str) {
        let mut gateway = MockRepositoryGateway::new();
        gateway.expect_compare().never();

        let result = load(&gateway, base, head);

        assert!(matches!(result, Err(GitHubError::InvalidComparison { .. })));
    }

    #[rstest]
    fn diverged_comparison_renders_both_counts_and_files() {
        let mut gateway = MockRepositoryGateway::new();
        gateway
            .expect_compare()
            .withf(|_, base, head| base == "main" && head == "feature")
            .times(1)
            .returning(|_, _, _| {
                Ok(Comparison {
                    status: "diverged".to_owned(),
                    ahead_by: 3,
                    behind_by: 5,
                    merge_base_sha: Some("1234567890".to_owned()),
                    commits: vec![commit_at("abcdef0001", "2024-04-01T00:00:00Z")],
                    files: vec![ChangedFile {
                        filename: "src/lib.rs".to_owned(),
                        status: "modified".to_owned(),
                        additions: 1,
                        deletions: 1,
                        patch: Some("@@ -1 +1 @@\n-old\n+new".to_owned()),
                        ..ChangedFile::default()
                    }],
                    ..Comparison::default()
                })
            });

        let view = load(&gateway, "main", "feature").expect("comparison should load");
        assert_eq!(
            view.summary,
            CompareSummary::Diverged {
                ahead_by: 3,
                behind_by: 5
            }
        );

        let mut buffer = Vec::new();
        view.render(&mut buffer).expect("render should succeed");
        let output = String::from_utf8(buffer).expect("utf-8 output");

        assert!(output.contains("ahead by 3"), "output: {output}");
        assert!(output.contains("behind by 5"), "output: {output}");
        assert!(output.contains("Comparing 1234567 and abcdef0"), "output: {output}");
        assert!(output.contains("src/lib.rs [modified] +1 -1"), "output: {output}");
        assert!(output.contains("    D -old"), "output: {output}");
        assert!(output.contains("    A +new"), "output: {output}");
    }

    #[rstest]
    fn patch_counts_follow_line_prefixes() {
        let counts = PatchLineCounts::of("@@ -1,3 +1,3 @@\n keep\n-gone\n+here\n+also");
        assert_eq!(
            counts,
            PatchLineCounts {
                additions: 2,
                deletions: 1,
                context: 2
            }
        );
    }
}
