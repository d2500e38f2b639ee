//! Data models for the GitHub REST payloads this crate consumes.
//!
//! Types prefixed with `Api` are internal deserialisation targets that convert
//! into public domain types. A missing or `null` field decodes to its empty
//! value instead of failing the whole payload.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::error::GitHubError;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Decodes an explicit `null` as `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Bytes of source per language, as returned by `/languages`.
pub type LanguageBytes = BTreeMap<String, u64>;

/// Repository metadata shown by the summary view and search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RepositoryInfo {
    /// Short repository name.
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// `owner/name`.
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Project homepage.
    pub homepage: Option<String>,
    /// Web URL on GitHub.
    pub html_url: Option<String>,
    /// Primary language detected by GitHub.
    pub language: Option<String>,
    /// Star count.
    #[serde(deserialize_with = "null_as_default")]
    pub stargazers_count: u64,
    /// Fork count.
    #[serde(deserialize_with = "null_as_default")]
    pub forks_count: u64,
    /// Watcher count.
    #[serde(deserialize_with = "null_as_default")]
    pub watchers_count: u64,
    /// Open issues (including pull requests).
    #[serde(deserialize_with = "null_as_default")]
    pub open_issues_count: u64,
    /// Default branch name.
    #[serde(deserialize_with = "null_as_default")]
    pub default_branch: String,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Whether the repository is archived.
    #[serde(deserialize_with = "null_as_default")]
    pub archived: bool,
    /// Repository topics.
    #[serde(deserialize_with = "null_as_default")]
    pub topics: Vec<String>,
}

/// Branch name and head commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Branch name.
    pub name: String,
    /// SHA of the branch head, if reported.
    pub head_sha: Option<String>,
}

/// The subset of commit fields the views consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Commit SHA.
    pub sha: String,
    /// Git author name.
    pub author_name: String,
    /// GitHub login of the author, when the email maps to an account.
    pub author_login: Option<String>,
    /// Author timestamp.
    pub author_date: DateTime<Utc>,
    /// Full commit message.
    pub message: String,
    /// Web URL of the commit.
    pub html_url: Option<String>,
}

impl CommitRecord {
    /// First line of the commit message.
    #[must_use]
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }

    /// Abbreviated SHA (seven characters).
    #[must_use]
    pub fn short_sha(&self) -> &str {
        self.sha.get(..7).unwrap_or(&self.sha)
    }

    /// Author login if known, otherwise the git author name.
    #[must_use]
    pub fn display_author(&self) -> &str {
        self.author_login.as_deref().unwrap_or(&self.author_name)
    }
}

/// A file touched by a comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChangedFile {
    /// Path of the file.
    #[serde(deserialize_with = "null_as_default")]
    pub filename: String,
    /// `added`, `modified`, `removed`, `renamed`, ...
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    /// Lines added.
    #[serde(deserialize_with = "null_as_default")]
    pub additions: u64,
    /// Lines removed.
    #[serde(deserialize_with = "null_as_default")]
    pub deletions: u64,
    /// Total changed lines.
    #[serde(deserialize_with = "null_as_default")]
    pub changes: u64,
    /// Unified diff hunk, absent for binary or very large files.
    pub patch: Option<String>,
}

/// Result of comparing two refs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    /// Upstream status: `identical`, `ahead`, `behind`, or `diverged`.
    pub status: String,
    /// Commits the head has that the base lacks.
    pub ahead_by: u64,
    /// Commits the base has that the head lacks.
    pub behind_by: u64,
    /// Number of commits in the comparison.
    pub total_commits: u64,
    /// Merge base SHA.
    pub merge_base_sha: Option<String>,
    /// Commits between base and head.
    pub commits: Vec<CommitRecord>,
    /// Changed files.
    pub files: Vec<ChangedFile>,
}

/// Decoded README document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readme {
    /// File name (e.g. `README.md`).
    pub name: String,
    /// UTF-8 text of the README.
    pub text: String,
}

/// One week of a contributor's activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WeeklyActivity {
    /// Unix timestamp of the start of the week.
    #[serde(rename = "w", deserialize_with = "null_as_default")]
    pub week_start: i64,
    /// Commits in the week.
    #[serde(rename = "c", deserialize_with = "null_as_default")]
    pub commits: u64,
    /// Lines added in the week.
    #[serde(rename = "a", deserialize_with = "null_as_default")]
    pub additions: u64,
    /// Lines deleted in the week.
    #[serde(rename = "d", deserialize_with = "null_as_default")]
    pub deletions: u64,
}

/// Per-contributor weekly statistics from `/stats/contributors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributorStats {
    /// Contributor login, `Unknown` when GitHub omits the author.
    pub login: String,
    /// Avatar image URL.
    pub avatar_url: Option<String>,
    /// Total commits.
    pub total: u64,
    /// Weekly series, oldest first.
    pub weeks: Vec<WeeklyActivity>,
}

/// A page of repository search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    /// Total matches reported by GitHub.
    pub total_count: u64,
    /// Repositories on this page.
    pub items: Vec<RepositoryInfo>,
    /// Page number that was requested.
    pub page: u32,
    /// True when this page was full, so another may follow.
    pub has_next_page: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiBranch {
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) name: String,
    pub(crate) commit: Option<ApiShaRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiShaRef {
    pub(crate) sha: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiCommit {
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) sha: String,
    pub(crate) html_url: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) commit: ApiCommitDetail,
    pub(crate) author: Option<ApiUser>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiCommitDetail {
    pub(crate) author: Option<ApiGitAuthor>,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiGitAuthor {
    pub(crate) name: Option<String>,
    pub(crate) date: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiUser {
    pub(crate) login: Option<String>,
    pub(crate) avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiComparison {
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) ahead_by: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) behind_by: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) total_commits: u64,
    pub(crate) merge_base_commit: Option<ApiShaRef>,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) commits: Vec<ApiCommit>,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) files: Vec<ChangedFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiReadme {
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) encoding: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiContributorStats {
    pub(crate) author: Option<ApiUser>,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) weeks: Vec<WeeklyActivity>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ApiSearchResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) total_count: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub(crate) items: Vec<RepositoryInfo>,
}

impl From<ApiBranch> for Branch {
    fn from(value: ApiBranch) -> Self {
        Self {
            name: value.name,
            head_sha: value.commit.and_then(|commit| commit.sha),
        }
    }
}

impl ApiCommit {
    /// Converts into a [`CommitRecord`], dropping commits without a usable
    /// author date since they cannot be placed on a calendar.
    pub(crate) fn into_record(self) -> Option<CommitRecord> {
        let author = self.commit.author.unwrap_or_default();
        let Some(author_date) = author.date.as_deref().and_then(parse_timestamp) else {
            debug!(sha = %self.sha, "dropping commit without a parsable author date");
            return None;
        };

        Some(CommitRecord {
            sha: self.sha,
            author_name: author.name.unwrap_or_else(|| "Unknown".to_owned()),
            author_login: self.author.and_then(|user| user.login),
            author_date,
            message: self.commit.message,
            html_url: self.html_url,
        })
    }
}

pub(crate) fn into_records(commits: Vec<ApiCommit>) -> Vec<CommitRecord> {
    commits.into_iter().filter_map(ApiCommit::into_record).collect()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

impl From<ApiComparison> for Comparison {
    fn from(value: ApiComparison) -> Self {
        Self {
            status: value.status,
            ahead_by: value.ahead_by,
            behind_by: value.behind_by,
            total_commits: value.total_commits,
            merge_base_sha: value.merge_base_commit.and_then(|commit| commit.sha),
            commits: into_records(value.commits),
            files: value.files,
        }
    }
}

impl From<ApiContributorStats> for ContributorStats {
    fn from(value: ApiContributorStats) -> Self {
        let author = value.author.unwrap_or_default();
        Self {
            login: author.login.unwrap_or_else(|| "Unknown".to_owned()),
            avatar_url: author.avatar_url,
            total: value.total,
            weeks: value.weeks,
        }
    }
}

impl ApiReadme {
    /// Decodes the Base64 payload into UTF-8 text.
    ///
    /// GitHub wraps the encoded content at 60 columns, so whitespace is
    /// stripped before decoding.
    pub(crate) fn decode(self) -> Result<Readme, GitHubError> {
        if !self.encoding.is_empty() && !self.encoding.eq_ignore_ascii_case("base64") {
            return Err(GitHubError::decode(
                "readme",
                format!("unsupported encoding {}", self.encoding),
            ));
        }

        let compact: String = self
            .content
            .chars()
            .filter(|character| !character.is_ascii_whitespace())
            .collect();
        let bytes = STANDARD
            .decode(compact.as_bytes())
            .map_err(|error| GitHubError::decode("readme", error))?;
        let text = String::from_utf8(bytes).map_err(|error| GitHubError::decode("readme", error))?;

        Ok(Readme {
            name: self.name,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::json;

    use super::{
        ApiCommit, ApiComparison, ApiContributorStats, ApiReadme, Comparison, ContributorStats,
        RepositoryInfo,
    };
    use crate::github::error::GitHubError;

    #[rstest]
    fn explicit_nulls_decode_to_empty_values() {
        let info: RepositoryInfo = serde_json::from_value(json!({
            "name": null,
            "full_name": "octo/repo",
            "topics": null,
            "stargazers_count": null,
            "archived": null
        }))
        .expect("null fields should deserialise");
        assert_eq!(info.name, "");
        assert!(info.topics.is_empty());
        assert_eq!(info.stargazers_count, 0);
        assert!(!info.archived);

        let api: ApiCommit = serde_json::from_value(json!({
            "sha": "abc1234",
            "commit": {
                "message": null,
                "author": { "name": "Mona", "date": "2024-05-01T10:00:00Z" }
            }
        }))
        .expect("null message should deserialise");
        let record = api.into_record().expect("dated commit should convert");
        assert_eq!(record.message, "");
        assert_eq!(record.summary(), "");
    }

    #[rstest]
    fn repository_info_defaults_missing_fields() {
        let info: RepositoryInfo = serde_json::from_value(json!({
            "name": "repo",
            "full_name": "octo/repo",
            "description": null,
            "stargazers_count": 12
        }))
        .expect("partial repository payload should deserialise");

        assert_eq!(info.full_name, "octo/repo");
        assert_eq!(info.description, None);
        assert_eq!(info.stargazers_count, 12);
        assert_eq!(info.forks_count, 0);
        assert!(info.topics.is_empty());
        assert!(info.created_at.is_none());
    }

    #[rstest]
    fn commit_converts_into_record() {
        let api: ApiCommit = serde_json::from_value(json!({
            "sha": "0123456789abcdef",
            "html_url": "https://github.com/octo/repo/commit/0123456",
            "commit": {
                "author": { "name": "Mona", "date": "2024-01-05T10:00:00Z" },
                "message": "Fix parser\n\nLonger body"
            },
            "author": { "login": "mona" }
        }))
        .expect("commit payload should deserialise");

        let record = api.into_record().expect("commit should convert");
        assert_eq!(record.short_sha(), "0123456");
        assert_eq!(record.summary(), "Fix parser");
        assert_eq!(record.display_author(), "mona");
        assert_eq!(
            record.author_date,
            Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0)
                .single()
                .expect("valid timestamp")
        );
    }

    #[rstest]
    #[case::missing_date(json!({ "sha": "abc", "commit": { "author": { "name": "Mona" } } }))]
    #[case::garbage_date(json!({ "sha": "abc", "commit": { "author": { "date": "yesterday" } } }))]
    #[case::no_author(json!({ "sha": "abc", "commit": {} }))]
    fn commits_without_dates_are_dropped(#[case] value: serde_json::Value) {
        let api: ApiCommit = serde_json::from_value(value).expect("payload should deserialise");
        assert!(api.into_record().is_none());
    }

    #[rstest]
    fn comparison_collects_merge_base_and_files() {
        let api: ApiComparison = serde_json::from_value(json!({
            "status": "diverged",
            "ahead_by": 3,
            "behind_by": 5,
            "total_commits": 3,
            "merge_base_commit": { "sha": "base123" },
            "files": [{ "filename": "src/lib.rs", "status": "modified", "additions": 2 }]
        }))
        .expect("comparison payload should deserialise");

        let comparison = Comparison::from(api);
        assert_eq!(comparison.status, "diverged");
        assert_eq!(comparison.merge_base_sha.as_deref(), Some("base123"));
        assert_eq!(comparison.files.len(), 1);
        assert!(comparison.commits.is_empty());
    }

    #[rstest]
    fn contributor_without_author_is_unknown() {
        let api: ApiContributorStats = serde_json::from_value(json!({
            "author": null,
            "total": 4,
            "weeks": [{ "w": 0, "a": 10, "d": 1, "c": 4 }]
        }))
        .expect("contributor payload should deserialise");

        let stats = ContributorStats::from(api);
        assert_eq!(stats.login, "Unknown");
        assert_eq!(stats.weeks.first().map(|week| week.commits), Some(4));
    }

    #[rstest]
    fn readme_decodes_wrapped_base64() {
        let readme = ApiReadme {
            name: "README.md".to_owned(),
            content: "IyBIZWxsbwoK\nV29ybGQgw6k=\n".to_owned(),
            encoding: "base64".to_owned(),
        }
        .decode()
        .expect("readme should decode");

        assert_eq!(readme.text, "# Hello\n\nWorld é");
    }

    #[rstest]
    fn readme_rejects_invalid_utf8() {
        let result = ApiReadme {
            name: "README".to_owned(),
            content: "/w==".to_owned(),
            encoding: "base64".to_owned(),
        }
        .decode();

        assert!(
            matches!(result, Err(GitHubError::Decode { .. })),
            "expected Decode error, got {result:?}"
        );
    }
}
