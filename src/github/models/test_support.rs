//! Test helpers for constructing model fixtures.
//!
//! # Examples
//!
//! ```
//! use repolens::github::models::test_support::{commit_at, contributor};
//!
//! let commit = commit_at("abc", "2024-01-01T12:00:00Z");
//! assert_eq!(commit.sha, "abc");
//!
//! let stats = contributor("mona", &[0, 2, 1]);
//! assert_eq!(stats.total, 3);
//! ```

use chrono::{DateTime, Utc};

use super::{CommitRecord, ContributorStats, WeeklyActivity};

/// Builds a commit authored at the given RFC 3339 timestamp.
///
/// # Panics
///
/// Panics when `timestamp` is not valid RFC 3339; intended for tests only.
#[must_use]
pub fn commit_at(sha: &str, timestamp: &str) -> CommitRecord {
    let author_date = DateTime::parse_from_rfc3339(timestamp)
        .unwrap_or_else(|error| panic!("invalid fixture timestamp {timestamp}: {error}"))
        .with_timezone(&Utc);

    CommitRecord {
        sha: sha.to_owned(),
        author_name: "Mona Lisa".to_owned(),
        author_login: Some("mona".to_owned()),
        author_date,
        message: format!("Commit {sha}"),
        html_url: None,
    }
}

/// Builds contributor statistics from a weekly commit series.
///
/// The total is the sum of the series; additions and deletions are derived
/// from the commit counts so tests can assert on them deterministically.
#[must_use]
pub fn contributor(login: &str, weekly_commits: &[u64]) -> ContributorStats {
    let weeks = weekly_commits
        .iter()
        .zip(0_i64..)
        .map(|(&commits, index)| WeeklyActivity {
            week_start: index.saturating_mul(604_800),
            commits,
            additions: commits.saturating_mul(10),
            deletions: commits,
        })
        .collect();

    ContributorStats {
        login: login.to_owned(),
        avatar_url: None,
        total: weekly_commits.iter().sum(),
        weeks,
    }
}
