//! Commit activity histograms and smoothing.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, TimeZone};

use crate::github::models::CommitRecord;

/// Half-width of the moving-average window used by the activity chart.
pub const DEFAULT_MOVING_AVERAGE_RADIUS: usize = 3;

/// Commits authored on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyBucket {
    /// Calendar day.
    pub day: NaiveDate,
    /// Commits authored on `day`.
    pub count: u32,
}

/// Commits authored in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyBucket {
    /// `YYYY-MM` key.
    pub month: String,
    /// Commits authored in `month`.
    pub count: u32,
}

/// Counts commits per local calendar day over the full observed range.
///
/// Days between the earliest and latest commit with no activity are present
/// with a count of zero.
#[must_use]
pub fn daily_commit_histogram(commits: &[CommitRecord]) -> Vec<DailyBucket> {
    daily_commit_histogram_in(commits, &Local)
}

/// Counts commits per calendar day in `zone`.
#[must_use]
pub fn daily_commit_histogram_in<Tz: TimeZone>(
    commits: &[CommitRecord],
    zone: &Tz,
) -> Vec<DailyBucket> {
    let mut counts: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for commit in commits {
        let day = commit.author_date.with_timezone(zone).date_naive();
        let count = counts.entry(day).or_insert(0);
        *count = count.saturating_add(1);
    }

    let (Some((&first, _)), Some((&last, _))) = (counts.first_key_value(), counts.last_key_value())
    else {
        return Vec::new();
    };

    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| DailyBucket {
            day,
            count: counts.get(&day).copied().unwrap_or(0),
        })
        .collect()
}

/// Averages each point with up to `radius` neighbours on either side.
///
/// The window shrinks at the edges of the series instead of padding with
/// zeros, so the first and last points average fewer values.
///
/// # Example
///
/// ```
/// use repolens::stats::moving_average;
///
/// let smoothed = moving_average(&[1, 0, 0, 0, 1], 3);
/// assert_eq!(smoothed.first().copied(), Some(0.25));
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "a mean of integer counts is fractional"
)]
#[must_use]
pub fn moving_average(series: &[u32], radius: usize) -> Vec<f64> {
    let last_index = series.len().saturating_sub(1);
    (0..series.len())
        .map(|index| {
            let start = index.saturating_sub(radius);
            let end = index.saturating_add(radius).min(last_index);
            let window = series.get(start..=end).unwrap_or_default();
            let sum: f64 = window.iter().copied().map(f64::from).sum();
            let width = u32::try_from(window.len()).map_or(f64::from(u32::MAX), f64::from);
            sum / width
        })
        .collect()
}

/// Counts commits per local calendar month.
///
/// Only months containing at least one commit appear.
#[must_use]
pub fn monthly_commit_histogram(commits: &[CommitRecord]) -> Vec<MonthlyBucket> {
    monthly_commit_histogram_in(commits, &Local)
}

/// Counts commits per calendar month in `zone`, keyed `YYYY-MM`.
#[must_use]
pub fn monthly_commit_histogram_in<Tz: TimeZone>(
    commits: &[CommitRecord],
    zone: &Tz,
) -> Vec<MonthlyBucket>
where
    Tz::Offset: std::fmt::Display,
{
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for commit in commits {
        let month = commit
            .author_date
            .with_timezone(zone)
            .format("%Y-%m")
            .to_string();
        let count = counts.entry(month).or_insert(0);
        *count = count.saturating_add(1);
    }

    counts
        .into_iter()
        .map(|(month, count)| MonthlyBucket { month, count })
        .collect()
}
