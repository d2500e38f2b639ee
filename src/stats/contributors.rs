//! Contributor bubble chart coordinates.

use crate::github::models::ContributorStats;

/// Contributors plotted on the bubble chart.
pub const DEFAULT_CONTRIBUTOR_CAP: usize = 20;

/// Upper bound on a bubble's radius.
pub const MAX_BUBBLE_RADIUS: f64 = 40.0;

/// One contributor's bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct ContributorPoint {
    /// GitHub login.
    pub login: String,
    /// Total commits.
    pub total_commits: u64,
    /// Index of the first week with a commit; `None` if never active.
    pub first_active_week: Option<usize>,
    /// Weeks with at least one commit.
    pub active_week_count: usize,
    /// Bubble radius, `min(sqrt(total) * 2, 40)`.
    pub radius: f64,
    /// Lines added across all weeks.
    pub additions: u64,
    /// Lines deleted across all weeks.
    pub deletions: u64,
}

impl ContributorPoint {
    fn from_stats(stats: &ContributorStats) -> Self {
        let first_active_week = stats.weeks.iter().position(|week| week.commits > 0);
        let active_week_count = stats.weeks.iter().filter(|week| week.commits > 0).count();
        let additions = stats
            .weeks
            .iter()
            .map(|week| week.additions)
            .fold(0, u64::saturating_add);
        let deletions = stats
            .weeks
            .iter()
            .map(|week| week.deletions)
            .fold(0, u64::saturating_add);

        Self {
            login: stats.login.clone(),
            total_commits: stats.total,
            first_active_week,
            active_week_count,
            radius: bubble_radius(stats.total),
            additions,
            deletions,
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "radius scales with the square root of the commit count"
)]
fn bubble_radius(total_commits: u64) -> f64 {
    ((total_commits as f64).sqrt() * 2.0).min(MAX_BUBBLE_RADIUS)
}

/// Bubbles for the `cap` most active contributors, by total commits
/// descending.
///
/// Contributors with equal totals keep their upstream order.
#[must_use]
pub fn contributor_bubble_points(stats: &[ContributorStats], cap: usize) -> Vec<ContributorPoint> {
    let mut ranked: Vec<&ContributorStats> = stats.iter().collect();
    ranked.sort_by(|left, right| right.total.cmp(&left.total));
    ranked
        .into_iter()
        .take(cap)
        .map(ContributorPoint::from_stats)
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{DEFAULT_CONTRIBUTOR_CAP, MAX_BUBBLE_RADIUS, contributor_bubble_points};
    use crate::github::models::test_support::contributor;

    #[rstest]
    fn caps_at_twenty_sorted_by_total() {
        let stats: Vec<_> = (1..=25_u64)
            .map(|commits| contributor(&format!("user-{commits}"), &[commits]))
            .collect();

        let points = contributor_bubble_points(&stats, DEFAULT_CONTRIBUTOR_CAP);

        assert_eq!(points.len(), 20);
        let totals: Vec<u64> = points.iter().map(|point| point.total_commits).collect();
        assert!(totals.windows(2).all(|pair| pair.first() >= pair.last()));
        assert_eq!(totals.first(), Some(&25));
        assert_eq!(totals.last(), Some(&6));
    }

    #[rstest]
    fn weekly_series_drives_position_and_width() {
        let stats = [contributor("mona", &[0, 0, 3, 0, 1])];

        let point = contributor_bubble_points(&stats, 5)
            .into_iter()
            .next()
            .expect("one point");

        assert_eq!(point.first_active_week, Some(2));
        assert_eq!(point.active_week_count, 2);
        assert_eq!(point.additions, 40);
        assert_eq!(point.deletions, 4);
    }

    #[rstest]
    fn inactive_contributor_has_no_first_week() {
        let stats = [contributor("idle", &[0, 0, 0])];
        let point = contributor_bubble_points(&stats, 5)
            .into_iter()
            .next()
            .expect("one point");
        assert_eq!(point.first_active_week, None);
        assert_eq!(point.active_week_count, 0);
    }

    #[rstest]
    #[case(0, 0.0)]
    #[case(4, 4.0)]
    #[case(100, 20.0)]
    #[case(10_000, MAX_BUBBLE_RADIUS)]
    fn radius_is_bounded(#[case] total: u64, #[case] expected: f64) {
        let stats = [contributor("someone", &[total])];
        let radius = contributor_bubble_points(&stats, 1)
            .first()
            .map(|point| point.radius)
            .expect("one point");
        assert!((radius - expected).abs() < 1e-9, "got {radius}");
    }
}
