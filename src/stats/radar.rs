//! Normalised repository profile for the radar chart.

use crate::github::models::RepositoryInfo;

/// One axis of the radar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct RadarMetric {
    /// Axis label.
    pub label: &'static str,
    /// Raw value.
    pub value: u64,
    /// Value that maps to a full score.
    pub scale: u64,
    /// `value / scale * 100`, capped at 100.
    pub score: f64,
}

impl RadarMetric {
    const fn new(label: &'static str, value: u64, scale: u64) -> Self {
        Self {
            label,
            value,
            scale,
            score: normalise(value, scale),
        }
    }
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "scores are fractional percentages"
)]
const fn normalise(value: u64, scale: u64) -> f64 {
    if scale == 0 {
        return 0.0;
    }
    (value as f64 / scale as f64 * 100.0).min(100.0)
}

/// Stars, forks, watchers, open issues, branches, and languages on a
/// common `[0, 100]` scale.
#[must_use]
pub fn radar_profile(
    info: &RepositoryInfo,
    branch_count: usize,
    language_count: usize,
) -> Vec<RadarMetric> {
    let as_u64 = |count: usize| u64::try_from(count).unwrap_or(u64::MAX);
    vec![
        RadarMetric::new("Stars", info.stargazers_count, 10_000),
        RadarMetric::new("Forks", info.forks_count, 5_000),
        RadarMetric::new("Watchers", info.watchers_count, 1_000),
        RadarMetric::new("Issues", info.open_issues_count, 500),
        RadarMetric::new("Branches", as_u64(branch_count), 50),
        RadarMetric::new("Languages", as_u64(language_count), 20),
    ]
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::radar_profile;
    use crate::github::models::RepositoryInfo;

    #[rstest]
    fn scores_are_normalised_and_capped() {
        let info = RepositoryInfo {
            stargazers_count: 2_500,
            forks_count: 10_000,
            watchers_count: 0,
            open_issues_count: 50,
            ..RepositoryInfo::default()
        };

        let profile = radar_profile(&info, 5, 4);
        let scores: Vec<(&str, f64)> = profile
            .iter()
            .map(|metric| (metric.label, metric.score))
            .collect();

        let expected = [
            ("Stars", 25.0),
            ("Forks", 100.0),
            ("Watchers", 0.0),
            ("Issues", 10.0),
            ("Branches", 10.0),
            ("Languages", 20.0),
        ];
        assert_eq!(scores.len(), expected.len());
        for ((label, score), (expected_label, expected_score)) in scores.iter().zip(expected) {
            assert_eq!(*label, expected_label);
            assert!((score - expected_score).abs() < 1e-9, "{label}: {score}");
        }
    }
}
