//! Pure aggregation over fetched repository data.
//!
//! Nothing here performs I/O. The functions turn commits, language byte
//! counts, contributor series, and comparison payloads into the series the
//! statistics views plot.

pub mod activity;
pub mod compare;
pub mod contributors;
pub mod languages;
pub mod radar;

pub use activity::{
    DEFAULT_MOVING_AVERAGE_RADIUS, DailyBucket, MonthlyBucket, daily_commit_histogram,
    daily_commit_histogram_in, monthly_commit_histogram, monthly_commit_histogram_in,
    moving_average,
};
pub use compare::{CompareSummary, DiffLineKind, classify_patch};
pub use contributors::{
    ContributorPoint, DEFAULT_CONTRIBUTOR_CAP, MAX_BUBBLE_RADIUS, contributor_bubble_points,
};
pub use languages::{DEFAULT_LANGUAGE_CAP, LanguageShare, language_breakdown, language_shares};
pub use radar::{RadarMetric, radar_profile};
