//! Retry policy for GitHub statistics endpoints.
//!
//! `/stats/contributors` answers `202 Accepted` (or an empty list) while
//! GitHub computes statistics in the background. The policy allows a single
//! retry after a fixed delay so worst-case latency stays bounded.

use std::time::Duration;

use backon::ConstantBuilder;

/// Delay before retrying a statistics request that is still being computed.
pub const DEFAULT_STATS_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Capped, fixed-delay retry configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsRetryPolicy {
    /// Delay between attempts.
    pub delay: Duration,
    /// Maximum number of retries after the first attempt.
    pub max_retries: usize,
}

impl Default for StatsRetryPolicy {
    fn default() -> Self {
        Self {
            delay: DEFAULT_STATS_RETRY_DELAY,
            max_retries: 1,
        }
    }
}

impl StatsRetryPolicy {
    /// Single retry after `delay`.
    #[must_use]
    pub const fn once_after(delay: Duration) -> Self {
        Self {
            delay,
            max_retries: 1,
        }
    }

    /// Build a constant backoff strategy from this policy.
    #[must_use]
    pub fn into_backoff(self) -> ConstantBuilder {
        ConstantBuilder::default()
            .with_delay(self.delay)
            .with_max_times(self.max_retries)
    }
}
