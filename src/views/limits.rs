//! Rate-limit status line.

use std::io::Write;

use chrono::{DateTime, Utc};

use crate::github::auth::TokenProvider;
use crate::github::error::GitHubError;
use crate::github::rate_limit::{RateLimitMonitor, RateLimitStatus};

use super::output::io_error;

/// Rate-limit status as of `observed_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitsView {
    /// Polled status, possibly degraded.
    pub status: RateLimitStatus,
    /// When the status was read.
    pub observed_at: DateTime<Utc>,
}

impl LimitsView {
    /// Polls the monitor once. Never fails.
    pub async fn load<P>(monitor: &RateLimitMonitor<P>) -> Self
    where
        P: TokenProvider + 'static,
    {
        Self {
            status: monitor.current_status().await,
            observed_at: Utc::now(),
        }
    }

    /// Writes the status description and time until reset.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Io` when writing fails.
    pub fn render<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        writeln!(writer, "{}", self.status.describe()).map_err(|e| io_error(&e))?;
        let seconds = self.status.seconds_until_reset(self.observed_at);
        if self.status.is_exhausted() {
            writeln!(
                writer,
                "Limit reached; requests resume in {}m {}s",
                seconds.checked_div(60).unwrap_or(0),
                seconds.checked_rem(60).unwrap_or(0)
            )
            .map_err(|e| io_error(&e))?;
        }
        Ok(())
    }
}
