//! Rate limit status polled from the GitHub `/rate_limit` endpoint.
//!
//! [`RateLimitMonitor`] is best-effort: a failed or malformed poll degrades to
//! a conservative anonymous default rather than surfacing an error.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::auth::TokenProvider;
use super::client::GitHubClient;
use super::error::GitHubError;

/// Hourly request quota for anonymous callers.
pub const ANONYMOUS_HOURLY_LIMIT: u32 = 60;

/// Hourly request quota for authenticated callers.
pub const AUTHENTICATED_HOURLY_LIMIT: u32 = 5000;

/// Default interval between rate-limit polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Shortest interval [`RateLimitMonitor::spawn_polling`] will poll at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

const RATE_LIMIT_PATH: &str = "/rate_limit";

/// Remaining requests, or `Unknown` when the last poll failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    /// Value reported by GitHub.
    Known(u32),
    /// The status could not be retrieved.
    Unknown,
}

impl fmt::Display for Remaining {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(value) => write!(formatter, "{value}"),
            Self::Unknown => formatter.write_str("unknown"),
        }
    }
}

/// Snapshot of the core API quota.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use repolens::github::rate_limit::{RateLimitStatus, Remaining};
///
/// let status = RateLimitStatus::new(5000, 4999, Utc::now(), true);
/// assert_eq!(status.remaining(), Remaining::Known(4999));
/// assert!(!status.is_exhausted());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    limit: u32,
    remaining: Remaining,
    reset: DateTime<Utc>,
    authenticated: bool,
}

impl RateLimitStatus {
    /// Creates a status, clamping `remaining` to `limit`.
    #[must_use]
    pub fn new(limit: u32, remaining: u32, reset: DateTime<Utc>, authenticated: bool) -> Self {
        Self {
            limit,
            remaining: Remaining::Known(remaining.min(limit)),
            reset,
            authenticated,
        }
    }

    /// Fallback reported when the quota cannot be retrieved.
    #[must_use]
    pub const fn degraded(now: DateTime<Utc>) -> Self {
        Self {
            limit: ANONYMOUS_HOURLY_LIMIT,
            remaining: Remaining::Unknown,
            reset: now,
            authenticated: false,
        }
    }

    /// Maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Remaining requests in the current window.
    #[must_use]
    pub const fn remaining(&self) -> Remaining {
        self.remaining
    }

    /// When the window resets.
    #[must_use]
    pub const fn reset(&self) -> DateTime<Utc> {
        self.reset
    }

    /// Whether a token was attached to the poll that produced this status.
    #[must_use]
    pub const fn authenticated(&self) -> bool {
        self.authenticated
    }

    /// True when GitHub reported zero remaining requests.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        matches!(self.remaining, Remaining::Known(0))
    }

    /// Seconds from `now` until the window resets, zero if already past.
    #[must_use]
    pub fn seconds_until_reset(&self, now: DateTime<Utc>) -> u64 {
        u64::try_from((self.reset - now).num_seconds()).unwrap_or(0)
    }

    /// Human-readable description for the status line.
    #[must_use]
    pub fn describe(&self) -> String {
        let mut text = format!(
            "GitHub API requests remaining: {} of {} (resets at {})",
            self.remaining,
            self.limit,
            self.reset.format("%H:%M:%S UTC")
        );
        if !self.authenticated {
            text.push_str(&format!(
                "\nSign in to raise the limit from {ANONYMOUS_HOURLY_LIMIT} to \
                 {AUTHENTICATED_HOURLY_LIMIT} requests per hour"
            ));
        }
        text
    }
}

#[derive(Debug, Deserialize)]
struct ApiRateLimit {
    resources: ApiRateResources,
}

#[derive(Debug, Deserialize)]
struct ApiRateResources {
    core: ApiRate,
}

#[derive(Debug, Deserialize)]
struct ApiRate {
    limit: u32,
    remaining: u32,
    reset: i64,
}

/// Queries the rate-limit endpoint through a [`GitHubClient`].
pub struct RateLimitMonitor<P> {
    client: Arc<GitHubClient<P>>,
}

impl<P> Clone for RateLimitMonitor<P> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<P> RateLimitMonitor<P>
where
    P: TokenProvider + 'static,
{
    /// Creates a monitor sharing `client`.
    #[must_use]
    pub const fn new(client: Arc<GitHubClient<P>>) -> Self {
        Self { client }
    }

    /// Polls the current status, degrading instead of failing.
    pub async fn current_status(&self) -> RateLimitStatus {
        match self.fetch().await {
            Ok(status) => status,
            Err(error) => {
                warn!("rate limit lookup failed, reporting degraded status: {error}");
                RateLimitStatus::degraded(Utc::now())
            }
        }
    }

    async fn fetch(&self) -> Result<RateLimitStatus, GitHubError> {
        let response = self.client.request(RATE_LIMIT_PATH).await?;
        if !response.is_success() {
            return Err(GitHubError::Api {
                message: format!("rate limit failed with status {}", response.status),
            });
        }

        let payload: ApiRateLimit = response.json("rate limit")?;
        let core = payload.resources.core;
        let reset = DateTime::from_timestamp(core.reset, 0)
            .ok_or_else(|| GitHubError::decode("rate limit", "reset timestamp out of range"))?;

        Ok(RateLimitStatus::new(
            core.limit,
            core.remaining,
            reset,
            response.authenticated,
        ))
    }

    /// Polls immediately and then every `interval` on a background task.
    ///
    /// Intervals shorter than [`MIN_POLL_INTERVAL`] are raised to it. The
    /// task stops when the returned poller is dropped.
    #[must_use]
    pub fn spawn_polling(&self, interval: Duration) -> RateLimitPoller {
        let (sender, receiver) = watch::channel(None);
        let monitor = self.clone();
        let period = polling_period(interval);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let status = monitor.current_status().await;
                debug!(
                    remaining = %status.remaining(),
                    limit = status.limit(),
                    "rate limit polled"
                );
                if sender.send(Some(status)).is_err() {
                    break;
                }
            }
        });

        RateLimitPoller { receiver, task }
    }
}

/// Handle to a background rate-limit poll loop.
pub struct RateLimitPoller {
    receiver: watch::Receiver<Option<RateLimitStatus>>,
    task: JoinHandle<()>,
}

impl RateLimitPoller {
    /// Most recent status, `None` before the first poll completes.
    #[must_use]
    pub fn latest(&self) -> Option<RateLimitStatus> {
        *self.receiver.borrow()
    }

    /// Waits for the next published status.
    ///
    /// Returns `None` if the poll loop has ended.
    pub async fn next_status(&mut self) -> Option<RateLimitStatus> {
        self.receiver.changed().await.ok()?;
        *self.receiver.borrow_and_update()
    }

    /// Stops polling.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for RateLimitPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn polling_period(interval: Duration) -> Duration {
    interval.max(MIN_POLL_INTERVAL)
}
