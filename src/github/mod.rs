//! GitHub REST access for the dashboard.
//!
//! This module wraps Octocrab to attach the signed-in user's token to each
//! request, parse repository URLs, poll the rate limit, and load repository
//! data. Errors are mapped into user-facing variants so callers can surface
//! precise failures without exposing Octocrab internals.

pub mod auth;
pub mod client;
pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod rate_limit;
pub mod search;
pub mod sequence;

pub use auth::{
    AccessToken, EnvTokenProvider, Session, SessionStore, SessionTokenProvider,
    StaticTokenProvider, TokenProvider,
};
pub use client::{ApiResponse, GitHubClient};
pub use error::GitHubError;
pub use gateway::{ApiRepositoryGateway, RepositoryGateway, StatsRetryPolicy};
pub use locator::{GITHUB_API_BASE, RepositoryLocator, RepositoryName, RepositoryOwner};
pub use models::{
    Branch, ChangedFile, CommitRecord, Comparison, ContributorStats, LanguageBytes, Readme,
    RepositoryInfo, SearchResults, WeeklyActivity,
};
pub use rate_limit::{RateLimitMonitor, RateLimitPoller, RateLimitStatus, Remaining};
pub use search::{SearchParams, SearchSort, SortOrder};
pub use sequence::{RequestSequencer, RequestTicket};

#[cfg(test)]
pub use auth::MockTokenProvider;
#[cfg(test)]
pub use gateway::MockRepositoryGateway;
