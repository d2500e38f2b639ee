//! Repolens library crate providing a GitHub repository dashboard core.
//!
//! The library wraps Octocrab to fetch repository data with the signed-in
//! user's token attached to each request, watches the API rate limit, and
//! aggregates commits, languages, and contributor statistics into chart-ready
//! series that the views render as text.

pub mod config;
pub mod github;
pub mod stats;
pub mod views;

pub use config::{RepolensConfig, ViewMode};
pub use github::{
    AccessToken, ApiRepositoryGateway, GitHubClient, GitHubError, RateLimitMonitor,
    RateLimitStatus, RepositoryGateway, RepositoryLocator, SessionStore, SessionTokenProvider,
};
