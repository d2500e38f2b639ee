//! View dispatch for the `repolens` binary.
//!
//! [`run`] wires the session-backed client, gateway, and rate-limit monitor
//! together; [`run_with`] takes them as parameters so tests can substitute
//! mock gateways.

use std::io::{self, Write};
use std::sync::Arc;

use chrono::Utc;
use repolens::github::{
    ApiRepositoryGateway, GITHUB_API_BASE, GitHubClient, GitHubError, RateLimitMonitor,
    RepositoryGateway, RepositoryLocator, SessionStore, SessionTokenProvider, TokenProvider,
};
use repolens::views::{
    BranchCommitsIntake, CompareView, LimitsView, ReadmeView, SearchView, StatisticsView,
    SummaryView,
};
use repolens::{RepolensConfig, ViewMode};
use tracing::{debug, info};

/// Renders the configured view to stdout.
///
/// # Errors
///
/// Returns [`GitHubError::Configuration`] for invalid settings and
/// propagates request, decoding, and output failures.
pub async fn run(config: &RepolensConfig) -> Result<(), GitHubError> {
    let view = config.view_mode()?;
    let api_base = api_base_for(config, view)?;

    let sessions = SessionStore::new();
    if let Some(token) = config.resolve_token() {
        sessions.sign_in(token, None);
    }
    let client = Arc::new(GitHubClient::new(
        &api_base,
        SessionTokenProvider::new(sessions),
    )?);
    let monitor = RateLimitMonitor::new(Arc::clone(&client));
    let gateway = ApiRepositoryGateway::new(client).with_stats_retry(config.stats_retry_policy());

    debug!(%view, api_base = %api_base, "dispatching view");
    let mut stdout = io::stdout().lock();
    run_with(config, &gateway, &monitor, &mut stdout).await
}

/// Renders the configured view using the given gateway and monitor.
///
/// # Errors
///
/// Returns [`GitHubError::Configuration`] for invalid settings and
/// propagates gateway and output failures.
pub async fn run_with<G, P, W>(
    config: &RepolensConfig,
    gateway: &G,
    monitor: &RateLimitMonitor<P>,
    writer: &mut W,
) -> Result<(), GitHubError>
where
    G: RepositoryGateway + ?Sized,
    P: TokenProvider + 'static,
    W: Write,
{
    match config.view_mode()? {
        ViewMode::Search => {
            SearchView::load(gateway, config.search_params()?)
                .await?
                .render(writer)
        }
        ViewMode::Limits => run_limits(config, monitor, writer).await,
        ViewMode::Summary => {
            SummaryView::load(gateway, &locate(config)?)
                .await?
                .render(writer)
        }
        ViewMode::Readme => {
            ReadmeView::load(gateway, &locate(config)?)
                .await?
                .render(writer)
        }
        ViewMode::Commits => {
            let intake = BranchCommitsIntake::new(gateway);
            match intake
                .load(&locate(config)?, config.branch.as_deref())
                .await?
            {
                Some(commits) => commits.render(writer),
                None => Ok(()),
            }
        }
        ViewMode::Compare => {
            let (base, head) = config.require_compare_branches()?;
            CompareView::load(gateway, &locate(config)?, base, head)
                .await?
                .render(writer)
        }
        ViewMode::Stats => {
            StatisticsView::load(gateway, &locate(config)?)
                .await?
                .render(writer)
        }
    }
}

fn locate(config: &RepolensConfig) -> Result<RepositoryLocator, GitHubError> {
    RepositoryLocator::parse(config.require_url()?)
}

async fn run_limits<P, W>(
    config: &RepolensConfig,
    monitor: &RateLimitMonitor<P>,
    writer: &mut W,
) -> Result<(), GitHubError>
where
    P: TokenProvider + 'static,
    W: Write,
{
    if !config.watch {
        return LimitsView::load(monitor).await.render(writer);
    }

    let interval = config.rate_limit_poll_interval()?;
    info!(seconds = interval.as_secs(), "watching rate limit");
    let mut poller = monitor.spawn_polling(interval);
    while let Some(status) = poller.next_status().await {
        LimitsView {
            status,
            observed_at: Utc::now(),
        }
        .render(writer)?;
        writer.flush().map_err(|error| GitHubError::Io {
            message: error.to_string(),
        })?;
    }
    Ok(())
}

/// API base for the configured repository, or github.com for searches and
/// limits without one.
fn api_base_for(config: &RepolensConfig, view: ViewMode) -> Result<String, GitHubError> {
    match (config.require_url(), view) {
        (Ok(url), _) => Ok(RepositoryLocator::parse(url)?
            .api_base()
            .as_str()
            .trim_end_matches('/')
            .to_owned()),
        (Err(_), ViewMode::Search | ViewMode::Limits) => Ok(GITHUB_API_BASE.to_owned()),
        (Err(error), _) => Err(error),
    }
}
