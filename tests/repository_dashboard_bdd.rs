//! Behavioural tests for loading dashboard data through the API gateway.

mod support;

use std::time::Duration;

use repolens::github::{ContributorStats, SessionStore, SessionTokenProvider, StatsRetryPolicy};
use repolens::views::{CompareView, SummaryView};
use repolens::{
    AccessToken, ApiRepositoryGateway, GitHubError, RepositoryGateway, RepositoryLocator,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::json;
use support::{
    SharedRuntime, ensure_runtime_and_server, mock_locator, mount, received_requests,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPO_PATH: &str = "/api/v3/repos/owner/repo";

#[derive(ScenarioState, Default)]
struct DashboardState {
    runtime: Slot<SharedRuntime>,
    server: Slot<MockServer>,
    sessions: Slot<SessionStore>,
    summary: Slot<SummaryView>,
    contributors: Slot<Vec<ContributorStats>>,
    error: Slot<GitHubError>,
}

#[fixture]
fn dashboard_state() -> DashboardState {
    DashboardState::default()
}

impl DashboardState {
    fn ensure_server(&self) -> Result<SharedRuntime, GitHubError> {
        ensure_runtime_and_server(&self.runtime, &self.server)
    }

    fn record<T>(&self, result: Result<T, GitHubError>, slot: &Slot<T>) {
        match result {
            Ok(value) => {
                drop(self.error.take());
                slot.set(value);
            }
            Err(error) => {
                drop(slot.take());
                self.error.set(error);
            }
        }
    }

    /// Builds a gateway whose requests use the scenario's session.
    fn gateway(
        &self,
    ) -> Result<
        (
            SharedRuntime,
            ApiRepositoryGateway<SessionTokenProvider>,
            RepositoryLocator,
        ),
        GitHubError,
    > {
        let runtime = self.ensure_server()?;
        let locator = mock_locator(&self.server)?;
        let sessions = self.sessions.get().unwrap_or_default();
        let client = runtime.client_for(&locator, sessions)?;
        let gateway = ApiRepositoryGateway::new(client)
            .with_stats_retry(StatsRetryPolicy::once_after(Duration::from_millis(1)));
        Ok((runtime, gateway, locator))
    }
}

#[given("a mock GitHub API server hosting owner/repo with {count:usize} branches")]
fn seed_repository(dashboard_state: &DashboardState, count: usize) -> Result<(), GitHubError> {
    let runtime = dashboard_state.ensure_server()?;

    let branches: Vec<_> = (0..count)
        .map(|index| json!({ "name": format!("branch-{index}"), "commit": { "sha": "abc" } }))
        .collect();
    let mocks = [
        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "repo",
                "full_name": "owner/repo",
                "default_branch": "main",
                "stargazers_count": 7
            }))),
        Mock::given(method("GET"))
            .and(path(format!("{REPO_PATH}/branches")))
            .respond_with(ResponseTemplate::new(200).set_body_json(&branches)),
        Mock::given(method("GET"))
            .and(path(format!("{REPO_PATH}/languages")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Rust": 2048 }))),
    ];

    for mock in mocks {
        mount(&runtime, &dashboard_state.server, mock)?;
    }
    Ok(())
}

#[given("a mock GitHub API server computing contributor statistics for owner/repo")]
fn seed_pending_statistics(dashboard_state: &DashboardState) -> Result<(), GitHubError> {
    let runtime = dashboard_state.ensure_server()?;
    let stats_path = format!("{REPO_PATH}/stats/contributors");

    mount(
        &runtime,
        &dashboard_state.server,
        Mock::given(method("GET"))
            .and(path(stats_path.as_str()))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({})))
            .up_to_n_times(1),
    )?;
    mount(
        &runtime,
        &dashboard_state.server,
        Mock::given(method("GET"))
            .and(path(stats_path.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "author": { "login": "mona" }, "total": 3, "weeks": [{ "w": 0, "c": 3, "a": 30, "d": 3 }] },
                { "author": { "login": "hubot" }, "total": 1, "weeks": [{ "w": 0, "c": 1, "a": 5, "d": 0 }] }
            ]))),
    )
}

#[given("a mock GitHub API server whose rate limit is exhausted")]
fn seed_exhausted_rate_limit(dashboard_state: &DashboardState) -> Result<(), GitHubError> {
    let runtime = dashboard_state.ensure_server()?;

    mount(
        &runtime,
        &dashboard_state.server,
        Mock::given(method("GET"))
            .and(path(REPO_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "API rate limit exceeded for 127.0.0.1.",
                "documentation_url": "https://docs.github.com/rest/rate-limit"
            }))),
    )
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a signed-in session with token {token}")]
fn sign_in(dashboard_state: &DashboardState, token: String) -> Result<(), GitHubError> {
    let sessions = SessionStore::new();
    sessions.sign_in(AccessToken::new(&token)?, Some("octocat".to_owned()));
    dashboard_state.sessions.set(sessions);
    Ok(())
}

#[when("the visitor loads the summary")]
fn load_summary(dashboard_state: &DashboardState) -> Result<(), GitHubError> {
    let (runtime, gateway, locator) = dashboard_state.gateway()?;
    let result = runtime.block_on(SummaryView::load(&gateway, &locator));
    dashboard_state.record(result, &dashboard_state.summary);
    Ok(())
}

#[when("the visitor loads contributor statistics")]
fn load_contributors(dashboard_state: &DashboardState) -> Result<(), GitHubError> {
    let (runtime, gateway, locator) = dashboard_state.gateway()?;
    let result = runtime.block_on(gateway.contributor_stats(&locator));
    dashboard_state.record(result, &dashboard_state.contributors);
    Ok(())
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[when("the visitor compares {base} with {head}")]
fn compare_branches(
    dashboard_state: &DashboardState,
    base: String,
    head: String,
) -> Result<(), GitHubError> {
    let (runtime, gateway, locator) = dashboard_state.gateway()?;
    let result = runtime.block_on(CompareView::load(&gateway, &locator, &base, &head));
    if let Err(error) = result {
        dashboard_state.error.set(error);
    }
    Ok(())
}

#[then("the summary shows {count:usize} branches")]
fn assert_branch_count(dashboard_state: &DashboardState, count: usize) {
    let actual = dashboard_state
        .summary
        .with_ref(|summary| summary.branch_count)
        .unwrap_or_else(|| panic!("summary missing"));

    assert_eq!(actual, count, "branch count mismatch");
}

#[then("no request carried an Authorization header")]
fn assert_anonymous_requests(dashboard_state: &DashboardState) {
    let runtime = dashboard_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime missing"));
    let requests = received_requests(&runtime, &dashboard_state.server);

    assert!(!requests.is_empty(), "expected requests to reach the server");
    assert!(
        requests
            .iter()
            .all(|request| !request.headers.contains_key("authorization")),
        "anonymous requests must not send Authorization"
    );
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("every request carried the bearer token {token}")]
fn assert_bearer_requests(dashboard_state: &DashboardState, token: String) {
    let runtime = dashboard_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime missing"));
    let requests = received_requests(&runtime, &dashboard_state.server);
    let expected = format!("Bearer {token}");

    assert!(!requests.is_empty(), "expected requests to reach the server");
    for request in &requests {
        let header = request
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok());
        assert_eq!(header, Some(expected.as_str()), "unexpected Authorization header");
    }
}

#[then("{count:usize} contributors are returned")]
fn assert_contributor_count(dashboard_state: &DashboardState, count: usize) {
    let actual = dashboard_state
        .contributors
        .with_ref(Vec::len)
        .unwrap_or_else(|| panic!("contributor statistics missing"));

    assert_eq!(actual, count, "contributor count mismatch");
}

#[then("the server received {count:usize} requests")]
fn assert_request_count(dashboard_state: &DashboardState, count: usize) {
    let runtime = dashboard_state
        .runtime
        .get()
        .unwrap_or_else(|| panic!("runtime missing"));

    assert_eq!(
        received_requests(&runtime, &dashboard_state.server).len(),
        count,
        "request count mismatch"
    );
}

#[then("the error indicates an invalid comparison")]
fn assert_invalid_comparison(dashboard_state: &DashboardState) {
    let error = dashboard_state
        .error
        .with_ref(Clone::clone)
        .unwrap_or_else(|| panic!("expected comparison error"));

    assert!(
        matches!(error, GitHubError::InvalidComparison { .. }),
        "expected InvalidComparison, got {error:?}"
    );
}

#[then("the error indicates rate limit exceeded")]
fn assert_rate_limit_error(dashboard_state: &DashboardState) {
    let error = dashboard_state
        .error
        .with_ref(Clone::clone)
        .unwrap_or_else(|| panic!("expected rate limit error"));

    assert!(
        matches!(error, GitHubError::RateLimitExceeded { .. }),
        "expected RateLimitExceeded, got {error:?}"
    );
}

#[scenario(path = "tests/features/repository_dashboard.feature", index = 0)]
fn anonymous_summary(dashboard_state: DashboardState) {
    let _ = dashboard_state;
}

#[scenario(path = "tests/features/repository_dashboard.feature", index = 1)]
fn signed_in_summary(dashboard_state: DashboardState) {
    let _ = dashboard_state;
}

#[scenario(path = "tests/features/repository_dashboard.feature", index = 2)]
fn contributor_statistics_retry(dashboard_state: DashboardState) {
    let _ = dashboard_state;
}

#[scenario(path = "tests/features/repository_dashboard.feature", index = 3)]
fn same_branch_comparison(dashboard_state: DashboardState) {
    let _ = dashboard_state;
}

#[scenario(path = "tests/features/repository_dashboard.feature", index = 4)]
fn exhausted_rate_limit(dashboard_state: DashboardState) {
    let _ = dashboard_state;
}
