//! Shared runtime and mock-server helpers for the behavioural tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use repolens::github::{GitHubClient, SessionStore, SessionTokenProvider};
use repolens::{GitHubError, RepositoryLocator};
use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::{Mock, MockServer};

/// Shared runtime wrapper that can be stored in an `rstest-bdd` Slot.
#[derive(Clone)]
pub struct SharedRuntime(Rc<RefCell<Runtime>>);

impl SharedRuntime {
    pub fn new(runtime: Runtime) -> Self {
        Self(Rc::new(RefCell::new(runtime)))
    }

    pub fn block_on<F: std::future::Future>(&self, future: F) -> F::Output {
        self.0.borrow().block_on(future)
    }

    /// Builds a session-backed client for the mock server's API base.
    ///
    /// # Errors
    ///
    /// Returns an error when the client cannot be constructed.
    pub fn client_for(
        &self,
        locator: &RepositoryLocator,
        sessions: SessionStore,
    ) -> Result<Arc<GitHubClient<SessionTokenProvider>>, GitHubError> {
        let runtime = self.0.borrow();
        let _guard = runtime.enter();
        GitHubClient::new(
            locator.api_base().as_str(),
            SessionTokenProvider::new(sessions),
        )
        .map(Arc::new)
    }
}

/// Ensures a Tokio runtime and Wiremock server are initialised.
///
/// # Errors
///
/// Returns an error if the Tokio runtime cannot be created or if the slots
/// behave unexpectedly.
pub fn ensure_runtime_and_server(
    runtime: &Slot<SharedRuntime>,
    server: &Slot<MockServer>,
) -> Result<SharedRuntime, GitHubError> {
    if runtime.with_ref(|_| ()).is_none() {
        let created = Runtime::new().map_err(|error| GitHubError::Io {
            message: format!("failed to create Tokio runtime: {error}"),
        })?;
        runtime.set(SharedRuntime::new(created));
    }

    let shared_runtime = runtime.get().ok_or_else(|| GitHubError::Api {
        message: "runtime not initialised after set".to_owned(),
    })?;

    if server.with_ref(|_| ()).is_none() {
        server.set(shared_runtime.block_on(MockServer::start()));
    }

    Ok(shared_runtime)
}

/// Mounts `mock` on the scenario's server.
///
/// # Errors
///
/// Returns an error when the server has not been started.
pub fn mount(
    runtime: &SharedRuntime,
    server: &Slot<MockServer>,
    mock: Mock,
) -> Result<(), GitHubError> {
    server
        .with_ref(|started| runtime.block_on(mock.mount(started)))
        .ok_or_else(|| GitHubError::Api {
            message: "mock server not initialised".to_owned(),
        })
}

/// Locator for `owner/repo` hosted on the mock server.
///
/// # Errors
///
/// Returns an error when the server has not been started.
pub fn mock_locator(server: &Slot<MockServer>) -> Result<RepositoryLocator, GitHubError> {
    let server_url = server
        .with_ref(MockServer::uri)
        .ok_or_else(|| GitHubError::InvalidUrl("mock server URL missing".to_owned()))?;
    RepositoryLocator::parse(&format!("{server_url}/owner/repo"))
}

/// Requests the mock server received, in arrival order.
///
/// # Panics
///
/// Panics when the server is missing or request recording is disabled.
pub fn received_requests(
    runtime: &SharedRuntime,
    server: &Slot<MockServer>,
) -> Vec<wiremock::Request> {
    server
        .with_ref(|started| runtime.block_on(started.received_requests()))
        .flatten()
        .unwrap_or_else(|| panic!("mock server should record requests"))
}
