//! Bearer-authenticated access to the GitHub REST API.
//!
//! [`GitHubClient`] is deliberately thin: it resolves the current token,
//! attaches it as an `Authorization: Bearer` header when present, performs one
//! GET, and hands the status and body back. Status interpretation and JSON
//! decoding belong to the caller.

use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use http::{StatusCode, Uri};
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::auth::{AccessToken, TokenProvider};
use super::error::GitHubError;

/// Raw response returned by [`GitHubClient::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// Whether a bearer token was attached to the request.
    pub authenticated: bool,
    /// Response body as text.
    pub body: String,
}

impl ApiResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Decode` naming `operation` when the body does
    /// not match `T`.
    pub fn json<T: DeserializeOwned>(&self, operation: &str) -> Result<T, GitHubError> {
        serde_json::from_str(&self.body).map_err(|error| GitHubError::decode(operation, error))
    }

    /// Extracts GitHub's `message` field from an error body, if any.
    #[must_use]
    pub fn github_message(&self) -> Option<String> {
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&self.body) else {
            return None;
        };
        value
            .get("message")
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned)
    }
}

/// Issues GET requests against the GitHub API with a per-call bearer token.
pub struct GitHubClient<P> {
    octocrab: Octocrab,
    tokens: P,
}

impl<P> GitHubClient<P>
where
    P: TokenProvider,
{
    /// Builds a client for the given API base URL.
    ///
    /// The underlying Octocrab instance carries no credentials; tokens come
    /// from `tokens` on every request. Octocrab's own retry middleware is
    /// disabled, so each call is sent exactly once. Must be called inside a
    /// Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when the base URI cannot be parsed or
    /// `GitHubError::Api` when Octocrab fails to construct a client.
    pub fn new(api_base: &str, tokens: P) -> Result<Self, GitHubError> {
        let base_uri: Uri = api_base
            .parse::<Uri>()
            .map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;

        let octocrab = Octocrab::builder()
            .base_uri(base_uri)
            .map_err(|error| GitHubError::Api {
                message: format!("build client failed: {error}"),
            })?
            .add_retry_config(RetryConfig::None)
            .build()
            .map_err(|error| GitHubError::Api {
                message: format!("build client failed: {error}"),
            })?;

        Ok(Self { octocrab, tokens })
    }

    /// Borrow the token provider.
    pub const fn tokens(&self) -> &P {
        &self.tokens
    }

    /// Performs a GET for `path` (relative to the API base, query included).
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` for an unparseable path and
    /// `GitHubError::Network` when no response could be obtained. Non-2xx
    /// statuses are not errors.
    pub async fn request(&self, path: &str) -> Result<ApiResponse, GitHubError> {
        let uri: Uri = path
            .parse::<Uri>()
            .map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;

        let token = self.tokens.current_token().await;
        let headers = token.as_ref().map(bearer_headers).transpose()?;
        let authenticated = headers.is_some();

        let response = self
            .octocrab
            ._get_with_headers(uri, headers)
            .await
            .map_err(|error| GitHubError::Network {
                message: format!("GET {path} failed: {error}"),
            })?;

        let status = response.status();
        let body = self
            .octocrab
            .body_to_string(response)
            .await
            .map_err(|error| GitHubError::Network {
                message: format!("reading {path} response failed: {error}"),
            })?;

        debug!(path, status = status.as_u16(), authenticated, "GitHub request");

        Ok(ApiResponse {
            status,
            authenticated,
            body,
        })
    }
}

fn bearer_headers(token: &AccessToken) -> Result<HeaderMap, GitHubError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.value()))
        .map_err(|_| GitHubError::MissingToken)?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}
