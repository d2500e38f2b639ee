//! Error types exposed by the GitHub access layer.

use thiserror::Error;

/// Errors surfaced while parsing input or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitHubError {
    /// No repository URL was configured for a view that needs one.
    #[error("repository URL is required")]
    MissingRepositoryUrl,

    /// The provided URL could not be parsed.
    #[error("repository URL is invalid: {0}")]
    InvalidUrl(String),

    /// The repository path is incomplete.
    #[error("repository URL must match github.com/<owner>/<repo>")]
    MissingPathSegments,

    /// The authentication token was blank.
    #[error("access token must not be blank")]
    MissingToken,

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401 response.
        message: String,
    },

    /// GitHub answered with a non-success status.
    #[error("GitHub API error: {message}")]
    Api {
        /// Operation, HTTP status, and GitHub's message.
        message: String,
    },

    /// The requested resource does not exist (HTTP 404).
    #[error("not found: {message}")]
    NotFound {
        /// Description of the missing resource.
        message: String,
    },

    /// Rate limit exceeded: GitHub returned 403/429 with a rate limit message.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A response body could not be decoded.
    #[error("could not decode {operation} response: {message}")]
    Decode {
        /// Operation whose payload failed to decode.
        operation: String,
        /// Decoder error detail.
        message: String,
    },

    /// Search parameters failed validation.
    #[error("invalid search: {message}")]
    InvalidSearch {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Branch comparison parameters failed validation.
    #[error("invalid comparison: {message}")]
    InvalidComparison {
        /// Description of the invalid parameter.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },
}

impl GitHubError {
    pub(crate) fn decode(operation: &str, error: impl std::fmt::Display) -> Self {
        Self::Decode {
            operation: operation.to_owned(),
            message: error.to_string(),
        }
    }
}
