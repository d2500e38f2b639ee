//! Mapping of non-success GitHub responses into [`GitHubError`] values.

use http::StatusCode;

use crate::github::client::ApiResponse;
use crate::github::error::GitHubError;

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks whether the response represents a rate limit error based on the
/// HTTP status and message content.
pub(super) fn is_rate_limit_error(status: StatusCode, message: Option<&str>) -> bool {
    let is_rate_limit_status = matches!(
        status,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit =
        message.is_some_and(|text| text.to_lowercase().contains("rate limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

/// Converts a non-success response into an error embedding the status.
pub(super) fn map_status_error(operation: &str, response: &ApiResponse) -> GitHubError {
    let github_message = response.github_message();
    let status = response.status;

    if is_rate_limit_error(status, github_message.as_deref()) {
        return GitHubError::RateLimitExceeded {
            message: format!(
                "{operation} failed with status {status}: {message}",
                message = github_message.unwrap_or_default()
            ),
        };
    }

    let message = github_message.unwrap_or_else(|| "unknown error".to_owned());
    if status == StatusCode::NOT_FOUND {
        GitHubError::NotFound {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    } else if is_auth_failure(status) {
        GitHubError::Authentication {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        }
    } else {
        GitHubError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}
