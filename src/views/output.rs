//! Shared text output helpers for the views.

use std::io;

use chrono::{DateTime, Utc};

use crate::github::error::GitHubError;

/// Converts an I/O error to a [`GitHubError::Io`].
pub(crate) fn io_error(error: &io::Error) -> GitHubError {
    GitHubError::Io {
        message: error.to_string(),
    }
}

/// Horizontal bar proportional to `value / max`, at most `width` cells.
pub(crate) fn bar(value: u64, max: u64, width: u64) -> String {
    let cells = value.saturating_mul(width).checked_div(max).unwrap_or(0);
    let filled = usize::try_from(cells.min(width)).unwrap_or(0);
    if filled == 0 && value > 0 {
        return "▏".to_owned();
    }
    "█".repeat(filled)
}

/// `YYYY-MM-DD`, or `unknown` when absent.
pub(crate) fn short_date(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp.map_or_else(
        || "unknown".to_owned(),
        |value| value.format("%Y-%m-%d").to_string(),
    )
}
