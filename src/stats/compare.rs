//! Classification of branch comparisons and diff lines.

use crate::github::models::Comparison;

/// Relationship of the head branch to the base branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompareSummary {
    /// Both refs point at the same history.
    Identical,
    /// Head has commits the base lacks.
    Ahead {
        /// Commits only on head.
        ahead_by: u64,
    },
    /// Base has commits the head lacks.
    Behind {
        /// Commits only on base.
        behind_by: u64,
    },
    /// Both sides have unique commits.
    Diverged {
        /// Commits only on head.
        ahead_by: u64,
        /// Commits only on base.
        behind_by: u64,
    },
    /// A status GitHub reported that is not recognised.
    Unknown {
        /// Raw status string.
        status: String,
    },
}

impl CompareSummary {
    /// Classifies the upstream `status` field.
    #[must_use]
    pub fn from_comparison(comparison: &Comparison) -> Self {
        match comparison.status.as_str() {
            "identical" => Self::Identical,
            "ahead" => Self::Ahead {
                ahead_by: comparison.ahead_by,
            },
            "behind" => Self::Behind {
                behind_by: comparison.behind_by,
            },
            "diverged" => Self::Diverged {
                ahead_by: comparison.ahead_by,
                behind_by: comparison.behind_by,
            },
            other => Self::Unknown {
                status: other.to_owned(),
            },
        }
    }

    /// User-facing description naming the `head` branch.
    #[must_use]
    pub fn message(&self, head: &str) -> String {
        match self {
            Self::Identical => "The branches are identical".to_owned(),
            Self::Ahead { ahead_by } => format!("{head} is ahead by {ahead_by} commits"),
            Self::Behind { behind_by } => format!("{head} is behind by {behind_by} commits"),
            Self::Diverged {
                ahead_by,
                behind_by,
            } => format!(
                "The branches have diverged ({head} is ahead by {ahead_by} commits and behind by \
                 {behind_by} commits)"
            ),
            Self::Unknown { status } => status.clone(),
        }
    }
}

/// Role of a line inside a unified diff hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffLineKind {
    /// Line starting with `+`.
    Addition,
    /// Line starting with `-`.
    Deletion,
    /// Anything else, including hunk headers.
    Context,
}

impl DiffLineKind {
    /// Classifies one patch line by its first character.
    #[must_use]
    pub fn classify(line: &str) -> Self {
        if line.starts_with('+') {
            Self::Addition
        } else if line.starts_with('-') {
            Self::Deletion
        } else {
            Self::Context
        }
    }
}

/// Splits a patch into classified lines.
pub fn classify_patch(patch: &str) -> impl Iterator<Item = (DiffLineKind, &str)> {
    patch
        .lines()
        .map(|line| (DiffLineKind::classify(line), line))
}
