//! Dashboard views.
//!
//! Each view loads what it needs through a
//! [`RepositoryGateway`](crate::github::gateway::RepositoryGateway), shapes it
//! with [`stats`](crate::stats), and renders plain text to any writer. Loading
//! and rendering are separate so view models can be tested without I/O.

pub mod branch_commits;
pub mod compare;
pub mod limits;
mod output;
pub mod readme;
pub mod search;
pub mod statistics;
pub mod summary;

pub use branch_commits::{BranchCommitsIntake, BranchCommitsView};
pub use compare::{CompareView, PatchLineCounts};
pub use limits::LimitsView;
pub use readme::{NO_README_MESSAGE, ReadmeView, resolve_relative_images};
pub use search::SearchView;
pub use statistics::StatisticsView;
pub use summary::SummaryView;
