//! Repository search results.

use std::io::Write;

use crate::github::error::GitHubError;
use crate::github::gateway::RepositoryGateway;
use crate::github::models::SearchResults;
use crate::github::search::SearchParams;

use super::output::{io_error, short_date};

/// One page of search results with the parameters that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    /// Parameters of the search.
    pub params: SearchParams,
    /// Returned page.
    pub results: SearchResults,
}

impl SearchView {
    /// Runs the search.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidSearch` for invalid parameters and
    /// propagates gateway failures.
    pub async fn load<G>(gateway: &G, params: SearchParams) -> Result<Self, GitHubError>
    where
        G: RepositoryGateway + ?Sized,
    {
        params.validate()?;
        let results = gateway.search_repositories(&params).await?;
        Ok(Self { params, results })
    }

    /// Writes the result list and paging hints.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Io` when writing fails.
    pub fn render<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        writeln!(
            writer,
            "{} repositories match \"{}\" (sorted by {} {})",
            self.results.total_count,
            self.params.qualified_query(),
            self.params.sort,
            self.params.order.as_str()
        )
        .map_err(|e| io_error(&e))?;

        if self.results.items.is_empty() {
            return writeln!(writer, "No repositories found.").map_err(|e| io_error(&e));
        }

        for item in &self.results.items {
            writeln!(
                writer,
                "  {:<40} ★ {:<7} forks {:<6} {:<12} updated {}",
                item.full_name,
                item.stargazers_count,
                item.forks_count,
                item.language.as_deref().unwrap_or("-"),
                short_date(item.updated_at)
            )
            .map_err(|e| io_error(&e))?;
            if let Some(description) = item.description.as_deref().filter(|text| !text.is_empty()) {
                writeln!(writer, "      {description}").map_err(|e| io_error(&e))?;
            }
        }

        writeln!(writer).map_err(|e| io_error(&e))?;
        writeln!(writer, "Page {}", self.results.page).map_err(|e| io_error(&e))?;
        if self.results.has_next_page {
            writeln!(
                writer,
                "More results available (--page {}).",
                self.results.page.saturating_add(1)
            )
            .map_err(|e| io_error(&e))?;
        }
        Ok(())
    }
}
