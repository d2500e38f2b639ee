//! Statistics dashboard: languages, activity, contributors, and profile.

use std::io::Write;

use chrono::{Local, TimeZone};
use tracing::warn;

use crate::github::error::GitHubError;
use crate::github::gateway::RepositoryGateway;
use crate::github::locator::RepositoryLocator;
use crate::github::models::RepositoryInfo;
use crate::stats::{
    ContributorPoint, DEFAULT_CONTRIBUTOR_CAP, DEFAULT_MOVING_AVERAGE_RADIUS, DailyBucket,
    LanguageShare, MonthlyBucket, RadarMetric, contributor_bubble_points,
    daily_commit_histogram_in, language_breakdown, language_shares, monthly_commit_histogram_in,
    moving_average, radar_profile,
};

use super::output::{bar, io_error};

const BAR_WIDTH: u64 = 30;

/// Everything the statistics page plots.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsView {
    /// Repository metadata.
    pub info: RepositoryInfo,
    /// Branches on the first page of `/branches`.
    pub branch_count: usize,
    /// Commits analysed (the latest page).
    pub commit_count: usize,
    /// Top languages for the chart.
    pub languages: Vec<LanguageShare>,
    /// Every language for the detail table.
    pub language_table: Vec<LanguageShare>,
    /// Commits per day over the observed range.
    pub daily: Vec<DailyBucket>,
    /// Moving average of `daily`.
    pub daily_trend: Vec<f64>,
    /// Commits per month.
    pub monthly: Vec<MonthlyBucket>,
    /// Contributor bubbles, or why they could not be loaded.
    ///
    /// An empty list means GitHub had no statistics to report, either
    /// because the repository has none or because they are still being
    /// computed.
    pub contributors: Result<Vec<ContributorPoint>, String>,
    /// Normalised repository profile.
    pub radar: Vec<RadarMetric>,
}

impl StatisticsView {
    /// Loads and aggregates statistics using the local calendar.
    ///
    /// # Errors
    ///
    /// Propagates the first gateway failure other than contributor
    /// statistics, which are reported inside the view.
    pub async fn load<G>(gateway: &G, locator: &RepositoryLocator) -> Result<Self, GitHubError>
    where
        G: RepositoryGateway + ?Sized,
    {
        Self::load_in(gateway, locator, &Local).await
    }

    /// Loads and aggregates statistics, bucketing days in `zone`.
    ///
    /// # Errors
    ///
    /// Propagates the first gateway failure other than contributor
    /// statistics, which are reported inside the view.
    pub async fn load_in<G, Tz>(
        gateway: &G,
        locator: &RepositoryLocator,
        zone: &Tz,
    ) -> Result<Self, GitHubError>
    where
        G: RepositoryGateway + ?Sized,
        Tz: TimeZone + Sync,
        Tz::Offset: std::fmt::Display,
    {
        let info = gateway.repository(locator).await?;
        let branches = gateway.branches(locator).await?;
        let languages = gateway.languages(locator).await?;
        let commits = gateway.commits(locator).await?;
        let contributors = gateway
            .contributor_stats(locator)
            .await
            .map(|stats| contributor_bubble_points(&stats, DEFAULT_CONTRIBUTOR_CAP))
            .map_err(|error| {
                warn!(%error, "contributor statistics unavailable");
                error.to_string()
            });

        let daily = daily_commit_histogram_in(&commits, zone);
        let counts: Vec<u32> = daily.iter().map(|bucket| bucket.count).collect();

        Ok(Self {
            radar: radar_profile(&info, branches.len(), languages.len()),
            info,
            branch_count: branches.len(),
            commit_count: commits.len(),
            languages: language_shares(&languages),
            language_table: language_breakdown(&languages),
            daily_trend: moving_average(&counts, DEFAULT_MOVING_AVERAGE_RADIUS),
            daily,
            monthly: monthly_commit_histogram_in(&commits, zone),
            contributors,
        })
    }

    /// Writes every section as text charts.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Io` when writing fails.
    pub fn render<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        self.write_overview(writer)?;
        self.write_languages(writer)?;
        self.write_activity(writer)?;
        self.write_contributors(writer)?;
        self.write_radar(writer)
    }

    fn write_overview<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        writeln!(writer, "Statistics for {}", self.info.full_name).map_err(|e| io_error(&e))?;
        writeln!(
            writer,
            "Stars: {}  Forks: {}  Watchers: {}  Open issues: {}  Branches: {}  Commits analysed: {}",
            self.info.stargazers_count,
            self.info.forks_count,
            self.info.watchers_count,
            self.info.open_issues_count,
            self.branch_count,
            self.commit_count
        )
        .map_err(|e| io_error(&e))
    }

    fn write_languages<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        writeln!(writer).map_err(|e| io_error(&e))?;
        writeln!(writer, "Languages").map_err(|e| io_error(&e))?;
        if self.languages.is_empty() {
            return writeln!(writer, "  no language data").map_err(|e| io_error(&e));
        }
        let largest = self.languages.first().map_or(0, |share| share.bytes);
        for share in &self.languages {
            writeln!(
                writer,
                "  {:<16} {:>5.1}% {}",
                share.name,
                share.percentage,
                bar(share.bytes, largest, BAR_WIDTH)
            )
            .map_err(|e| io_error(&e))?;
        }

        writeln!(writer, "  {:<16} {:>10} {:>7}", "Language", "KB", "%")
            .map_err(|e| io_error(&e))?;
        for share in &self.language_table {
            writeln!(
                writer,
                "  {:<16} {:>10.2} {:>6.1}%",
                share.name,
                share.kilobytes(),
                share.percentage
            )
            .map_err(|e| io_error(&e))?;
        }
        Ok(())
    }

    fn write_activity<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        writeln!(writer).map_err(|e| io_error(&e))?;
        writeln!(
            writer,
            "Daily activity (moving average over ±{DEFAULT_MOVING_AVERAGE_RADIUS} days)"
        )
        .map_err(|e| io_error(&e))?;
        if self.daily.is_empty() {
            writeln!(writer, "  no commits").map_err(|e| io_error(&e))?;
        }
        let busiest = self
            .daily
            .iter()
            .map(|bucket| u64::from(bucket.count))
            .max()
            .unwrap_or(0);
        for (bucket, trend) in self.daily.iter().zip(&self.daily_trend) {
            writeln!(
                writer,
                "  {} {:>3} {:>6.2} {}",
                bucket.day,
                bucket.count,
                trend,
                bar(u64::from(bucket.count), busiest, BAR_WIDTH)
            )
            .map_err(|e| io_error(&e))?;
        }

        writeln!(writer).map_err(|e| io_error(&e))?;
        writeln!(writer, "Monthly activity").map_err(|e| io_error(&e))?;
        let busiest_month = self
            .monthly
            .iter()
            .map(|bucket| u64::from(bucket.count))
            .max()
            .unwrap_or(0);
        for bucket in &self.monthly {
            writeln!(
                writer,
                "  {} {:>4} {}",
                bucket.month,
                bucket.count,
                bar(u64::from(bucket.count), busiest_month, BAR_WIDTH)
            )
            .map_err(|e| io_error(&e))?;
        }
        Ok(())
    }

    fn write_contributors<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        writeln!(writer).map_err(|e| io_error(&e))?;
        writeln!(writer, "Contributors").map_err(|e| io_error(&e))?;
        let points = match &self.contributors {
            Ok(points) => points,
            Err(reason) => {
                return writeln!(writer, "  could not load contributors: {reason}")
                    .map_err(|e| io_error(&e));
            }
        };
        if points.is_empty() {
            return writeln!(
                writer,
                "  no contributor statistics available; GitHub may still be computing them"
            )
            .map_err(|e| io_error(&e));
        }
        for point in points {
            let first_week = point
                .first_active_week
                .map_or_else(|| "never".to_owned(), |week| format!("week {week}"));
            writeln!(
                writer,
                "  {:<20} {:>5} commits  first active {first_week}  {} active weeks  +{} -{}  r={:.1}",
                point.login,
                point.total_commits,
                point.active_week_count,
                point.additions,
                point.deletions,
                point.radius
            )
            .map_err(|e| io_error(&e))?;
        }
        Ok(())
    }

    fn write_radar<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        writeln!(writer).map_err(|e| io_error(&e))?;
        writeln!(writer, "Profile").map_err(|e| io_error(&e))?;
        for metric in &self.radar {
            writeln!(
                writer,
                "  {:<10} {:>5.1} ({} of {})",
                metric.label, metric.score, metric.value, metric.scale
            )
            .map_err(|e| io_error(&e))?;
        }
        Ok(())
    }
}
