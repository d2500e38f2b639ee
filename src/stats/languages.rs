//! Language share computation for the language chart and detail table.

use crate::github::models::LanguageBytes;

/// Maximum entries shown in the language chart.
///
/// Languages beyond the cap are dropped, not merged into an "other" slice.
pub const DEFAULT_LANGUAGE_CAP: usize = 10;

/// One language's share of the repository's source bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageShare {
    /// Language name as reported by GitHub.
    pub name: String,
    /// Bytes of source in this language.
    pub bytes: u64,
    /// Percentage of all source bytes, in `[0, 100]`.
    pub percentage: f64,
}

impl LanguageShare {
    /// Size in kibibytes for display.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "display value tolerates rounding"
    )]
    #[must_use]
    pub const fn kilobytes(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

/// Top languages by bytes, capped at [`DEFAULT_LANGUAGE_CAP`].
///
/// Percentages are relative to the total over every language, so the capped
/// list may sum to less than 100.
///
/// # Example
///
/// ```
/// use repolens::github::models::LanguageBytes;
/// use repolens::stats::language_shares;
///
/// let languages = LanguageBytes::from([("Rust".to_owned(), 800), ("Shell".to_owned(), 200)]);
/// let shares = language_shares(&languages);
/// assert_eq!(shares.first().map(|share| share.name.as_str()), Some("Rust"));
/// assert_eq!(shares.first().map(|share| share.percentage), Some(80.0));
/// ```
#[must_use]
pub fn language_shares(languages: &LanguageBytes) -> Vec<LanguageShare> {
    let mut shares = language_breakdown(languages);
    shares.truncate(DEFAULT_LANGUAGE_CAP);
    shares
}

/// Every language with its share, sorted descending by bytes.
///
/// Ties are ordered by name so the output is deterministic.
#[must_use]
pub fn language_breakdown(languages: &LanguageBytes) -> Vec<LanguageShare> {
    let total: u64 = languages.values().copied().fold(0, u64::saturating_add);

    let mut shares: Vec<LanguageShare> = languages
        .iter()
        .map(|(name, &bytes)| LanguageShare {
            name: name.clone(),
            bytes,
            percentage: percentage_of(bytes, total),
        })
        .collect();
    shares.sort_by(|left, right| {
        right
            .bytes
            .cmp(&left.bytes)
            .then_with(|| left.name.cmp(&right.name))
    });
    shares
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "percentages are fractional"
)]
const fn percentage_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}
