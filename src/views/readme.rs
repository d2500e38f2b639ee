//! README display with repository-relative images resolved to raw URLs.

use std::io::Write;
use std::ops::Range;

use pulldown_cmark::{Event, LinkType, Options, Parser, Tag};

use crate::github::error::GitHubError;
use crate::github::gateway::RepositoryGateway;
use crate::github::locator::RepositoryLocator;

use super::output::io_error;

/// Shown when the repository has no README.
pub const NO_README_MESSAGE: &str = "This repository has no README file.";

/// README content ready for a markdown renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadmeView {
    /// A decoded README.
    Document {
        /// File name, e.g. `README.md`.
        name: String,
        /// Markdown with image sources made absolute.
        markdown: String,
    },
    /// GitHub reported no README.
    Missing,
}

impl ReadmeView {
    /// Loads the README and resolves relative images against the default
    /// branch.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures other than a missing README.
    pub async fn load<G>(gateway: &G, locator: &RepositoryLocator) -> Result<Self, GitHubError>
    where
        G: RepositoryGateway + ?Sized,
    {
        let info = gateway.repository(locator).await?;
        let readme = match gateway.readme(locator).await {
            Ok(readme) => readme,
            Err(GitHubError::NotFound { .. }) => return Ok(Self::Missing),
            Err(error) => return Err(error),
        };

        let raw_base = locator.raw_content_base(&info.default_branch);
        Ok(Self::Document {
            name: readme.name,
            markdown: resolve_relative_images(&readme.text, &raw_base),
        })
    }

    /// Writes the README text.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::Io` when writing fails.
    pub fn render<W: Write>(&self, writer: &mut W) -> Result<(), GitHubError> {
        match self {
            Self::Document { name, markdown } => {
                writeln!(writer, "{name}").map_err(|e| io_error(&e))?;
                writeln!(writer, "{}", "-".repeat(name.chars().count()))
                    .map_err(|e| io_error(&e))?;
                writeln!(writer, "{markdown}").map_err(|e| io_error(&e))
            }
            Self::Missing => writeln!(writer, "{NO_README_MESSAGE}").map_err(|e| io_error(&e)),
        }
    }
}

/// Rewrites relative image sources in markdown images and inline `<img>`
/// tags so they point at `raw_base`.
///
/// The markdown is parsed, so code spans and code blocks are left as
/// written. Only the destination text changes; everything else is copied
/// through unchanged.
///
/// # Example
///
/// ```
/// use repolens::views::readme::resolve_relative_images;
///
/// let markdown = "![logo](docs/logo.png) ![badge](https://img.shields.io/x.svg)";
/// let resolved = resolve_relative_images(markdown, "https://github.com/o/r/raw/main");
/// assert_eq!(
///     resolved,
///     "![logo](https://github.com/o/r/raw/main/docs/logo.png) \
///      ![badge](https://img.shields.io/x.svg)"
/// );
/// ```
#[must_use]
pub fn resolve_relative_images(markdown: &str, raw_base: &str) -> String {
    let mut edits = Vec::new();
    for (event, span) in Parser::new_ext(markdown, markdown_options()).into_offset_iter() {
        let edit = match event {
            Event::Start(Tag::Image {
                link_type: LinkType::Inline,
                dest_url,
                ..
            }) => image_destination_edit(markdown, span, &dest_url, raw_base),
            Event::Html(_) | Event::InlineHtml(_) => html_edit(markdown, span, raw_base),
            _ => None,
        };
        edits.extend(edit);
    }
    apply_edits(markdown, edits)
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES
}

/// Locates `dest_url` inside the image's source text, right after the
/// opening `(` or `(<`.
fn image_destination_edit(
    markdown: &str,
    span: Range<usize>,
    dest_url: &str,
    raw_base: &str,
) -> Option<Edit> {
    let resolved = resolve_source(dest_url, raw_base);
    if resolved == dest_url {
        return None;
    }

    let image_start = span.start;
    let image = markdown.get(span)?;
    let offset = image
        .match_indices(dest_url)
        .map(|(index, _)| index)
        .find(|&index| {
            image.get(..index).is_some_and(|before| {
                let before_trimmed = before.trim_end();
                before_trimmed.ends_with('(') || before_trimmed.ends_with("(<")
            })
        })?;

    let start = image_start + offset;
    Some(Edit {
        range: start..start + dest_url.len(),
        replacement: resolved,
    })
}

fn html_edit(markdown: &str, span: Range<usize>, raw_base: &str) -> Option<Edit> {
    let html = markdown.get(span.clone())?;
    let resolved = resolve_html_images(html, raw_base);
    (resolved != html).then_some(Edit {
        range: span,
        replacement: resolved,
    })
}

/// A byte range of the source and the text replacing it.
struct Edit {
    range: Range<usize>,
    replacement: String,
}

fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| edit.range.start);

    let mut output = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in edits {
        // Overlaps only arise from images nested in alt text.
        let Some(kept) = source.get(cursor..edit.range.start) else {
            continue;
        };
        output.push_str(kept);
        output.push_str(&edit.replacement);
        cursor = edit.range.end;
    }
    output.push_str(source.get(cursor..).unwrap_or_default());
    output
}

fn resolve_html_images(html: &str, raw_base: &str) -> String {
    let mut output = String::with_capacity(html.len());
    let mut rest = html;

    while let Some((before, after_tag)) = rest.split_once("<img") {
        output.push_str(before);
        output.push_str("<img");

        let Some((attributes, after_src)) = after_tag.split_once("src=\"") else {
            rest = after_tag;
            continue;
        };
        if attributes.contains('>') {
            output.push_str(attributes);
            output.push_str("src=\"");
            rest = after_src;
            continue;
        }
        let Some((source, after_source)) = after_src.split_once('"') else {
            output.push_str(attributes);
            output.push_str("src=\"");
            rest = after_src;
            continue;
        };

        output.push_str(attributes);
        output.push_str("src=\"");
        output.push_str(&resolve_source(source, raw_base));
        output.push('"');
        rest = after_source;
    }

    output.push_str(rest);
    output
}

fn resolve_source(source: &str, raw_base: &str) -> String {
    let is_absolute = ["http://", "https://", "//", "data:", "#"]
        .iter()
        .any(|prefix| source.starts_with(prefix));
    if is_absolute || source.is_empty() {
        return source.to_owned();
    }

    let relative = source.trim_start_matches("./").trim_start_matches('/');
    format!("{}/{relative}", raw_base.trim_end_matches('/'))
}
