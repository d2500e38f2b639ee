//! Repository URL parsing and the REST paths derived from it.

use url::Url;

use super::error::GitHubError;

/// Public github.com API endpoint.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Number of commits requested per commit listing.
pub const COMMITS_PER_PAGE: u8 = 100;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, GitHubError> {
        if value.is_empty() {
            return Err(GitHubError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Accepts a repository segment, dropping a trailing `.git`.
    pub(crate) fn new(value: &str) -> Result<Self, GitHubError> {
        let trimmed = value.strip_suffix(".git").unwrap_or(value);
        if trimmed.is_empty() {
            return Err(GitHubError::MissingPathSegments);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Derives the GitHub API base URL from a host string.
fn derive_api_base_from_host(
    scheme: &str,
    host: &str,
    port: Option<u16>,
) -> Result<Url, GitHubError> {
    if host.eq_ignore_ascii_case("github.com") || host.eq_ignore_ascii_case("www.github.com") {
        Url::parse(GITHUB_API_BASE).map_err(|error| GitHubError::InvalidUrl(error.to_string()))
    } else {
        let authority = if host.contains(':') {
            format!("[{host}]")
        } else {
            host.to_owned()
        };
        let mut api_url = Url::parse(&format!("{scheme}://{authority}"))
            .map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;

        api_url
            .set_port(port)
            .map_err(|()| GitHubError::InvalidUrl("invalid port".to_owned()))?;
        api_url.set_path("api/v3");
        Ok(api_url)
    }
}

/// Adds a scheme to inputs such as `github.com/owner/repo`.
fn with_scheme(input: &str) -> String {
    if input.contains("://") {
        input.to_owned()
    } else {
        format!("https://{input}")
    }
}

/// Parsed repository URL with derived API base.
///
/// # Example
///
/// ```
/// use repolens::github::locator::RepositoryLocator;
///
/// let locator = RepositoryLocator::parse("https://github.com/vercel/next.js")
///     .expect("should parse repository URL");
/// assert_eq!(locator.owner().as_str(), "vercel");
/// assert_eq!(locator.repository().as_str(), "next.js");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryLocator {
    api_base: Url,
    owner: RepositoryOwner,
    repository: RepositoryName,
}

impl RepositoryLocator {
    /// Creates a repository locator from owner and repository name strings.
    ///
    /// Uses `api.github.com` as the API base.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::MissingPathSegments` when owner or repo is empty.
    pub fn from_owner_repo(owner: &str, repo: &str) -> Result<Self, GitHubError> {
        let validated_owner = RepositoryOwner::new(owner)?;
        let repository = RepositoryName::new(repo)?;
        let api_base = Url::parse(GITHUB_API_BASE)
            .map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;

        Ok(Self {
            api_base,
            owner: validated_owner,
            repository,
        })
    }

    /// Parses a repository URL such as `https://github.com/<owner>/<repo>`.
    ///
    /// The scheme may be omitted, a trailing `.git` is dropped, and extra path
    /// segments (`/tree/main`, `/pulls`) are ignored. Hosts other than
    /// github.com are treated as GitHub Enterprise with an `/api/v3` base.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when parsing fails or
    /// `MissingPathSegments` when the path lacks owner and repository.
    pub fn parse(input: &str) -> Result<Self, GitHubError> {
        let trimmed = input.trim();
        let parsed = Url::parse(&with_scheme(trimmed))
            .map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;

        let mut segments = parsed
            .path_segments()
            .ok_or(GitHubError::MissingPathSegments)?;

        let owner_segment = segments.next().ok_or(GitHubError::MissingPathSegments)?;
        let repository_segment = segments.next().ok_or(GitHubError::MissingPathSegments)?;

        let owner = RepositoryOwner::new(owner_segment)?;
        let repository = RepositoryName::new(repository_segment)?;

        let host = parsed
            .host_str()
            .ok_or_else(|| GitHubError::InvalidUrl("URL must include a host".to_owned()))?;
        let api_base = derive_api_base_from_host(parsed.scheme(), host, parsed.port())?;

        Ok(Self {
            api_base,
            owner,
            repository,
        })
    }

    /// Returns a copy pointing at a different API base.
    ///
    /// Used when the configuration overrides the API endpoint.
    #[must_use]
    pub fn with_api_base(mut self, api_base: Url) -> Self {
        self.api_base = api_base;
        self
    }

    /// API base URL derived from the repository host.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// `owner/repo` display form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner.as_str(), self.repository.as_str())
    }

    pub(crate) fn repository_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }

    pub(crate) fn branches_path(&self) -> String {
        format!("{}/branches", self.repository_path())
    }

    pub(crate) fn languages_path(&self) -> String {
        format!("{}/languages", self.repository_path())
    }

    pub(crate) fn commits_path(&self, branch: Option<&str>) -> String {
        let base = self.repository_path();
        match branch {
            Some(sha) => format!(
                "{base}/commits?sha={}&per_page={COMMITS_PER_PAGE}",
                encode_component(sha)
            ),
            None => format!("{base}/commits?per_page={COMMITS_PER_PAGE}"),
        }
    }

    pub(crate) fn compare_path(&self, base: &str, head: &str) -> String {
        format!(
            "{}/compare/{}...{}",
            self.repository_path(),
            encode_component(base),
            encode_component(head)
        )
    }

    pub(crate) fn readme_path(&self) -> String {
        format!("{}/readme", self.repository_path())
    }

    pub(crate) fn contributor_stats_path(&self) -> String {
        format!("{}/stats/contributors", self.repository_path())
    }

    /// Base URL that relative README links resolve against.
    #[must_use]
    pub fn raw_content_base(&self, default_branch: &str) -> String {
        format!(
            "https://github.com/{}/{}/raw/{default_branch}",
            self.owner.as_str(),
            self.repository.as_str()
        )
    }
}

/// Percent-encodes a value for use in a path or query component.
///
/// Slashes in branch names are kept; GitHub accepts them unescaped.
pub(crate) fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace("%2F", "/")
}
