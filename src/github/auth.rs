//! Access token resolution for outbound GitHub requests.
//!
//! Tokens are never cached by the client. Every request asks its
//! [`TokenProvider`] for the current token, so a session that signs out or a
//! token that is revoked stops being used on the very next call. Anonymous
//! access is a normal state: providers return `None` rather than an error.

use std::env;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use super::error::GitHubError;

/// OAuth scopes requested by the external sign-in flow.
///
/// `repo` grants access to private repositories; the user scopes identify the
/// signed-in account.
pub const OAUTH_SCOPES: &str = "read:user user:email repo";

/// Bearer token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, GitHubError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(GitHubError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }

    /// Parses an optional raw value, treating blank input as "no token".
    #[must_use]
    pub fn from_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| Self::new(value).ok())
    }
}

impl AsRef<str> for AccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("AccessToken(***)")
    }
}

/// Resolves the bearer token to attach to the next request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns the current token, or `None` for anonymous access.
    async fn current_token(&self) -> Option<AccessToken>;
}

#[async_trait]
impl<P> TokenProvider for Arc<P>
where
    P: TokenProvider + ?Sized,
{
    async fn current_token(&self) -> Option<AccessToken> {
        self.as_ref().current_token().await
    }
}

/// Provider returning a fixed token chosen at start-up.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    token: Option<AccessToken>,
}

impl StaticTokenProvider {
    /// Creates a provider for the given token.
    #[must_use]
    pub const fn new(token: Option<AccessToken>) -> Self {
        Self { token }
    }

    /// Creates a provider that never supplies a token.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { token: None }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn current_token(&self) -> Option<AccessToken> {
        self.token.clone()
    }
}

/// Provider that reads an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    variable: String,
}

impl EnvTokenProvider {
    /// Creates a provider reading `variable`.
    #[must_use]
    pub fn new(variable: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
        }
    }

    /// Provider for the conventional `GITHUB_TOKEN` variable.
    #[must_use]
    pub fn github_token() -> Self {
        Self::new("GITHUB_TOKEN")
    }
}

#[async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn current_token(&self) -> Option<AccessToken> {
        let raw = env::var(&self.variable).ok();
        AccessToken::from_optional(raw.as_deref())
    }
}

/// Signed-in state handed over by the external OAuth collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Bearer token for the signed-in user, if any.
    pub access_token: Option<AccessToken>,
    /// Login of the signed-in user, if known.
    pub user_login: Option<String>,
}

/// Shared session store whose lifecycle belongs to the sign-in flow.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Session>>,
}

impl SessionStore {
    /// Creates an empty (signed-out) store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a signed-in session.
    pub fn sign_in(&self, token: AccessToken, user_login: Option<String>) {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *session = Session {
            access_token: Some(token),
            user_login,
        };
    }

    /// Clears the session.
    pub fn sign_out(&self) {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *session = Session::default();
    }

    /// Returns a copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Provider reading the token from a [`SessionStore`] at request time.
#[derive(Debug, Clone)]
pub struct SessionTokenProvider {
    store: SessionStore,
}

impl SessionTokenProvider {
    /// Wraps a shared session store.
    #[must_use]
    pub const fn new(store: SessionStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TokenProvider for SessionTokenProvider {
    async fn current_token(&self) -> Option<AccessToken> {
        self.store.snapshot().access_token
    }
}
