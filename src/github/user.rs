//! Identity wrappers for the application user whose pull requests are loaded.

use std::fmt;

use url::Url;

use super::error::RetrievalError;

/// Local application identifier of a user.
///
/// This is the identifier owned by the application, not by GitHub. It scopes
/// the shared cache entry so two users can never read each other's response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalUserId(u64);

impl LocalUserId {
    /// Wraps a local user identifier.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LocalUserId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// GitHub's unique identifier for the user (the REST `id` field).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUid(String);

impl RemoteUid {
    /// Validates that the uid is non-blank and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::MissingUid`] when the supplied string is
    /// blank.
    pub fn new(uid: impl AsRef<str>) -> Result<Self, RetrievalError> {
        let trimmed = uid.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RetrievalError::MissingUid);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the uid value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::MissingToken`] when the supplied string is
    /// blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, RetrievalError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RetrievalError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(<redacted>)")
    }
}

/// The application user on whose behalf pull requests are retrieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: LocalUserId,
    uid: RemoteUid,
    token: PersonalAccessToken,
}

impl User {
    /// Assembles a user from its validated parts.
    #[must_use]
    pub const fn new(id: LocalUserId, uid: RemoteUid, token: PersonalAccessToken) -> Self {
        Self { id, uid, token }
    }

    /// Local application identifier.
    #[must_use]
    pub const fn id(&self) -> LocalUserId {
        self.id
    }

    /// GitHub uid used to derive the GraphQL node identifier.
    #[must_use]
    pub const fn uid(&self) -> &RemoteUid {
        &self.uid
    }

    /// Current provider access token.
    #[must_use]
    pub const fn token(&self) -> &PersonalAccessToken {
        &self.token
    }
}

/// Base URL of the GitHub REST API the GraphQL endpoint hangs off.
///
/// `https://api.github.com` serves GraphQL at `/graphql`. GitHub Enterprise
/// hosts serve REST at `/api/v3` and GraphQL at `/api/graphql`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(Url);

impl ApiBase {
    /// Parses an API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::InvalidApiBase`] when the value is not an
    /// absolute HTTP(S) URL.
    pub fn parse(value: &str) -> Result<Self, RetrievalError> {
        let url = Url::parse(value.trim())
            .map_err(|error| RetrievalError::InvalidApiBase(error.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RetrievalError::InvalidApiBase(format!(
                "unsupported scheme `{}`",
                url.scheme()
            )));
        }
        Ok(Self(url))
    }

    /// Returns the root URL whose `/graphql` path is the GraphQL endpoint.
    ///
    /// Enterprise REST bases ending in `/v3` are trimmed so that the endpoint
    /// resolves to `/api/graphql`.
    #[must_use]
    pub fn graphql_root(&self) -> String {
        let base = self.0.as_str().trim_end_matches('/');
        base.strip_suffix("/v3").unwrap_or(base).to_owned()
    }
}

/// Public GitHub REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
