//! Error types exposed by the pull request retrieval layer.

use thiserror::Error;

use crate::cache::CacheError;

/// Errors raised while turning a raw GraphQL node into a [`PullRequest`].
///
/// Every variant carries the JSON path of the offending value so callers can
/// tell which node in the response was malformed.
///
/// [`PullRequest`]: super::models::PullRequest
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MappingError {
    /// A required field was absent or `null`.
    #[error("response is missing required field `{path}`")]
    MissingField {
        /// JSON path of the missing field.
        path: String,
    },

    /// A timestamp could not be parsed as RFC 3339.
    #[error("response field `{path}` is not a valid timestamp: {value}")]
    InvalidTimestamp {
        /// JSON path of the timestamp field.
        path: String,
        /// The raw value GitHub returned.
        value: String,
    },

    /// The response body did not match the expected schema at all.
    #[error("response does not match the pull request schema: {message}")]
    Schema {
        /// Decoder error detail.
        message: String,
    },
}

/// Errors surfaced while retrieving pull requests for a user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RetrievalError {
    /// The user has no GitHub uid to derive a node identifier from.
    #[error("GitHub uid is required")]
    MissingUid,

    /// The access token was missing or blank.
    #[error("personal access token is required")]
    MissingToken,

    /// The configured API base URL could not be parsed.
    #[error("GitHub API base URL is invalid: {0}")]
    InvalidApiBase(String),

    /// The access token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// GitHub returned a non-authentication error, or a GraphQL `errors`
    /// payload.
    #[error("GitHub API error: {message}")]
    Api {
        /// Failure detail from GitHub.
        message: String,
    },

    /// GitHub refused the request because the rate limit was exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Error message from GitHub.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// The response could not be mapped to pull requests.
    #[error(transparent)]
    Mapping(#[from] MappingError),

    /// The response cache failed in a way that could not be bypassed.
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Configuration could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },
}
