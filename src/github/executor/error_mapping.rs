//! Translation of Octocrab failures into retrieval errors.

use http::StatusCode;

use crate::github::error::RetrievalError;

/// Checks if a GitHub error status indicates an authentication failure.
const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the GitHub error represents a rate limit error based on the
/// HTTP status and message / documentation URL content.
fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> RetrievalError {
    match error {
        octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
            RetrievalError::RateLimitExceeded {
                message: format!("{operation} failed: {message}", message = source.message),
            }
        }
        octocrab::Error::GitHub { source, .. } if is_auth_failure(source.status_code) => {
            RetrievalError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        }
        octocrab::Error::GitHub { source, .. } => RetrievalError::Api {
            message: format!(
                "{operation} failed with status {status}: {message}",
                status = source.status_code,
                message = source.message
            ),
        },
        _ if is_network_error(error) => RetrievalError::Network {
            message: format!("{operation} failed: {error}"),
        },
        _ => RetrievalError::Api {
            message: format!("{operation} failed: {error}"),
        },
    }
}
