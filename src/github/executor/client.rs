//! Octocrab client construction for GraphQL executors.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::RetrievalError;
use crate::github::user::{ApiBase, PersonalAccessToken};

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client authenticated with `token` whose `/graphql`
/// route resolves to the GraphQL endpoint of `api_base`.
///
/// # Errors
///
/// Returns `RetrievalError::InvalidApiBase` when the base URI cannot be parsed
/// or `RetrievalError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    api_base: &ApiBase,
) -> Result<Octocrab, RetrievalError> {
    let base_uri: Uri = api_base
        .graphql_root()
        .parse::<Uri>()
        .map_err(|error| RetrievalError::InvalidApiBase(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| RetrievalError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
