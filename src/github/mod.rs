//! Retrieval of a user's GitHub pull requests over GraphQL.
//!
//! The flow is: derive the user's global node id, look the raw response up in
//! the shared cache (running the GraphQL query on a miss), then map every node
//! of `data.node.pullRequests.nodes` into a [`PullRequest`]. Errors are mapped
//! into user-friendly variants so callers never see Octocrab internals.

pub mod error;
pub mod executor;
pub mod models;
pub mod node_id;
pub mod query;
pub mod service;
pub mod user;

pub use error::{MappingError, RetrievalError};
pub use executor::{OctocrabQueryExecutor, QueryExecutor};
pub use models::{PullRequest, ensure_no_graphql_errors, pull_requests_from_response};
pub use node_id::{NodeId, encode_user_node_id};
pub use query::{PULL_REQUEST_QUERY, PullRequestQueryVariables};
pub use service::{PullRequestService, RESPONSE_TTL, cache_key};
pub use user::{ApiBase, DEFAULT_API_BASE, LocalUserId, PersonalAccessToken, RemoteUid, User};

#[cfg(test)]
pub use executor::MockQueryExecutor;

#[cfg(test)]
mod tests;
