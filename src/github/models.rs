//! Pull request value objects and the typed GraphQL response schema.
//!
//! The `Api*` types mirror the JSON GitHub returns for
//! [`PULL_REQUEST_QUERY`](super::query::PULL_REQUEST_QUERY). Every field is
//! optional at this layer so that the mapper, rather than serde, decides what
//! is required and can report the exact path of anything missing.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::error::{MappingError, RetrievalError};

const NODES_PATH: &str = "data.node.pullRequests.nodes";

/// A pull request authored by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// GitHub global node id of the pull request.
    pub id: String,
    /// Title of the pull request.
    pub title: String,
    /// Markdown body; empty when the author left no description.
    pub body: String,
    /// HTML URL for displaying to a user.
    pub url: String,
    /// When the pull request was opened.
    pub created_at: DateTime<Utc>,
    /// Database id of the target repository, absent if it was deleted.
    pub repository_id: Option<i64>,
    /// Label names in the order GitHub returned them.
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiResponse {
    pub(crate) data: Option<ApiData>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiData {
    pub(crate) node: Option<ApiUserNode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiUserNode {
    pub(crate) pull_requests: Option<ApiPullRequestConnection>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiPullRequestConnection {
    pub(crate) nodes: Option<Vec<Option<ApiPullRequestNode>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPullRequestNode {
    pub(crate) id: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) body: Option<String>,
    pub(crate) url: Option<String>,
    pub(crate) created_at: Option<String>,
    pub(crate) repository: Option<ApiRepository>,
    pub(crate) labels: Option<ApiLabelConnection>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiRepository {
    pub(crate) database_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLabelConnection {
    pub(crate) edges: Option<Vec<Option<ApiLabelEdge>>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLabelEdge {
    pub(crate) node: Option<ApiLabel>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLabel {
    pub(crate) name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    errors: Option<Vec<ApiGraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct ApiGraphQlError {
    message: Option<String>,
}

/// Rejects responses carrying a GraphQL `errors` payload.
///
/// GitHub reports unresolvable node ids, permission problems and query
/// complexity failures this way with an HTTP 200 status.
///
/// # Errors
///
/// Returns [`RetrievalError::Api`] listing every error message when the
/// payload is non-empty.
pub fn ensure_no_graphql_errors(response: &Value) -> Result<(), RetrievalError> {
    let Ok(envelope) = ApiErrorEnvelope::deserialize(response) else {
        return Ok(());
    };
    let errors = envelope.errors.unwrap_or_default();
    if errors.is_empty() {
        return Ok(());
    }

    let messages: Vec<&str> = errors
        .iter()
        .map(|error| error.message.as_deref().unwrap_or("unknown GraphQL error"))
        .collect();
    Err(RetrievalError::Api {
        message: format!("GraphQL query failed: {}", messages.join("; ")),
    })
}

/// Maps a raw pull request query response to value objects, preserving the
/// order of `data.node.pullRequests.nodes`.
///
/// # Errors
///
/// Returns [`MappingError`] when the response does not follow the query's
/// schema or a node lacks a required field.
pub fn pull_requests_from_response(response: &Value) -> Result<Vec<PullRequest>, MappingError> {
    let api = ApiResponse::deserialize(response).map_err(|error| MappingError::Schema {
        message: error.to_string(),
    })?;

    let nodes = api
        .data
        .ok_or_else(|| missing("data"))?
        .node
        .ok_or_else(|| missing("data.node"))?
        .pull_requests
        .ok_or_else(|| missing("data.node.pullRequests"))?
        .nodes
        .ok_or_else(|| missing(NODES_PATH))?;

    nodes
        .into_iter()
        .enumerate()
        .map(|(index, node)| {
            let path = format!("{NODES_PATH}[{index}]");
            let present = node.ok_or_else(|| missing(&path))?;
            PullRequest::try_from_node(&path, present)
        })
        .collect()
}

impl PullRequest {
    /// Builds a pull request from one raw node found at `path`.
    pub(crate) fn try_from_node(
        path: &str,
        node: ApiPullRequestNode,
    ) -> Result<Self, MappingError> {
        let field = |name: &str| format!("{path}.{name}");

        let created_at_raw = node.created_at.ok_or_else(|| missing(&field("createdAt")))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_raw)
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .map_err(|_| MappingError::InvalidTimestamp {
                path: field("createdAt"),
                value: created_at_raw.clone(),
            })?;

        Ok(Self {
            id: node.id.ok_or_else(|| missing(&field("id")))?,
            title: node.title.ok_or_else(|| missing(&field("title")))?,
            body: node.body.ok_or_else(|| missing(&field("body")))?,
            url: node.url.ok_or_else(|| missing(&field("url")))?,
            created_at,
            repository_id: node.repository.and_then(|repository| repository.database_id),
            labels: label_names(&field("labels"), node.labels)?,
        })
    }
}

fn label_names(
    path: &str,
    labels: Option<ApiLabelConnection>,
) -> Result<Vec<String>, MappingError> {
    let edges = labels.and_then(|connection| connection.edges).unwrap_or_default();

    edges
        .into_iter()
        .enumerate()
        .map(|(index, edge)| {
            let edge_path = format!("{path}.edges[{index}]");
            edge.ok_or_else(|| missing(&edge_path))?
                .node
                .ok_or_else(|| missing(&format!("{edge_path}.node")))?
                .name
                .ok_or_else(|| missing(&format!("{edge_path}.node.name")))
        })
        .collect()
}

fn missing(path: &str) -> MappingError {
    MappingError::MissingField {
        path: path.to_owned(),
    }
}
