//! Unit tests for the GitHub pull request retrieval module.
//!
//! - `mapper`: raw node to value object mapping
//! - `service`: memoization, caching and failure handling
//! - `user`: identity wrapper validation

mod user;

use serde_json::{Value, json};

/// Wraps raw pull request nodes in the full GraphQL response envelope.
pub(super) fn response_with_nodes(nodes: Value) -> Value {
    json!({ "data": { "node": { "pullRequests": { "nodes": nodes } } } })
}

/// A well-formed node with one label.
pub(super) fn bug_fix_node() -> Value {
    json!({
        "id": "PR_1",
        "title": "Fix bug",
        "body": "",
        "url": "https://x/1",
        "createdAt": "2024-01-01T00:00:00Z",
        "repository": { "databaseId": 42 },
        "labels": { "edges": [{ "node": { "name": "bug" } }] }
    })
}

/// A well-formed node with the given id and no labels.
pub(super) fn plain_node(id: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Change {id}"),
        "body": "Details",
        "url": format!("https://github.com/octo/repo/pull/{id}"),
        "createdAt": "2024-03-05T12:30:00+02:00",
        "repository": { "databaseId": 7 },
        "labels": { "edges": [] }
    })
}
