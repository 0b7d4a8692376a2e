//! The GraphQL document used to load a user's pull requests.

use serde_json::{Value, json};

use super::node_id::NodeId;

/// Loads the most recent 100 pull requests (open, merged and closed) authored
/// by the user node bound to `$nodeId`, with up to 100 labels each.
pub const PULL_REQUEST_QUERY: &str = r"query($nodeId:ID!){
  node(id:$nodeId) {
    ... on User {
      pullRequests(states: [OPEN, MERGED, CLOSED] last: 100) {
        nodes {
          id
          title
          body
          url
          createdAt
          repository{
            databaseId
          }
          labels(first: 100) {
            edges {
              node {
                name
              }
            }
          }
        }
      }
    }
  }
}
";

/// Variables bound into [`PULL_REQUEST_QUERY`].
#[derive(Debug, Clone, Copy)]
pub struct PullRequestQueryVariables<'a> {
    /// Global node id of the user.
    pub node_id: &'a str,
}

impl<'a> PullRequestQueryVariables<'a> {
    /// Binds the query to the given user node.
    #[must_use]
    pub const fn for_node(node_id: &'a NodeId) -> Self {
        Self {
            node_id: node_id.as_str(),
        }
    }

    /// Renders the variables as the JSON object sent alongside the query.
    #[must_use]
    pub fn to_value(self) -> Value {
        json!({ "nodeId": self.node_id })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{PULL_REQUEST_QUERY, PullRequestQueryVariables};
    use crate::github::node_id::encode_user_node_id;
    use crate::github::user::RemoteUid;

    #[test]
    fn variables_bind_node_id() {
        let uid = RemoteUid::new("abc123").expect("uid should be valid");
        let node_id = encode_user_node_id(&uid);
        let variables = PullRequestQueryVariables::for_node(&node_id);

        assert_eq!(variables.to_value(), json!({ "nodeId": "MDQ6VXNlcmFiYzEyMw==" }));
    }

    #[test]
    fn query_requests_expected_shape() {
        for fragment in [
            "query($nodeId:ID!)",
            "node(id:$nodeId)",
            "... on User",
            "pullRequests(states: [OPEN, MERGED, CLOSED] last: 100)",
            "createdAt",
            "databaseId",
            "labels(first: 100)",
        ] {
            assert!(
                PULL_REQUEST_QUERY.contains(fragment),
                "query should contain `{fragment}`"
            );
        }
    }
}
