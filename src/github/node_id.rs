//! Derivation of GitHub GraphQL global node identifiers.
//!
//! Legacy GitHub node ids are the base64 encoding of
//! `<version>:<Type><database id>`. The GraphQL API still resolves them, which
//! lets us address a user node without an extra lookup query.

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use super::user::RemoteUid;

const USER_NODE_PREFIX: &str = "04:User";

/// Opaque GitHub GraphQL node identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeId(String);

impl NodeId {
    /// Borrow the encoded identifier.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Encodes the GraphQL node identifier for the user with the given uid.
///
/// The standard engine never wraps lines, so the result carries no trailing
/// newline to strip.
#[must_use]
pub fn encode_user_node_id(uid: &RemoteUid) -> NodeId {
    let raw = format!("{USER_NODE_PREFIX}{uid}", uid = uid.as_str());
    NodeId(STANDARD.encode(raw))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{RemoteUid, encode_user_node_id};

    fn uid(value: &str) -> RemoteUid {
        RemoteUid::new(value).expect("uid should be valid")
    }

    #[rstest]
    #[case::alphanumeric("abc123", "MDQ6VXNlcmFiYzEyMw==")]
    #[case::numeric("583231", "MDQ6VXNlcjU4MzIzMQ==")]
    #[case::single_digit("1", "MDQ6VXNlcjE=")]
    fn encodes_prefixed_uid(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(encode_user_node_id(&uid(input)).as_str(), expected);
    }

    #[test]
    fn encoding_is_stable_across_calls() {
        let first = encode_user_node_id(&uid("abc123"));
        let second = encode_user_node_id(&uid("abc123"));
        assert_eq!(first, second, "encoding must be deterministic");
    }

    #[test]
    fn long_uids_are_not_line_wrapped() {
        let node_id = encode_user_node_id(&uid(&"9".repeat(120)));
        assert!(
            !node_id.as_str().contains('\n'),
            "node id must not contain line breaks: {node_id}"
        );
    }
}
