//! Tests for user identity wrappers.

use rstest::rstest;

use crate::github::{ApiBase, PersonalAccessToken, RemoteUid, RetrievalError};

#[rstest]
#[case::empty("")]
#[case::whitespace("   ")]
fn rejects_blank_uid(#[case] value: &str) {
    assert_eq!(RemoteUid::new(value), Err(RetrievalError::MissingUid));
}

#[rstest]
fn trims_uid() {
    let uid = RemoteUid::new(" 583231\n").expect("uid should be valid");
    assert_eq!(uid.as_str(), "583231");
}

#[rstest]
fn rejects_empty_token() {
    let result = PersonalAccessToken::new(String::new());
    assert!(
        matches!(result, Err(RetrievalError::MissingToken)),
        "expected MissingToken, got {result:?}"
    );
}

#[rstest]
fn token_debug_output_is_redacted() {
    let token = PersonalAccessToken::new("ghp_secret").expect("token should be valid");
    assert!(!format!("{token:?}").contains("ghp_secret"));
}

#[rstest]
#[case::public("https://api.github.com", "https://api.github.com")]
#[case::public_trailing_slash("https://api.github.com/", "https://api.github.com")]
#[case::enterprise("https://ghe.example.com/api/v3", "https://ghe.example.com/api")]
#[case::enterprise_trailing_slash("https://ghe.example.com/api/v3/", "https://ghe.example.com/api")]
#[case::local("http://127.0.0.1:8080", "http://127.0.0.1:8080")]
fn derives_graphql_root(#[case] base: &str, #[case] expected: &str) {
    let api_base = ApiBase::parse(base).expect("base should parse");
    assert_eq!(api_base.graphql_root(), expected);
}

#[rstest]
#[case::relative("api.github.com")]
#[case::unsupported_scheme("ftp://api.github.com")]
fn rejects_invalid_api_base(#[case] base: &str) {
    let result = ApiBase::parse(base);
    assert!(
        matches!(result, Err(RetrievalError::InvalidApiBase(_))),
        "expected InvalidApiBase, got {result:?}"
    );
}
