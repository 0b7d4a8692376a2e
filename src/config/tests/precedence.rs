//! Layer precedence tests.

use rstest::rstest;
use serde_json::json;

use super::helpers::{Layer, merge_layers};

#[rstest]
#[case::file_overrides_defaults(Layer::Defaults, Layer::File)]
#[case::environment_overrides_file(Layer::File, Layer::Environment)]
#[case::cli_overrides_environment(Layer::Environment, Layer::Cli)]
fn later_layer_wins_for_uid(#[case] lower: Layer, #[case] higher: Layer) {
    let config = merge_layers(&[
        (lower, json!({"uid": "lower-uid"})),
        (higher, json!({"uid": "higher-uid"})),
    ]);

    assert_eq!(
        config.uid.as_deref(),
        Some("higher-uid"),
        "{higher:?} should override {lower:?}"
    );
}

#[rstest]
fn numeric_user_id_merges_from_file() {
    let config = merge_layers(&[
        (Layer::Defaults, json!({"user_id": 1})),
        (Layer::File, json!({"user_id": 17, "database_url": "cache.sqlite"})),
    ]);

    assert_eq!(config.user_id, Some(17));
    assert_eq!(config.database_url.as_deref(), Some("cache.sqlite"));
}

#[rstest]
fn unset_layers_keep_lower_values() {
    let config = merge_layers(&[
        (Layer::Defaults, json!({"token": "default-token", "uid": "default-uid"})),
        (Layer::Cli, json!({"uid": "cli-uid"})),
    ]);

    assert_eq!(config.token.as_deref(), Some("default-token"));
    assert_eq!(config.uid.as_deref(), Some("cli-uid"));
    assert!(!config.migrate_db, "migrate_db should default to false");
}
