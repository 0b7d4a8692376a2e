//! Layer composition helpers for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::PullscopeConfig;

/// Configuration source, listed from lowest to highest precedence.
#[derive(Debug, Clone, Copy)]
pub enum Layer {
    Defaults,
    File,
    Environment,
    Cli,
}

/// Merges `layers` in the given order into a [`PullscopeConfig`].
pub fn merge_layers(layers: &[(Layer, Value)]) -> PullscopeConfig {
    let mut composer = MergeComposer::new();

    for (layer, value) in layers.iter().cloned() {
        match layer {
            Layer::Defaults => composer.push_defaults(value),
            Layer::File => composer.push_file(value, None),
            Layer::Environment => composer.push_environment(value),
            Layer::Cli => composer.push_cli(value),
        }
    }

    PullscopeConfig::merge_from_layers(composer.layers()).expect("merge should succeed")
}
