//! Registration record printed by the `manifest` subcommand.
//!
//! Qiita needs the command, its parameters with types and defaults, and the
//! output artifact before it can schedule jobs for the plugin.

use pipeline::{manifest::param_keys, PluginManifest, WordcloudParameters};
use serde_json::{json, Value};

/// Registration JSON for `manifest`, with defaults taken from `defaults`.
pub fn registration(manifest: &PluginManifest, defaults: &WordcloudParameters) -> Value {
    let outputs: Vec<Value> = manifest
        .outputs
        .in_order()
        .iter()
        .map(|file| json!({ "name": file.name, "kind": file.kind.as_str() }))
        .collect();

    json!({
        "name": manifest.name,
        "version": manifest.version,
        "description": manifest.description,
        "command": {
            "name": manifest.command,
            "required_parameters": {
                (param_keys::ARTIFACT): ["artifact", ["BIOM"]],
            },
            "optional_parameters": {
                (param_keys::SERVER_URL): ["string", defaults.server_url.as_str()],
                (param_keys::API_URL): ["string", defaults.api_url.as_str()],
                (param_keys::MIN_OCCURRENCE): ["float", defaults.min_occurrence.as_f64().to_string()],
                (param_keys::WIDTH): ["integer", defaults.width.to_string()],
                (param_keys::HEIGHT): ["integer", defaults.height.to_string()],
                (param_keys::BACKGROUND): ["string", defaults.background.as_str()],
                (param_keys::RELATIVE_SCALING): ["float", defaults.relative_scaling.as_f64().to_string()],
            },
            "accepted_provenance": manifest.accepted_provenance,
            "outputs": {
                (manifest.output_name): {
                    "artifact_type": manifest.artifact_type,
                    "files": outputs,
                },
            },
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::DBBACT_PLUGIN;
    use pretty_assertions::assert_eq;

    #[test]
    fn registration_lists_parameters_and_outputs() {
        let value = registration(&DBBACT_PLUGIN, &WordcloudParameters::default());
        let command = &value["command"];

        assert_eq!(value["name"], "dbBact");
        assert_eq!(command["name"], "Wordcloud from ASV sequences");
        assert_eq!(
            command["optional_parameters"]["Wordcloud width"],
            json!(["integer", "400"])
        );
        assert_eq!(
            command["optional_parameters"]["dbBact server URL"],
            json!(["string", "http://dbbact.org"])
        );
        assert_eq!(
            command["outputs"]["dbBact wordcloud"]["files"][3],
            json!({ "name": "stats.tsv", "kind": "log" })
        );
        assert_eq!(command["optional_parameters"].as_object().unwrap().len(), 7);
    }
}
