//! Static plugin registration record.
//!
//! The orchestrator learns about the plugin, its command, its parameters,
//! and the artifact type it produces from this record. It is plain
//! configuration: the job receives a `&'static PluginManifest` instead of
//! consulting process-wide registration state.

use crate::FileKind;

/// Parameter keys as the orchestrator names them.
pub mod param_keys {
    pub const ARTIFACT: &str = "deblur BIOM table";
    pub const SERVER_URL: &str = "dbBact server URL";
    pub const API_URL: &str = "dbBact api URL";
    pub const MIN_OCCURRENCE: &str = "Minimum ASV sample occurence in feature-table";
    pub const WIDTH: &str = "Wordcloud width";
    pub const HEIGHT: &str = "Wordcloud height";
    pub const BACKGROUND: &str = "Wordcloud background color";
    pub const RELATIVE_SCALING: &str = "Wordcloud relative scaling";
}

/// One file of the output artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFile {
    /// File name inside the job's output directory.
    pub name: &'static str,
    pub kind: FileKind,
}

/// Description of the plugin and its single command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginManifest {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub command: &'static str,
    /// Name of the output slot the result artifact is attached to.
    pub output_name: &'static str,
    /// Artifact type of the result.
    pub artifact_type: &'static str,
    /// Provenance names of artifacts the command accepts.
    pub accepted_provenance: &'static [&'static str],
    /// Result files in the order they are reported.
    pub outputs: OutputLayout,
}

/// The four result files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLayout {
    pub raster: OutputFile,
    pub vector: OutputFile,
    pub scores: OutputFile,
    pub stats: OutputFile,
}

impl OutputLayout {
    /// Files in reporting order: raster, vector, scores, stats.
    pub fn in_order(&self) -> [OutputFile; 4] {
        [self.raster, self.vector, self.scores, self.stats]
    }
}

impl PluginManifest {
    /// Returns `true` if artifacts produced by `name` may be processed.
    pub fn accepts_provenance(&self, name: &str) -> bool {
        self.accepted_provenance.contains(&name)
    }
}

/// The dbBact wordcloud plugin.
pub static DBBACT_PLUGIN: PluginManifest = PluginManifest {
    name: "dbBact",
    version: "2024.03",
    description: "Achieving pan-microbiome biological insights",
    command: "Wordcloud from ASV sequences",
    output_name: "dbBact wordcloud",
    artifact_type: "WordCloud",
    accepted_provenance: &["deblur final table", "deblur reference hit table"],
    outputs: OutputLayout {
        raster: OutputFile {
            name: "wordcloud.png",
            kind: FileKind::ImageBitmap,
        },
        vector: OutputFile {
            name: "wordcloud.svg",
            kind: FileKind::ImageVector,
        },
        scores: OutputFile {
            name: "fscores.tsv",
            kind: FileKind::TabularText,
        },
        stats: OutputFile {
            name: "stats.tsv",
            kind: FileKind::Log,
        },
    },
};
