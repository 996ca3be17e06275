//! What a run hands back to the orchestrator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::WordcloudError;

/// File type tag understood by the orchestrator's artifact-type schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// PNG image.
    ImageBitmap,
    /// SVG image.
    ImageVector,
    /// Tab-separated table.
    TabularText,
    /// Tab-separated run log.
    Log,
    /// Feature table in BIOM format (input artifacts only).
    Biom,
}

impl FileKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ImageBitmap => "image_bitmap",
            Self::ImageVector => "image_vector",
            Self::TabularText => "tabular_text",
            Self::Log => "log",
            Self::Biom => "biom",
        }
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A result artifact: named output slot, type, and tagged files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactInfo {
    pub output_name: String,
    pub artifact_type: String,
    pub files: Vec<(PathBuf, FileKind)>,
}

/// `(success, artifacts, message)` reported for every run.
///
/// A failed run carries no artifacts and the error's message; a successful
/// run carries its artifacts and an empty message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub success: bool,
    pub artifacts: Option<Vec<ArtifactInfo>>,
    pub message: String,
}

impl JobOutcome {
    pub fn succeeded(artifacts: Vec<ArtifactInfo>) -> Self {
        Self {
            success: true,
            artifacts: Some(artifacts),
            message: String::new(),
        }
    }

    pub fn failed(error: &WordcloudError) -> Self {
        Self {
            success: false,
            artifacts: None,
            message: error.to_string(),
        }
    }
}
