//! Input artifact description as reported by the metadata service.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::FileKind;

/// One entry of an artifact's file listing.
///
/// Older Qiita releases list bare paths, newer ones objects with a
/// `filepath` member and extra bookkeeping (size, checksum) that is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum FileEntry {
    Path(PathBuf),
    Detailed { filepath: PathBuf },
}

impl FileEntry {
    fn into_path(self) -> PathBuf {
        match self {
            Self::Path(path) | Self::Detailed { filepath: path } => path,
        }
    }
}

fn deserialize_files<'de, D>(deserializer: D) -> Result<IndexMap<String, Vec<PathBuf>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: IndexMap<String, Vec<FileEntry>> = IndexMap::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(kind, entries)| (kind, entries.into_iter().map(FileEntry::into_path).collect()))
        .collect())
}

/// Provenance and file listing of an input artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Name recorded by the command that produced the artifact.
    pub name: String,
    /// Artifact type (e.g. `BIOM`); informational only.
    #[serde(rename = "type", default)]
    pub artifact_type: Option<String>,
    /// File paths grouped by file kind (`biom`, `preprocessed_fasta`, ...).
    #[serde(default, deserialize_with = "deserialize_files")]
    pub files: IndexMap<String, Vec<PathBuf>>,
}

impl ArtifactRecord {
    /// First file of the given kind, if any.
    pub fn first_file(&self, kind: FileKind) -> Option<&Path> {
        self.files
            .get(kind.as_str())
            .and_then(|paths| paths.first())
            .map(PathBuf::as_path)
    }
}
