//! Artifact descriptions read from a local JSON file.
//!
//! The file maps artifact ids to the same objects Qiita's
//! `qiita_db/artifacts/<id>/` endpoint returns:
//!
//! ```json
//! {
//!   "5": {
//!     "name": "deblur reference hit table",
//!     "type": "BIOM",
//!     "files": {"biom": ["/data/reference-hit.biom"]}
//!   }
//! }
//! ```
//!
//! Relative file paths are resolved against the manifest's directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use indexmap::IndexMap;
use pipeline::{ArtifactId, ArtifactRecord, ArtifactSource, WordcloudError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not an artifact manifest: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// [`ArtifactSource`] backed by a manifest file loaded up front.
#[derive(Debug, Clone)]
pub struct ManifestArtifactSource {
    artifacts: IndexMap<String, ArtifactRecord>,
}

impl ManifestArtifactSource {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut artifacts: IndexMap<String, ArtifactRecord> =
            serde_json::from_str(&text).map_err(|source| ManifestError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for record in artifacts.values_mut() {
            for paths in record.files.values_mut() {
                for file in paths.iter_mut() {
                    if file.is_relative() {
                        *file = base.join(&*file);
                    }
                }
            }
        }
        debug!(path = %path.display(), artifacts = artifacts.len(), "loaded artifact manifest");
        Ok(Self { artifacts })
    }

    pub fn from_records(artifacts: impl IntoIterator<Item = (ArtifactId, ArtifactRecord)>) -> Self {
        Self {
            artifacts: artifacts
                .into_iter()
                .map(|(id, record)| (id.as_str().to_string(), record))
                .collect(),
        }
    }
}

#[async_trait]
impl ArtifactSource for ManifestArtifactSource {
    async fn artifact(&self, artifact: &ArtifactId) -> Result<ArtifactRecord, WordcloudError> {
        self.artifacts
            .get(artifact.as_str())
            .cloned()
            .ok_or_else(|| WordcloudError::ArtifactLookup {
                artifact: artifact.clone(),
                reason: "not listed in the artifact manifest".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pipeline::FileKind;

    use super::*;

    #[tokio::test]
    async fn relative_paths_resolve_against_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            r#"{{"5": {{"name": "deblur final table", "files": {{"biom": ["tables/final.biom", "/abs/other.biom"]}}}}}}"#
        )
        .unwrap();

        let source = ManifestArtifactSource::load(&path).unwrap();
        let record = source.artifact(&ArtifactId::new("5").unwrap()).await.unwrap();

        assert_eq!(record.name, "deblur final table");
        assert_eq!(
            record.first_file(FileKind::Biom),
            Some(dir.path().join("tables/final.biom").as_path())
        );
        assert_eq!(record.files["biom"][1], PathBuf::from("/abs/other.biom"));
    }

    #[tokio::test]
    async fn unknown_artifacts_fail_the_lookup() {
        let source = ManifestArtifactSource::from_records(Vec::new());
        let err = source
            .artifact(&ArtifactId::new("9").unwrap())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "artifact_lookup");
    }

    #[test]
    fn malformed_manifests_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifacts.json");
        std::fs::write(&path, "[]").unwrap();
        assert!(matches!(
            ManifestArtifactSource::load(&path),
            Err(ManifestError::Json { .. })
        ));
    }
}
