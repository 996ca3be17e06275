//! Input validation rules.
//!
//! Checks run in a fixed order so that the cheap, metadata-only rejections
//! happen before the feature table is read:
//!
//! 1. [`check_provenance`] - artifact produced by an accepted deblur command.
//! 2. [`biom_path`] - artifact lists a BIOM file.
//! 3. [`validate_table`] - every feature identifier is a DNA sequence.

use std::path::Path;

use tracing::warn;

use crate::{
    is_dna, ArtifactRecord, FeatureTable, FileKind, PluginManifest, Sequence, WordcloudError,
};

/// Rejects artifacts whose provenance is not on the manifest's allow-list.
pub fn check_provenance(
    manifest: &PluginManifest,
    record: &ArtifactRecord,
) -> Result<(), WordcloudError> {
    if manifest.accepts_provenance(&record.name) {
        Ok(())
    } else {
        Err(WordcloudError::UnsupportedProvenance {
            name: record.name.clone(),
        })
    }
}

/// Path of the artifact's BIOM file.
pub fn biom_path(record: &ArtifactRecord) -> Result<&Path, WordcloudError> {
    record
        .first_file(FileKind::Biom)
        .ok_or(WordcloudError::MissingBiomFile)
}

/// A feature table whose identifiers are all DNA sequences.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTable {
    table: FeatureTable,
    sequences: Vec<Sequence>,
}

impl ValidatedTable {
    pub fn table(&self) -> &FeatureTable {
        &self.table
    }

    /// Every feature of the table, in table order.
    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }
}

/// Checks the DNA invariant on every feature identifier.
pub fn validate_table(table: FeatureTable) -> Result<ValidatedTable, WordcloudError> {
    if let Some(bad) = table.features().iter().find(|f| !is_dna(f)) {
        warn!(feature = %bad, "feature identifier is not a DNA sequence");
        return Err(WordcloudError::NonDnaSequence {
            feature: bad.clone(),
        });
    }
    let sequences = table
        .features()
        .iter()
        .filter_map(|f| Sequence::new(f.as_str()))
        .collect();
    Ok(ValidatedTable { table, sequences })
}
