//! Error taxonomy for the wordcloud pipeline.
//!
//! [`WordcloudError`] covers every condition that ends a run. Adapter crates
//! (BIOM reader, dbBact client, Qiita client, renderer) define their own
//! error enums and map them into this taxonomy at the port boundary, so the
//! job only ever sees these variants.
//!
//! No variant is retried. The job turns the first error it meets into a
//! failed [`crate::JobOutcome`] whose message is the `Display` text below;
//! several of those texts are matched verbatim by callers and must not
//! change.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ArtifactId;

/// Errors that end a wordcloud run.
#[derive(Debug, Error, Serialize, Deserialize)]
pub enum WordcloudError {
    /// The artifact was not produced by one of the accepted deblur commands.
    #[error(
        "Currently, dbBact queries within Qiita are only possible for artifacts that have been produced via \"deblur\"."
    )]
    UnsupportedProvenance {
        /// Provenance name recorded on the artifact.
        name: String,
    },

    /// The artifact's file listing has no `biom` entry.
    #[error("The input artifact is lacking the biom file.")]
    MissingBiomFile,

    /// At least one feature identifier is not a DNA sequence.
    #[error("One or more ASV sequences contains at least one non-DNA character.")]
    NonDnaSequence {
        /// First offending feature identifier.
        feature: String,
    },

    /// dbBact answered with a non-200 status, an unparsable body, or could
    /// not be reached at all.
    ///
    /// The message is surfaced to the user unchanged; for HTTP errors it is
    /// the raw response body.
    #[error("{message}")]
    RemoteService {
        /// User-visible message.
        message: String,
    },

    /// dbBact returned no scored terms for the submitted sequences.
    #[error("None of the {submitted} sequences were found in dbBact.")]
    NoTermsFound {
        /// Number of sequences that were submitted.
        submitted: usize,
    },

    /// A job parameter is missing or outside its accepted range.
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter key as the orchestrator names it.
        name: String,
        /// What is wrong with the supplied value.
        reason: String,
    },

    /// The metadata service could not describe the artifact.
    #[error("Could not retrieve artifact {artifact}: {reason}")]
    ArtifactLookup {
        /// Artifact that was requested.
        artifact: ArtifactId,
        /// Underlying failure.
        reason: String,
    },

    /// The feature table file could not be read or parsed.
    #[error("Could not read feature table '{}': {reason}", path.display())]
    TableUnreadable {
        /// Path of the table file.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },

    /// The word cloud could not be laid out or rasterised.
    #[error("Could not render wordcloud: {reason}")]
    RenderFailed {
        /// Underlying failure.
        reason: String,
    },

    /// An output file could not be written.
    #[error("Could not write '{}': {reason}", path.display())]
    OutputWrite {
        /// Path of the output file.
        path: PathBuf,
        /// Underlying failure.
        reason: String,
    },
}

impl WordcloudError {
    /// Short machine-readable tag used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedProvenance { .. } => "unsupported_provenance",
            Self::MissingBiomFile => "missing_biom_file",
            Self::NonDnaSequence { .. } => "non_dna_sequence",
            Self::RemoteService { .. } => "remote_service",
            Self::NoTermsFound { .. } => "no_terms_found",
            Self::InvalidParameter { .. } => "invalid_parameter",
            Self::ArtifactLookup { .. } => "artifact_lookup",
            Self::TableUnreadable { .. } => "table_unreadable",
            Self::RenderFailed { .. } => "render_failed",
            Self::OutputWrite { .. } => "output_write",
        }
    }

    /// Convenience constructor for [`WordcloudError::InvalidParameter`].
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
