//! Port traits implemented by the infrastructure crates.
//!
//! | Port | Implemented by |
//! |------|----------------|
//! | [`ArtifactSource`] | `qiita` (REST API and local manifest) |
//! | [`TableReader`] | `biom` |
//! | [`EnrichmentService`] | `dbbact` |
//! | [`ProgressReporter`] | `qiita` (job step updates), `cli` (log only) |
//! | [`WordcloudRenderer`], [`TableWriter`] | `render` |
//!
//! Every method reports failures as [`WordcloudError`]; adapters translate
//! their own error types before returning.

use std::path::Path;

use async_trait::async_trait;

use crate::{
    ArtifactId, ArtifactRecord, CloudLayout, DatabaseStats, EnrichmentScores, FeatureTable,
    ScoreMap, Sequence, ServiceUrl, TermCounts, WordcloudError, WordcloudParameters,
};

/// Metadata service describing input artifacts.
#[async_trait]
pub trait ArtifactSource: Send + Sync {
    /// Provenance and file listing of `artifact`.
    async fn artifact(&self, artifact: &ArtifactId) -> Result<ArtifactRecord, WordcloudError>;
}

/// Reads a feature table file.
pub trait TableReader: Send + Sync {
    fn read_table(&self, path: &Path) -> Result<FeatureTable, WordcloudError>;
}

/// Remote term-enrichment service.
///
/// Both calls are single-attempt; implementations must bound them with a
/// timeout and report transport and decoding failures as
/// [`WordcloudError::RemoteService`].
#[async_trait]
pub trait EnrichmentService: Send + Sync {
    /// Term scores for the submitted sequences. An empty slice is a valid
    /// request.
    async fn fscores(
        &self,
        server: &ServiceUrl,
        sequences: &[Sequence],
    ) -> Result<EnrichmentScores, WordcloudError>;

    /// Database statistics, stamped with the time of the request.
    async fn stats(&self, api: &ServiceUrl) -> Result<DatabaseStats, WordcloudError>;
}

/// Progress notification for one pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepUpdate {
    pub index: u8,
    pub total: u8,
    pub description: String,
}

impl StepUpdate {
    pub fn new(index: u8, total: u8, description: impl Into<String>) -> Self {
        Self {
            index,
            total,
            description: description.into(),
        }
    }
}

impl std::fmt::Display for StepUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Step {} of {}: {}", self.index, self.total, self.description)
    }
}

/// Receives coarse progress notifications.
///
/// Delivery is best effort: implementations log their own failures and
/// never abort the run.
#[async_trait]
pub trait ProgressReporter: Send + Sync {
    async fn step(&self, update: &StepUpdate);
}

/// Input to the word cloud layout.
#[derive(Debug, Clone, Copy)]
pub struct CloudRequest<'a> {
    pub scores: &'a ScoreMap,
    pub term_counts: &'a TermCounts,
    pub params: &'a WordcloudParameters,
}

/// Lays out and draws word clouds.
pub trait WordcloudRenderer: Send + Sync {
    /// Places every term that fits on the canvas.
    fn layout(&self, request: CloudRequest<'_>) -> Result<CloudLayout, WordcloudError>;

    /// Writes `layout` as a PNG to `raster` and as an SVG to `vector`.
    fn draw(&self, layout: &CloudLayout, raster: &Path, vector: &Path)
        -> Result<(), WordcloudError>;
}

/// Serializes the tabular outputs.
pub trait TableWriter: Send + Sync {
    /// Two columns, `term` and `fscore`, with a header row.
    fn write_scores(&self, scores: &ScoreMap, path: &Path) -> Result<(), WordcloudError>;

    /// Two columns, name and value, no header, ending with the query time.
    fn write_stats(&self, stats: &DatabaseStats, path: &Path) -> Result<(), WordcloudError>;
}
