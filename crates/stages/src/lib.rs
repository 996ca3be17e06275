//! The dbBact wordcloud job.
//!
//! [`WordcloudJob`] runs the four stages strictly in order over the port
//! traits of the [`pipeline`] crate:
//!
//! 1. **Collect**: look up the artifact, check its provenance and BIOM file,
//!    read the table and check that every feature is a DNA sequence.
//! 2. **Select**: keep features seen in enough samples.
//! 3. **Score**: fetch term scores, then database statistics.
//! 4. **Render**: lay out and draw the cloud, then write both tables.
//!
//! The first error ends the run. Every error is folded into the returned
//! [`JobOutcome`]; `run` itself never fails.
//!
//! ## Architectural Layer
//!
//! **Orchestration.** This crate sequences calls between the domain rules in
//! [`pipeline`] and the infrastructure behind the ports. It holds no domain
//! rules of its own.

use std::path::{Path, PathBuf};

use pipeline::{
    biom_path, check_provenance, select_features, validate_table, ArtifactId, ArtifactInfo,
    ArtifactSource, CloudLayout, CloudRequest, DatabaseStats, EnrichmentScores,
    EnrichmentService, JobOutcome, JobParameters, PluginManifest, ProgressReporter, RunId,
    Sequence, StepUpdate, TableReader, TableWriter, ValidatedTable, WordcloudError,
    WordcloudRenderer,
};
use tracing::{error, info, info_span, instrument, Instrument};

/// Number of progress steps reported per run.
pub const STEP_COUNT: u8 = 4;

/// The adapters a job runs against.
#[derive(Clone, Copy)]
pub struct Ports<'a> {
    pub artifacts: &'a dyn ArtifactSource,
    pub tables: &'a dyn TableReader,
    pub enrichment: &'a dyn EnrichmentService,
    pub renderer: &'a dyn WordcloudRenderer,
    pub writer: &'a dyn TableWriter,
    pub progress: &'a dyn ProgressReporter,
}

/// One plugin command bound to its adapters.
pub struct WordcloudJob<'a> {
    manifest: &'static PluginManifest,
    ports: Ports<'a>,
}

impl<'a> WordcloudJob<'a> {
    pub fn new(manifest: &'static PluginManifest, ports: Ports<'a>) -> Self {
        Self { manifest, ports }
    }

    /// Runs all stages and writes the result files into `out_dir`.
    #[instrument(skip_all, fields(run_id = %RunId::new_random(), artifact = %params.artifact))]
    pub async fn run(&self, params: &JobParameters, out_dir: &Path) -> JobOutcome {
        match self.execute(params, out_dir).await {
            Ok(artifact) => {
                info!(files = artifact.files.len(), "run succeeded");
                JobOutcome::succeeded(vec![artifact])
            }
            Err(err) => {
                error!(kind = err.kind(), error = %err, "run failed");
                JobOutcome::failed(&err)
            }
        }
    }

    async fn execute(
        &self,
        params: &JobParameters,
        out_dir: &Path,
    ) -> Result<ArtifactInfo, WordcloudError> {
        let wordcloud = &params.wordcloud;

        self.report(1, "Collecting info and generating submission").await;
        let validated = self
            .collect(&params.artifact)
            .instrument(info_span!("collect"))
            .await?;

        let selected = select_features(&validated, wordcloud.min_occurrence);
        self.report(
            2,
            format!(
                "Querying dbBact for {} of {} ASVs",
                selected.len(),
                validated.sequences().len()
            ),
        )
        .await;
        let (enrichment, stats) = self
            .score(params, &selected)
            .instrument(info_span!("score", submitted = selected.len()))
            .await?;

        self.report(3, "Generating wordcloud").await;
        let layout = info_span!("layout").in_scope(|| {
            self.ports.renderer.layout(CloudRequest {
                scores: &enrichment.scores,
                term_counts: &enrichment.term_counts,
                params: wordcloud,
            })
        })?;

        self.report(4, "Rendering image and writing tables").await;
        info_span!("render", words = layout.words.len())
            .in_scope(|| self.write_outputs(&layout, &enrichment, &stats, out_dir))
    }

    /// Metadata checks first; the table is only read once they pass.
    async fn collect(&self, artifact: &ArtifactId) -> Result<ValidatedTable, WordcloudError> {
        let record = self.ports.artifacts.artifact(artifact).await?;
        check_provenance(self.manifest, &record)?;
        let biom = biom_path(&record)?;
        let table = self.ports.tables.read_table(biom)?;
        info!(
            features = table.n_features(),
            samples = table.n_samples(),
            "read feature table"
        );
        validate_table(table)
    }

    /// Term scores first; statistics only once there is something to show.
    async fn score(
        &self,
        params: &JobParameters,
        selected: &[Sequence],
    ) -> Result<(EnrichmentScores, DatabaseStats), WordcloudError> {
        let wordcloud = &params.wordcloud;
        let enrichment = self
            .ports
            .enrichment
            .fscores(&wordcloud.server_url, selected)
            .await?;
        if enrichment.scores.is_empty() {
            return Err(WordcloudError::NoTermsFound {
                submitted: selected.len(),
            });
        }
        info!(terms = enrichment.scores.len(), "scored sequences");
        let stats = self.ports.enrichment.stats(&wordcloud.api_url).await?;
        Ok((enrichment, stats))
    }

    fn write_outputs(
        &self,
        layout: &CloudLayout,
        enrichment: &EnrichmentScores,
        stats: &DatabaseStats,
        out_dir: &Path,
    ) -> Result<ArtifactInfo, WordcloudError> {
        std::fs::create_dir_all(out_dir).map_err(|err| WordcloudError::OutputWrite {
            path: out_dir.to_path_buf(),
            reason: err.to_string(),
        })?;
        let outputs = &self.manifest.outputs;
        let path = |name: &str| -> PathBuf { out_dir.join(name) };
        self.ports
            .renderer
            .draw(layout, &path(outputs.raster.name), &path(outputs.vector.name))?;
        self.ports
            .writer
            .write_scores(&enrichment.scores, &path(outputs.scores.name))?;
        self.ports
            .writer
            .write_stats(stats, &path(outputs.stats.name))?;

        Ok(ArtifactInfo {
            output_name: self.manifest.output_name.to_string(),
            artifact_type: self.manifest.artifact_type.to_string(),
            files: outputs
                .in_order()
                .iter()
                .map(|file| (path(file.name), file.kind))
                .collect(),
        })
    }

    async fn report(&self, index: u8, description: impl Into<String>) {
        let update = StepUpdate::new(index, STEP_COUNT, description);
        self.ports.progress.step(&update).await;
    }
}
