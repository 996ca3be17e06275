//! The `run` and `qiita` subcommands.

use std::path::PathBuf;

use anyhow::{bail, Context};
use async_trait::async_trait;
use biom::BiomReader;
use clap::Args;
use dbbact::{ClientConfig, DbBactClient};
use pipeline::{
    manifest::param_keys, ArtifactSource, JobId, JobOutcome, JobParameters, ProgressReporter,
    StepUpdate, WordcloudError, DBBACT_PLUGIN,
};
use qiita::{ManifestArtifactSource, QiitaClient, QiitaConfig};
use render::{TsvTables, WordcloudPainter};
use serde_json::{Map, Value};
use stages::{Ports, WordcloudJob};
use tracing::info;

use crate::config::Config;

/// Local run against an artifact manifest.
#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// JSON file describing the input artifacts
    #[arg(long, value_name = "PATH")]
    pub manifest: PathBuf,

    /// Id of the feature table artifact in the manifest
    #[arg(long)]
    pub artifact: String,

    /// Directory receiving the wordcloud and tables
    #[arg(long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Job parameter as `NAME=VALUE`, using the Qiita parameter names
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

/// One Qiita job.
#[derive(Debug, Clone, Args)]
pub struct QiitaArgs {
    /// Qiita server URL, overriding `[qiita] url`
    #[arg(long, env = "QIITA_URL")]
    pub url: Option<String>,

    /// Job to execute
    #[arg(long)]
    pub job_id: String,

    /// Directory receiving the wordcloud and tables
    #[arg(long, value_name = "DIR")]
    pub out_dir: PathBuf,

    #[arg(long, env = "QIITA_CLIENT_ID", hide_env_values = true)]
    pub client_id: Option<String>,

    #[arg(long, env = "QIITA_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    pub insecure: bool,
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("'{raw}' is not NAME=VALUE"))
}

/// Logs progress instead of reporting it to an orchestrator.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

#[async_trait]
impl ProgressReporter for LogProgress {
    async fn step(&self, update: &StepUpdate) {
        info!(step = update.index, total = update.total, "{}", update.description);
    }
}

/// Runs the job for an artifact described by a local manifest.
pub async fn run_local(config: &Config, args: &RunArgs) -> anyhow::Result<JobOutcome> {
    let mut raw: Map<String, Value> = args
        .params
        .iter()
        .map(|(name, value)| (name.clone(), Value::String(value.clone())))
        .collect();
    raw.insert(param_keys::ARTIFACT.to_string(), Value::String(args.artifact.clone()));

    let artifacts = ManifestArtifactSource::load(&args.manifest)?;
    execute(config, raw, &artifacts, &LogProgress, &args.out_dir).await
}

/// Fetches a Qiita job, runs it, and posts progress to Qiita.
pub async fn run_qiita(config: &Config, args: &QiitaArgs) -> anyhow::Result<JobOutcome> {
    let section = &config.qiita;
    let url = match &args.url {
        Some(raw) => pipeline::ServiceUrl::new(raw)
            .with_context(|| format!("'{raw}' is not an http(s) URL"))?,
        None => section
            .url
            .clone()
            .context("no Qiita URL: pass --url or set [qiita] url")?,
    };
    let client_id = args
        .client_id
        .clone()
        .or_else(|| section.client_id.clone())
        .context("no Qiita client id: pass --client-id or set [qiita] client_id")?;
    let client_secret = args
        .client_secret
        .clone()
        .or_else(|| section.client_secret.clone())
        .context("no Qiita client secret: pass --client-secret or set [qiita] client_secret")?;
    let job_id = JobId::new(args.job_id.as_str()).context("job id must not be blank")?;

    let client = QiitaClient::connect(&QiitaConfig {
        url,
        client_id,
        client_secret,
        verify_tls: section.verify_tls && !args.insecure,
        timeout: std::time::Duration::from_secs(section.timeout_secs),
    })
    .await?;
    let job = client.job(&job_id).await?;
    if job.command != DBBACT_PLUGIN.command {
        bail!(
            "job {job_id} runs '{}', not '{}'",
            job.command,
            DBBACT_PLUGIN.command
        );
    }
    info!(job = %job_id, status = %job.status, "starting Qiita job");

    let progress = client.progress(job_id);
    execute(config, job.parameters, &client, &progress, &args.out_dir).await
}

async fn execute(
    config: &Config,
    raw: Map<String, Value>,
    artifacts: &dyn ArtifactSource,
    progress: &dyn ProgressReporter,
    out_dir: &std::path::Path,
) -> anyhow::Result<JobOutcome> {
    let defaults = config.parameter_defaults()?;
    let params = match JobParameters::parse(raw, &defaults) {
        Ok(params) => params,
        Err(err) => return Ok(JobOutcome::failed(&err)),
    };
    let painter = match WordcloudPainter::with_font_path(config.wordcloud.font_path.as_deref()) {
        Ok(painter) => painter,
        Err(err) => return Ok(JobOutcome::failed(&WordcloudError::from(err))),
    };
    let dbbact = DbBactClient::new(&ClientConfig {
        timeout: config.dbbact.timeout(),
        ..ClientConfig::default()
    })?;

    let job = WordcloudJob::new(
        &DBBACT_PLUGIN,
        Ports {
            artifacts,
            tables: &BiomReader,
            enrichment: &dbbact,
            renderer: &painter,
            writer: &TsvTables,
            progress,
        },
    );
    Ok(job.run(&params, out_dir).await)
}
