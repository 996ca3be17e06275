//! REST client for `qiita_db` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{
    ArtifactId, ArtifactRecord, ArtifactSource, JobId, ProgressReporter, ServiceUrl, StepUpdate,
    WordcloudError,
};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const AUTHENTICATE_PATH: &str = "qiita_db/authenticate/";

/// Failures talking to Qiita.
#[derive(Debug, Error)]
pub enum QiitaError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("could not reach Qiita at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Qiita answered {status} at {url}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Connection settings.
#[derive(Debug, Clone)]
pub struct QiitaConfig {
    pub url: ServiceUrl,
    pub client_id: String,
    pub client_secret: String,
    /// Set to `false` for development servers with self-signed certificates.
    pub verify_tls: bool,
    pub timeout: Duration,
}

/// What Qiita knows about a job.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobInfo {
    pub command: String,
    /// Raw parameter map, keyed by the plugin's parameter names.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    pub status: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Authenticated Qiita client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct QiitaClient {
    http: reqwest::Client,
    base: ServiceUrl,
    token: String,
}

impl QiitaClient {
    /// Builds the HTTP client and obtains an access token.
    #[instrument(skip_all, fields(url = %config.url))]
    pub async fn connect(config: &QiitaConfig) -> Result<Self, QiitaError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(QiitaError::Client)?;
        if !config.verify_tls {
            warn!("TLS certificate verification is disabled");
        }

        let url = config.url.endpoint(AUTHENTICATE_PATH);
        let request = http.post(&url).form(&[
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("grant_type", "client"),
        ]);
        let token: TokenResponse = send_json(&url, request).await?;
        info!("authenticated with Qiita");

        Ok(Self {
            http,
            base: config.url.clone(),
            token: token.access_token,
        })
    }

    /// Command, parameters and status of `job`.
    #[instrument(skip_all, fields(job = %job))]
    pub async fn job(&self, job: &JobId) -> Result<JobInfo, QiitaError> {
        let url = self.base.endpoint(&format!("qiita_db/jobs/{job}/"));
        let info: JobInfo = send_json(&url, self.http.get(&url).bearer_auth(&self.token)).await?;
        debug!(command = %info.command, status = %info.status, "fetched job");
        Ok(info)
    }

    /// Provenance and file listing of `artifact`.
    #[instrument(skip_all, fields(artifact = %artifact))]
    pub async fn artifact_record(&self, artifact: &ArtifactId) -> Result<ArtifactRecord, QiitaError> {
        let url = self.base.endpoint(&format!("qiita_db/artifacts/{artifact}/"));
        let record: ArtifactRecord =
            send_json(&url, self.http.get(&url).bearer_auth(&self.token)).await?;
        debug!(name = %record.name, kinds = record.files.len(), "fetched artifact");
        Ok(record)
    }

    /// Sets the human-readable step text of `job`.
    pub async fn update_step(&self, job: &JobId, step: &str) -> Result<(), QiitaError> {
        let url = self.base.endpoint(&format!("qiita_db/jobs/{job}/step/"));
        let request = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "step": step }));
        send(&url, request).await.map(|_| ())
    }

    /// Progress reporter posting step updates for `job`.
    pub fn progress(&self, job: JobId) -> JobProgress {
        JobProgress {
            client: self.clone(),
            job,
        }
    }
}

async fn send(url: &str, request: RequestBuilder) -> Result<String, QiitaError> {
    let transport = |source| QiitaError::Transport {
        url: url.to_string(),
        source,
    };
    let response = request.send().await.map_err(transport)?;
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if !status.is_success() {
        return Err(QiitaError::Status {
            url: url.to_string(),
            status,
            body,
        });
    }
    Ok(body)
}

async fn send_json<T: DeserializeOwned>(url: &str, request: RequestBuilder) -> Result<T, QiitaError> {
    let body = send(url, request).await?;
    serde_json::from_str(&body).map_err(|err| QiitaError::Decode {
        url: url.to_string(),
        reason: err.to_string(),
    })
}

#[async_trait]
impl ArtifactSource for QiitaClient {
    async fn artifact(&self, artifact: &ArtifactId) -> Result<ArtifactRecord, WordcloudError> {
        self.artifact_record(artifact)
            .await
            .map_err(|err| WordcloudError::ArtifactLookup {
                artifact: artifact.clone(),
                reason: err.to_string(),
            })
    }
}

/// Posts step updates of one job.
#[derive(Debug, Clone)]
pub struct JobProgress {
    client: QiitaClient,
    job: JobId,
}

#[async_trait]
impl ProgressReporter for JobProgress {
    async fn step(&self, update: &StepUpdate) {
        let text = update.to_string();
        info!(job = %self.job, step = %text, "progress");
        if let Err(err) = self.client.update_step(&self.job, &text).await {
            warn!(job = %self.job, error = %err, "could not post step update");
        }
    }
}
