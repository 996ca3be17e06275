//! dbBact term-enrichment client adapter.
//!
//! Implements the [`pipeline::EnrichmentService`] trait over dbBact's
//! HTTP+JSON API:
//!
//! - `POST <server>/sequences_fscores` with `{"sequences": [...]}` returns
//!   the F-score of every term associated with the sequences, either as a
//!   bare `{term: score}` object or as an object with `fscore`, `recall`,
//!   `precision`, and `term_count` members.
//! - `GET <api>/stats/stats` returns `{"stats": {name: value}}`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Transport, timeouts, and response decoding live here.
//! Every failure is reported to the [`pipeline`] crate as
//! [`pipeline::WordcloudError::RemoteService`]; nothing is retried.

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use pipeline::{
    DatabaseStats, EnrichmentScores, EnrichmentService, Sequence, ServiceUrl, Timestamp,
    WordcloudError,
};
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::wire::{FscoresRequest, FscoresResponse, StatsResponse};

pub const FSCORES_PATH: &str = "sequences_fscores";
pub const STATS_PATH: &str = "stats/stats";

/// Default bound on every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Failures talking to dbBact.
#[derive(Debug, Error)]
pub enum DbBactError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("could not reach dbBact at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-200 answer; `body` is the raw response text.
    #[error("dbBact answered {status} at {url}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("dbBact returned an unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

impl From<DbBactError> for WordcloudError {
    fn from(err: DbBactError) -> Self {
        let message = match err {
            DbBactError::Status { body, status, .. } if body.trim().is_empty() => {
                format!("dbBact answered with HTTP status {status}")
            }
            DbBactError::Status { body, .. } => body,
            other => other.to_string(),
        };
        WordcloudError::RemoteService { message }
    }
}

/// Client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("qp-dbbact/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// HTTP client for dbBact.
#[derive(Debug, Clone)]
pub struct DbBactClient {
    http: reqwest::Client,
}

impl DbBactClient {
    pub fn new(config: &ClientConfig) -> Result<Self, DbBactError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(DbBactError::Client)?;
        Ok(Self { http })
    }

    /// Scores the given sequences.
    #[instrument(skip_all, fields(server = %server, sequences = sequences.len()))]
    pub async fn sequences_fscores(
        &self,
        server: &ServiceUrl,
        sequences: &[Sequence],
    ) -> Result<EnrichmentScores, DbBactError> {
        let url = server.endpoint(FSCORES_PATH);
        info!("querying dbBact for term scores");
        let request = FscoresRequest { sequences };
        let response = self.http.post(&url).json(&request).send().await;
        let body = read_body(&url, response).await?;
        let decoded: FscoresResponse =
            serde_json::from_str(&body).map_err(|err| DbBactError::Decode {
                url: url.clone(),
                reason: err.to_string(),
            })?;
        let scores = decoded.into_scores();
        debug!(terms = scores.scores.len(), "received term scores");
        Ok(scores)
    }

    /// Fetches the database statistics.
    #[instrument(skip_all, fields(api = %api))]
    pub async fn database_stats(&self, api: &ServiceUrl) -> Result<DatabaseStats, DbBactError> {
        let url = api.endpoint(STATS_PATH);
        let queried_at = Timestamp::now();
        info!("querying dbBact database statistics");
        let response = self.http.get(&url).send().await;
        let body = read_body(&url, response).await?;
        let decoded: StatsResponse =
            serde_json::from_str(&body).map_err(|err| DbBactError::Decode {
                url: url.clone(),
                reason: err.to_string(),
            })?;
        let stats = decoded.into_stats(queried_at);
        debug!(entries = stats.entries.len(), "received database statistics");
        Ok(stats)
    }
}

async fn read_body(
    url: &str,
    response: Result<reqwest::Response, reqwest::Error>,
) -> Result<String, DbBactError> {
    let transport = |source| DbBactError::Transport {
        url: url.to_string(),
        source,
    };
    let response = response.map_err(transport)?;
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if status != StatusCode::OK {
        warn!(%status, url, "dbBact request failed");
        return Err(DbBactError::Status {
            url: url.to_string(),
            status,
            body,
        });
    }
    Ok(body)
}

#[async_trait]
impl EnrichmentService for DbBactClient {
    async fn fscores(
        &self,
        server: &ServiceUrl,
        sequences: &[Sequence],
    ) -> Result<EnrichmentScores, WordcloudError> {
        Ok(self.sequences_fscores(server, sequences).await?)
    }

    async fn stats(&self, api: &ServiceUrl) -> Result<DatabaseStats, WordcloudError> {
        Ok(self.database_stats(api).await?)
    }
}
