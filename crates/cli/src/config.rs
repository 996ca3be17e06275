//! `qp-dbbact.toml`.
//!
//! ```toml
//! [dbbact]
//! server_url = "http://dbbact.org"
//! api_url = "http://api.dbbact.org"
//! timeout_secs = 60
//!
//! [wordcloud]
//! min_occurrence = 0.333
//! width = 400
//! height = 200
//! background = "white"
//! relative_scaling = 0.5
//! font_path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"
//!
//! [wordcloud.layout]
//! max_words = 200
//! seed = 42
//!
//! [qiita]
//! url = "https://localhost:21174"
//! client_id = "..."
//! client_secret = "..."
//! verify_tls = false
//! ```
//!
//! Every key is optional. Job parameters override the `[wordcloud]` values.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context};
use pipeline::{
    params::MAX_DIMENSION, BackgroundColor, LayoutOptions, OccurrenceFraction, RelativeScaling,
    ServiceUrl, WordcloudParameters,
};
use serde::Deserialize;

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "qp-dbbact.toml";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub dbbact: DbBactSection,
    pub wordcloud: WordcloudSection,
    pub qiita: QiitaSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbBactSection {
    pub server_url: Option<ServiceUrl>,
    pub api_url: Option<ServiceUrl>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for DbBactSection {
    fn default() -> Self {
        Self {
            server_url: None,
            api_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DbBactSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WordcloudSection {
    pub min_occurrence: Option<f64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub background: Option<String>,
    pub relative_scaling: Option<f64>,
    /// Font used for both images; a system sans-serif face when unset.
    pub font_path: Option<PathBuf>,
    pub layout: LayoutOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QiitaSection {
    pub url: Option<ServiceUrl>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    #[serde(default = "default_true")]
    pub verify_tls: bool,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for QiitaSection {
    fn default() -> Self {
        Self {
            url: None,
            client_id: None,
            client_secret: None,
            verify_tls: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Reads `path`, or [`DEFAULT_CONFIG_FILE`] if it exists, or defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn parse(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Run parameters before job parameters are applied.
    pub fn parameter_defaults(&self) -> anyhow::Result<WordcloudParameters> {
        let mut params = WordcloudParameters::default();
        let section = &self.wordcloud;
        if let Some(url) = &self.dbbact.server_url {
            params.server_url = url.clone();
        }
        if let Some(url) = &self.dbbact.api_url {
            params.api_url = url.clone();
        }
        if let Some(fraction) = section.min_occurrence {
            params.min_occurrence = OccurrenceFraction::new(fraction)
                .ok_or_else(|| anyhow!("wordcloud.min_occurrence must be a non-negative number"))?;
        }
        if let Some(width) = section.width {
            anyhow::ensure!(
                (1..=MAX_DIMENSION).contains(&width),
                "wordcloud.width must lie between 1 and {MAX_DIMENSION}"
            );
            params.width = width;
        }
        if let Some(height) = section.height {
            anyhow::ensure!(
                (1..=MAX_DIMENSION).contains(&height),
                "wordcloud.height must lie between 1 and {MAX_DIMENSION}"
            );
            params.height = height;
        }
        if let Some(background) = &section.background {
            params.background = BackgroundColor::new(background)
                .ok_or_else(|| anyhow!("wordcloud.background '{background}' is not a color"))?;
        }
        if let Some(scaling) = section.relative_scaling {
            params.relative_scaling = RelativeScaling::new(scaling)
                .ok_or_else(|| anyhow!("wordcloud.relative_scaling must lie between 0 and 1"))?;
        }
        params.layout = section.layout.clone();
        Ok(params)
    }
}
