//! Run parameters.
//!
//! The orchestrator supplies a flat map of parameters keyed by their
//! human-readable names (see [`crate::manifest`]). [`JobParameters::parse`]
//! takes that map apart: the source artifact reference is removed and
//! returned separately so it never reaches result metadata, and every other
//! value is validated into a [`WordcloudParameters`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crate::manifest::param_keys;
use crate::{ArtifactId, OccurrenceFraction, RelativeScaling, WordcloudError};

pub const DEFAULT_SERVER_URL: &str = "http://dbbact.org";
pub const DEFAULT_API_URL: &str = "http://api.dbbact.org";
pub const DEFAULT_WIDTH: u32 = 400;
pub const DEFAULT_HEIGHT: u32 = 200;
pub const DEFAULT_BACKGROUND: &str = "white";
pub const DEFAULT_RELATIVE_SCALING: f64 = 0.5;
pub const DEFAULT_MIN_OCCURRENCE: f64 = 1.0 / 3.0;
/// Largest accepted canvas side in pixels.
pub const MAX_DIMENSION: u32 = 8192;

// ---------------------------------------------------------------------------

/// Base URL of an HTTP service, validated to be absolute http(s).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceUrl(String);

impl ServiceUrl {
    /// Parses `raw`, accepting form-url-encoded input such as
    /// `http%3A%2F%2Fdbbact.org`. A trailing `/` is dropped.
    pub fn new(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let decoded = if raw.contains("://") {
            raw.to_string()
        } else {
            let query = format!("v={raw}");
            url::form_urlencoded::parse(query.as_bytes())
                .next()
                .map(|(_, value)| value.into_owned())?
        };
        let parsed = Url::parse(&decoded).ok()?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return None;
        }
        Some(Self(decoded.trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `self` followed by `/` and `path` (leading slashes in `path` ignored).
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.0, path.trim_start_matches('/'))
    }
}

impl TryFrom<String> for ServiceUrl {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ServiceUrl::new(&value).ok_or_else(|| format!("'{value}' is not an http(s) URL"))
    }
}

impl From<ServiceUrl> for String {
    fn from(value: ServiceUrl) -> Self {
        value.0
    }
}

impl std::fmt::Display for ServiceUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// Canvas background: an SVG color keyword or a `#rgb` / `#rrggbb` literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundColor(String);

impl BackgroundColor {
    pub fn new(value: &str) -> Option<Self> {
        let v = value.trim();
        let valid = match v.strip_prefix('#') {
            Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => {
                !v.is_empty()
                    && v.chars().all(|c| c.is_ascii_alphabetic())
                    && v.to_ascii_lowercase().parse::<svgtypes::Color>().is_ok()
            }
        };
        valid.then(|| Self(v.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for BackgroundColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        BackgroundColor::new(&value).ok_or_else(|| format!("'{value}' is not a color"))
    }
}

impl From<BackgroundColor> for String {
    fn from(value: BackgroundColor) -> Self {
        value.0
    }
}

// ---------------------------------------------------------------------------

/// Word cloud layout knobs that the orchestrator does not expose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    /// Upper bound on the number of terms drawn.
    pub max_words: usize,
    /// Share of words laid out horizontally, in `[0, 1]`.
    pub prefer_horizontal: f64,
    /// Smallest font size in pixels; layout stops below it.
    pub min_font_size: u32,
    /// Font size decrement when a word does not fit.
    pub font_step: u32,
    /// Seed for placement; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_words: 200,
            prefer_horizontal: 0.9,
            min_font_size: 4,
            font_step: 1,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------

/// Validated parameters for one run. Contains no artifact reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordcloudParameters {
    /// Base URL of the scoring service (`/sequences_fscores`).
    pub server_url: ServiceUrl,
    /// Base URL of the statistics service (`/stats/stats`).
    pub api_url: ServiceUrl,
    pub min_occurrence: OccurrenceFraction,
    pub width: u32,
    pub height: u32,
    pub background: BackgroundColor,
    pub relative_scaling: RelativeScaling,
    #[serde(default)]
    pub layout: LayoutOptions,
}

impl Default for WordcloudParameters {
    fn default() -> Self {
        Self {
            server_url: ServiceUrl(DEFAULT_SERVER_URL.to_string()),
            api_url: ServiceUrl(DEFAULT_API_URL.to_string()),
            min_occurrence: OccurrenceFraction(DEFAULT_MIN_OCCURRENCE),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: BackgroundColor(DEFAULT_BACKGROUND.to_string()),
            relative_scaling: RelativeScaling(DEFAULT_RELATIVE_SCALING),
            layout: LayoutOptions::default(),
        }
    }
}

/// Parameters of one job as handed over by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct JobParameters {
    /// Feature table to process.
    pub artifact: ArtifactId,
    pub wordcloud: WordcloudParameters,
}

impl JobParameters {
    /// Splits the orchestrator's parameter map.
    ///
    /// Keys that are absent fall back to `defaults`; unknown keys are
    /// ignored. The artifact key is required.
    pub fn parse(
        mut raw: Map<String, Value>,
        defaults: &WordcloudParameters,
    ) -> Result<Self, WordcloudError> {
        let artifact = raw
            .remove(param_keys::ARTIFACT)
            .and_then(|value| match value {
                Value::String(s) => ArtifactId::new(s),
                Value::Number(n) => ArtifactId::new(n.to_string()),
                _ => None,
            })
            .ok_or_else(|| {
                WordcloudError::invalid_parameter(param_keys::ARTIFACT, "an artifact id is required")
            })?;

        let mut params = defaults.clone();
        if let Some(value) = raw.get(param_keys::SERVER_URL) {
            params.server_url = url_value(param_keys::SERVER_URL, value)?;
        }
        if let Some(value) = raw.get(param_keys::API_URL) {
            params.api_url = url_value(param_keys::API_URL, value)?;
        }
        if let Some(value) = raw.get(param_keys::MIN_OCCURRENCE) {
            let fraction = number_value(param_keys::MIN_OCCURRENCE, value)?;
            params.min_occurrence = OccurrenceFraction::new(fraction).ok_or_else(|| {
                WordcloudError::invalid_parameter(
                    param_keys::MIN_OCCURRENCE,
                    "must be a non-negative number",
                )
            })?;
        }
        if let Some(value) = raw.get(param_keys::WIDTH) {
            params.width = dimension_value(param_keys::WIDTH, value)?;
        }
        if let Some(value) = raw.get(param_keys::HEIGHT) {
            params.height = dimension_value(param_keys::HEIGHT, value)?;
        }
        if let Some(value) = raw.get(param_keys::BACKGROUND) {
            params.background = value
                .as_str()
                .and_then(BackgroundColor::new)
                .ok_or_else(|| {
                    WordcloudError::invalid_parameter(param_keys::BACKGROUND, "not a color name")
                })?;
        }
        if let Some(value) = raw.get(param_keys::RELATIVE_SCALING) {
            let scaling = number_value(param_keys::RELATIVE_SCALING, value)?;
            params.relative_scaling = RelativeScaling::new(scaling).ok_or_else(|| {
                WordcloudError::invalid_parameter(
                    param_keys::RELATIVE_SCALING,
                    "must lie between 0 and 1",
                )
            })?;
        }

        Ok(Self {
            artifact,
            wordcloud: params,
        })
    }
}

fn url_value(name: &str, value: &Value) -> Result<ServiceUrl, WordcloudError> {
    value
        .as_str()
        .and_then(ServiceUrl::new)
        .ok_or_else(|| WordcloudError::invalid_parameter(name, format!("{value} is not an http(s) URL")))
}

fn number_value(name: &str, value: &Value) -> Result<f64, WordcloudError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| WordcloudError::invalid_parameter(name, format!("{value} is not a number")))
}

fn dimension_value(name: &str, value: &Value) -> Result<u32, WordcloudError> {
    let number = number_value(name, value)?;
    if number.fract() != 0.0 || number < 1.0 {
        return Err(WordcloudError::invalid_parameter(
            name,
            "must be a positive integer",
        ));
    }
    if number > f64::from(MAX_DIMENSION) {
        return Err(WordcloudError::invalid_parameter(
            name,
            format!("must not exceed {MAX_DIMENSION} pixels"),
        ));
    }
    Ok(number as u32)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test input must be an object"),
        }
    }

    #[test]
    fn artifact_is_split_off() {
        let parsed = JobParameters::parse(
            raw(json!({ "deblur BIOM table": 5, "Wordcloud width": 640 })),
            &WordcloudParameters::default(),
        )
        .unwrap();
        assert_eq!(parsed.artifact.as_str(), "5");
        assert_eq!(parsed.wordcloud.width, 640);
        assert_eq!(parsed.wordcloud.height, DEFAULT_HEIGHT);
    }

    #[test]
    fn missing_artifact_is_invalid() {
        let err = JobParameters::parse(raw(json!({})), &WordcloudParameters::default())
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[test]
    fn urls_may_be_form_encoded() {
        let parsed = JobParameters::parse(
            raw(json!({
                "deblur BIOM table": "7",
                "dbBact server URL": "http%3A%2F%2Fdbbact.org",
                "dbBact api URL": "http://api.dbbact.org/",
            })),
            &WordcloudParameters::default(),
        )
        .unwrap();
        assert_eq!(parsed.wordcloud.server_url.as_str(), "http://dbbact.org");
        assert_eq!(parsed.wordcloud.api_url.as_str(), "http://api.dbbact.org");
        assert_eq!(
            parsed.wordcloud.api_url.endpoint("/stats/stats"),
            "http://api.dbbact.org/stats/stats"
        );
    }

    #[test]
    fn numeric_strings_are_accepted() {
        let parsed = JobParameters::parse(
            raw(json!({
                "deblur BIOM table": "7",
                "Minimum ASV sample occurence in feature-table": "0.333",
                "Wordcloud height": "300",
            })),
            &WordcloudParameters::default(),
        )
        .unwrap();
        assert_eq!(parsed.wordcloud.min_occurrence.as_f64(), 0.333);
        assert_eq!(parsed.wordcloud.height, 300);
    }

    #[test]
    fn large_fractions_are_allowed() {
        let parsed = JobParameters::parse(
            raw(json!({
                "deblur BIOM table": "7",
                "Minimum ASV sample occurence in feature-table": 99,
            })),
            &WordcloudParameters::default(),
        )
        .unwrap();
        assert_eq!(parsed.wordcloud.min_occurrence.as_f64(), 99.0);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let defaults = WordcloudParameters::default();
        for (key, value) in [
            ("Wordcloud width", json!(0)),
            ("Wordcloud height", json!(12.5)),
            ("Wordcloud relative scaling", json!(1.5)),
            ("Minimum ASV sample occurence in feature-table", json!(-1)),
            ("Wordcloud background color", json!("not a color!")),
            ("dbBact server URL", json!("ftp://dbbact.org")),
        ] {
            let mut map = raw(json!({ "deblur BIOM table": "1" }));
            map.insert(key.to_string(), value);
            let err = JobParameters::parse(map, &defaults).unwrap_err();
            assert_eq!(err.kind(), "invalid_parameter", "{key}");
        }
    }

    #[test]
    fn background_colors() {
        assert!(BackgroundColor::new("White").is_some());
        assert!(BackgroundColor::new("#fff").is_some());
        assert!(BackgroundColor::new("#12345g").is_none());
        assert!(BackgroundColor::new("").is_none());
        assert_eq!(
            BackgroundColor::new("CornflowerBlue").unwrap().as_str(),
            "cornflowerblue"
        );
    }

    #[test]
    fn unknown_color_names_are_rejected() {
        assert!(BackgroundColor::new("notacolor").is_none());
        let mut map = raw(json!({ "deblur BIOM table": "1" }));
        map.insert("Wordcloud background color".into(), json!("notacolor"));
        let err = JobParameters::parse(map, &WordcloudParameters::default()).unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[test]
    fn oversized_canvases_are_rejected() {
        let defaults = WordcloudParameters::default();
        for value in [json!(100_000), json!("8193"), json!(u64::from(u32::MAX) + 1)] {
            let mut map = raw(json!({ "deblur BIOM table": "1" }));
            map.insert("Wordcloud width".into(), value.clone());
            let err = JobParameters::parse(map, &defaults).unwrap_err();
            assert_eq!(err.kind(), "invalid_parameter", "{value}");
        }
        let mut map = raw(json!({ "deblur BIOM table": "1" }));
        map.insert("Wordcloud height".into(), json!(MAX_DIMENSION));
        let parsed = JobParameters::parse(map, &defaults).unwrap();
        assert_eq!(parsed.wordcloud.height, MAX_DIMENSION);
    }
}
