//! Request and response bodies of the dbBact API.

use indexmap::IndexMap;
use pipeline::{DatabaseStats, EnrichmentScores, ScoreMap, Sequence, TermCounts, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub(crate) struct FscoresRequest<'a> {
    pub sequences: &'a [Sequence],
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum FscoresResponse {
    Extended {
        fscore: ScoreMap,
        #[serde(default)]
        term_count: TermCounts,
    },
    Bare(ScoreMap),
}

impl FscoresResponse {
    pub(crate) fn into_scores(self) -> EnrichmentScores {
        match self {
            Self::Extended { fscore, term_count } => EnrichmentScores {
                scores: fscore,
                term_counts: term_count,
            },
            Self::Bare(scores) => EnrichmentScores {
                scores,
                term_counts: TermCounts::new(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsResponse {
    stats: IndexMap<String, Value>,
}

impl StatsResponse {
    pub(crate) fn into_stats(self, queried_at: Timestamp) -> DatabaseStats {
        let entries = self
            .stats
            .into_iter()
            .map(|(name, value)| {
                let text = match value {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (name, text)
            })
            .collect();
        DatabaseStats {
            entries,
            queried_at,
        }
    }
}
