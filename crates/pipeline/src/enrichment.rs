//! Results returned by the term-enrichment service.
//!
//! [`ScoreMap`] and [`TermCounts`] keep the order in which dbBact listed the
//! terms; the renderer and the table writer decide their own order.

use std::cmp::Ordering;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::Timestamp;

/// Highest term count that still changes the color; larger counts clamp.
pub const MAX_TERM_COUNT: u64 = 10;

// ---------------------------------------------------------------------------

/// F-score per term. Depleted terms carry a leading `-`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreMap(IndexMap<String, f64>);

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the score of `term`.
    pub fn insert(&mut self, term: impl Into<String>, score: f64) {
        self.0.insert(term.into(), score);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Terms in service order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(term, score)| (term.as_str(), *score))
    }

    /// Terms by descending score; ties are broken by term so the order is
    /// stable across runs.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
    }
}

impl FromIterator<(String, f64)> for ScoreMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------

/// Number of reference experiments each term was seen in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermCounts(IndexMap<String, u64>);

impl TermCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, term: impl Into<String>, count: u64) {
        self.0.insert(term.into(), count);
    }

    /// Count used for coloring: the recorded count capped at
    /// [`MAX_TERM_COUNT`], or the cap itself when the term is unknown.
    pub fn clamped(&self, term: &str) -> u64 {
        self.0
            .get(term)
            .map_or(MAX_TERM_COUNT, |count| (*count).min(MAX_TERM_COUNT))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, u64)> for TermCounts {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ---------------------------------------------------------------------------

/// Everything one scoring request yields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentScores {
    pub scores: ScoreMap,
    /// Empty when the service does not report counts.
    pub term_counts: TermCounts,
}

// ---------------------------------------------------------------------------

/// Summary statistics of the dbBact database at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStats {
    /// `(name, value)` pairs in service order; values are already rendered
    /// as text.
    pub entries: Vec<(String, String)>,
    /// When the statistics were requested.
    pub queried_at: Timestamp,
}

impl DatabaseStats {
    /// Name of the synthetic row carrying [`DatabaseStats::queried_at`].
    pub const TIMESTAMP_KEY: &'static str = "query_timestamp";

    /// Rows to serialize: the service entries followed by the query time.
    pub fn rows(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.entries
            .iter()
            .cloned()
            .chain(std::iter::once((
                Self::TIMESTAMP_KEY.to_string(),
                self.queried_at.to_string(),
            )))
    }
}
