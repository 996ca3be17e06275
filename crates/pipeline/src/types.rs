//! Shared value types for the wordcloud pipeline domain.
//!
//! Unlike the opaque identifiers in [`crate::identifiers`], these types carry
//! invariants (sequences are pure DNA, fractions are non-negative) and take
//! part in domain computations.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

/// Returns `true` if `value` is a non-empty string over the alphabet `ACGT`.
pub fn is_dna(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T'))
}

/// An ASV sequence: a non-empty string over `A`, `C`, `G`, `T`.
///
/// Deblur names its features by the sequence itself, so a feature identifier
/// that passes validation doubles as the query sent to dbBact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sequence(String);

impl Sequence {
    /// Creates a [`Sequence`], returning `None` unless `value` is pure DNA.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if is_dna(&v) {
            Some(Self(v))
        } else {
            None
        }
    }

    /// Returns the sequence as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Sequence {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Sequence::new(value.clone()).ok_or(value)
    }
}

impl From<Sequence> for String {
    fn from(value: Sequence) -> Self {
        value.0
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Bounded parameters
// ---------------------------------------------------------------------------

/// Minimum fraction of samples in which a feature must be observed.
///
/// Any finite non-negative value is accepted. Fractions above `1.0` are
/// legal and simply select nothing.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct OccurrenceFraction(pub(crate) f64);

impl OccurrenceFraction {
    /// Creates an [`OccurrenceFraction`], returning `None` if `value` is
    /// negative, infinite, or NaN.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && value >= 0.0 {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the fraction as an `f64`.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for OccurrenceFraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

// ---------------------------------------------------------------------------

/// Relative importance of score ratios for font sizes, in `[0.0, 1.0]`.
///
/// `0.0` sizes words by rank only, `1.0` makes a word with twice the score
/// twice as large.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct RelativeScaling(pub(crate) f64);

impl RelativeScaling {
    /// Creates a [`RelativeScaling`], returning `None` outside `[0.0, 1.0]`.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the scaling as an `f64` in `[0.0, 1.0]`.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for RelativeScaling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Terms
// ---------------------------------------------------------------------------

/// Direction of association between a term and the query sequences.
///
/// dbBact marks terms that are depleted in the query set with a leading `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermPolarity {
    /// Term is over-represented in the query set.
    Enriched,
    /// Term is under-represented in the query set (`-` prefix).
    Depleted,
}

impl TermPolarity {
    /// Classifies a term by its prefix.
    pub fn of(term: &str) -> Self {
        if term.starts_with('-') {
            Self::Depleted
        } else {
            Self::Enriched
        }
    }
}

// ---------------------------------------------------------------------------

/// When a remote query was issued, in UTC.
///
/// Displayed as RFC 3339 with second precision, e.g. `2024-03-05T09:12:44Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self(instant)
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}
