//! Term coloring.
//!
//! Enriched terms are drawn from a purple ramp and depleted terms from an
//! orange ramp. The term count picks the shade:
//! `intensity = 0.4 + min(count, 10) / 40`, so intensities span `[0.4, 0.65]`.
//!
//! Each ramp is a 256-entry lookup table linearly interpolated between nine
//! ColorBrewer anchors. Sampling and byte conversion truncate, which is what
//! makes `hallo` come out as `#7b73b5` rather than a rounded neighbour.

use serde::{Deserialize, Serialize};

use crate::{TermCounts, TermPolarity};

/// Number of entries in a ramp lookup table.
const LUT_SIZE: usize = 256;

const PURPLES: [[u8; 3]; 9] = [
    [0xfc, 0xfb, 0xfd],
    [0xef, 0xed, 0xf5],
    [0xda, 0xda, 0xeb],
    [0xbc, 0xbd, 0xdc],
    [0x9e, 0x9a, 0xc8],
    [0x80, 0x7d, 0xba],
    [0x6a, 0x51, 0xa3],
    [0x54, 0x27, 0x8f],
    [0x3f, 0x00, 0x7d],
];

const ORANGES: [[u8; 3]; 9] = [
    [0xff, 0xf5, 0xeb],
    [0xfe, 0xe6, 0xce],
    [0xfd, 0xd0, 0xa2],
    [0xfd, 0xae, 0x6b],
    [0xfd, 0x8d, 0x3c],
    [0xf1, 0x69, 0x13],
    [0xd9, 0x48, 0x01],
    [0xa6, 0x36, 0x03],
    [0x7f, 0x27, 0x04],
];

/// An opaque 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// `#rrggbb` in lower case.
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Sequential single-hue color ramps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRamp {
    Purples,
    Oranges,
}

impl ColorRamp {
    /// Ramp used for terms of the given polarity.
    pub fn for_polarity(polarity: TermPolarity) -> Self {
        match polarity {
            TermPolarity::Enriched => Self::Purples,
            TermPolarity::Depleted => Self::Oranges,
        }
    }

    fn anchors(self) -> &'static [[u8; 3]; 9] {
        match self {
            Self::Purples => &PURPLES,
            Self::Oranges => &ORANGES,
        }
    }

    /// Looks up `x` in `[0, 1]`; values outside are clamped to the ends.
    pub fn sample(self, x: f64) -> Rgb {
        let scaled = x * LUT_SIZE as f64;
        let index = if scaled.is_nan() || scaled < 0.0 {
            0
        } else {
            (scaled as usize).min(LUT_SIZE - 1)
        };
        self.entry(index)
    }

    fn entry(self, index: usize) -> Rgb {
        let anchors = self.anchors();
        let exact = |[r, g, b]: [u8; 3]| Rgb { r, g, b };
        if index == 0 {
            return exact(anchors[0]);
        }
        if index >= LUT_SIZE - 1 {
            return exact(anchors[anchors.len() - 1]);
        }
        let segments = (anchors.len() - 1) as f64;
        let position = index as f64 / (LUT_SIZE - 1) as f64 * segments;
        let lower = (position.floor() as usize).min(anchors.len() - 2);
        let frac = position - lower as f64;
        let channel = |c: usize| {
            let from = f64::from(anchors[lower][c]) / 255.0;
            let to = f64::from(anchors[lower + 1][c]) / 255.0;
            let value = frac * (to - from) + from;
            (value * 255.0) as u8
        };
        Rgb {
            r: channel(0),
            g: channel(1),
            b: channel(2),
        }
    }
}

/// Shade intensity for a term count, already clamped to
/// [`crate::enrichment::MAX_TERM_COUNT`].
pub fn intensity(clamped_count: u64) -> f64 {
    0.4 + clamped_count as f64 / 40.0
}

/// Color of `term` in the word cloud.
///
/// Depends only on the term's polarity and its (clamped) count, so the same
/// term is always drawn in the same color.
pub fn term_color(term: &str, term_counts: &TermCounts) -> Rgb {
    let ramp = ColorRamp::for_polarity(TermPolarity::of(term));
    ramp.sample(intensity(term_counts.clamped(term)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enriched_term_without_counts_is_full_purple() {
        assert_eq!(term_color("hallo", &TermCounts::new()).to_hex(), "#7b73b5");
    }

    #[test]
    fn depleted_term_without_counts_is_full_orange() {
        assert_eq!(term_color("-hallo", &TermCounts::new()).to_hex(), "#ec620f");
    }

    #[test]
    fn low_counts_give_lighter_shades() {
        let counts: TermCounts = vec![("hallo".to_string(), 3)].into_iter().collect();
        assert_eq!(term_color("hallo", &counts).to_hex(), "#a4a1cc");
    }

    #[test]
    fn counts_above_ten_match_ten() {
        let many: TermCounts = vec![("hallo".to_string(), 400)].into_iter().collect();
        let ten: TermCounts = vec![("hallo".to_string(), 10)].into_iter().collect();
        assert_eq!(term_color("hallo", &many), term_color("hallo", &ten));
        assert_eq!(term_color("hallo", &many), term_color("hallo", &TermCounts::new()));
    }

    #[test]
    fn ramp_ends_match_anchors() {
        assert_eq!(ColorRamp::Purples.sample(0.0).to_hex(), "#fcfbfd");
        assert_eq!(ColorRamp::Purples.sample(1.0).to_hex(), "#3f007d");
        assert_eq!(ColorRamp::Oranges.sample(-3.0).to_hex(), "#fff5eb");
    }

    #[test]
    fn intensity_spans_expected_range() {
        assert!((intensity(0) - 0.4).abs() < 1e-12);
        assert!((intensity(10) - 0.65).abs() < 1e-12);
    }
}
