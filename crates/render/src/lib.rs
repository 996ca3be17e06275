//! Word cloud rendering and table serialization.
//!
//! Implements [`pipeline::WordcloudRenderer`] ([`WordcloudPainter`]) and
//! [`pipeline::TableWriter`] ([`TsvTables`]).
//!
//! A layout is computed once and encoded twice: as SVG with the font
//! embedded, and as PNG by rasterizing the same SVG with resvg. Both files
//! therefore show identical word positions.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Font discovery, image encoding and file output live
//! here; the [`pipeline`] crate only sees [`pipeline::CloudLayout`].

pub mod font;
pub mod layout;
pub mod raster;
pub mod tables;
pub mod vector;

use std::path::{Path, PathBuf};

use pipeline::{params::MAX_DIMENSION, CloudLayout, CloudRequest, WordcloudError, WordcloudRenderer};
use thiserror::Error;
use tracing::{debug, instrument};

pub use font::{FontFace, TextMeasure};
pub use layout::layout_cloud;
pub use tables::TsvTables;

/// Failures while drawing.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no usable font found; configure a font file")]
    NoFont,

    #[error("could not read font file {path}: {source}")]
    FontFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font could not be parsed: {reason}")]
    FontParse { reason: String },

    #[error("generated SVG is invalid: {reason}")]
    Svg { reason: String },

    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    #[error("could not write PNG {path}: {reason}")]
    Png { path: PathBuf, reason: String },

    #[error("could not write SVG {path}: {source}")]
    SvgWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<RenderError> for WordcloudError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Png { path, reason } => WordcloudError::OutputWrite { path, reason },
            RenderError::SvgWrite { path, source } => WordcloudError::OutputWrite {
                path,
                reason: source.to_string(),
            },
            other => WordcloudError::RenderFailed {
                reason: other.to_string(),
            },
        }
    }
}

/// Lays out and draws word clouds in one font.
#[derive(Debug, Clone)]
pub struct WordcloudPainter {
    font: FontFace,
}

impl WordcloudPainter {
    pub fn new(font: FontFace) -> Self {
        Self { font }
    }

    /// Painter using the font at `font_path`, or a system sans-serif face.
    pub fn with_font_path(font_path: Option<&Path>) -> Result<Self, RenderError> {
        FontFace::resolve(font_path).map(Self::new)
    }

    pub fn font(&self) -> &FontFace {
        &self.font
    }
}

impl WordcloudRenderer for WordcloudPainter {
    fn layout(&self, request: CloudRequest<'_>) -> Result<CloudLayout, WordcloudError> {
        let (width, height) = (request.params.width, request.params.height);
        // The occupancy grid holds a few bytes per pixel.
        if width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RenderError::Canvas { width, height }.into());
        }
        Ok(layout_cloud(request, &self.font))
    }

    #[instrument(skip_all, fields(words = layout.words.len()))]
    fn draw(&self, layout: &CloudLayout, raster: &Path, vector: &Path) -> Result<(), WordcloudError> {
        let plain = vector::document(layout, &self.font, None).to_string();
        raster::write_png(&plain, Some(self.font.data()), layout.width, layout.height, raster)?;
        debug!(path = %raster.display(), "wrote PNG");

        let embedded = vector::document(layout, &self.font, Some(self.font.data())).to_string();
        std::fs::write(vector, embedded).map_err(|source| RenderError::SvgWrite {
            path: vector.to_path_buf(),
            source,
        })?;
        debug!(path = %vector.display(), "wrote SVG");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_failures_are_output_errors() {
        let err: WordcloudError = RenderError::Png {
            path: PathBuf::from("/out/wordcloud.png"),
            reason: "disk full".into(),
        }
        .into();
        assert_eq!(err.kind(), "output_write");
    }

    #[test]
    fn oversized_canvases_fail_before_layout() {
        let Ok(font) = FontFace::system_sans_serif() else {
            return;
        };
        let painter = WordcloudPainter::new(font);
        let scores = pipeline::ScoreMap::from_iter([("feces".to_string(), 0.5)]);
        let counts = pipeline::TermCounts::new();
        let mut params = pipeline::WordcloudParameters::default();
        params.width = 100_000;
        params.height = 100_000;

        let err = painter
            .layout(CloudRequest {
                scores: &scores,
                term_counts: &counts,
                params: &params,
            })
            .unwrap_err();
        assert_eq!(err.kind(), "render_failed");
    }

    #[test]
    fn missing_fonts_are_render_failures() {
        let err: WordcloudError = RenderError::NoFont.into();
        assert_eq!(err.kind(), "render_failed");
    }
}
