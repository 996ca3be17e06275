//! Font loading and text measurement.

use std::path::Path;
use std::sync::Arc;

use resvg::usvg::fontdb::{Database, Family, Query};
use tracing::debug;
use ttf_parser::{name_id, Face, GlyphId};

use crate::RenderError;

/// Families tried when the database has no mapping for generic sans-serif.
const SANS_SERIF_FALLBACKS: [&str; 5] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Open Sans",
    "FreeSans",
];

/// Box size and baseline of text set in one font.
pub trait TextMeasure {
    /// Family name written into the SVG.
    fn family(&self) -> &str;

    /// Width and height in whole pixels of `text` on one line at `size`.
    fn measure(&self, text: &str, size: u32) -> (u32, u32);

    /// Distance from the top of the line box to the baseline at `size`.
    fn ascent(&self, size: u32) -> f64;
}

/// A parsed font face and its raw data.
#[derive(Debug, Clone)]
pub struct FontFace {
    family: String,
    data: Arc<Vec<u8>>,
    index: u32,
    units_per_em: f64,
    ascender: f64,
    descender: f64,
}

impl FontFace {
    /// Loads the font at `path` if given, else a sans-serif system font.
    pub fn resolve(path: Option<&Path>) -> Result<Self, RenderError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::system_sans_serif(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let data = std::fs::read(path).map_err(|source| RenderError::FontFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(data, 0)
    }

    /// First sans-serif face of the system font database.
    pub fn system_sans_serif() -> Result<Self, RenderError> {
        let mut db = Database::new();
        db.load_system_fonts();

        let generic = db.query(&Query {
            families: &[Family::SansSerif],
            ..Query::default()
        });
        let id = generic
            .or_else(|| {
                SANS_SERIF_FALLBACKS.iter().find_map(|name| {
                    db.query(&Query {
                        families: &[Family::Name(name)],
                        ..Query::default()
                    })
                })
            })
            .or_else(|| db.faces().next().map(|face| face.id))
            .ok_or(RenderError::NoFont)?;

        let (data, index) = db
            .with_face_data(id, |data, index| (data.to_vec(), index))
            .ok_or(RenderError::NoFont)?;
        let face = Self::from_bytes(data, index)?;
        debug!(family = %face.family, "using system font");
        Ok(face)
    }

    /// Parses face `index` of a font file or collection.
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Result<Self, RenderError> {
        let face = Face::parse(&data, index).map_err(|err| RenderError::FontParse {
            reason: err.to_string(),
        })?;
        let family = [name_id::TYPOGRAPHIC_FAMILY, name_id::FAMILY]
            .into_iter()
            .find_map(|id| {
                face.names()
                    .into_iter()
                    .filter(|name| name.name_id == id && name.is_unicode())
                    .find_map(|name| name.to_string())
            })
            .unwrap_or_else(|| "sans-serif".to_string());
        let units_per_em = f64::from(face.units_per_em());
        let ascender = f64::from(face.ascender());
        let descender = f64::from(face.descender());
        Ok(Self {
            family,
            data: Arc::new(data),
            index,
            units_per_em,
            ascender,
            descender,
        })
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn scale(&self, size: u32) -> f64 {
        f64::from(size) / self.units_per_em
    }

    fn advance(&self, text: &str) -> f64 {
        let Ok(face) = Face::parse(&self.data, self.index) else {
            return 0.0;
        };
        let fallback = face
            .glyph_hor_advance(GlyphId(0))
            .map(f64::from)
            .unwrap_or(self.units_per_em / 2.0);
        text.chars()
            .map(|c| {
                face.glyph_index(c)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .map(f64::from)
                    .unwrap_or(fallback)
            })
            .sum()
    }
}

impl TextMeasure for FontFace {
    fn family(&self) -> &str {
        &self.family
    }

    fn measure(&self, text: &str, size: u32) -> (u32, u32) {
        let scale = self.scale(size);
        let width = (self.advance(text) * scale).ceil();
        let height = ((self.ascender - self.descender) * scale).ceil();
        (width.max(0.0) as u32, height.max(0.0) as u32)
    }

    fn ascent(&self, size: u32) -> f64 {
        self.ascender * self.scale(size)
    }
}

/// MIME type and CSS `format()` hint of a font file.
pub(crate) fn font_format(data: &[u8]) -> (&'static str, &'static str) {
    match data.get(..4) {
        Some(b"OTTO") => ("font/otf", "opentype"),
        Some(b"wOFF") => ("font/woff", "woff"),
        Some(b"wOF2") => ("font/woff2", "woff2"),
        Some(b"ttcf") => ("font/collection", "collection"),
        _ => ("font/ttf", "truetype"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_is_not_a_font() {
        assert!(matches!(
            FontFace::from_bytes(b"not a font".to_vec(), 0),
            Err(RenderError::FontParse { .. })
        ));
    }

    #[test]
    fn missing_font_files_are_reported() {
        assert!(matches!(
            FontFace::from_file(Path::new("/nonexistent/font.ttf")),
            Err(RenderError::FontFile { .. })
        ));
    }

    #[test]
    fn formats_are_sniffed_from_the_magic() {
        assert_eq!(font_format(b"OTTO\0\0").1, "opentype");
        assert_eq!(font_format(b"\0\x01\0\0").0, "font/ttf");
        assert_eq!(font_format(b"wOF2").0, "font/woff2");
    }

    #[test]
    fn system_fonts_measure_wider_text_as_wider() {
        // Machines without fonts cannot run this check.
        let Ok(face) = FontFace::system_sans_serif() else {
            return;
        };
        let (short, line) = face.measure("soil", 20);
        let (long, same_line) = face.measure("soil and feces", 20);
        assert!(long > short);
        assert_eq!(line, same_line);
        assert!(face.ascent(20) > 0.0);
    }
}
