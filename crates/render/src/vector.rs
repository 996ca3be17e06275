//! SVG encoding of a layout.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pipeline::{CloudLayout, Orientation, PlacedWord};
use svg::node::element::{Rectangle, Style, Text};
use svg::Document;

use crate::font::{font_format, TextMeasure};

/// Builds the SVG document for `layout`.
///
/// With `embed` set, the font data is inlined as a base64 `@font-face` so
/// the file renders the same without the font installed.
pub fn document(layout: &CloudLayout, font: &dyn TextMeasure, embed: Option<&[u8]>) -> Document {
    let family = font.family();
    let mut doc = Document::new()
        .set("viewBox", (0, 0, layout.width, layout.height))
        .set("width", layout.width)
        .set("height", layout.height);

    if let Some(data) = embed {
        let (mime, format) = font_format(data);
        let css = format!(
            "@font-face {{ font-family: '{family}'; src: url(data:{mime};base64,{}) format('{format}'); }}",
            STANDARD.encode(data)
        );
        doc = doc.add(Style::new(css));
    }

    doc = doc.add(
        Rectangle::new()
            .set("x", 0)
            .set("y", 0)
            .set("width", layout.width)
            .set("height", layout.height)
            .set("fill", layout.background.as_str()),
    );

    for word in &layout.words {
        doc = doc.add(word_text(word, family, font.ascent(word.font_size)));
    }
    doc
}

fn word_text(word: &PlacedWord, family: &str, ascent: f64) -> Text {
    let text = Text::new(word.term.as_str())
        .set("font-family", family)
        .set("font-size", word.font_size)
        .set("fill", word.color.to_hex());
    match word.orientation {
        Orientation::Horizontal => text
            .set("x", word.x)
            .set("y", f64::from(word.y) + ascent),
        // Baseline runs upwards; ascent extends to the left of it.
        Orientation::Vertical => {
            let x = f64::from(word.x) + ascent;
            let y = f64::from(word.y) + f64::from(word.height);
            text.set("transform", format!("translate({x} {y}) rotate(-90)"))
        }
    }
}

#[cfg(test)]
mod tests {
    use pipeline::{BackgroundColor, Rgb};

    use super::*;

    struct Fake;

    impl TextMeasure for Fake {
        fn family(&self) -> &str {
            "Fake Sans"
        }

        fn measure(&self, text: &str, size: u32) -> (u32, u32) {
            (text.len() as u32 * size, size)
        }

        fn ascent(&self, size: u32) -> f64 {
            f64::from(size) * 0.75
        }
    }

    fn layout() -> CloudLayout {
        CloudLayout {
            width: 400,
            height: 200,
            background: BackgroundColor::new("white").unwrap(),
            words: vec![
                PlacedWord {
                    term: "feces".into(),
                    font_size: 40,
                    x: 10,
                    y: 20,
                    width: 200,
                    height: 40,
                    orientation: Orientation::Horizontal,
                    color: Rgb { r: 0x7b, g: 0x73, b: 0xb5 },
                },
                PlacedWord {
                    term: "-skin".into(),
                    font_size: 20,
                    x: 300,
                    y: 10,
                    width: 20,
                    height: 100,
                    orientation: Orientation::Vertical,
                    color: Rgb { r: 0xec, g: 0x62, b: 0x0f },
                },
            ],
        }
    }

    #[test]
    fn words_are_written_with_their_colors() {
        let svg = document(&layout(), &Fake, None).to_string();
        assert!(svg.contains(r#"width="400""#));
        assert!(svg.contains(r##"fill="#7b73b5""##));
        assert!(svg.contains(r##"fill="#ec620f""##));
        assert!(svg.contains(r#"y="50""#));
        assert!(svg.contains("translate(315 110) rotate(-90)"));
        assert!(svg.contains(r#"fill="white""#));
    }

    #[test]
    fn embedded_fonts_are_base64_font_faces() {
        let svg = document(&layout(), &Fake, Some(b"\0\x01\0\0glyphs")).to_string();
        assert!(svg.contains("@font-face"));
        assert!(svg.contains("Fake Sans"));
        assert!(svg.contains(&STANDARD.encode(b"\0\x01\0\0glyphs")));
        assert!(svg.contains("truetype"));
    }
}
