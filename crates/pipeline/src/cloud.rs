//! Word cloud layout produced by a renderer and drawn twice (PNG and SVG).

use serde::{Deserialize, Serialize};

use crate::{BackgroundColor, Rgb};

/// Text direction of a placed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    /// Rotated 90 degrees counter-clockwise, reading bottom to top.
    Vertical,
}

/// One term at its final size, position, and color.
///
/// `(x, y)` is the top-left corner of the word's bounding box in canvas
/// pixels; `width` and `height` are the box as occupied on the canvas, so
/// for vertical words they are already swapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub term: String,
    pub font_size: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub orientation: Orientation,
    pub color: Rgb,
}

/// A complete layout on a fixed canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudLayout {
    pub width: u32,
    pub height: u32,
    pub background: BackgroundColor,
    /// Words in placement order (largest first).
    pub words: Vec<PlacedWord>,
}

impl CloudLayout {
    /// Returns `true` if no two word boxes overlap and all lie on the canvas.
    pub fn is_consistent(&self) -> bool {
        let on_canvas = self.words.iter().all(|w| {
            u64::from(w.x) + u64::from(w.width) <= u64::from(self.width)
                && u64::from(w.y) + u64::from(w.height) <= u64::from(self.height)
        });
        let disjoint = self.words.iter().enumerate().all(|(i, a)| {
            self.words[i + 1..].iter().all(|b| {
                a.x + a.width <= b.x
                    || b.x + b.width <= a.x
                    || a.y + a.height <= b.y
                    || b.y + b.height <= a.y
            })
        });
        on_canvas && disjoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(x: u32, y: u32, width: u32, height: u32) -> PlacedWord {
        PlacedWord {
            term: "t".into(),
            font_size: 10,
            x,
            y,
            width,
            height,
            orientation: Orientation::Horizontal,
            color: Rgb { r: 0, g: 0, b: 0 },
        }
    }

    fn layout(words: Vec<PlacedWord>) -> CloudLayout {
        CloudLayout {
            width: 100,
            height: 50,
            background: BackgroundColor::new("white").unwrap(),
            words,
        }
    }

    #[test]
    fn touching_boxes_are_consistent() {
        assert!(layout(vec![word(0, 0, 10, 10), word(10, 0, 10, 10)]).is_consistent());
    }

    #[test]
    fn overlapping_boxes_are_not() {
        assert!(!layout(vec![word(0, 0, 10, 10), word(5, 5, 10, 10)]).is_consistent());
    }

    #[test]
    fn boxes_off_canvas_are_not() {
        assert!(!layout(vec![word(95, 0, 10, 10)]).is_consistent());
    }
}
