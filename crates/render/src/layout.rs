//! Word placement.
//!
//! Terms are taken in descending score order. The first term starts at the
//! canvas height; each following size is
//! `round((rs * score / last_score + (1 - rs)) * last_size)`. A term that
//! fits nowhere is first tried in the other orientation, then shrunk by
//! `font_step` until it fits or drops below `min_font_size`, which ends the
//! layout. Positions are drawn uniformly from all free spots of an
//! occupancy grid, so a fixed seed reproduces the same cloud.

use pipeline::{term_color, CloudLayout, CloudRequest, Orientation, PlacedWord};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::font::TextMeasure;

/// Free pixels kept around every word box.
const MARGIN: usize = 2;

/// Lays out the request's terms on its canvas.
pub fn layout_cloud(request: CloudRequest<'_>, measure: &dyn TextMeasure) -> CloudLayout {
    let params = request.params;
    let options = &params.layout;
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut grid = Occupancy::new(params.width as usize, params.height as usize);
    let scaling = params.relative_scaling.as_f64();
    let min_font_size = options.min_font_size.max(1);
    let font_step = options.font_step.max(1);

    let ranked = request.scores.ranked();
    let top = ranked.first().map(|(_, score)| *score).unwrap_or(0.0);
    let mut words = Vec::new();
    let mut font_size = params.height;
    let mut last_freq = 1.0;

    for (term, score) in ranked.into_iter().take(options.max_words) {
        let freq = if top > 0.0 { score / top } else { 0.0 };
        if freq <= 0.0 {
            continue;
        }
        if scaling != 0.0 {
            let scaled = (scaling * (freq / last_freq) + (1.0 - scaling)) * f64::from(font_size);
            font_size = scaled.round().max(0.0) as u32;
        }

        let mut orientation = if rng.gen::<f64>() < options.prefer_horizontal {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
        let mut tried_other = false;
        let placed = loop {
            if font_size < min_font_size {
                break None;
            }
            let (text_width, text_height) = measure.measure(term, font_size);
            let (width, height) = match orientation {
                Orientation::Horizontal => (text_width as usize, text_height as usize),
                Orientation::Vertical => (text_height as usize, text_width as usize),
            };
            if let Some((row, col)) = grid.sample(height + MARGIN, width + MARGIN, &mut rng) {
                break Some((row + MARGIN / 2, col + MARGIN / 2, width, height));
            }
            if !tried_other && options.prefer_horizontal < 1.0 {
                orientation = flipped(orientation);
                tried_other = true;
            } else {
                font_size = font_size.saturating_sub(font_step);
                orientation = Orientation::Horizontal;
            }
        };
        let Some((y, x, width, height)) = placed else {
            debug!(term, "no room left, stopping layout");
            break;
        };

        grid.fill(y, x, height, width);
        words.push(PlacedWord {
            term: term.to_string(),
            font_size,
            x: x as u32,
            y: y as u32,
            width: width as u32,
            height: height as u32,
            orientation,
            color: term_color(term, request.term_counts),
        });
        last_freq = freq;
    }

    debug!(
        placed = words.len(),
        terms = request.scores.len(),
        "laid out word cloud"
    );
    CloudLayout {
        width: params.width,
        height: params.height,
        background: params.background.clone(),
        words,
    }
}

fn flipped(orientation: Orientation) -> Orientation {
    match orientation {
        Orientation::Horizontal => Orientation::Vertical,
        Orientation::Vertical => Orientation::Horizontal,
    }
}

/// Taken pixels plus their summed-area table.
struct Occupancy {
    width: usize,
    height: usize,
    taken: Vec<bool>,
    /// `(height + 1) x (width + 1)`, first row and column zero.
    integral: Vec<u32>,
}

impl Occupancy {
    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            taken: vec![false; width * height],
            integral: vec![0; (width + 1) * (height + 1)],
        }
    }

    fn at(&self, row: usize, col: usize) -> u32 {
        self.integral[row * (self.width + 1) + col]
    }

    fn area(&self, row: usize, col: usize, height: usize, width: usize) -> u32 {
        (self.at(row + height, col + width) + self.at(row, col))
            - (self.at(row, col + width) + self.at(row + height, col))
    }

    fn free_spots(&self, height: usize, width: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let rows = self.height + 1 - height;
        let cols = self.width + 1 - width;
        (0..rows)
            .flat_map(move |row| (0..cols).map(move |col| (row, col)))
            .filter(move |&(row, col)| self.area(row, col, height, width) == 0)
    }

    /// Top-left corner of a random free `height x width` box.
    fn sample(&self, height: usize, width: usize, rng: &mut impl Rng) -> Option<(usize, usize)> {
        if height > self.height || width > self.width {
            return None;
        }
        let count = self.free_spots(height, width).count();
        if count == 0 {
            return None;
        }
        let goal = rng.gen_range(0..count);
        self.free_spots(height, width).nth(goal)
    }

    fn fill(&mut self, row: usize, col: usize, height: usize, width: usize) {
        for r in row..(row + height).min(self.height) {
            let start = r * self.width;
            for cell in &mut self.taken[start + col..start + (col + width).min(self.width)] {
                *cell = true;
            }
        }
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let stride = self.width + 1;
        for r in 0..self.height {
            let mut row_sum = 0;
            for c in 0..self.width {
                row_sum += u32::from(self.taken[r * self.width + c]);
                self.integral[(r + 1) * stride + c + 1] = self.integral[r * stride + c + 1] + row_sum;
            }
        }
    }
}
