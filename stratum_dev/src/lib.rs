// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Stratum Dev
//!
//! This crate provides layer fixtures and a font-free glyph source for
//! developing Stratum.

use core::f64::consts::TAU;

use stratum::{GlyphBitmap, GlyphSource, Layer, Point, Polygon, Ring, TextMeasure};

/// An axis-aligned square ring.
pub fn square(min: f64, max: f64) -> Ring {
    rect(min, min, max, max)
}

/// An axis-aligned rectangular ring, counter-clockwise.
pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
    Ring::from_coords(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
        .expect("rectangle has four distinct corners")
}

/// An ellipse approximated by `segments` vertices.
pub fn ellipse(center: Point, rx: f64, ry: f64, segments: usize) -> Ring {
    let points = (0..segments)
        .map(|i| {
            let a = TAU * i as f64 / segments as f64;
            Point::new(center.x + rx * a.cos(), center.y + ry * a.sin())
        })
        .collect();
    Ring::new(points).expect("ellipse has at least three vertices")
}

/// Three nested square terraces on a 100 by 100 extent.
///
/// The middle terrace has a square pit in its center.
pub fn terraced_hill() -> Vec<Layer> {
    vec![
        Layer::new(100.0, vec![Polygon::new(square(0.0, 100.0), vec![])]),
        Layer::new(
            200.0,
            vec![Polygon::new(square(20.0, 80.0), vec![square(45.0, 55.0)])],
        ),
        Layer::new(300.0, vec![Polygon::new(square(30.0, 70.0), vec![])]),
    ]
}

/// Two islands that rise to different heights.
///
/// The second layer keeps both islands, the third only the larger one.
pub fn islands() -> Vec<Layer> {
    vec![
        Layer::new(
            0.0,
            vec![
                Polygon::new(rect(0.0, 0.0, 40.0, 40.0), vec![]),
                Polygon::new(rect(60.0, 0.0, 120.0, 60.0), vec![]),
            ],
        ),
        Layer::new(
            50.0,
            vec![
                Polygon::new(rect(10.0, 10.0, 30.0, 30.0), vec![]),
                Polygon::new(rect(70.0, 10.0, 110.0, 50.0), vec![]),
            ],
        ),
        Layer::new(
            100.0,
            vec![Polygon::new(ellipse(Point::new(90.0, 30.0), 15.0, 10.0, 48), vec![])],
        ),
    ]
}

/// [`terraced_hill`] with a layer of no polygons inserted on top of the base.
pub fn hill_with_gap() -> Vec<Layer> {
    let mut layers = terraced_hill();
    layers.insert(1, Layer::new(150.0, vec![]));
    layers
}

/// A glyph source that draws every character as a solid block.
///
/// Advances are `size * 0.6` per character, matching the estimated metrics
/// of the vector backend.
#[derive(Clone, Debug, Default)]
pub struct BlockGlyphs {
    /// Number of glyphs rasterized so far.
    pub rasterized: usize,
}

impl BlockGlyphs {
    /// Width of a character relative to the font size.
    pub const ADVANCE_RATIO: f64 = 0.6;
}

impl TextMeasure for BlockGlyphs {
    fn measure_text_width(&mut self, text: &str, size: f64) -> Option<f64> {
        Some(text.chars().count() as f64 * size * Self::ADVANCE_RATIO)
    }
}

impl GlyphSource for BlockGlyphs {
    fn rasterize_glyph(&mut self, ch: char, size: f64, _rotation: f64) -> Option<GlyphBitmap> {
        if ch.is_whitespace() {
            return None;
        }
        self.rasterized += 1;
        let advance = size * Self::ADVANCE_RATIO;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "fixture glyphs are small"
        )]
        let (width, height) = (
            advance.round().max(1.0) as u32,
            (size * 0.7).round().max(1.0) as u32,
        );
        #[expect(
            clippy::cast_possible_truncation,
            reason = "fixture glyphs are small"
        )]
        let advance = advance as f32;
        Some(GlyphBitmap {
            left: 0,
            top: i32::try_from(height).unwrap_or(i32::MAX),
            width,
            height,
            advance,
            mask: vec![255; (width * height) as usize],
        })
    }
}
