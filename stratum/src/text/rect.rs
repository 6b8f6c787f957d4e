// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use peniko::kurbo::Point;

use crate::geometry::bounds_of;

/// Font scales tried by [`search_scale_ladder`], largest first.
const SCALE_LADDER: [f64; 6] = [1.0, 0.9, 0.8, 0.7, 0.6, 0.5];

/// Returns the font scales tried for hidden labels, largest first.
pub fn scale_ladder() -> impl Iterator<Item = f64> {
    SCALE_LADDER.into_iter()
}

/// A horizontal band inside a shape that can hold a line of text.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextRect {
    /// Center of the text.
    pub center: Point,
    /// Required width.
    pub width: f64,
    /// Required height.
    pub height: f64,
    /// Whether a band wide enough was found.
    pub valid: bool,
}

impl TextRect {
    fn invalid(width: f64, height: f64) -> Self {
        Self {
            center: Point::ZERO,
            width,
            height,
            valid: false,
        }
    }
}

/// Searches boundary samples for a band that fits `width` x `height`.
///
/// Candidate bands start at the top of the samples and move down by `step`.
/// The usable width of a band is the horizontal extent of the samples whose
/// y falls within `[y, y + height)`. This is measured on boundary samples
/// only, so concave shapes can overestimate the room inside a band; dense
/// samples keep the estimate close to the true extent.
///
/// The widest band wins, earliest on ties. A valid result is centered
/// horizontally on the extent of all samples and vertically on the band.
pub fn find_optimal_text_rect(samples: &[Point], width: f64, height: f64, step: f64) -> TextRect {
    let Some(bounds) = bounds_of(samples.iter().copied()) else {
        return TextRect::invalid(width, height);
    };
    if step <= 0.0 || height <= 0.0 || bounds.height() < height {
        return TextRect::invalid(width, height);
    }

    #[expect(
        clippy::cast_possible_truncation,
        reason = "band count is bounded by the shape height"
    )]
    let bands = ((bounds.height() - height) / step).floor() as usize;
    let mut best_width = 0.0;
    let mut best_y = None;
    for band in 0..=bands {
        let y = bounds.y0 + band as f64 * step;
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        for p in samples.iter().filter(|p| p.y >= y && p.y < y + height) {
            min_x = min_x.min(p.x);
            max_x = max_x.max(p.x);
        }
        if max_x > min_x && max_x - min_x > best_width {
            best_width = max_x - min_x;
            best_y = Some(y);
        }
    }

    match best_y {
        Some(y) if best_width >= width => TextRect {
            center: Point::new((bounds.x0 + bounds.x1) * 0.5, y + height * 0.5),
            width,
            height,
            valid: true,
        },
        _ => TextRect::invalid(width, height),
    }
}

/// A successful step of [`search_scale_ladder`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LadderFit {
    /// Scale relative to the nominal font size.
    pub scale: f64,
    /// The font size at that scale.
    pub font_size: f64,
    /// Where the text goes.
    pub rect: TextRect,
    /// Number of scales tried, including the successful one.
    pub attempts: usize,
}

/// Runs [`find_optimal_text_rect`] at each scale of [`scale_ladder`] and
/// stops at the first fit.
///
/// `text_size` returns the width and height of the text at a font size, or
/// `None` if it cannot be measured, in which case that scale is skipped.
/// Returns `None` if no scale fits.
pub fn search_scale_ladder(
    samples: &[Point],
    nominal_size: f64,
    step: f64,
    mut text_size: impl FnMut(f64) -> Option<(f64, f64)>,
) -> Option<LadderFit> {
    for (i, scale) in scale_ladder().enumerate() {
        let font_size = nominal_size * scale;
        let Some((width, height)) = text_size(font_size) else {
            continue;
        };
        let rect = find_optimal_text_rect(samples, width, height, step);
        if rect.valid {
            return Some(LadderFit {
                scale,
                font_size,
                rect,
                attempts: i + 1,
            });
        }
    }
    None
}
