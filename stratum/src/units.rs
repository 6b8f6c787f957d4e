// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit conversion and canvas sizing.

use peniko::kurbo::Rect;

use crate::geometry::pad_degenerate;

const MM_PER_INCH: f64 = 25.4;

/// Converts millimeters to pixels at the given resolution.
pub fn mm_to_pixels(mm: f64, dpi: f64) -> f64 {
    mm / MM_PER_INCH * dpi
}

/// How the height-to-width ratio of a canvas is derived from its bounds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum AspectMode {
    /// Bounds are longitude/latitude degrees. The longitude span is shortened
    /// by the cosine of the center latitude.
    #[default]
    Geographic,
    /// Bounds are in a projected coordinate system with equal axis units.
    Planar,
}

/// Returns the height-to-width ratio of the content drawn for `bounds`.
pub fn content_aspect(bounds: Rect, mode: AspectMode) -> f64 {
    let bounds = pad_degenerate(bounds);
    let width = match mode {
        AspectMode::Geographic => {
            let center_lat = bounds.center().y.to_radians();
            bounds.width() * center_lat.cos().abs().max(1e-6)
        }
        AspectMode::Planar => bounds.width(),
    };
    bounds.height() / width
}
