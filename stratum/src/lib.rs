// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stratum renders stacks of elevation-banded contour polygons into artwork for
//! stacked relief models: cut-line vector sheets and rasterized previews.
//!
//! The input is an ascending-elevation list of [`Layer`]s. Both backends share
//! one [`CanvasTransform`], one [`ColorScheme`] mapping over the range of the
//! whole stack and one [`LabelPlacer`], so a layer looks the same whether it
//! is exported alone or as part of a combined sheet.
//!
//! Each layer can carry two labels:
//!
//! - a *visible* label in the permanently exposed part of the sheet, fitted by
//!   shrinking and splitting the text, and
//! - a *hidden* label placed inside the area that the next layer covers once
//!   the sheets are stacked, searched for with a font-scale ladder and
//!   optionally laid out along a curve that follows the covering shape.
//!
//! ## Example
//!
//! ```no_run
//! use stratum::{Layer, Point, Polygon, Ring, SvgConfig, VectorRenderer};
//!
//! let square = |min: f64, max: f64| {
//!     Ring::new(vec![
//!         Point::new(min, min),
//!         Point::new(max, min),
//!         Point::new(max, max),
//!         Point::new(min, max),
//!     ])
//! };
//! let layers = vec![
//!     Layer::new(100.0, vec![Polygon::new(square(0.0, 10.0).unwrap(), vec![])]),
//!     Layer::new(200.0, vec![Polygon::new(square(3.0, 7.0).unwrap(), vec![])]),
//! ];
//! let renderer = VectorRenderer::new(SvgConfig::default());
//! let written = renderer.export_layers(&layers, "out", "relief");
//! assert_eq!(written.len(), 2);
//! ```

// LINEBENDER LINT SET - lib.rs - v3
// See https://linebender.org/wiki/canonical-lints/
// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
// Targeting e.g. 32-bit means structs containing usize can give false positives for 64-bit.
#![cfg_attr(target_pointer_width = "64", warn(clippy::trivially_copy_pass_by_ref))]
// END LINEBENDER LINT SET
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use peniko::kurbo::{Point, Rect, Size};
pub use peniko::Color;

mod canvas;
mod color;
mod error;
mod font;
mod geometry;
mod transform;
mod units;

pub mod label;
pub mod render;
pub mod text;

pub use canvas::{RasterCanvas, Rgba8};
pub use color::{rgba8, ColorScheme, ElevationRange, RenderMode};
pub use error::Error;
pub use font::{
    resolve_font_path, EstimatedMetrics, FontConfig, FontResource, GlyphBitmap, GlyphSource,
    TextMeasure,
};
pub use geometry::{pad_degenerate, stack_bounds, Layer, Polygon, Ring};
pub use label::pattern::{substitute_filename, substitute_label, LabelUnits, PatternValues};
pub use label::{
    Anchor, LabelConfig, LabelContext, LabelKind, LabelPlacer, PlacedLabel, SheetLabels,
};
pub use render::raster::{RasterConfig, RasterRenderer};
pub use render::vector::{SvgConfig, VectorRenderer};
pub use render::{fill_color, layer_file_stem, LayerReport, StackContext, Stage};
pub use transform::{to_canvas, CanvasTransform};
pub use units::{content_aspect, mm_to_pixels, AspectMode};

/// Result type used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
