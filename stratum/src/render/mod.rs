// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The two output backends and the contract they share.
//!
//! Both backends render a sheet in the same order of [`Stage`]s, compute the
//! elevation range of the whole stack once in a [`StackContext`], take fill
//! colors from [`fill_color`] and ask the same [`LabelPlacer`] for labels.
//! What differs is only how a polygon, a line or a glyph ends up in the
//! output.

pub mod raster;
pub mod vector;

use std::path::{Path, PathBuf};

use peniko::kurbo::{Rect, Size};
use peniko::Color;

use crate::color::{ColorScheme, ElevationRange, RenderMode};
use crate::font::TextMeasure;
use crate::geometry::{pad_degenerate, stack_bounds, Layer, Polygon};
use crate::label::pattern::substitute_filename;
use crate::label::{heuristic_hidden_bbox, LabelContext, LabelPlacer, SheetLabels};
use crate::transform::CanvasTransform;
use crate::{Error, Result};

/// File stem used when no pattern is configured.
pub const DEFAULT_FILENAME_PATTERN: &str = "%{b}_layer_%{l}";

/// Stack-wide values computed once per export.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StackContext {
    range: ElevationRange,
    bounds: Rect,
}

impl StackContext {
    /// Computes the elevation range and geographic bounds of `layers`.
    ///
    /// Either can be overridden, for example to color a partial stack like
    /// the full one. Fails with [`Error::EmptyStack`] if a value is neither
    /// given nor derivable.
    pub fn new(
        layers: &[Layer],
        bounds: Option<Rect>,
        range: Option<ElevationRange>,
    ) -> Result<Self> {
        let range = range
            .or_else(|| ElevationRange::from_layers(layers))
            .ok_or(Error::EmptyStack)?;
        let bounds = bounds
            .or_else(|| stack_bounds(layers))
            .ok_or(Error::EmptyStack)?;
        Ok(Self {
            range,
            bounds: pad_degenerate(bounds),
        })
    }

    /// The elevation range colors are mapped over.
    pub fn range(&self) -> ElevationRange {
        self.range
    }

    /// The geographic bounds, padded if degenerate.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Returns the transform onto a canvas of `canvas` size.
    pub fn transform(&self, canvas: Size, margin: f64) -> CanvasTransform {
        CanvasTransform::new(self.bounds, canvas, margin)
    }
}

/// Returns the fill color of a layer, or `None` if `mode` does not fill.
pub fn fill_color(
    elevation: f64,
    range: ElevationRange,
    scheme: ColorScheme,
    mode: RenderMode,
) -> Option<Color> {
    mode.fill_scheme(scheme).map(|s| s.map(elevation, range))
}

/// A step in rendering one sheet.
///
/// Sheets go through every stage in declaration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// Nothing has been done yet.
    Init,
    /// Polygons are mapped onto the canvas.
    TransformGeometry,
    /// Polygons are filled.
    Fill,
    /// Exterior rings are outlined.
    Stroke,
    /// Labels are placed and drawn.
    PlaceLabels,
    /// The sheet is complete.
    Finalize,
}

impl Stage {
    /// Returns the stage after this one.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::TransformGeometry),
            Self::TransformGeometry => Some(Self::Fill),
            Self::Fill => Some(Self::Stroke),
            Self::Stroke => Some(Self::PlaceLabels),
            Self::PlaceLabels => Some(Self::Finalize),
            Self::Finalize => None,
        }
    }
}

/// What happened while rendering one sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerReport {
    /// Layer number of the sheet, 0 for combined sheets.
    pub layer_number: usize,
    /// Elevation of the sheet.
    pub elevation: f64,
    /// Stages entered, in order.
    pub stages: Vec<Stage>,
    /// Polygons filled.
    pub fills: usize,
    /// Exterior ring edges outlined.
    pub outline_segments: usize,
    /// Labels drawn.
    pub labels_placed: usize,
    /// Labels with text that found no room.
    pub labels_suppressed: usize,
}

impl LayerReport {
    pub(crate) fn new(layer_number: usize, elevation: f64) -> Self {
        Self {
            layer_number,
            elevation,
            stages: vec![Stage::Init],
            fills: 0,
            outline_segments: 0,
            labels_placed: 0,
            labels_suppressed: 0,
        }
    }

    /// The most recent stage.
    pub fn stage(&self) -> Stage {
        self.stages.last().copied().unwrap_or(Stage::Init)
    }

    /// Whether the sheet reached [`Stage::Finalize`].
    pub fn is_finished(&self) -> bool {
        self.stage() == Stage::Finalize
    }

    /// Moves to `stage`, which must directly follow the current one.
    pub(crate) fn enter(&mut self, stage: Stage) {
        let current = self.stage();
        debug_assert_eq!(
            current.next(),
            Some(stage),
            "stages run strictly in order"
        );
        log::trace!(
            "layer {}: {current:?} -> {stage:?}",
            self.layer_number
        );
        self.stages.push(stage);
    }

    pub(crate) fn record_labels(&mut self, labels: &SheetLabels) {
        self.labels_placed += labels.placed();
        self.labels_suppressed += labels.suppressed;
    }
}

/// One output artifact: the layers drawn on it and the layer above.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Sheet<'a> {
    pub(crate) layers: &'a [Layer],
    pub(crate) next: Option<&'a Layer>,
    pub(crate) is_base: bool,
    pub(crate) combined: bool,
    pub(crate) layer_number: usize,
    pub(crate) elevation: f64,
}

impl<'a> Sheet<'a> {
    /// The sheet of `layers[index]`. The bottom layer is the base sheet.
    pub(crate) fn single(layers: &'a [Layer], index: usize) -> Option<Self> {
        let layer = layers.get(index)?;
        Some(Self {
            layers: core::slice::from_ref(layer),
            next: layers.get(index + 1),
            is_base: index == 0,
            combined: false,
            layer_number: index + 1,
            elevation: layer.elevation,
        })
    }

    /// All of `layers` on one base sheet.
    pub(crate) fn combined(layers: &'a [Layer]) -> Self {
        Self {
            layers,
            next: layers.get(1),
            is_base: true,
            combined: true,
            layer_number: 0,
            elevation: layers.first().map_or(0.0, |l| l.elevation),
        }
    }
}

/// Places the labels of `sheet` on a canvas described by `transform`.
pub(crate) fn place_sheet_labels(
    placer: &LabelPlacer<'_>,
    transform: &CanvasTransform,
    stack: &StackContext,
    sheet: &Sheet<'_>,
    measure: &mut dyn TextMeasure,
) -> SheetLabels {
    let next: Option<Vec<Polygon>> = sheet.next.map(|layer| {
        layer
            .polygons
            .iter()
            .map(|p| transform.polygon_to_canvas(p))
            .collect()
    });
    let next = next.as_deref().filter(|polygons| !polygons.is_empty());
    let content = transform.content_rect();
    let hidden_bbox = next
        .and_then(|polygons| {
            polygons
                .iter()
                .map(Polygon::bounds)
                .reduce(|a, b| a.union(b))
        })
        .unwrap_or_else(|| heuristic_hidden_bbox(content));
    let ctx = LabelContext {
        is_base: sheet.is_base,
        layer_number: sheet.layer_number,
        elevation: sheet.elevation,
        bounds: stack.bounds(),
        content_bbox: content,
        hidden_bbox,
        next_layer_polygons: next,
    };
    placer.place_labels(&ctx, measure)
}

/// Returns the file stem of the sheet of layer `layer_number`.
pub fn layer_file_stem(
    pattern: Option<&str>,
    base: &str,
    layer_number: usize,
    elevation: f64,
) -> String {
    substitute_filename(
        pattern.unwrap_or(DEFAULT_FILENAME_PATTERN),
        base,
        layer_number,
        elevation,
    )
}

/// Creates `dir` if needed.
pub(crate) fn prepare_output_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Writes every sheet of `layers` with `write`, skipping and logging sheets
/// that fail. Layers without polygons are skipped unless `force_all`.
pub(crate) fn export_each(
    layers: &[Layer],
    dir: &Path,
    force_all: bool,
    mut write: impl FnMut(usize, &Layer) -> Result<PathBuf>,
) -> Vec<PathBuf> {
    if let Err(e) = prepare_output_dir(dir) {
        log::error!("{e}");
        return Vec::new();
    }
    let mut written = Vec::with_capacity(layers.len());
    for (index, layer) in layers.iter().enumerate() {
        if layer.polygons.is_empty() && !force_all {
            log::debug!("skipping empty layer {}", index + 1);
            continue;
        }
        match write(index, layer) {
            Ok(path) => {
                log::info!("wrote {}", path.display());
                written.push(path);
            }
            Err(e) => log::error!("layer {} at {}m: {e}", index + 1, layer.elevation),
        }
    }
    written
}
