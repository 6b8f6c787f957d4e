// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visible and hidden layer labels.
//!
//! Every sheet can carry two labels. The *visible* label sits in a corner of
//! the content area that stays exposed once the sheets are stacked. The
//! *hidden* label goes where the next sheet up will cover it, so it can hold
//! assembly notes without showing on the finished model.
//!
//! [`LabelPlacer`] turns a [`LabelConfig`] and a per-sheet [`LabelContext`]
//! into [`PlacedLabel`]s that both renderers draw with their own text
//! primitive.

pub mod pattern;

use peniko::kurbo::{Point, Rect};
use peniko::Color;

use self::pattern::{substitute_label, LabelUnits, PatternValues};
use crate::font::TextMeasure;
use crate::geometry::{largest_polygon, Polygon};
use crate::text::{
    fit_text, generate_text_path, search_scale_ladder, FitConfig, FittedLine, TextPath,
    TextPathConfig,
};

pub use crate::text::Anchor;

/// Label text and styling.
///
/// Templates go through [`pattern::substitute_label`]. An empty template
/// produces no label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelConfig {
    /// Visible label of the base (combined) sheet.
    pub base_visible: String,
    /// Hidden label of the base (combined) sheet.
    pub base_hidden: String,
    /// Visible label of each layer sheet.
    pub layer_visible: String,
    /// Hidden label of each layer sheet.
    pub layer_hidden: String,
    /// Whether visible labels are drawn at all.
    pub visible_enabled: bool,
    /// Whether hidden labels are drawn at all.
    pub hidden_enabled: bool,
    /// Font size of base sheet labels, in millimeters.
    pub base_font_size: f64,
    /// Font size of layer sheet labels, in millimeters.
    pub layer_font_size: f64,
    /// Size of hidden labels relative to visible ones.
    pub hidden_scale: f64,
    /// Color of visible labels.
    pub visible_color: Color,
    /// Color of hidden labels.
    pub hidden_color: Color,
    /// Units used by `%{c}` and the coordinate patterns.
    pub units: LabelUnits,
    /// Map scale denominator for `%{s}`.
    pub scale_ratio: f64,
    /// Elevation step between layers in meters, for `%{c}`.
    pub contour_height: f64,
    /// Adaptive fitting, sizes in millimeters.
    pub fit: FitConfig,
    /// Curved path generation.
    pub path: TextPathConfig,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            base_visible: String::new(),
            base_hidden: String::new(),
            layer_visible: String::new(),
            layer_hidden: String::new(),
            visible_enabled: true,
            hidden_enabled: true,
            base_font_size: 4.0,
            layer_font_size: 3.0,
            hidden_scale: 0.9,
            visible_color: Color::from_rgb8(0x00, 0x00, 0x00),
            hidden_color: Color::from_rgb8(0x66, 0x66, 0x66),
            units: LabelUnits::Metric,
            scale_ratio: 0.0,
            contour_height: 0.0,
            fit: FitConfig::default(),
            path: TextPathConfig::default(),
        }
    }
}

/// Where labels of one sheet may go, in canvas units.
#[derive(Copy, Clone, Debug)]
pub struct LabelContext<'a> {
    /// Whether the sheet uses the base templates and sizes. The bottom sheet
    /// of a stack and combined sheets are base sheets.
    pub is_base: bool,
    /// `index + 1` of the layer, 0 for combined sheets.
    pub layer_number: usize,
    /// Elevation of the sheet in meters.
    pub elevation: f64,
    /// Geographic bounds of the stack.
    pub bounds: Rect,
    /// Usable area inside the margins.
    pub content_bbox: Rect,
    /// Area expected to be covered by the next sheet.
    pub hidden_bbox: Rect,
    /// Polygons of the next sheet, already in canvas units.
    pub next_layer_polygons: Option<&'a [Polygon]>,
}

/// Returns the middle 60% of `content`, used when the next sheet's shape is
/// unknown.
pub fn heuristic_hidden_bbox(content: Rect) -> Rect {
    let dx = content.width() * 0.2;
    let dy = content.height() * 0.2;
    Rect::new(content.x0 + dx, content.y0 + dy, content.x1 - dx, content.y1 - dy)
}

/// Which of the two labels of a sheet a [`PlacedLabel`] is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LabelKind {
    /// Stays exposed on the stacked model.
    Visible,
    /// Covered by the next sheet.
    Hidden,
}

/// A label ready to be drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLabel {
    /// Full text after template substitution.
    pub text: String,
    /// Visible or hidden.
    pub kind: LabelKind,
    /// Alignment of each line relative to its origin.
    pub anchor: Anchor,
    /// Final font size in canvas units.
    pub font_size: f64,
    /// Fill color.
    pub color: Color,
    /// Lines to draw, each vertically centered on its origin.
    pub lines: Vec<FittedLine>,
    /// Curve to lay the text along instead of `lines`.
    pub path: Option<TextPath>,
    /// Describes how the text was degraded to fit, if it was.
    pub warning: Option<String>,
}

impl PlacedLabel {
    /// Returns the origin of the first line.
    pub fn position(&self) -> Point {
        self.lines.first().map_or(Point::ZERO, |line| line.origin)
    }

    /// Whether the label follows a curve.
    pub fn is_curved(&self) -> bool {
        self.path.is_some()
    }
}

/// The labels of one sheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SheetLabels {
    /// The visible label, if any.
    pub visible: Option<PlacedLabel>,
    /// The hidden label, if any.
    pub hidden: Option<PlacedLabel>,
    /// Labels that had text but found no room.
    pub suppressed: usize,
}

impl SheetLabels {
    /// Iterates over the placed labels, visible first.
    pub fn iter(&self) -> impl Iterator<Item = &PlacedLabel> + '_ {
        self.visible.iter().chain(&self.hidden)
    }

    /// Number of placed labels.
    pub fn placed(&self) -> usize {
        self.iter().count()
    }
}

/// Places the labels of a sheet.
///
/// Sizes in [`LabelConfig`] are millimeters; `units_per_mm` converts them to
/// canvas units, 1 for vector output and `dpi / 25.4` for raster output.
#[derive(Clone, Debug)]
pub struct LabelPlacer<'c> {
    config: &'c LabelConfig,
    units_per_mm: f64,
    sample_spacing: f64,
    curved: bool,
}

impl<'c> LabelPlacer<'c> {
    /// Creates a placer.
    pub fn new(config: &'c LabelConfig, units_per_mm: f64) -> Self {
        Self {
            config,
            units_per_mm,
            sample_spacing: 1.0,
            curved: false,
        }
    }

    /// Sets the boundary sample spacing and band step of the hidden label
    /// search, in canvas units.
    pub fn with_sample_spacing(mut self, spacing: f64) -> Self {
        self.sample_spacing = spacing;
        self
    }

    /// Lays hidden labels along a curve when one fits.
    pub fn with_curved(mut self, curved: bool) -> Self {
        self.curved = curved;
        self
    }

    /// Places both labels of a sheet.
    pub fn place_labels(&self, ctx: &LabelContext<'_>, measure: &mut dyn TextMeasure) -> SheetLabels {
        let config = self.config;
        let (visible_template, hidden_template) = if ctx.is_base {
            (&config.base_visible, &config.base_hidden)
        } else {
            (&config.layer_visible, &config.layer_hidden)
        };
        let values = PatternValues {
            layer_number: ctx.layer_number,
            elevation: ctx.elevation,
            bounds: ctx.bounds,
            scale_ratio: config.scale_ratio,
            contour_height: config.contour_height,
            units: config.units,
        };

        let mut labels = SheetLabels::default();
        if config.visible_enabled {
            let text = substitute_label(visible_template, &values);
            if !text.trim().is_empty() {
                labels.visible = self.place_visible(&text, ctx, measure);
                labels.suppressed += usize::from(labels.visible.is_none());
            }
        }
        if config.hidden_enabled {
            let text = substitute_label(hidden_template, &values);
            if !text.trim().is_empty() {
                labels.hidden = self.place_hidden(&text, ctx, measure);
                labels.suppressed += usize::from(labels.hidden.is_none());
            }
        }
        labels
    }

    /// Fits `text` into the exposed corner of the content area.
    ///
    /// The base sheet anchors the text at the lower left, layer sheets at the
    /// lower right, each inset by a tenth of the content area.
    pub fn place_visible(
        &self,
        text: &str,
        ctx: &LabelContext<'_>,
        measure: &mut dyn TextMeasure,
    ) -> Option<PlacedLabel> {
        let content = ctx.content_bbox.abs();
        let y = content.y1 - content.height() * 0.1;
        let (position, anchor) = if ctx.is_base {
            (Point::new(content.x0 + content.width() * 0.1, y), Anchor::Start)
        } else {
            (Point::new(content.x1 - content.width() * 0.1, y), Anchor::End)
        };
        let Some(fitted) = fit_text(
            text,
            position,
            anchor,
            self.nominal_size(ctx),
            content,
            &self.fit_config(),
            measure,
        ) else {
            log::info!(
                "visible label {text:?} of layer {} suppressed: no room in the content area",
                ctx.layer_number
            );
            return None;
        };
        Some(PlacedLabel {
            text: text.to_string(),
            kind: LabelKind::Visible,
            anchor,
            font_size: fitted.font_size,
            color: self.config.visible_color,
            lines: fitted.lines,
            path: None,
            warning: fitted.warning,
        })
    }

    /// Places `text` where the next sheet will cover it.
    ///
    /// With the next sheet's polygons, the widest band of the largest one is
    /// searched at decreasing font sizes and the label is suppressed if none
    /// fits. Without them the text is fitted into the hidden box.
    pub fn place_hidden(
        &self,
        text: &str,
        ctx: &LabelContext<'_>,
        measure: &mut dyn TextMeasure,
    ) -> Option<PlacedLabel> {
        let size = self.nominal_size(ctx) * self.config.hidden_scale;
        let next = ctx.next_layer_polygons.filter(|polygons| !polygons.is_empty());
        let Some(polygons) = next else {
            return self.place_hidden_in_box(text, size, ctx, measure);
        };
        let largest = largest_polygon(polygons)?;
        let samples = largest.exterior.resample(self.sample_spacing);
        let fit = search_scale_ladder(&samples, size, self.sample_spacing, |s| {
            Some((measure.measure_text_width(text, s)?, measure.line_height(s)))
        });
        let Some(fit) = fit else {
            log::info!(
                "hidden label {text:?} of layer {} suppressed: no font scale fits the covering shape",
                ctx.layer_number
            );
            return None;
        };
        log::debug!(
            "hidden label of layer {} placed at {:.0}% after {} attempts",
            ctx.layer_number,
            fit.scale * 100.0,
            fit.attempts
        );

        let mut label = PlacedLabel {
            text: text.to_string(),
            kind: LabelKind::Hidden,
            anchor: Anchor::Middle,
            font_size: fit.font_size,
            color: self.config.hidden_color,
            lines: vec![FittedLine {
                text: text.to_string(),
                origin: fit.rect.center,
            }],
            path: None,
            warning: (fit.scale < 1.0).then(|| {
                format!(
                    "Text scaled to {:.0}% of original size to fit",
                    fit.scale * 100.0
                )
            }),
        };
        if self.curved {
            if let Some(path) = generate_text_path(polygons, fit.rect.width, fit.font_size, &self.config.path) {
                label.font_size = path.fitted_font_size(fit.rect.width, fit.font_size, &self.config.path);
                if let Some((mid, _)) = path.point_at(path.length * 0.5) {
                    label.lines[0].origin = mid;
                }
                label.path = Some(path);
            } else {
                log::debug!(
                    "no curve for hidden label of layer {}, keeping it straight",
                    ctx.layer_number
                );
            }
        }
        Some(label)
    }

    fn place_hidden_in_box(
        &self,
        text: &str,
        size: f64,
        ctx: &LabelContext<'_>,
        measure: &mut dyn TextMeasure,
    ) -> Option<PlacedLabel> {
        let target = ctx.hidden_bbox.abs();
        let Some(fitted) = fit_text(
            text,
            target.center(),
            Anchor::Middle,
            size,
            target,
            &self.fit_config(),
            measure,
        ) else {
            log::info!(
                "hidden label {text:?} of layer {} suppressed: no room in the hidden area",
                ctx.layer_number
            );
            return None;
        };
        Some(PlacedLabel {
            text: text.to_string(),
            kind: LabelKind::Hidden,
            anchor: Anchor::Middle,
            font_size: fitted.font_size,
            color: self.config.hidden_color,
            lines: fitted.lines,
            path: None,
            warning: fitted.warning,
        })
    }

    fn nominal_size(&self, ctx: &LabelContext<'_>) -> f64 {
        let mm = if ctx.is_base {
            self.config.base_font_size
        } else {
            self.config.layer_font_size
        };
        mm * self.units_per_mm
    }

    fn fit_config(&self) -> FitConfig {
        let fit = self.config.fit;
        FitConfig {
            min_legible_size: fit.min_legible_size * self.units_per_mm,
            margin: fit.margin * self.units_per_mm,
            ..fit
        }
    }
}
