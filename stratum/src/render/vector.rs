// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! SVG cut sheets for laser cutters.
//!
//! All coordinates are millimeters. Exterior rings become cut lines; holes,
//! when retained, only shape the fill.

use core::fmt::{self, Write as _};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use peniko::kurbo::{Rect, Size};
use peniko::Color;

use super::{
    export_each, fill_color, layer_file_stem, place_sheet_labels, prepare_output_dir,
    LayerReport, Sheet, Stage, StackContext,
};
use crate::color::{hex, ColorScheme, ElevationRange, RenderMode};
use crate::font::EstimatedMetrics;
use crate::geometry::{Layer, Polygon, Ring};
use crate::label::{LabelConfig, LabelKind, LabelPlacer, PlacedLabel, SheetLabels};
use crate::units::{content_aspect, AspectMode};
use crate::{Error, Result};

/// Options of [`VectorRenderer`]. Lengths are millimeters.
#[derive(Clone, Debug, PartialEq)]
pub struct SvgConfig {
    /// Document width.
    pub width_mm: f64,
    /// Document height. Derived from the aspect ratio of the bounds if unset.
    pub height_mm: Option<f64>,
    /// Blank border around the content.
    pub margin_mm: f64,
    /// How the aspect ratio of the bounds is measured.
    pub aspect: AspectMode,
    /// Geographic bounds to map onto the page. Defaults to the stack's.
    pub bounds: Option<Rect>,
    /// Elevation range colors are mapped over. Defaults to the stack's.
    pub elevation_range: Option<ElevationRange>,
    /// Fill colors.
    pub color_scheme: ColorScheme,
    /// Whether and how polygons are filled.
    pub render_mode: RenderMode,
    /// Cut line width.
    pub cut_stroke_width: f64,
    /// Cut line color of single-layer sheets.
    pub cut_color: Color,
    /// Page background.
    pub background: Color,
    /// Draws corner crosses for aligning the sheets.
    pub alignment_marks: bool,
    /// Alignment mark line width.
    pub alignment_stroke_width: f64,
    /// Alignment mark and guideline color.
    pub alignment_color: Color,
    /// Length of each arm of an alignment cross.
    pub alignment_mark_size: f64,
    /// Draws a dashed rectangle along the margin.
    pub cut_guidelines: bool,
    /// Lists the elevation of each layer in the top-left margin.
    pub elevation_labels: bool,
    /// Color of elevation labels.
    pub text_color: Color,
    /// Font size of elevation labels.
    pub elevation_font_size_mm: f64,
    /// Drops holes entirely instead of cutting them out of the fill.
    pub remove_holes: bool,
    /// Minimum distance between kept vertices, if simplifying.
    pub simplify_tolerance: Option<f64>,
    /// Writes sheets for layers without polygons.
    pub force_all_layers: bool,
    /// File stem pattern for layer sheets, see [`layer_file_stem`].
    pub filename_pattern: Option<String>,
    /// CSS font family of all text.
    pub font_family: String,
    /// Layer labels.
    pub labels: LabelConfig,
    /// Lays hidden labels along a curve.
    pub curved_hidden: bool,
    /// Boundary sample spacing of the hidden label search.
    pub sample_spacing: f64,
    /// Text measurement used for fitting.
    pub metrics: EstimatedMetrics,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            width_mm: 300.0,
            height_mm: None,
            margin_mm: 10.0,
            aspect: AspectMode::Geographic,
            bounds: None,
            elevation_range: None,
            color_scheme: ColorScheme::Terrain,
            render_mode: RenderMode::FullColor,
            cut_stroke_width: 0.1,
            cut_color: Color::from_rgb8(0xFF, 0x00, 0x00),
            background: Color::from_rgb8(0xFF, 0xFF, 0xFF),
            alignment_marks: true,
            alignment_stroke_width: 0.2,
            alignment_color: Color::from_rgb8(0x00, 0x00, 0xFF),
            alignment_mark_size: 5.0,
            cut_guidelines: true,
            elevation_labels: true,
            text_color: Color::from_rgb8(0x00, 0x00, 0x00),
            elevation_font_size_mm: 3.0,
            remove_holes: false,
            simplify_tolerance: Some(0.1),
            force_all_layers: false,
            filename_pattern: None,
            font_family: "Arial, sans-serif".into(),
            labels: LabelConfig::default(),
            curved_hidden: true,
            sample_spacing: 0.25,
            metrics: EstimatedMetrics::default(),
        }
    }
}

/// Renders layer stacks as SVG documents.
#[derive(Clone, Debug, Default)]
pub struct VectorRenderer {
    config: SvgConfig,
}

impl VectorRenderer {
    /// Creates a renderer.
    pub fn new(config: SvgConfig) -> Self {
        Self { config }
    }

    /// The configuration.
    pub fn config(&self) -> &SvgConfig {
        &self.config
    }

    /// Returns the page size for `bounds`.
    pub fn page_size(&self, bounds: Rect) -> Size {
        let cfg = &self.config;
        let margin = cfg.margin_mm;
        let height = cfg.height_mm.unwrap_or_else(|| {
            (cfg.width_mm - 2.0 * margin) * content_aspect(bounds, cfg.aspect) + 2.0 * margin
        });
        Size::new(cfg.width_mm, height)
    }

    /// Renders the sheet of `layers[index]`.
    pub fn render_layer(&self, layers: &[Layer], index: usize) -> Result<(String, LayerReport)> {
        let stack = self.stack(layers)?;
        let sheet = Sheet::single(layers, index).ok_or(Error::EmptyStack)?;
        Ok(self.render_sheet(&stack, &sheet))
    }

    /// Renders every layer onto one sheet.
    pub fn render_combined(&self, layers: &[Layer]) -> Result<(String, LayerReport)> {
        let stack = self.stack(layers)?;
        Ok(self.render_sheet(&stack, &Sheet::combined(layers)))
    }

    /// Writes one SVG per layer into `dir` and returns the files written.
    pub fn export_layers(
        &self,
        layers: &[Layer],
        dir: impl AsRef<Path>,
        base: &str,
    ) -> Vec<PathBuf> {
        let dir = dir.as_ref();
        let stack = match self.stack(layers) {
            Ok(stack) => stack,
            Err(e) => {
                log::error!("nothing to export: {e}");
                return Vec::new();
            }
        };
        export_each(layers, dir, self.config.force_all_layers, |index, layer| {
            let sheet = Sheet::single(layers, index).ok_or(Error::EmptyStack)?;
            let (svg, _) = self.render_sheet(&stack, &sheet);
            let stem = layer_file_stem(
                self.config.filename_pattern.as_deref(),
                base,
                index + 1,
                layer.elevation,
            );
            let path = dir.join(format!("{stem}.svg"));
            std::fs::write(&path, svg).map_err(|e| Error::io(&path, e))?;
            Ok(path)
        })
    }

    /// Writes all layers onto `{base}_combined.svg` in `dir`.
    pub fn export_combined(
        &self,
        layers: &[Layer],
        dir: impl AsRef<Path>,
        base: &str,
    ) -> Vec<PathBuf> {
        let dir = dir.as_ref();
        let result = self.render_combined(layers).and_then(|(svg, _)| {
            prepare_output_dir(dir)?;
            let path = dir.join(format!("{base}_combined.svg"));
            std::fs::write(&path, svg).map_err(|e| Error::io(&path, e))?;
            Ok(path)
        });
        match result {
            Ok(path) => {
                log::info!("wrote {}", path.display());
                vec![path]
            }
            Err(e) => {
                log::error!("combined sheet: {e}");
                Vec::new()
            }
        }
    }

    fn stack(&self, layers: &[Layer]) -> Result<StackContext> {
        StackContext::new(layers, self.config.bounds, self.config.elevation_range)
    }

    fn render_sheet(&self, stack: &StackContext, sheet: &Sheet<'_>) -> (String, LayerReport) {
        let cfg = &self.config;
        let mut report = LayerReport::new(sheet.layer_number, sheet.elevation);
        let size = self.page_size(stack.bounds());
        let transform = stack.transform(size, cfg.margin_mm);

        report.enter(Stage::TransformGeometry);
        let groups: Vec<Vec<Polygon>> = sheet
            .layers
            .iter()
            .map(|layer| {
                layer
                    .polygons
                    .iter()
                    .map(|p| transform.polygon_to_canvas(p))
                    .filter_map(|p| self.simplify(p))
                    .collect()
            })
            .collect();

        let mut svg = SvgWriter::default();
        self.write_header(&mut svg, size);

        // Fill and cut elements of each layer group, in drawing order.
        let mut elements: Vec<Vec<String>> = vec![Vec::new(); groups.len()];

        report.enter(Stage::Fill);
        for (i, ((layer, polygons), out)) in
            sheet.layers.iter().zip(&groups).zip(&mut elements).enumerate()
        {
            let fill = fill_color(
                layer.elevation,
                stack.range(),
                cfg.color_scheme,
                cfg.render_mode,
            );
            let stroke = self.cut_color(sheet, i);
            for polygon in polygons {
                out.push(self.fill_element(polygon, fill, &stroke));
                report.fills += usize::from(fill.is_some());
            }
        }

        report.enter(Stage::Stroke);
        for (i, (polygons, out)) in groups.iter().zip(&mut elements).enumerate() {
            let stroke = self.cut_color(sheet, i);
            let mut cuts = Vec::new();
            for polygon in polygons {
                report.outline_segments += polygon.exterior.len();
                if self.needs_separate_cut(polygon) {
                    cuts.push(self.cut_element(&polygon.exterior, &stroke));
                }
            }
            out.extend(cuts);
        }

        for (i, (layer, out)) in sheet.layers.iter().zip(&elements).enumerate() {
            let index = if sheet.combined { i } else { 0 };
            svg.line(
                1,
                format_args!(
                    "<g id=\"layer_{index:02}_elev_{:.0}\" inkscape:label=\"Layer {}m\">",
                    layer.elevation.round(),
                    num(layer.elevation)
                ),
            );
            for element in out {
                svg.line(2, format_args!("{element}"));
            }
            svg.line(1, format_args!("</g>"));
        }
        if cfg.alignment_marks {
            self.write_alignment_marks(&mut svg, size);
        }
        if cfg.elevation_labels {
            self.write_elevation_labels(&mut svg, sheet.layers);
        }

        report.enter(Stage::PlaceLabels);
        let placer = LabelPlacer::new(&cfg.labels, 1.0)
            .with_sample_spacing(cfg.sample_spacing)
            .with_curved(cfg.curved_hidden);
        let mut metrics = cfg.metrics;
        let labels = place_sheet_labels(&placer, &transform, stack, sheet, &mut metrics);
        report.record_labels(&labels);
        self.write_labels(&mut svg, &labels, sheet.layer_number);

        report.enter(Stage::Finalize);
        if cfg.cut_guidelines {
            self.write_cut_guidelines(&mut svg, size);
        }
        svg.line(0, format_args!("</svg>"));
        (svg.finish(), report)
    }

    /// Cut color of the `index`th layer of `sheet`. Combined sheets shade
    /// from red at the bottom layer to blue at the top.
    fn cut_color(&self, sheet: &Sheet<'_>, index: usize) -> String {
        if !sheet.combined {
            return hex(self.config.cut_color);
        }
        let t = index as f64 / sheet.layers.len().saturating_sub(1).max(1) as f64;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "t is within [0, 1]"
        )]
        let (red, blue) = ((255.0 * (1.0 - t)) as u8, (255.0 * t) as u8);
        hex(Color::from_rgb8(red, 0, blue))
    }

    fn simplify(&self, polygon: Polygon) -> Option<Polygon> {
        let Some(tolerance) = self.config.simplify_tolerance.filter(|t| *t > 0.0) else {
            return Some(polygon);
        };
        let exterior = simplify_ring(&polygon.exterior, tolerance)?;
        let holes = polygon
            .holes
            .iter()
            .filter_map(|hole| simplify_ring(hole, tolerance))
            .collect();
        Some(Polygon::new(exterior, holes))
    }

    fn needs_separate_cut(&self, polygon: &Polygon) -> bool {
        !self.config.remove_holes && !polygon.holes.is_empty()
    }

    fn fill_element(&self, polygon: &Polygon, fill: Option<Color>, stroke: &str) -> String {
        let cfg = &self.config;
        let mut d = String::new();
        ring_path(&polygon.exterior, &mut d);
        let mut out = String::new();
        let opacity = match cfg.render_mode {
            RenderMode::Grayscale => "0.7",
            _ => "0.85",
        };
        if self.needs_separate_cut(polygon) {
            for hole in &polygon.holes {
                d.push(' ');
                ring_path(hole, &mut d);
            }
            let fill = fill.map_or_else(|| "none".to_string(), hex);
            let _ = write!(
                out,
                "<path d=\"{d}\" class=\"fill\" fill=\"{fill}\" fill-rule=\"evenodd\" stroke=\"none\""
            );
            if fill != "none" {
                let _ = write!(out, " fill-opacity=\"{opacity}\"");
            }
            out.push_str("/>");
            return out;
        }
        let _ = write!(
            out,
            "<path d=\"{d}\" class=\"cut-line\" stroke=\"{stroke}\" stroke-width=\"{}\"",
            num(cfg.cut_stroke_width)
        );
        match fill {
            Some(color) => {
                let _ = write!(out, " fill=\"{}\" fill-opacity=\"{opacity}\"", hex(color));
            }
            None => out.push_str(" fill=\"none\""),
        }
        out.push_str("/>");
        out
    }

    fn cut_element(&self, exterior: &Ring, stroke: &str) -> String {
        let mut d = String::new();
        ring_path(exterior, &mut d);
        format!(
            "<path d=\"{d}\" class=\"cut-line\" stroke=\"{stroke}\" stroke-width=\"{}\" fill=\"none\"/>",
            num(self.config.cut_stroke_width)
        )
    }

    fn write_header(&self, svg: &mut SvgWriter, size: Size) {
        let cfg = &self.config;
        let (w, h) = (num(size.width), num(size.height));
        svg.line(
            0,
            format_args!("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"),
        );
        svg.line(
            0,
            format_args!(
                "<svg width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\" version=\"1.1\" \
                 xmlns=\"http://www.w3.org/2000/svg\" \
                 xmlns:inkscape=\"http://www.inkscape.org/namespaces/inkscape\">"
            ),
        );
        svg.line(1, format_args!("<title>Stratum relief layers</title>"));
        svg.line(1, format_args!("<defs>"));
        svg.line(2, format_args!("<style>"));
        svg.line(
            3,
            format_args!(".cut-line {{ stroke-width: {}; }}", num(cfg.cut_stroke_width)),
        );
        svg.line(
            3,
            format_args!(
                ".alignment-mark {{ fill: none; stroke-width: {}; }}",
                num(cfg.alignment_stroke_width)
            ),
        );
        svg.line(
            3,
            format_args!(".label {{ font-family: {}; }}", escape(&cfg.font_family)),
        );
        svg.line(2, format_args!("</style>"));
        svg.line(1, format_args!("</defs>"));
        svg.line(
            1,
            format_args!(
                "<rect x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\" fill=\"{}\" inkscape:label=\"Background\"/>",
                hex(cfg.background)
            ),
        );
    }

    fn write_alignment_marks(&self, svg: &mut SvgWriter, size: Size) {
        let cfg = &self.config;
        let offset = cfg.margin_mm * 0.5;
        let half = cfg.alignment_mark_size * 0.5;
        let color = hex(cfg.alignment_color);
        svg.line(
            1,
            format_args!("<g id=\"alignment-marks\" inkscape:label=\"Alignment Marks\">"),
        );
        for (x, y) in [
            (offset, offset),
            (size.width - offset, offset),
            (size.width - offset, size.height - offset),
            (offset, size.height - offset),
        ] {
            svg.line(
                2,
                format_args!(
                    "<path d=\"M {} {} L {} {} M {} {} L {} {}\" class=\"alignment-mark\" stroke=\"{color}\"/>",
                    num(x - half),
                    num(y),
                    num(x + half),
                    num(y),
                    num(x),
                    num(y - half),
                    num(x),
                    num(y + half)
                ),
            );
        }
        svg.line(1, format_args!("</g>"));
    }

    fn write_elevation_labels(&self, svg: &mut SvgWriter, layers: &[Layer]) {
        let cfg = &self.config;
        svg.line(
            1,
            format_args!("<g id=\"elevation-labels\" inkscape:label=\"Elevation Labels\">"),
        );
        for (i, layer) in layers.iter().enumerate() {
            svg.line(
                2,
                format_args!(
                    "<text x=\"{}\" y=\"{}\" class=\"label\" font-size=\"{}\" fill=\"{}\">{:.0}m</text>",
                    num(cfg.margin_mm),
                    num(cfg.margin_mm + 5.0 + i as f64 * 5.0),
                    num(cfg.elevation_font_size_mm),
                    hex(cfg.text_color),
                    layer.elevation.round()
                ),
            );
        }
        svg.line(1, format_args!("</g>"));
    }

    fn write_labels(&self, svg: &mut SvgWriter, labels: &SheetLabels, layer_number: usize) {
        if labels.placed() == 0 {
            return;
        }
        svg.line(
            1,
            format_args!("<g id=\"comprehensive-labels\" inkscape:label=\"Labels\">"),
        );
        for label in labels.iter() {
            match &label.path {
                Some(path) => {
                    let id = format!("text-path-{layer_number}");
                    svg.line(2, format_args!("<defs>"));
                    svg.line(
                        3,
                        format_args!("<path id=\"{id}\" d=\"{}\"/>", path.svg_path_data()),
                    );
                    svg.line(2, format_args!("</defs>"));
                    svg.line(2, format_args!("<text {}>", self.text_attributes(label)));
                    svg.line(
                        3,
                        format_args!(
                            "<textPath href=\"#{id}\" startOffset=\"50%\">{}</textPath>",
                            escape(&label.text)
                        ),
                    );
                    svg.line(2, format_args!("</text>"));
                }
                None => {
                    for line in &label.lines {
                        svg.line(
                            2,
                            format_args!(
                                "<text x=\"{}\" y=\"{}\" dominant-baseline=\"central\" {}>{}</text>",
                                num(line.origin.x),
                                num(line.origin.y),
                                self.text_attributes(label),
                                escape(&line.text)
                            ),
                        );
                    }
                }
            }
        }
        svg.line(1, format_args!("</g>"));
    }

    fn text_attributes(&self, label: &PlacedLabel) -> String {
        let mut attrs = format!(
            "class=\"label\" text-anchor=\"{}\" font-size=\"{}\" fill=\"{}\"",
            label.anchor.as_svg(),
            num(label.font_size),
            hex(label.color)
        );
        if label.kind == LabelKind::Hidden {
            attrs.push_str(" opacity=\"0.7\"");
        }
        attrs
    }

    fn write_cut_guidelines(&self, svg: &mut SvgWriter, size: Size) {
        let cfg = &self.config;
        let m = cfg.margin_mm;
        svg.line(
            1,
            format_args!("<g id=\"cutting-guidelines\" inkscape:label=\"Cutting Guidelines\">"),
        );
        svg.line(
            2,
            format_args!(
                "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"0.1\" stroke-dasharray=\"1,1\"/>",
                num(m),
                num(m),
                num(size.width - 2.0 * m),
                num(size.height - 2.0 * m),
                hex(cfg.alignment_color)
            ),
        );
        svg.line(1, format_args!("</g>"));
    }
}

/// Accumulates an indented document.
#[derive(Default)]
struct SvgWriter {
    out: String,
}

impl SvgWriter {
    fn line(&mut self, indent: usize, args: fmt::Arguments<'_>) {
        for _ in 0..indent {
            self.out.push_str("  ");
        }
        // Writing into a String cannot fail.
        let _ = self.out.write_fmt(args);
        self.out.push('\n');
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Appends `M x y L x y ... Z` for `ring`.
fn ring_path(ring: &Ring, d: &mut String) {
    for (i, p) in ring.points().iter().enumerate() {
        let cmd = if i == 0 { "M" } else { " L" };
        let _ = write!(d, "{cmd} {} {}", num(p.x), num(p.y));
    }
    d.push_str(" Z");
}

/// Drops vertices closer than `tolerance` to the last kept one.
fn simplify_ring(ring: &Ring, tolerance: f64) -> Option<Ring> {
    let mut kept: Vec<_> = Vec::with_capacity(ring.len());
    for &p in ring.points() {
        match kept.last() {
            Some(last) if p.distance(*last) < tolerance => {}
            _ => kept.push(p),
        }
    }
    Ring::new(kept)
}

/// Formats a length with at most three decimals.
fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".into(),
        s => s.into(),
    }
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Ring {
        Ring::from_coords(&[(min, min), (max, min), (max, max), (min, max)]).unwrap()
    }

    fn stack() -> Vec<Layer> {
        vec![
            Layer::new(
                100.0,
                vec![Polygon::new(square(0.0, 10.0), vec![square(4.0, 6.0)])],
            ),
            Layer::new(200.0, vec![Polygon::new(square(3.0, 7.0), vec![])]),
        ]
    }

    fn planar() -> SvgConfig {
        SvgConfig {
            width_mm: 120.0,
            aspect: AspectMode::Planar,
            simplify_tolerance: None,
            ..SvgConfig::default()
        }
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(300.0), "300");
        assert_eq!(num(0.1), "0.1");
        assert_eq!(num(2.0 / 3.0), "0.667");
        assert_eq!(num(-0.0001), "0");
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(escape("A & B <c>"), "A &amp; B &lt;c&gt;");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn simplification_drops_close_vertices() {
        let ring = Ring::from_coords(&[(0.0, 0.0), (0.05, 0.0), (10.0, 0.0), (10.0, 10.0)]).unwrap();
        assert_eq!(simplify_ring(&ring, 0.1).unwrap().len(), 3);
        let tiny = Ring::from_coords(&[(0.0, 0.0), (0.01, 0.0), (0.0, 0.01)]).unwrap();
        assert_eq!(simplify_ring(&tiny, 0.1), None);
    }

    #[test]
    fn page_height_follows_aspect() {
        let renderer = VectorRenderer::new(planar());
        let size = renderer.page_size(Rect::new(0.0, 0.0, 20.0, 10.0));
        assert_eq!(size, Size::new(120.0, 70.0));
    }

    #[test]
    fn retained_holes_are_filled_but_not_cut() {
        let renderer = VectorRenderer::new(planar());
        let (svg, report) = renderer.render_layer(&stack(), 0).unwrap();
        assert!(svg.contains("fill-rule=\"evenodd\""));
        // One combined fill path with two subpaths, one exterior-only cut path.
        let cut_paths = svg.matches("class=\"cut-line\" stroke=\"#FF0000\"").count();
        assert_eq!(cut_paths, 1);
        assert_eq!(report.fills, 1);
        assert_eq!(report.outline_segments, 4);
        assert!(report.is_finished());
    }

    #[test]
    fn removed_holes_leave_a_single_path() {
        let renderer = VectorRenderer::new(SvgConfig {
            remove_holes: true,
            ..planar()
        });
        let (svg, _) = renderer.render_layer(&stack(), 0).unwrap();
        assert!(!svg.contains("evenodd"));
        assert_eq!(svg.matches(" Z\"").count(), 1, "{svg}");
    }

    #[test]
    fn monochrome_has_no_fills() {
        let renderer = VectorRenderer::new(SvgConfig {
            render_mode: RenderMode::Monochrome,
            remove_holes: true,
            ..planar()
        });
        let (svg, report) = renderer.render_layer(&stack(), 0).unwrap();
        assert_eq!(report.fills, 0);
        assert!(!svg.contains("fill-opacity"));
    }

    #[test]
    fn combined_sheet_shades_layers() {
        let renderer = VectorRenderer::new(planar());
        let (svg, report) = renderer.render_combined(&stack()).unwrap();
        assert!(svg.contains("id=\"layer_00_elev_100\""));
        assert!(svg.contains("id=\"layer_01_elev_200\""));
        assert!(svg.contains("stroke=\"#0000FF\" stroke-width"));
        assert_eq!(report.layer_number, 0);
        assert_eq!(report.outline_segments, 8);
    }

    #[test]
    fn optional_decorations() {
        let bare = VectorRenderer::new(SvgConfig {
            alignment_marks: false,
            cut_guidelines: false,
            elevation_labels: false,
            ..planar()
        });
        let (svg, _) = bare.render_layer(&stack(), 1).unwrap();
        assert!(!svg.contains("alignment-marks"));
        assert!(!svg.contains("cutting-guidelines"));
        assert!(!svg.contains("elevation-labels"));

        let (svg, _) = VectorRenderer::new(planar()).render_layer(&stack(), 1).unwrap();
        assert_eq!(svg.matches("class=\"alignment-mark\"").count(), 4);
        assert!(svg.contains("stroke-dasharray=\"1,1\""));
        assert!(svg.contains(">200m</text>"));
    }

    #[test]
    fn elevation_label_size_is_configurable() {
        let (svg, _) = VectorRenderer::new(planar()).render_layer(&stack(), 0).unwrap();
        assert!(svg.contains("font-size=\"3\" fill=\"#000000\">100m</text>"));

        let renderer = VectorRenderer::new(SvgConfig {
            elevation_font_size_mm: 4.5,
            ..planar()
        });
        let (svg, _) = renderer.render_layer(&stack(), 0).unwrap();
        assert!(svg.contains("font-size=\"4.5\" fill=\"#000000\">100m</text>"));
    }
}
