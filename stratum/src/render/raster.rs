// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster previews.
//!
//! Sheets are drawn into a [`RasterCanvas`] and written as PNG. Positions are
//! pixels; label sizes configured in millimeters are converted at the
//! configured resolution.

use std::path::{Path, PathBuf};

use peniko::kurbo::{Point, Rect, Size};
use peniko::Color;

use super::{
    export_each, fill_color, layer_file_stem, place_sheet_labels, prepare_output_dir,
    LayerReport, Sheet, Stage, StackContext,
};
use crate::canvas::{RasterCanvas, Rgba8};
use crate::color::{rgba8, ColorScheme, ElevationRange, RenderMode};
use crate::font::{FontConfig, FontResource, GlyphSource};
use crate::geometry::{Layer, Polygon};
use crate::label::{Anchor, LabelConfig, LabelPlacer, PlacedLabel};
use crate::units::{content_aspect, mm_to_pixels, AspectMode};
use crate::{Error, Result};

/// Baseline offset below the vertical center of a line, relative to the
/// font size.
const BASELINE_OFFSET: f64 = 0.35;

/// Options of [`RasterRenderer`]. Lengths are pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterConfig {
    /// Image width.
    pub width: u32,
    /// Image height. Derived from the aspect ratio of the bounds if unset.
    pub height: Option<u32>,
    /// Resolution used to convert label sizes from millimeters.
    pub dpi: f64,
    /// Blank border around the content.
    pub margin: u32,
    /// How the aspect ratio of the bounds is measured.
    pub aspect: AspectMode,
    /// Geographic bounds to map onto the image. Defaults to the stack's.
    pub bounds: Option<Rect>,
    /// Elevation range colors are mapped over. Defaults to the stack's.
    pub elevation_range: Option<ElevationRange>,
    /// Fill colors.
    pub color_scheme: ColorScheme,
    /// Whether and how polygons are filled.
    pub render_mode: RenderMode,
    /// Image background.
    pub background: Color,
    /// Terrain outline color.
    pub outline_color: Color,
    /// Terrain outline width.
    pub outline_width: u32,
    /// Leaves holes filled instead of cutting them out.
    pub remove_holes: bool,
    /// Draws corner crosses for aligning the sheets.
    pub alignment_marks: bool,
    /// Draws a rectangle along the margin.
    pub border: bool,
    /// Alignment mark and border color.
    pub alignment_color: Color,
    /// Extent of each alignment cross.
    pub mark_size: u32,
    /// Smooths polygon edges.
    pub anti_alias: bool,
    /// Draws a color ramp with elevations in the lower right corner.
    pub legend: bool,
    /// Writes images for layers without polygons.
    pub force_all_layers: bool,
    /// File stem pattern for layer images, see [`layer_file_stem`].
    pub filename_pattern: Option<String>,
    /// Layer labels.
    pub labels: LabelConfig,
    /// Lays hidden labels along a curve, rotating each glyph.
    pub curved_hidden: bool,
    /// Font lookup for [`RasterRenderer::with_system_font`].
    pub font: FontConfig,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: 2048,
            height: None,
            dpi: 600.0,
            margin: 236,
            aspect: AspectMode::Geographic,
            bounds: None,
            elevation_range: None,
            color_scheme: ColorScheme::Terrain,
            render_mode: RenderMode::FullColor,
            background: Color::from_rgb8(0xFF, 0xFF, 0xFF),
            outline_color: Color::from_rgb8(0xFF, 0x00, 0x00),
            outline_width: 5,
            remove_holes: false,
            alignment_marks: true,
            border: true,
            alignment_color: Color::from_rgb8(0x00, 0x00, 0xFF),
            mark_size: 50,
            anti_alias: true,
            legend: false,
            force_all_layers: false,
            filename_pattern: None,
            labels: LabelConfig::default(),
            curved_hidden: false,
            font: FontConfig::default(),
        }
    }
}

/// Renders layer stacks into pixel images.
///
/// The renderer owns its glyph source. Renderers working in parallel each
/// need their own.
#[derive(Debug)]
pub struct RasterRenderer<G = FontResource> {
    config: RasterConfig,
    glyphs: G,
}

impl RasterRenderer<FontResource> {
    /// Creates a renderer with the font described by `config.font`.
    pub fn with_system_font(config: RasterConfig) -> Result<Self> {
        let font = FontResource::resolve(&config.font)?;
        Ok(Self::new(config, font))
    }
}

impl<G: GlyphSource> RasterRenderer<G> {
    /// Creates a renderer drawing text with `glyphs`.
    pub fn new(config: RasterConfig, glyphs: G) -> Self {
        Self { config, glyphs }
    }

    /// The configuration.
    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    /// Returns the image size for `bounds`.
    pub fn image_size(&self, bounds: Rect) -> (u32, u32) {
        let cfg = &self.config;
        let height = cfg.height.unwrap_or_else(|| {
            let h = (f64::from(cfg.width) * content_aspect(bounds, cfg.aspect)).round();
            #[expect(
                clippy::cast_possible_truncation,
                reason = "clamped into the u32 range"
            )]
            let h = h.clamp(1.0, f64::from(u32::MAX)) as u32;
            h
        });
        (cfg.width, height)
    }

    /// Renders the sheet of `layers[index]`.
    pub fn render_layer(
        &mut self,
        layers: &[Layer],
        index: usize,
    ) -> Result<(RasterCanvas, LayerReport)> {
        let stack = self.stack(layers)?;
        let sheet = Sheet::single(layers, index).ok_or(Error::EmptyStack)?;
        self.render_sheet(&stack, &sheet)
    }

    /// Renders every layer onto one image.
    pub fn render_combined(&mut self, layers: &[Layer]) -> Result<(RasterCanvas, LayerReport)> {
        let stack = self.stack(layers)?;
        self.render_sheet(&stack, &Sheet::combined(layers))
    }

    /// Writes one PNG per layer into `dir` and returns the files written.
    pub fn export_layers(
        &mut self,
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
        let force_all = self.config.force_all_layers;
        export_each(layers, dir, force_all, |index, layer| {
            let sheet = Sheet::single(layers, index).ok_or(Error::EmptyStack)?;
            let (canvas, _) = self.render_sheet(&stack, &sheet)?;
            let stem = layer_file_stem(
                self.config.filename_pattern.as_deref(),
                base,
                index + 1,
                layer.elevation,
            );
            let path = dir.join(format!("{stem}.png"));
            canvas.write_png(&path)?;
            Ok(path)
        })
    }

    /// Writes all layers onto `{base}_combined.png` in `dir`.
    pub fn export_combined(
        &mut self,
        layers: &[Layer],
        dir: impl AsRef<Path>,
        base: &str,
    ) -> Vec<PathBuf> {
        let dir = dir.as_ref();
        let result = self.render_combined(layers).and_then(|(canvas, _)| {
            prepare_output_dir(dir)?;
            let path = dir.join(format!("{base}_combined.png"));
            canvas.write_png(&path)?;
            Ok(path)
        });
        match result {
            Ok(path) => {
                log::info!("wrote {}", path.display());
                vec![path]
            }
            Err(e) => {
                log::error!("combined image: {e}");
                Vec::new()
            }
        }
    }

    fn stack(&self, layers: &[Layer]) -> Result<StackContext> {
        StackContext::new(layers, self.config.bounds, self.config.elevation_range)
    }

    fn render_sheet(
        &mut self,
        stack: &StackContext,
        sheet: &Sheet<'_>,
    ) -> Result<(RasterCanvas, LayerReport)> {
        let (width, height) = self.image_size(stack.bounds());
        let Self {
            config: cfg,
            glyphs,
        } = self;
        let mut report = LayerReport::new(sheet.layer_number, sheet.elevation);
        let mut canvas = RasterCanvas::new(width, height, rgba8(cfg.background))?;
        canvas.set_anti_alias(cfg.anti_alias);
        let margin = f64::from(cfg.margin);
        let transform = stack.transform(
            Size::new(f64::from(width), f64::from(height)),
            margin,
        );

        report.enter(Stage::TransformGeometry);
        let groups: Vec<Vec<Polygon>> = sheet
            .layers
            .iter()
            .map(|layer| {
                layer
                    .polygons
                    .iter()
                    .map(|p| transform.polygon_to_canvas(p))
                    .collect()
            })
            .collect();

        report.enter(Stage::Fill);
        for (layer, polygons) in sheet.layers.iter().zip(&groups) {
            let Some(color) = fill_color(
                layer.elevation,
                stack.range(),
                cfg.color_scheme,
                cfg.render_mode,
            ) else {
                continue;
            };
            let color = rgba8(color);
            for polygon in polygons {
                if canvas.fill_polygon(polygon, color, !cfg.remove_holes) {
                    report.fills += 1;
                }
            }
        }

        report.enter(Stage::Stroke);
        let outline = rgba8(cfg.outline_color);
        for polygon in sheet.layers.iter().flat_map(|layer| &layer.polygons) {
            for (a, b) in polygon.exterior.edges() {
                canvas.stroke_line(
                    transform.to_pixel(a),
                    transform.to_pixel(b),
                    outline,
                    cfg.outline_width,
                );
                report.outline_segments += 1;
            }
        }
        draw_registration(&mut canvas, cfg);

        report.enter(Stage::PlaceLabels);
        let placer = LabelPlacer::new(&cfg.labels, mm_to_pixels(1.0, cfg.dpi))
            .with_sample_spacing(1.0)
            .with_curved(cfg.curved_hidden);
        let labels = place_sheet_labels(&placer, &transform, stack, sheet, glyphs);
        for label in labels.iter() {
            draw_label(&mut canvas, glyphs, label);
        }
        report.record_labels(&labels);

        report.enter(Stage::Finalize);
        if cfg.legend {
            draw_legend(&mut canvas, glyphs, cfg, stack.range());
        }
        Ok((canvas, report))
    }
}

fn draw_registration(canvas: &mut RasterCanvas, cfg: &RasterConfig) {
    let color = rgba8(cfg.alignment_color);
    let margin = to_i32(f64::from(cfg.margin));
    let (w, h) = (to_i32(f64::from(canvas.width())), to_i32(f64::from(canvas.height())));
    if cfg.alignment_marks {
        let offset = margin / 2;
        let size = to_i32(f64::from(cfg.mark_size));
        for corner in [
            (offset, offset),
            (w - offset, offset),
            (w - offset, h - offset),
            (offset, h - offset),
        ] {
            canvas.draw_cross(corner, size, color, cfg.outline_width);
        }
    }
    if cfg.border {
        canvas.stroke_rect(
            margin,
            margin,
            w - 2 * margin,
            h - 2 * margin,
            color,
            cfg.outline_width,
        );
    }
}

fn draw_label<G: GlyphSource>(canvas: &mut RasterCanvas, glyphs: &mut G, label: &PlacedLabel) {
    let color = rgba8(label.color);
    let size = label.font_size;
    let Some(path) = &label.path else {
        for line in &label.lines {
            draw_text(canvas, glyphs, &line.text, line.origin, label.anchor, size, color);
        }
        return;
    };
    let chars: Vec<char> = label.text.chars().collect();
    let advances: Vec<f64> = chars
        .iter()
        .map(|ch| {
            let mut buf = [0; 4];
            glyphs
                .measure_text_width(ch.encode_utf8(&mut buf), size)
                .unwrap_or(size * 0.6)
        })
        .collect();
    for (&ch, (center, angle)) in chars.iter().zip(path.glyph_positions(&advances)) {
        let Some(glyph) = glyphs.rasterize_glyph(ch, size, angle) else {
            continue;
        };
        let origin = (
            to_i32(center.x - f64::from(glyph.width) * 0.5),
            to_i32(center.y - f64::from(glyph.height) * 0.5),
        );
        canvas.composite_glyph(&glyph, origin, color);
    }
}

/// Draws one line of text vertically centered on `origin`.
fn draw_text<G: GlyphSource>(
    canvas: &mut RasterCanvas,
    glyphs: &mut G,
    text: &str,
    origin: Point,
    anchor: Anchor,
    size: f64,
    color: Rgba8,
) {
    let width = glyphs.measure_text_width(text, size).unwrap_or(0.0);
    let mut pen_x = origin.x - anchor.offset(width);
    let baseline = origin.y + size * BASELINE_OFFSET;
    for ch in text.chars() {
        match glyphs.rasterize_glyph(ch, size, 0.0) {
            Some(glyph) => {
                let x = to_i32(pen_x) + glyph.left;
                let y = to_i32(baseline) - glyph.top;
                canvas.composite_glyph(&glyph, (x, y), color);
                pen_x += f64::from(glyph.advance);
            }
            None => {
                let mut buf = [0; 4];
                pen_x += glyphs
                    .measure_text_width(ch.encode_utf8(&mut buf), size)
                    .unwrap_or(0.0);
            }
        }
    }
}

const LEGEND_WIDTH: i32 = 40;
const LEGEND_HEIGHT: i32 = 200;
const LEGEND_MARGIN: i32 = 20;
const LEGEND_SEGMENTS: i32 = 100;
const LEGEND_FONT_SIZE: f64 = 14.0;
const LEGEND_LABEL_SPACING: f64 = 10.0;

/// Draws the color ramp, highest elevation on top, with the extreme and
/// middle elevations written to its left.
fn draw_legend<G: GlyphSource>(
    canvas: &mut RasterCanvas,
    glyphs: &mut G,
    cfg: &RasterConfig,
    range: ElevationRange,
) {
    let Some(scheme) = cfg.render_mode.fill_scheme(cfg.color_scheme) else {
        return;
    };
    let x = to_i32(f64::from(canvas.width())) - LEGEND_MARGIN - LEGEND_WIDTH;
    let y = to_i32(f64::from(canvas.height())) - LEGEND_MARGIN - LEGEND_HEIGHT;
    let segment = LEGEND_HEIGHT / LEGEND_SEGMENTS;
    for i in 0..LEGEND_SEGMENTS {
        let f = f64::from(i) / f64::from(LEGEND_SEGMENTS - 1);
        let elevation = range.max - (range.max - range.min) * f;
        let top = f64::from(y + i * segment);
        canvas.fill_rect(
            Rect::new(
                f64::from(x),
                top,
                f64::from(x + LEGEND_WIDTH),
                top + f64::from(segment),
            ),
            rgba8(scheme.map(elevation, range)),
        );
    }
    let black = [0, 0, 0, 255];
    canvas.stroke_rect(x - 1, y - 1, LEGEND_WIDTH + 2, LEGEND_HEIGHT + 2, black, 1);

    let label_x = f64::from(x) - LEGEND_LABEL_SPACING;
    for (elevation, label_y) in [
        (range.max, y),
        ((range.min + range.max) * 0.5, y + LEGEND_HEIGHT / 2),
        (range.min, y + LEGEND_HEIGHT),
    ] {
        draw_text(
            canvas,
            glyphs,
            &format!("{:.0}m", elevation.round()),
            Point::new(label_x, f64::from(label_y)),
            Anchor::End,
            LEGEND_FONT_SIZE,
            black,
        );
    }
}

fn to_i32(v: f64) -> i32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "canvas coordinates are far below the i32 range"
    )]
    let v = v.round() as i32;
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{GlyphBitmap, TextMeasure};
    use crate::geometry::Ring;

    /// Every glyph is a solid box of half the font size.
    #[derive(Debug, Default)]
    struct Boxes {
        rasterized: usize,
    }

    impl TextMeasure for Boxes {
        fn measure_text_width(&mut self, text: &str, size: f64) -> Option<f64> {
            Some(text.chars().count() as f64 * size * 0.5)
        }
    }

    impl GlyphSource for Boxes {
        fn rasterize_glyph(&mut self, _: char, size: f64, _: f64) -> Option<GlyphBitmap> {
            self.rasterized += 1;
            #[expect(clippy::cast_possible_truncation, reason = "test sizes are small")]
            let side = (size * 0.5).round().max(1.0) as u32;
            Some(GlyphBitmap {
                left: 0,
                top: i32::try_from(side).unwrap(),
                width: side,
                height: side,
                advance: side as f32,
                mask: vec![255; (side * side) as usize],
            })
        }
    }

    fn square(min: f64, max: f64) -> Ring {
        Ring::from_coords(&[(min, min), (max, min), (max, max), (min, max)]).unwrap()
    }

    fn config() -> RasterConfig {
        RasterConfig {
            width: 100,
            height: Some(100),
            margin: 0,
            aspect: AspectMode::Planar,
            alignment_marks: false,
            border: false,
            anti_alias: false,
            outline_width: 1,
            ..RasterConfig::default()
        }
    }

    fn stack() -> Vec<Layer> {
        vec![
            Layer::new(
                0.0,
                vec![Polygon::new(square(0.0, 10.0), vec![square(4.0, 6.0)])],
            ),
            Layer::new(10.0, vec![Polygon::new(square(2.0, 8.0), vec![])]),
        ]
    }

    #[test]
    fn height_follows_aspect() {
        let renderer = RasterRenderer::new(
            RasterConfig {
                height: None,
                ..config()
            },
            Boxes::default(),
        );
        assert_eq!(renderer.image_size(Rect::new(0.0, 0.0, 20.0, 10.0)), (100, 50));
    }

    #[test]
    fn hole_is_cut_from_fill() {
        let mut renderer = RasterRenderer::new(config(), Boxes::default());
        let (canvas, report) = renderer.render_layer(&stack(), 0).unwrap();
        let fill = rgba8(ColorScheme::Terrain.map(0.0, ElevationRange::new(0.0, 10.0)));
        assert_eq!(canvas.pixel(20, 20), Some(fill));
        assert_eq!(canvas.pixel(50, 50), Some([255, 255, 255, 255]), "hole stays background");
        assert_eq!(report.fills, 1);
        assert_eq!(report.outline_segments, 4);
        assert!(report.is_finished());
    }

    #[test]
    fn removed_holes_are_filled() {
        let mut renderer = RasterRenderer::new(
            RasterConfig {
                remove_holes: true,
                ..config()
            },
            Boxes::default(),
        );
        let (canvas, _) = renderer.render_layer(&stack(), 0).unwrap();
        assert_ne!(canvas.pixel(50, 50), Some([255, 255, 255, 255]));
    }

    #[test]
    fn holes_are_not_outlined() {
        let mut renderer = RasterRenderer::new(
            RasterConfig {
                render_mode: RenderMode::Monochrome,
                ..config()
            },
            Boxes::default(),
        );
        let (canvas, report) = renderer.render_layer(&stack(), 0).unwrap();
        assert_eq!(report.fills, 0);
        assert_eq!(canvas.pixel(40, 50), Some([255, 255, 255, 255]));
        assert_eq!(canvas.pixel(0, 50), Some([255, 0, 0, 255]));
    }

    #[test]
    fn labels_are_drawn_with_glyphs() {
        let mut renderer = RasterRenderer::new(
            RasterConfig {
                dpi: 25.4 * 4.0,
                labels: LabelConfig {
                    layer_visible: "L%{n}".into(),
                    ..LabelConfig::default()
                },
                ..config()
            },
            Boxes::default(),
        );
        let (_, report) = renderer.render_layer(&stack(), 1).unwrap();
        assert_eq!(report.labels_placed, 1);
        assert_eq!(renderer.glyphs.rasterized, 2);
    }

    #[test]
    fn legend_is_drawn_in_corner() {
        let mut renderer = RasterRenderer::new(
            RasterConfig {
                width: 400,
                height: Some(400),
                legend: true,
                ..config()
            },
            Boxes::default(),
        );
        let (canvas, _) = renderer.render_layer(&stack(), 0).unwrap();
        let top = rgba8(ColorScheme::Terrain.at(1.0));
        assert_eq!(canvas.pixel(360, 181), Some(top));
    }
}
