// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An RGBA pixel grid with the primitives the raster backend draws with.

use std::path::Path;

use image::codecs::png::PngEncoder;
use image::RgbaImage;
use peniko::kurbo::Rect;
use tiny_skia::{
    ColorU8, FillRule, Paint, PathBuilder, Pixmap, PremultipliedColorU8, Transform,
};

use crate::font::GlyphBitmap;
use crate::geometry::Polygon;
use crate::{Error, Result};

/// Straight (non-premultiplied) 8-bit RGBA.
pub type Rgba8 = [u8; 4];

/// An in-memory RGBA canvas.
///
/// Pixels are stored premultiplied by `tiny-skia`. Everything drawn by the
/// renderers is opaque, so stored and straight values coincide except where
/// the background itself is translucent.
pub struct RasterCanvas {
    pixmap: Pixmap,
    anti_alias: bool,
}

impl core::fmt::Debug for RasterCanvas {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RasterCanvas")
            .field("width", &self.pixmap.width())
            .field("height", &self.pixmap.height())
            .field("anti_alias", &self.anti_alias)
            .finish_non_exhaustive()
    }
}

impl RasterCanvas {
    /// Allocates a canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgba8) -> Result<Self> {
        let mut pixmap =
            Pixmap::new(width, height).ok_or(Error::CanvasAllocation { width, height })?;
        let [r, g, b, a] = background;
        pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, a));
        Ok(Self {
            pixmap,
            anti_alias: true,
        })
    }

    /// Enables or disables antialiased polygon edges.
    pub fn set_anti_alias(&mut self, anti_alias: bool) {
        self.anti_alias = anti_alias;
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Returns the straight color of a pixel, or `None` if out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        self.pixmap.pixel(x, y).map(|p| straight(p.demultiply()))
    }

    /// Fills a polygon given in canvas coordinates.
    ///
    /// The exterior and, if `include_holes` is set, every hole become one
    /// path that is filled once with the even-odd rule. Returns `false` if the
    /// polygon produced no fillable path.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "tiny-skia paths are single precision"
    )]
    pub fn fill_polygon(&mut self, polygon: &Polygon, color: Rgba8, include_holes: bool) -> bool {
        let mut pb = PathBuilder::new();
        let holes = if include_holes { &polygon.holes[..] } else { &[] };
        for ring in core::iter::once(&polygon.exterior).chain(holes) {
            let mut points = ring.points().iter();
            let Some(first) = points.next() else {
                continue;
            };
            pb.move_to(first.x as f32, first.y as f32);
            for p in points {
                pb.line_to(p.x as f32, p.y as f32);
            }
            pb.close();
        }
        let Some(path) = pb.finish() else {
            return false;
        };
        let mut paint = Paint::default();
        let [r, g, b, a] = color;
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = self.anti_alias;
        self.pixmap.fill_path(
            &path,
            &paint,
            FillRule::EvenOdd,
            Transform::identity(),
            None,
        );
        true
    }

    /// Fills an axis-aligned rectangle.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "tiny-skia rectangles are single precision"
    )]
    pub fn fill_rect(&mut self, rect: Rect, color: Rgba8) {
        let rect = rect.abs();
        let Some(rect) = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        ) else {
            return;
        };
        let mut paint = Paint::default();
        let [r, g, b, a] = color;
        paint.set_color_rgba8(r, g, b, a);
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }

    /// Draws a line of the given width with Bresenham's algorithm.
    ///
    /// Every visited point stamps a square brush extending `width / 2`
    /// pixels in each direction.
    pub fn stroke_line(&mut self, from: (i32, i32), to: (i32, i32), color: Rgba8, width: u32) {
        let half = i32::try_from(width / 2).unwrap_or(i32::MAX / 4);
        let (mut x, mut y) = from;
        let (x1, y1) = to;
        let dx = (x1 - x).abs();
        let dy = (y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        loop {
            for oy in -half..=half {
                for ox in -half..=half {
                    self.set_pixel(x + ox, y + oy, color);
                }
            }
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Outlines a rectangle given by its top-left corner and size.
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgba8, width: u32) {
        let (x1, y1) = (x + w, y + h);
        self.stroke_line((x, y), (x1, y), color, width);
        self.stroke_line((x1, y), (x1, y1), color, width);
        self.stroke_line((x1, y1), (x, y1), color, width);
        self.stroke_line((x, y1), (x, y), color, width);
    }

    /// Draws an axis-aligned cross of total extent `size` centered on `center`.
    pub fn draw_cross(&mut self, center: (i32, i32), size: i32, color: Rgba8, width: u32) {
        let (cx, cy) = center;
        let half = size / 2;
        self.stroke_line((cx - half, cy), (cx + half, cy), color, width);
        self.stroke_line((cx, cy - half), (cx, cy + half), color, width);
    }

    /// Overwrites a pixel. Out-of-bounds coordinates are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba8) {
        if let Some(idx) = self.index(x, y) {
            let [r, g, b, a] = color;
            self.pixmap.pixels_mut()[idx] = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
    }

    /// Blends `color` over a pixel with coverage `alpha`.
    ///
    /// Computes `fg * a + bg * (1 - a)` per channel and leaves the pixel
    /// opaque. Out-of-bounds coordinates are ignored.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba8, alpha: u8) {
        if alpha == 0 {
            return;
        }
        let Some(idx) = self.index(x, y) else {
            return;
        };
        let bg = straight(self.pixmap.pixels()[idx].demultiply());
        let a = f32::from(alpha) / 255.0;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "blend of two u8 values stays within u8"
        )]
        let mix = |fg: u8, bg: u8| (f32::from(fg) * a + f32::from(bg) * (1.0 - a)) as u8;
        if let Some(px) = PremultipliedColorU8::from_rgba(
            mix(color[0], bg[0]),
            mix(color[1], bg[1]),
            mix(color[2], bg[2]),
            255,
        ) {
            self.pixmap.pixels_mut()[idx] = px;
        }
    }

    /// Composites a glyph coverage mask with its top-left corner at `origin`.
    pub fn composite_glyph(&mut self, glyph: &GlyphBitmap, origin: (i32, i32), color: Rgba8) {
        let Ok(width) = usize::try_from(glyph.width) else {
            return;
        };
        if width == 0 {
            return;
        }
        for (row, line) in glyph.mask.chunks_exact(width).enumerate() {
            let Ok(row) = i32::try_from(row) else {
                return;
            };
            for (col, &alpha) in line.iter().enumerate() {
                let Ok(col) = i32::try_from(col) else {
                    break;
                };
                self.blend_pixel(origin.0 + col, origin.1 + row, color, alpha);
            }
        }
    }

    /// Returns the canvas as straight RGBA bytes, row-major from the top left.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| straight(p.demultiply()))
            .collect()
    }

    /// Encodes the canvas as PNG into `path`.
    ///
    /// The image is encoded in memory first so that a failed encode leaves
    /// no file behind.
    pub fn write_png(&self, path: &Path) -> Result<()> {
        let image = RgbaImage::from_raw(self.width(), self.height(), self.to_rgba8()).ok_or(
            Error::CanvasAllocation {
                width: self.width(),
                height: self.height(),
            },
        )?;
        let mut encoded = Vec::new();
        image
            .write_with_encoder(PngEncoder::new(&mut encoded))
            .map_err(|source| Error::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        std::fs::write(path, encoded).map_err(|e| Error::io(path, e))
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        if x >= self.width() || y >= self.height() {
            return None;
        }
        usize::try_from(u64::from(y) * u64::from(self.width()) + u64::from(x)).ok()
    }
}

fn straight(c: ColorU8) -> Rgba8 {
    [c.red(), c.green(), c.blue(), c.alpha()]
}
