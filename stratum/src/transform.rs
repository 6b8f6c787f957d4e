// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping from geographic coordinates to canvas coordinates.

use peniko::kurbo::{Point, Rect, Size};

use crate::geometry::{bounds_of, pad_degenerate, Polygon, Ring};

/// Maps a geographic point into a canvas of `canvas` size.
///
/// The content occupies the canvas minus `margin` on every side. Geographic y
/// grows upward while canvas y grows downward, so the y axis is flipped.
///
/// `bounds` must not be degenerate; see [`pad_degenerate`].
pub fn to_canvas(geo: Point, bounds: Rect, canvas: Size, margin: f64) -> Point {
    let norm_x = (geo.x - bounds.x0) / (bounds.x1 - bounds.x0);
    let norm_y = (geo.y - bounds.y0) / (bounds.y1 - bounds.y0);
    Point::new(
        margin + norm_x * (canvas.width - 2.0 * margin),
        margin + (1.0 - norm_y) * (canvas.height - 2.0 * margin),
    )
}

/// The shared geographic-to-canvas transform of one export.
///
/// Fills, outlines and label regions are all computed through this type so
/// that they line up exactly.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CanvasTransform {
    bounds: Rect,
    canvas: Size,
    margin: f64,
}

impl CanvasTransform {
    /// Creates a transform. Degenerate bounds are padded.
    pub fn new(bounds: Rect, canvas: Size, margin: f64) -> Self {
        Self {
            bounds: pad_degenerate(bounds),
            canvas,
            margin,
        }
    }

    /// The (padded) geographic bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The size of the canvas.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// The margin on each side of the canvas.
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// The canvas area inside the margins.
    pub fn content_rect(&self) -> Rect {
        Rect::new(
            self.margin,
            self.margin,
            self.canvas.width - self.margin,
            self.canvas.height - self.margin,
        )
    }

    /// Maps a geographic point to the canvas.
    pub fn to_canvas(&self, geo: Point) -> Point {
        to_canvas(geo, self.bounds, self.canvas, self.margin)
    }

    /// Maps a geographic point to a pixel, clamped into the canvas.
    pub fn to_pixel(&self, geo: Point) -> (i32, i32) {
        let p = self.to_canvas(geo);
        (
            clamp_pixel(p.x, self.canvas.width),
            clamp_pixel(p.y, self.canvas.height),
        )
    }

    /// Maps every point of a ring to the canvas.
    pub fn ring_to_canvas(&self, ring: &Ring) -> Ring {
        ring.map(|p| self.to_canvas(p))
    }

    /// Maps every ring of a polygon to the canvas.
    pub fn polygon_to_canvas(&self, polygon: &Polygon) -> Polygon {
        polygon.map(|p| self.to_canvas(p))
    }

    /// Maps a geographic rectangle to the canvas.
    ///
    /// The result is normalized so that `y0 < y1` despite the flip.
    pub fn rect_to_canvas(&self, rect: Rect) -> Rect {
        let a = self.to_canvas(Point::new(rect.x0, rect.y0));
        let b = self.to_canvas(Point::new(rect.x1, rect.y1));
        Rect::from_points(a, b)
    }

    /// Returns the canvas bounding box of every ring of `polygons`, or `None`
    /// if there are no polygons.
    pub fn polygons_bbox(&self, polygons: &[Polygon]) -> Option<Rect> {
        bounds_of(
            polygons
                .iter()
                .flat_map(Polygon::rings)
                .flat_map(Ring::points)
                .map(|&p| self.to_canvas(p)),
        )
    }
}

fn clamp_pixel(v: f64, extent: f64) -> i32 {
    let max = (extent - 1.0).max(0.0);
    #[expect(
        clippy::cast_possible_truncation,
        reason = "value is clamped into the canvas"
    )]
    let pixel = v.floor().clamp(0.0, max) as i32;
    pixel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_transform() -> CanvasTransform {
        CanvasTransform::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Size::new(100.0, 100.0),
            0.0,
        )
    }

    #[test]
    fn to_canvas_flips_y() {
        let t = square_transform();
        assert_eq!(t.to_canvas(Point::new(0.0, 10.0)), Point::new(0.0, 0.0));
        assert_eq!(t.to_canvas(Point::new(10.0, 0.0)), Point::new(100.0, 100.0));
    }

    #[test]
    fn to_canvas_honors_margin() {
        let t = CanvasTransform::new(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Size::new(120.0, 120.0),
            10.0,
        );
        assert_eq!(t.to_canvas(Point::new(0.0, 0.0)), Point::new(10.0, 110.0));
        assert_eq!(t.to_canvas(Point::new(5.0, 5.0)), Point::new(60.0, 60.0));
        assert_eq!(t.content_rect(), Rect::new(10.0, 10.0, 110.0, 110.0));
    }

    #[test]
    fn to_pixel_clamps() {
        let t = square_transform();
        assert_eq!(t.to_pixel(Point::new(10.0, 0.0)), (99, 99));
        assert_eq!(t.to_pixel(Point::new(-5.0, 20.0)), (0, 0));
        assert_eq!(t.to_pixel(Point::new(2.55, 7.45)), (25, 25));
    }

    #[test]
    fn degenerate_bounds_do_not_divide_by_zero() {
        let t = CanvasTransform::new(
            Rect::new(5.0, 5.0, 5.0, 5.0),
            Size::new(100.0, 100.0),
            0.0,
        );
        let p = t.to_canvas(Point::new(5.0, 5.0));
        assert_eq!(p, Point::new(50.0, 50.0));
    }

    #[test]
    fn rect_to_canvas_matches_point_transform() {
        let t = square_transform();
        let rect = t.rect_to_canvas(Rect::new(2.0, 2.0, 4.0, 6.0));
        assert_eq!(rect, Rect::new(20.0, 40.0, 40.0, 80.0));
        let ring = Ring::from_coords(&[(2.0, 2.0), (4.0, 2.0), (4.0, 6.0), (2.0, 6.0)]).unwrap();
        let poly = Polygon::new(ring, vec![]);
        assert_eq!(t.polygons_bbox(&[poly]), Some(rect));
    }
}
