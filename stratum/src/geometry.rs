// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon-with-holes value types.

use peniko::kurbo::{Point, Rect};

/// Extents below this are treated as degenerate.
pub(crate) const DEGENERATE_EPSILON: f64 = 1e-6;

/// Padding applied on each side of a degenerate axis.
const DEGENERATE_PADDING: f64 = 0.5;

/// A closed boundary of at least three points.
///
/// The closing edge from the last point back to the first is implicit.
#[derive(Clone, Debug, PartialEq)]
pub struct Ring {
    points: Vec<Point>,
}

impl Ring {
    /// Creates a ring from its points.
    ///
    /// An explicit closing point equal to the first point is dropped.
    /// Returns `None` if fewer than three points remain.
    pub fn new(mut points: Vec<Point>) -> Option<Self> {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        (points.len() >= 3).then_some(Self { points })
    }

    /// Creates a ring from `(x, y)` pairs.
    pub fn from_coords(coords: &[(f64, f64)]) -> Option<Self> {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    /// Returns the points of the ring, without the closing point.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Returns the number of points, which is also the number of edges.
    #[expect(clippy::len_without_is_empty, reason = "a ring is never empty")]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Iterates over the edges of the ring, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Returns the bounding box of the ring.
    pub fn bounds(&self) -> Rect {
        bounds_of(self.points.iter().copied()).unwrap_or(Rect::ZERO)
    }

    /// Returns the signed shoelace area.
    ///
    /// Positive for counter-clockwise rings in a y-up coordinate system.
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            * 0.5
    }

    /// Returns the absolute area enclosed by the ring.
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Returns the ring with every point mapped through `f`.
    pub fn map(&self, f: impl FnMut(Point) -> Point) -> Self {
        Self {
            points: self.points.iter().copied().map(f).collect(),
        }
    }

    /// Returns the boundary sampled so that consecutive samples are at most
    /// `spacing` apart.
    ///
    /// Every vertex is part of the output.
    pub fn resample(&self, spacing: f64) -> Vec<Point> {
        let mut samples = Vec::with_capacity(self.points.len());
        for (a, b) in self.edges() {
            samples.push(a);
            if spacing <= 0.0 {
                continue;
            }
            let len = a.distance(b);
            let steps = (len / spacing).ceil();
            if steps > 1.0 {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "edge sample counts are small"
                )]
                let count = steps as usize;
                for i in 1..count {
                    samples.push(a.lerp(b, i as f64 / steps));
                }
            }
        }
        samples
    }
}

/// A filled region with an exterior boundary and zero or more holes.
///
/// Holes mark area that is covered by a higher layer once the sheets are
/// stacked. Only the exterior is ever outlined.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    /// The outer boundary.
    pub exterior: Ring,
    /// Interior boundaries subtracted from the fill.
    pub holes: Vec<Ring>,
}

impl Polygon {
    /// Creates a polygon from its exterior and holes.
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// Iterates over the exterior followed by every hole.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> + '_ {
        core::iter::once(&self.exterior).chain(&self.holes)
    }

    /// Returns the bounding box of all rings.
    pub fn bounds(&self) -> Rect {
        self.exterior.bounds()
    }

    /// Returns the area of the exterior minus the area of the holes.
    pub fn area(&self) -> f64 {
        self.exterior.area() - self.holes.iter().map(Ring::area).sum::<f64>()
    }

    /// Returns the polygon with every point of every ring mapped through `f`.
    pub fn map(&self, mut f: impl FnMut(Point) -> Point) -> Self {
        Self {
            exterior: self.exterior.map(&mut f),
            holes: self.holes.iter().map(|hole| hole.map(&mut f)).collect(),
        }
    }
}

/// One elevation band of the stack, cut from one sheet.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    /// Elevation of the band in meters.
    pub elevation: f64,
    /// The polygons making up the band.
    pub polygons: Vec<Polygon>,
}

impl Layer {
    /// Creates a layer.
    pub fn new(elevation: f64, polygons: Vec<Polygon>) -> Self {
        Self {
            elevation,
            polygons,
        }
    }

    /// Returns the bounding box of all polygons, or `None` if there are none.
    pub fn bounds(&self) -> Option<Rect> {
        self.polygons
            .iter()
            .map(Polygon::bounds)
            .reduce(|a, b| a.union(b))
    }

    /// Returns the polygon with the largest area.
    pub fn largest_polygon(&self) -> Option<&Polygon> {
        largest_polygon(&self.polygons)
    }
}

/// Returns the polygon with the largest exterior area.
///
/// Ties resolve to the earliest polygon.
pub(crate) fn largest_polygon(polygons: &[Polygon]) -> Option<&Polygon> {
    polygons.iter().fold(None, |best: Option<&Polygon>, poly| match best {
        Some(b) if b.exterior.area() >= poly.exterior.area() => Some(b),
        _ => Some(poly),
    })
}

/// Returns the bounding box of every polygon in the stack.
pub fn stack_bounds(layers: &[Layer]) -> Option<Rect> {
    layers
        .iter()
        .filter_map(Layer::bounds)
        .reduce(|a, b| a.union(b))
}

/// Expands any axis of `rect` whose extent is near zero.
pub fn pad_degenerate(rect: Rect) -> Rect {
    let mut rect = rect.abs();
    if rect.width() < DEGENERATE_EPSILON {
        rect.x0 -= DEGENERATE_PADDING;
        rect.x1 += DEGENERATE_PADDING;
    }
    if rect.height() < DEGENERATE_EPSILON {
        rect.y0 -= DEGENERATE_PADDING;
        rect.y1 += DEGENERATE_PADDING;
    }
    rect
}

pub(crate) fn bounds_of(points: impl IntoIterator<Item = Point>) -> Option<Rect> {
    let mut points = points.into_iter();
    let first = points.next()?;
    Some(points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Ring {
        Ring::from_coords(&[(min, min), (max, min), (max, max), (min, max)]).unwrap()
    }

    #[test]
    fn ring_drops_closing_point() {
        let ring = Ring::from_coords(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]).unwrap();
        assert_eq!(ring.len(), 3, "closing point should be implicit");
        assert!(
            Ring::from_coords(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]).is_none(),
            "two distinct points are not a ring"
        );
    }

    #[test]
    fn ring_edges_close() {
        let ring = square(0.0, 2.0);
        let edges: Vec<_> = ring.edges().collect();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges[3], (Point::new(0.0, 2.0), Point::new(0.0, 0.0)));
    }

    #[test]
    fn ring_area_and_orientation() {
        let ring = square(0.0, 2.0);
        assert_eq!(ring.signed_area(), 4.0);
        let reversed = Ring::new(ring.points().iter().rev().copied().collect()).unwrap();
        assert_eq!(reversed.signed_area(), -4.0);
        assert_eq!(reversed.area(), 4.0);
    }

    #[test]
    fn ring_resample_keeps_vertices() {
        let samples = square(0.0, 2.0).resample(0.5);
        assert_eq!(samples.len(), 16, "each 2-unit edge yields 4 samples");
        assert_eq!(samples[0], Point::new(0.0, 0.0));
        assert_eq!(samples[4], Point::new(2.0, 0.0));
        assert!(
            samples.windows(2).all(|w| w[0].distance(w[1]) <= 0.5 + 1e-9),
            "samples should be at most the spacing apart"
        );
    }

    #[test]
    fn polygon_area_subtracts_holes() {
        let poly = Polygon::new(square(0.0, 4.0), vec![square(1.0, 2.0)]);
        assert_eq!(poly.area(), 15.0);
        assert_eq!(poly.rings().count(), 2);
    }

    #[test]
    fn largest_polygon_prefers_first_on_tie() {
        let a = Polygon::new(square(0.0, 1.0), vec![]);
        let b = Polygon::new(square(5.0, 7.0), vec![]);
        let c = Polygon::new(square(10.0, 12.0), vec![]);
        let polys = [a, b.clone(), c];
        assert_eq!(largest_polygon(&polys), Some(&b));
        assert_eq!(largest_polygon(&[]), None);
    }

    #[test]
    fn degenerate_bounds_are_padded() {
        let padded = pad_degenerate(Rect::new(3.0, 1.0, 3.0, 5.0));
        assert_eq!(padded, Rect::new(2.5, 1.0, 3.5, 5.0));
        let untouched = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert_eq!(pad_degenerate(untouched), untouched);
    }

    #[test]
    fn stack_bounds_skips_empty_layers() {
        let layers = [
            Layer::new(1.0, vec![]),
            Layer::new(2.0, vec![Polygon::new(square(0.0, 1.0), vec![])]),
            Layer::new(3.0, vec![Polygon::new(square(2.0, 3.0), vec![])]),
        ];
        assert_eq!(stack_bounds(&layers), Some(Rect::new(0.0, 0.0, 3.0, 3.0)));
        assert_eq!(stack_bounds(&layers[..1]), None);
    }
}
