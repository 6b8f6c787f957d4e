// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt::Write;

use peniko::kurbo::{Point, Vec2};

use crate::geometry::{Polygon, Ring};

/// Parameters for [`generate_text_path`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TextPathConfig {
    /// How far the path is pulled inside the boundary, relative to the font
    /// height.
    pub inset_factor: f64,
    /// Exteriors with at most this many points are too coarse to follow.
    pub min_exterior_points: usize,
    /// Upper bound on the number of inset points searched for a segment.
    pub max_search_points: usize,
    /// Minimum length of a candidate segment relative to the text width.
    pub min_segment_ratio: f64,
    /// Largest total turn of a candidate segment, in degrees.
    pub max_turn_degrees: f64,
    /// Number of points sampled on the smoothed path.
    pub samples: usize,
    /// Minimum length of the smoothed path relative to the text width.
    pub min_path_ratio: f64,
    /// Share of the path text may occupy when it has to be shrunk.
    pub fit_ratio: f64,
}

impl Default for TextPathConfig {
    fn default() -> Self {
        Self {
            inset_factor: 0.75,
            min_exterior_points: 6,
            max_search_points: 200,
            min_segment_ratio: 0.6,
            max_turn_degrees: 90.0,
            samples: 50,
            min_path_ratio: 0.8,
            fit_ratio: 0.95,
        }
    }
}

/// A smooth curve inside a shape that text can follow.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPath {
    /// Sampled points, in reading order.
    pub points: Vec<Point>,
    /// Tangent direction at each point, in degrees.
    pub angles: Vec<f64>,
    /// Length of the polyline through `points`.
    pub length: f64,
}

impl TextPath {
    /// Formats the path as SVG path data.
    pub fn svg_path_data(&self) -> String {
        let mut d = String::new();
        for (i, p) in self.points.iter().enumerate() {
            let cmd = if i == 0 { "M" } else { " L" };
            let _ = write!(d, "{cmd} {:.3} {:.3}", p.x, p.y);
        }
        d
    }

    /// Returns the font size for text of `text_width` at `font_size` so that
    /// it fits on the path.
    pub fn fitted_font_size(&self, text_width: f64, font_size: f64, config: &TextPathConfig) -> f64 {
        if text_width > self.length && text_width > 0.0 {
            font_size * self.length / text_width * config.fit_ratio
        } else {
            font_size
        }
    }

    /// Returns the point and direction, in degrees, at `distance` along the
    /// path. Distances outside the path are clamped to its ends.
    pub fn point_at(&self, distance: f64) -> Option<(Point, f64)> {
        let first = *self.points.first()?;
        let mut remaining = distance.max(0.0);
        for (i, w) in self.points.windows(2).enumerate() {
            let seg = w[0].distance(w[1]);
            if remaining <= seg {
                let t = if seg > 0.0 { remaining / seg } else { 0.0 };
                return Some((w[0].lerp(w[1], t), segment_angle(w[0], w[1], self.angle(i))));
            }
            remaining -= seg;
        }
        let last = self.points.len() - 1;
        Some((
            self.points.get(last).copied().unwrap_or(first),
            self.angle(last),
        ))
    }

    /// Tangent at sample `i`, or 0 if the path carries no angle for it.
    fn angle(&self, i: usize) -> f64 {
        self.angles.get(i).copied().unwrap_or(0.0)
    }

    /// Places characters with the given advances centered along the path.
    ///
    /// Returns the center point and rotation, in degrees, of each character.
    pub fn glyph_positions(&self, advances: &[f64]) -> Vec<(Point, f64)> {
        let total: f64 = advances.iter().sum();
        let mut cursor = ((self.length - total) * 0.5).max(0.0);
        advances
            .iter()
            .filter_map(|advance| {
                let placed = self.point_at(cursor + advance * 0.5);
                cursor += advance;
                placed
            })
            .collect()
    }
}

fn segment_angle(a: Point, b: Point, fallback: f64) -> f64 {
    let d = b - a;
    if d.hypot2() > 0.0 {
        d.y.atan2(d.x).to_degrees()
    } else {
        fallback
    }
}

/// Derives a path for text of `text_width` x `font_height` inside the
/// largest of `polygons`.
///
/// The exterior is pulled inward, the straightest sufficiently long stretch
/// near the middle of the shape is picked, and that stretch is smoothed with
/// a Catmull-Rom spline. The path runs left to right. Returns `None` if no
/// polygon is detailed enough or no stretch is long enough.
pub fn generate_text_path(
    polygons: &[Polygon],
    text_width: f64,
    font_height: f64,
    config: &TextPathConfig,
) -> Option<TextPath> {
    let polygon = polygons
        .iter()
        .filter(|p| p.exterior.len() > config.min_exterior_points)
        .fold(None, |best: Option<&Polygon>, p| match best {
            Some(b) if b.exterior.area() >= p.exterior.area() => Some(b),
            _ => Some(p),
        })?;

    let distance = font_height * config.inset_factor;
    let inset = inset_ring(&polygon.exterior, distance)
        .or_else(|| inset_ring(&polygon.exterior, distance * 0.5))?;
    let inset = decimate(inset, config.max_search_points);

    let centroid = polygon.bounds().center();
    let segment = best_segment(&inset, text_width, centroid, config)?;
    let mut points = catmull_rom(&segment, config.samples.max(2));
    if points[points.len() - 1].x < points[0].x {
        points.reverse();
    }

    let length: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    if length < text_width * config.min_path_ratio {
        return None;
    }
    let angles = (0..points.len())
        .map(|i| {
            let a = points[i.saturating_sub(1)];
            let b = points[(i + 1).min(points.len() - 1)];
            segment_angle(a, b, 0.0)
        })
        .collect();
    Some(TextPath {
        points,
        angles,
        length,
    })
}

/// Offsets every vertex toward the interior along the angle bisector.
///
/// Returns `None` if the result collapses or turns inside out.
fn inset_ring(ring: &Ring, distance: f64) -> Option<Vec<Point>> {
    let area = ring.signed_area();
    if area == 0.0 {
        return None;
    }
    // The left normal points inward for positively oriented rings.
    let side = area.signum();
    let pts = ring.points();
    let n = pts.len();
    let left_normal = |a: Point, b: Point| -> Option<Vec2> {
        let d = b - a;
        let len = d.hypot();
        (len > 0.0).then(|| Vec2::new(-d.y, d.x) * (side / len))
    };
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = pts[(i + n - 1) % n];
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        let (Some(n1), Some(n2)) = (left_normal(prev, cur), left_normal(cur, next)) else {
            continue;
        };
        let sum = n1 + n2;
        let bisector = if sum.hypot() > 1e-9 { sum.normalize() } else { n1 };
        let cos = bisector.dot(n1).max(0.3);
        out.push(cur + bisector * (distance / cos));
    }
    let inset = Ring::new(out)?;
    let inset_area = inset.signed_area();
    (inset_area.signum() == side && inset_area.abs() < area.abs() && inset.len() >= 4)
        .then(|| inset.points().to_vec())
}

/// Keeps at most `max` points, evenly strided.
fn decimate(points: Vec<Point>, max: usize) -> Vec<Point> {
    if max < 4 || points.len() <= max {
        return points;
    }
    let stride = points.len().div_ceil(max);
    points.into_iter().step_by(stride).collect()
}

/// Finds the best run of consecutive ring points for the text.
fn best_segment(
    ring: &[Point],
    text_width: f64,
    centroid: Point,
    config: &TextPathConfig,
) -> Option<Vec<Point>> {
    let n = ring.len();
    let max_len = n / 2;
    let min_length = text_width * config.min_segment_ratio;
    let mut best: Option<(f64, usize, usize)> = None;
    for start in 0..n {
        let mut length = 0.0;
        let mut turn = 0.0;
        let mut prev_dir: Option<f64> = None;
        for count in 2..=max_len {
            let a = ring[(start + count - 2) % n];
            let b = ring[(start + count - 1) % n];
            length += a.distance(b);
            let dir = (b - a).atan2();
            if let Some(prev) = prev_dir {
                turn += angle_between(prev, dir).abs();
            }
            prev_dir = Some(dir);
            if turn.to_degrees() > config.max_turn_degrees {
                break;
            }
            if count < 3 || length < min_length {
                continue;
            }
            let mid = ring[(start + count / 2) % n];
            let score = length / (1.0 + mid.distance(centroid) * 0.1);
            if best.is_none_or(|(s, _, _)| score > s) {
                best = Some((score, start, count));
            }
        }
    }
    let (_, start, count) = best?;
    Some((0..count).map(|i| ring[(start + i) % n]).collect())
}

fn angle_between(a: f64, b: f64) -> f64 {
    let mut d = b - a;
    while d > core::f64::consts::PI {
        d -= core::f64::consts::TAU;
    }
    while d < -core::f64::consts::PI {
        d += core::f64::consts::TAU;
    }
    d
}

/// Samples a Catmull-Rom spline through `control` at `samples` points.
fn catmull_rom(control: &[Point], samples: usize) -> Vec<Point> {
    let last = control.len() - 1;
    (0..samples)
        .map(|s| {
            let t = s as f64 / (samples - 1) as f64 * last as f64;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "t is bounded by the control point count"
            )]
            let i = (t.floor() as usize).min(last.saturating_sub(1));
            let u = t - i as f64;
            let p0 = control[i.saturating_sub(1)].to_vec2();
            let p1 = control[i].to_vec2();
            let p2 = control[(i + 1).min(last)].to_vec2();
            let p3 = control[(i + 2).min(last)].to_vec2();
            let u2 = u * u;
            let u3 = u2 * u;
            let v = (p1 * 2.0
                + (p2 - p0) * u
                + (p0 * 2.0 - p1 * 5.0 + p2 * 4.0 - p3) * u2
                + (p1 * 3.0 - p0 - p2 * 3.0 + p3) * u3)
                * 0.5;
            v.to_point()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A regular polygon approximating a circle.
    fn circle(cx: f64, cy: f64, r: f64, n: usize) -> Polygon {
        let points = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * core::f64::consts::TAU;
                Point::new(cx + r * a.cos(), cy + r * a.sin())
            })
            .collect();
        Polygon::new(Ring::new(points).unwrap(), vec![])
    }

    #[test]
    fn path_follows_large_circle() {
        let config = TextPathConfig::default();
        let path = generate_text_path(&[circle(50.0, 50.0, 40.0, 64)], 40.0, 5.0, &config).unwrap();
        assert_eq!(path.points.len(), 50);
        assert_eq!(path.angles.len(), 50);
        assert!(path.length >= 40.0 * 0.8);
        assert!(path.points[0].x <= path.points[49].x, "path should read left to right");
        for p in &path.points {
            assert!(
                p.distance(Point::new(50.0, 50.0)) < 40.0,
                "path should stay inside the shape: {p:?}"
            );
        }
    }

    #[test]
    fn coarse_polygons_are_skipped() {
        let config = TextPathConfig::default();
        assert_eq!(
            generate_text_path(&[circle(0.0, 0.0, 40.0, 6)], 10.0, 2.0, &config),
            None
        );
        assert_eq!(generate_text_path(&[], 10.0, 2.0, &config), None);
    }

    #[test]
    fn path_too_short_is_rejected() {
        let config = TextPathConfig::default();
        assert_eq!(
            generate_text_path(&[circle(0.0, 0.0, 5.0, 32)], 200.0, 1.0, &config),
            None
        );
    }

    #[test]
    fn svg_path_data_format() {
        let path = TextPath {
            points: vec![Point::new(1.0, 2.0), Point::new(3.5, 4.25)],
            angles: vec![0.0, 0.0],
            length: 1.0,
        };
        assert_eq!(path.svg_path_data(), "M 1.000 2.000 L 3.500 4.250");
    }

    #[test]
    fn glyphs_are_centered_along_path() {
        let path = TextPath {
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            angles: vec![0.0, 45.0, 90.0],
            length: 20.0,
        };
        let placed = path.glyph_positions(&[2.0, 2.0, 2.0, 2.0]);
        assert_eq!(placed.len(), 4);
        assert_eq!(placed[0], (Point::new(7.0, 0.0), 0.0));
        assert_eq!(placed[1], (Point::new(9.0, 0.0), 0.0));
        assert_eq!(placed[2], (Point::new(10.0, 1.0), 90.0));
        assert_eq!(placed[3], (Point::new(10.0, 3.0), 90.0));
    }

    #[test]
    fn long_text_shrinks_to_path() {
        let config = TextPathConfig::default();
        let path = TextPath {
            points: vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)],
            angles: vec![0.0, 0.0],
            length: 10.0,
        };
        assert_eq!(path.fitted_font_size(5.0, 4.0, &config), 4.0);
        assert!((path.fitted_font_size(20.0, 4.0, &config) - 1.9).abs() < 1e-12);
    }

    #[test]
    fn missing_angles_fall_back_to_horizontal() {
        let path = TextPath {
            points: vec![Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(4.0, 0.0)],
            angles: vec![],
            length: 4.0,
        };
        assert_eq!(path.point_at(0.0), Some((Point::new(0.0, 0.0), 0.0)));
        assert_eq!(path.point_at(100.0), Some((Point::new(4.0, 0.0), 0.0)));
        assert_eq!(path.glyph_positions(&[1.0]).len(), 1);
    }
}
