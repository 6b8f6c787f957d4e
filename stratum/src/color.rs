// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elevation color mapping.

use peniko::Color;

use crate::geometry::Layer;

/// Inclusive range of elevations in a stack.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ElevationRange {
    /// Lowest elevation.
    pub min: f64,
    /// Highest elevation.
    pub max: f64,
}

impl ElevationRange {
    /// Creates a range, swapping the bounds if needed.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Returns the range spanned by the elevations of every layer.
    pub fn from_layers(layers: &[Layer]) -> Option<Self> {
        layers
            .iter()
            .map(|layer| layer.elevation)
            .filter(|e| e.is_finite())
            .fold(None, |range, e| match range {
                None => Some(Self::new(e, e)),
                Some(r) => Some(Self::new(r.min.min(e), r.max.max(e))),
            })
    }

    /// Maps an elevation to `[0, 1]`.
    ///
    /// An empty range maps everything to 1, the upper end of every scheme.
    pub fn normalize(&self, elevation: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return 1.0;
        }
        ((elevation - self.min) / span).clamp(0.0, 1.0)
    }
}

/// A color ramp for elevation bands.
///
/// Every scheme has its own table; none is derived from another.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Black at the lowest band to white at the highest.
    Grayscale,
    /// Brown lowlands, green slopes, tan uplands and white peaks.
    #[default]
    Terrain,
    /// Violet through red.
    Rainbow,
    /// The palette of printed topographic maps: green, yellow, brown, white.
    Topographic,
    /// Classic hypsometric tints from deep green to pale gray.
    Hypsometric,
}

type Stop = (f32, [f32; 3]);

const GRAYSCALE: &[Stop] = &[(0.0, [0.0, 0.0, 0.0]), (1.0, [1.0, 1.0, 1.0])];

const TERRAIN: &[Stop] = &[
    (0.0, [0.4, 0.2, 0.1]),
    (0.3, [0.2, 0.6, 0.1]),
    (0.7, [0.8, 0.8, 0.6]),
    (1.0, [1.0, 1.0, 1.0]),
];

const RAINBOW: &[Stop] = &[
    (0.0, [0.5, 0.0, 1.0]),
    (0.2, [0.0, 0.0, 1.0]),
    (0.4, [0.0, 1.0, 1.0]),
    (0.6, [0.0, 1.0, 0.0]),
    (0.8, [1.0, 1.0, 0.0]),
    (1.0, [1.0, 0.0, 0.0]),
];

const TOPOGRAPHIC: &[Stop] = &[
    (0.0, [0.36, 0.6, 0.33]),
    (0.25, [0.67, 0.8, 0.45]),
    (0.5, [0.95, 0.87, 0.55]),
    (0.75, [0.7, 0.5, 0.3]),
    (1.0, [0.98, 0.98, 0.98]),
];

const HYPSOMETRIC: &[Stop] = &[
    (0.0, [0.0, 0.38, 0.28]),
    (0.15, [0.3, 0.6, 0.3]),
    (0.35, [0.75, 0.84, 0.48]),
    (0.55, [0.96, 0.89, 0.6]),
    (0.75, [0.84, 0.6, 0.36]),
    (0.9, [0.66, 0.5, 0.44]),
    (1.0, [0.92, 0.92, 0.92]),
];

impl ColorScheme {
    /// Every scheme, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Grayscale,
        Self::Terrain,
        Self::Rainbow,
        Self::Topographic,
        Self::Hypsometric,
    ];

    fn stops(self) -> &'static [Stop] {
        match self {
            Self::Grayscale => GRAYSCALE,
            Self::Terrain => TERRAIN,
            Self::Rainbow => RAINBOW,
            Self::Topographic => TOPOGRAPHIC,
            Self::Hypsometric => HYPSOMETRIC,
        }
    }

    /// Returns the color at normalized position `t`, clamped to `[0, 1]`.
    pub fn at(self, t: f64) -> Color {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "color interpolation happens in f32"
        )]
        let t = t.clamp(0.0, 1.0) as f32;
        let stops = self.stops();
        let rgb = stops
            .windows(2)
            .find(|w| t <= w[1].0)
            .map(|w| {
                let (t0, c0) = w[0];
                let (t1, c1) = w[1];
                let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
                [
                    c0[0] + (c1[0] - c0[0]) * f,
                    c0[1] + (c1[1] - c0[1]) * f,
                    c0[2] + (c1[2] - c0[2]) * f,
                ]
            })
            .unwrap_or(stops[stops.len() - 1].1);
        Color::new([rgb[0], rgb[1], rgb[2], 1.0])
    }

    /// Maps an elevation to a color given the range of the whole stack.
    pub fn map(self, elevation: f64, range: ElevationRange) -> Color {
        self.at(range.normalize(elevation))
    }
}

/// How layers are filled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RenderMode {
    /// Fill with the configured color scheme.
    #[default]
    FullColor,
    /// Fill with the grayscale scheme, whatever scheme is configured.
    Grayscale,
    /// Outlines only.
    Monochrome,
}

impl RenderMode {
    /// Returns the scheme used to fill, or `None` if this mode does not fill.
    pub fn fill_scheme(self, configured: ColorScheme) -> Option<ColorScheme> {
        match self {
            Self::FullColor => Some(configured),
            Self::Grayscale => Some(ColorScheme::Grayscale),
            Self::Monochrome => None,
        }
    }
}

/// Converts a color to 8-bit channels.
///
/// Channels are truncated rather than rounded. Both backends go through this
/// function so that vector and raster output agree to the bit.
pub fn rgba8(color: Color) -> [u8; 4] {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "channels are clamped to [0, 255]"
    )]
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0) as u8;
    let [r, g, b, a] = color.components;
    [channel(r), channel(g), channel(b), channel(a)]
}

/// Formats the RGB channels of a color as `#rrggbb`.
pub(crate) fn hex(color: Color) -> String {
    let [r, g, b, _] = rgba8(color);
    format!("#{r:02X}{g:02X}{b:02X}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grayscale_endpoints() {
        let range = ElevationRange::new(100.0, 300.0);
        assert_eq!(rgba8(ColorScheme::Grayscale.map(100.0, range)), [0, 0, 0, 255]);
        assert_eq!(
            rgba8(ColorScheme::Grayscale.map(300.0, range)),
            [255, 255, 255, 255]
        );
        assert_eq!(
            rgba8(ColorScheme::Grayscale.map(200.0, range)),
            [127, 127, 127, 255]
        );
    }

    #[test]
    fn out_of_range_is_clamped() {
        let range = ElevationRange::new(0.0, 10.0);
        for scheme in ColorScheme::ALL {
            assert_eq!(
                scheme.map(-50.0, range).components,
                scheme.at(0.0).components,
                "{scheme:?}"
            );
            assert_eq!(
                scheme.map(50.0, range).components,
                scheme.at(1.0).components,
                "{scheme:?}"
            );
        }
    }

    #[test]
    fn empty_range_uses_upper_band() {
        let range = ElevationRange::new(42.0, 42.0);
        for scheme in ColorScheme::ALL {
            assert_eq!(
                scheme.map(42.0, range).components,
                scheme.at(1.0).components,
                "{scheme:?}"
            );
        }
    }

    #[test]
    fn terrain_hits_its_stops() {
        assert_eq!(rgba8(ColorScheme::Terrain.at(0.0)), [102, 51, 25, 255]);
        assert_eq!(rgba8(ColorScheme::Terrain.at(1.0)), [255, 255, 255, 255]);
    }

    #[test]
    fn schemes_are_distinct() {
        let samples: Vec<_> = ColorScheme::ALL
            .iter()
            .map(|scheme| rgba8(scheme.at(0.4)))
            .collect();
        for (i, a) in samples.iter().enumerate() {
            for b in &samples[i + 1..] {
                assert_ne!(a, b, "schemes should not share a palette");
            }
        }
    }

    #[test]
    fn render_mode_selects_scheme() {
        assert_eq!(
            RenderMode::FullColor.fill_scheme(ColorScheme::Rainbow),
            Some(ColorScheme::Rainbow)
        );
        assert_eq!(
            RenderMode::Grayscale.fill_scheme(ColorScheme::Rainbow),
            Some(ColorScheme::Grayscale)
        );
        assert_eq!(RenderMode::Monochrome.fill_scheme(ColorScheme::Rainbow), None);
    }

    #[test]
    fn range_from_layers() {
        let layers = [
            Layer::new(300.0, vec![]),
            Layer::new(100.0, vec![]),
            Layer::new(f64::NAN, vec![]),
        ];
        assert_eq!(
            ElevationRange::from_layers(&layers),
            Some(ElevationRange::new(100.0, 300.0))
        );
        assert_eq!(ElevationRange::from_layers(&[]), None);
    }

    #[test]
    fn hex_formatting() {
        assert_eq!(hex(Color::from_rgb8(255, 0, 255)), "#FF00FF");
    }
}
