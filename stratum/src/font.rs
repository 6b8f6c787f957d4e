// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement and glyph rasterization.

use std::path::{Path, PathBuf};

use fontique::{Collection, CollectionOptions, SourceKind};
use swash::scale::image::Content;
use swash::scale::{Render, ScaleContext, Source, StrikeWith};
use swash::zeno::{Angle, Format, Transform};
use swash::FontRef;

use crate::{Error, Result};

/// Measures text for layout.
///
/// Sizes and results share one unit, millimeters on the vector backend and
/// pixels on the raster backend.
pub trait TextMeasure {
    /// Returns the advance width of `text` at `size`, or `None` if the text
    /// cannot be measured.
    fn measure_text_width(&mut self, text: &str, size: f64) -> Option<f64>;

    /// Returns the height of one line of text at `size`.
    fn line_height(&mut self, size: f64) -> f64 {
        size
    }
}

/// A rasterized glyph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphBitmap {
    /// Offset from the pen position to the left edge of the mask.
    pub left: i32,
    /// Offset from the baseline up to the top edge of the mask.
    pub top: i32,
    /// Width of the mask in pixels.
    pub width: u32,
    /// Height of the mask in pixels.
    pub height: u32,
    /// Horizontal advance in pixels.
    pub advance: f32,
    /// Coverage values, row-major, `width * height` long.
    pub mask: Vec<u8>,
}

/// A font that can also rasterize its glyphs.
pub trait GlyphSource: TextMeasure {
    /// Rasterizes the glyph for `ch` at `size` pixels.
    ///
    /// `rotation` is in degrees, clockwise on the canvas.
    fn rasterize_glyph(&mut self, ch: char, size: f64, rotation: f64) -> Option<GlyphBitmap>;
}

/// Font-free measurement with a fixed average character width.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EstimatedMetrics {
    /// Average advance of a character relative to the font size.
    pub char_width_ratio: f64,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
        }
    }
}

impl TextMeasure for EstimatedMetrics {
    fn measure_text_width(&mut self, text: &str, size: f64) -> Option<f64> {
        Some(text.chars().count() as f64 * size * self.char_width_ratio)
    }
}

/// Where to look for a font.
#[derive(Clone, Debug, PartialEq)]
pub struct FontConfig {
    /// A font file to use if it exists.
    pub path: Option<PathBuf>,
    /// A family to look up among the system fonts.
    pub family: String,
    /// Font files probed, in order, when neither of the above is usable.
    pub fallback_paths: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            family: "Arial".into(),
            fallback_paths: [
                "/System/Library/Fonts/Helvetica.ttc",
                "/System/Library/Fonts/Supplemental/Arial.ttf",
                "/Library/Fonts/Arial.ttf",
                "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/dejavu/DejaVuSans.ttf",
                "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
                "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
                "C:\\Windows\\Fonts\\arial.ttf",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

impl FontConfig {
    fn candidates(&self) -> Vec<PathBuf> {
        self.path
            .iter()
            .chain(&self.fallback_paths)
            .cloned()
            .collect()
    }
}

/// Returns the first usable font file for `config`.
///
/// The explicit path wins if it exists, then the default face of the
/// configured family among the system fonts, then the fallback list.
pub fn resolve_font_path(config: &FontConfig) -> Option<PathBuf> {
    if let Some(path) = config.path.as_ref().filter(|p| p.is_file()) {
        return Some(path.clone());
    }
    if let Some((path, _)) = system_font_path(&config.family) {
        return Some(path);
    }
    config.fallback_paths.iter().find(|p| p.is_file()).cloned()
}

fn system_font_path(family: &str) -> Option<(PathBuf, u32)> {
    let mut collection = Collection::new(CollectionOptions {
        shared: false,
        system_fonts: true,
    });
    let family = collection.family_by_name(family)?;
    let font = family.default_font()?;
    match &font.source().kind {
        SourceKind::Path(path) => Some((path.to_path_buf(), font.index())),
        SourceKind::Memory(_) => None,
    }
}

/// A loaded font face and the scaling state used to rasterize it.
///
/// Scaling state is reused between calls, so a resource must be owned by a
/// single renderer. Dropping it releases the font data.
pub struct FontResource {
    data: Vec<u8>,
    index: u32,
    path: Option<PathBuf>,
    context: ScaleContext,
}

impl core::fmt::Debug for FontResource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FontResource")
            .field("path", &self.path)
            .field("index", &self.index)
            .field("len", &self.data.len())
            .finish_non_exhaustive()
    }
}

impl FontResource {
    /// Finds and loads a font as described by `config`.
    pub fn resolve(config: &FontConfig) -> Result<Self> {
        if let Some(path) = config.path.as_ref().filter(|p| p.is_file()) {
            return Self::load(path);
        }
        if let Some((path, index)) = system_font_path(&config.family) {
            match Self::load_index(&path, index) {
                Ok(font) => return Ok(font),
                Err(err) => log::warn!("system font for {:?} unusable: {err}", config.family),
            }
        }
        match config.fallback_paths.iter().find(|p| p.is_file()) {
            Some(path) => Self::load(path),
            None => Err(Error::FontNotFound {
                tried: config.candidates(),
            }),
        }
    }

    /// Loads the first face of a font file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_index(path, 0)
    }

    fn load_index(path: &Path, index: u32) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let mut font = Self::from_bytes(data, index).map_err(|_| Error::InvalidFont {
            path: Some(path.to_path_buf()),
        })?;
        log::debug!("loaded font {}", path.display());
        font.path = Some(path.to_path_buf());
        Ok(font)
    }

    /// Creates a resource from font data already in memory.
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Result<Self> {
        if FontRef::from_index(&data, index as usize).is_none() {
            return Err(Error::InvalidFont { path: None });
        }
        Ok(Self {
            data,
            index,
            path: None,
            context: ScaleContext::new(),
        })
    }

    /// The file the font was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn font(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(&self.data, self.index as usize)
    }
}

impl TextMeasure for FontResource {
    fn measure_text_width(&mut self, text: &str, size: f64) -> Option<f64> {
        let font = self.font()?;
        let charmap = font.charmap();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "font sizes fit in f32"
        )]
        let metrics = font.glyph_metrics(&[]).scale(size as f32);
        let width: f32 = text
            .chars()
            .map(|ch| metrics.advance_width(charmap.map(ch)))
            .sum();
        Some(f64::from(width))
    }

    fn line_height(&mut self, size: f64) -> f64 {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "font sizes fit in f32"
        )]
        let metrics = self.font().map(|font| font.metrics(&[]).scale(size as f32));
        metrics.map_or(size, |m| f64::from(m.ascent + m.descent))
    }
}

impl GlyphSource for FontResource {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "font sizes and angles fit in f32"
    )]
    fn rasterize_glyph(&mut self, ch: char, size: f64, rotation: f64) -> Option<GlyphBitmap> {
        let font = FontRef::from_index(&self.data, self.index as usize)?;
        let glyph_id = font.charmap().map(ch);
        let advance = font
            .glyph_metrics(&[])
            .scale(size as f32)
            .advance_width(glyph_id);
        let rotated = rotation.abs() > 1e-3;
        let mut scaler = self
            .context
            .builder(font)
            .size(size as f32)
            .hint(!rotated)
            .build();
        // Glyph space is y-up, so a clockwise canvas rotation is negative.
        let transform = rotated.then(|| Transform::rotation(Angle::from_degrees(-rotation as f32)));
        let image = Render::new(&[
            Source::ColorOutline(0),
            Source::ColorBitmap(StrikeWith::BestFit),
            Source::Outline,
        ])
        .format(Format::Alpha)
        .transform(transform)
        .render(&mut scaler, glyph_id)?;

        let mask = match image.content {
            Content::Mask => image.data,
            Content::Color => image.data.chunks_exact(4).map(|px| px[3]).collect(),
            Content::SubpixelMask => image.data.chunks_exact(4).map(|px| px[1]).collect(),
        };
        Some(GlyphBitmap {
            left: image.placement.left,
            top: image.placement.top,
            width: image.placement.width,
            height: image.placement.height,
            advance,
            mask,
        })
    }
}
