// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Utility functions and types shared across tests.

use std::path::Path;

use stratum::{rgba8, AspectMode, Color, RasterConfig, RasterRenderer, SvgConfig};
use stratum_dev::BlockGlyphs;

/// Routes `log` output through the test harness.
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A small, square, font-free raster setup with nothing but fills and outlines.
pub(crate) fn raster_config() -> RasterConfig {
    RasterConfig {
        width: 200,
        height: Some(200),
        margin: 0,
        aspect: AspectMode::Planar,
        alignment_marks: false,
        border: false,
        anti_alias: false,
        outline_width: 1,
        ..RasterConfig::default()
    }
}

pub(crate) fn raster_renderer(config: RasterConfig) -> RasterRenderer<BlockGlyphs> {
    init_logger();
    RasterRenderer::new(config, BlockGlyphs::default())
}

/// A square page without decorations.
pub(crate) fn svg_config() -> SvgConfig {
    SvgConfig {
        aspect: AspectMode::Planar,
        ..SvgConfig::default()
    }
}

/// The `#RRGGBB` form a color takes in vector output.
pub(crate) fn svg_hex(color: Color) -> String {
    let [r, g, b, _] = rgba8(color);
    format!("#{r:02X}{g:02X}{b:02X}")
}

/// File names in `dir`, sorted.
pub(crate) fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
