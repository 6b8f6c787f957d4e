// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use stratum::{Error, Layer, SvgConfig, VectorRenderer};
use stratum_dev::{hill_with_gap, islands, terraced_hill};

use crate::util::{file_names, init_logger, svg_config};

#[test]
fn vector_rendering_is_repeatable() {
    let renderer = VectorRenderer::new(svg_config());
    let layers = islands();
    let (first, _) = renderer.render_layer(&layers, 1).unwrap();
    let (second, _) = renderer.render_layer(&layers, 1).unwrap();
    assert_eq!(first, second);
}

#[test]
fn vector_sheet_is_well_formed() {
    let (svg, report) = VectorRenderer::new(svg_config())
        .render_layer(&terraced_hill(), 1)
        .unwrap();
    assert!(svg.starts_with("<?xml"), "xml declaration first");
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains("width=\"300mm\""));
    assert!(svg.contains("id=\"layer_00_elev_200\""));
    assert!(report.is_finished());
    assert_eq!(report.layer_number, 2);
    assert_eq!(report.outline_segments, 4);
}

#[test]
fn vector_empty_stack_is_rejected() {
    let renderer = VectorRenderer::new(SvgConfig::default());
    assert!(matches!(
        renderer.render_layer(&[], 0),
        Err(Error::EmptyStack)
    ));
    assert!(matches!(
        renderer.render_combined(&[Layer::new(1.0, vec![])]),
        Err(Error::EmptyStack)
    ));
}

#[test]
fn vector_export_skips_empty_layers() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let written = VectorRenderer::new(svg_config()).export_layers(&hill_with_gap(), dir.path(), "relief");
    assert_eq!(written.len(), 3);
    assert_eq!(
        file_names(dir.path()),
        ["relief_layer_01.svg", "relief_layer_03.svg", "relief_layer_04.svg"]
    );
}

#[test]
fn vector_export_combined() {
    let dir = tempfile::tempdir().unwrap();
    let written = VectorRenderer::new(svg_config()).export_combined(&terraced_hill(), dir.path(), "hill");
    assert_eq!(written, [dir.path().join("hill_combined.svg")]);
    let svg = std::fs::read_to_string(&written[0]).unwrap();
    assert!(svg.contains("stroke=\"#FF0000\""), "lowest layer is cut in red");
    assert!(svg.contains("stroke=\"#7F007F\""), "middle layer is cut in purple");
    assert!(svg.contains("stroke=\"#0000FF\""), "highest layer is cut in blue");
}

#[test]
fn vector_export_into_a_file_writes_nothing() {
    init_logger();
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("taken");
    std::fs::write(&blocker, b"").unwrap();
    let written = VectorRenderer::new(svg_config()).export_layers(&terraced_hill(), &blocker, "hill");
    assert!(written.is_empty());
}
