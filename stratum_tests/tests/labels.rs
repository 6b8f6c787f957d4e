// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use stratum::{
    EstimatedMetrics, LabelConfig, LabelContext, LabelKind, LabelPlacer, Layer, Polygon, Rect,
    SvgConfig, VectorRenderer,
};
use stratum_dev::{rect, square, terraced_hill};

use crate::util::{init_logger, raster_config, raster_renderer, svg_config};

fn labelled(labels: LabelConfig) -> SvgConfig {
    SvgConfig {
        labels,
        elevation_labels: false,
        ..svg_config()
    }
}

#[test]
fn labels_visible_template_is_substituted() {
    let config = labelled(LabelConfig {
        base_visible: "Base %{e}m".into(),
        layer_visible: "Layer %{n} of 3".into(),
        ..LabelConfig::default()
    });
    let renderer = VectorRenderer::new(config);
    let (base, report) = renderer.render_layer(&terraced_hill(), 0).unwrap();
    assert!(base.contains(">Base 100m</text>"), "{base}");
    assert_eq!(report.labels_placed, 1);

    let (top, _) = renderer.render_layer(&terraced_hill(), 2).unwrap();
    assert!(top.contains(">Layer 3 of 3</text>"), "{top}");
    assert!(top.contains("text-anchor=\"end\""), "layer labels hug the right edge");
}

#[test]
fn labels_hidden_label_is_placed_under_next_layer() {
    let config = labelled(LabelConfig {
        layer_hidden: "H%{n}".into(),
        ..LabelConfig::default()
    });
    let (svg, report) = VectorRenderer::new(config)
        .render_layer(&terraced_hill(), 1)
        .unwrap();
    assert_eq!(report.labels_placed, 1);
    assert_eq!(report.labels_suppressed, 0);
    assert!(svg.contains("H2</"), "{svg}");
    assert!(svg.contains("opacity=\"0.7\""), "hidden labels are faded");
}

#[test]
fn labels_hidden_label_is_suppressed_without_room() {
    init_logger();
    let layers = vec![
        Layer::new(0.0, vec![Polygon::new(square(0.0, 100.0), vec![])]),
        Layer::new(10.0, vec![Polygon::new(rect(50.0, 50.0, 50.5, 50.5), vec![])]),
    ];
    let config = labelled(LabelConfig {
        base_hidden: "Hidden label".into(),
        ..LabelConfig::default()
    });
    let (svg, report) = VectorRenderer::new(config).render_layer(&layers, 0).unwrap();
    assert_eq!(report.labels_suppressed, 1);
    assert_eq!(report.labels_placed, 0);
    assert!(!svg.contains("Hidden label"), "suppressed labels are not written");
}

#[test]
fn labels_hidden_position_lies_in_covering_shape() {
    let config = LabelConfig {
        layer_hidden: "Covered".into(),
        ..LabelConfig::default()
    };
    let next = [Polygon::new(rect(30.0, 40.0, 70.0, 60.0), vec![])];
    let ctx = LabelContext {
        is_base: false,
        layer_number: 4,
        elevation: 400.0,
        bounds: Rect::new(0.0, 0.0, 1.0, 1.0),
        content_bbox: Rect::new(0.0, 0.0, 100.0, 100.0),
        hidden_bbox: Rect::new(30.0, 40.0, 70.0, 60.0),
        next_layer_polygons: Some(&next[..]),
    };
    let labels = LabelPlacer::new(&config, 1.0).place_labels(&ctx, &mut EstimatedMetrics::default());
    let hidden = labels.hidden.unwrap();
    assert_eq!(hidden.kind, LabelKind::Hidden);
    assert!(
        Rect::new(30.0, 40.0, 70.0, 60.0).contains(hidden.position()),
        "hidden label at {:?}",
        hidden.position()
    );
    assert!(labels.visible.is_none(), "no visible template configured");
}

#[test]
fn labels_are_rasterized_with_the_glyph_source() {
    let mut renderer = raster_renderer(stratum::RasterConfig {
        dpi: 25.4 * 4.0,
        labels: LabelConfig {
            base_visible: "AB C".into(),
            ..LabelConfig::default()
        },
        ..raster_config()
    });
    let (canvas, report) = renderer.render_layer(&terraced_hill(), 0).unwrap();
    assert_eq!(report.labels_placed, 1);
    let labelled = canvas.to_rgba8();
    let (plain, _) = raster_renderer(raster_config())
        .render_layer(&terraced_hill(), 0)
        .unwrap();
    assert_ne!(labelled, plain.to_rgba8(), "label glyphs change the image");
}
